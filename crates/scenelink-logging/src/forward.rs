//! `log.entry` forwarding layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use scenelink_core::logging::FieldVisitor;
use scenelink_core::{Event as EventEnvelope, Outbound, send_envelope};
use serde_json::{Map, Value};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Event method used for forwarded log lines.
pub const LOG_ENTRY_METHOD: &str = "log.entry";

/// Targets never forwarded; the transport logs while sending.
const SUPPRESSED_TARGET: &str = "scenelink_transport";

/// Verbosity name the peer expects for a tracing level.
pub fn peer_level(level: Level) -> &'static str {
    match level {
        Level::ERROR => "Error",
        Level::WARN => "Warning",
        Level::INFO => "Display",
        Level::DEBUG => "Log",
        Level::TRACE => "Verbose",
    }
}

struct ForwardState {
    enabled: AtomicBool,
    min_level: Level,
    sink: RwLock<Option<Arc<dyn Outbound>>>,
}

/// Runtime control over an installed [`ForwardLayer`].
#[derive(Clone)]
pub struct ForwardHandle {
    state: Arc<ForwardState>,
}

impl ForwardHandle {
    /// Turn forwarding on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.state.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Whether forwarding is on.
    pub fn is_enabled(&self) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
    }

    /// Route forwarded events through `sink`.
    pub fn attach(&self, sink: Arc<dyn Outbound>) {
        *self.state.sink.write() = Some(sink);
    }

    /// Stop routing events anywhere.
    pub fn detach(&self) {
        *self.state.sink.write() = None;
    }
}

/// Tracing layer that forwards events to the peer.
pub struct ForwardLayer {
    state: Arc<ForwardState>,
}

impl ForwardLayer {
    /// Create a layer forwarding events at or above `min_level`.
    ///
    /// `min_level` accepts tracing level names (`info`, `WARN`...); anything
    /// unparsable falls back to `info`.
    pub fn new(min_level: &str, enabled: bool) -> Self {
        let min_level = min_level.parse::<Level>().unwrap_or(Level::INFO);
        Self {
            state: Arc::new(ForwardState {
                enabled: AtomicBool::new(enabled),
                min_level,
                sink: RwLock::new(None),
            }),
        }
    }

    /// Get a handle for toggling and attaching the sink.
    pub fn handle(&self) -> ForwardHandle {
        ForwardHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn should_forward(&self, level: Level, target: &str) -> bool {
        self.state.enabled.load(Ordering::SeqCst)
            && level <= self.state.min_level
            && !target.starts_with(SUPPRESSED_TARGET)
    }
}

impl<S> Layer<S> for ForwardLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.should_forward(*metadata.level(), metadata.target()) {
            return;
        }
        let sink = self.state.sink.read().clone();
        let Some(sink) = sink else {
            return;
        };
        if !sink.is_connected() {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let mut payload = Map::new();
        let _ = payload.insert("text".into(), Value::String(visitor.render()));
        let _ = payload.insert(
            "category".into(),
            Value::String(metadata.target().to_owned()),
        );
        let _ = payload.insert(
            "level".into(),
            Value::String(peer_level(*metadata.level()).to_owned()),
        );
        send_envelope(sink.as_ref(), &EventEnvelope::new(LOG_ENTRY_METHOD, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    mock! {
        Sink {}
        impl Outbound for Sink {
            fn send_text(&self, text: String);
            fn is_connected(&self) -> bool;
        }
    }

    #[derive(Default)]
    struct Recorder {
        sent: parking_lot::Mutex<Vec<Value>>,
        connected: bool,
    }

    impl Outbound for Recorder {
        fn send_text(&self, text: String) {
            if let Ok(v) = serde_json::from_str(&text) {
                self.sent.lock().push(v);
            }
        }
        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    fn install(layer: ForwardLayer) -> tracing::subscriber::DefaultGuard {
        tracing_subscriber::registry().with(layer).set_default()
    }

    // ── level mapping ───────────────────────────────────────────────

    #[test]
    fn peer_levels() {
        assert_eq!(peer_level(Level::ERROR), "Error");
        assert_eq!(peer_level(Level::WARN), "Warning");
        assert_eq!(peer_level(Level::INFO), "Display");
        assert_eq!(peer_level(Level::DEBUG), "Log");
        assert_eq!(peer_level(Level::TRACE), "Verbose");
    }

    // ── forwarding ──────────────────────────────────────────────────

    #[test]
    fn forwards_when_enabled_and_connected() {
        let layer = ForwardLayer::new("info", true);
        let handle = layer.handle();
        let sink = Arc::new(Recorder {
            connected: true,
            ..Recorder::default()
        });
        handle.attach(sink.clone());
        let _guard = install(layer);

        tracing::warn!(target: "scenelink_dispatch::handlers", count = 2, "spawned");

        let sent = sink.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["type"], "evt");
        assert_eq!(sent[0]["method"], "log.entry");
        assert_eq!(sent[0]["payload"]["level"], "Warning");
        assert_eq!(sent[0]["payload"]["category"], "scenelink_dispatch::handlers");
        assert_eq!(sent[0]["payload"]["text"], "spawned count=2");
    }

    #[test]
    fn below_min_level_is_dropped() {
        let layer = ForwardLayer::new("warn", true);
        let handle = layer.handle();
        let sink = Arc::new(Recorder {
            connected: true,
            ..Recorder::default()
        });
        handle.attach(sink.clone());
        let _guard = install(layer);

        tracing::info!("chatty");
        tracing::error!("loud");

        let sent = sink.sent.lock();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["payload"]["level"], "Error");
    }

    #[test]
    fn transport_target_is_never_forwarded() {
        let mut sink = MockSink::new();
        sink.expect_is_connected().returning(|| true);
        sink.expect_send_text().never();

        let layer = ForwardLayer::new("trace", true);
        layer.handle().attach(Arc::new(sink));
        let _guard = install(layer);

        tracing::warn!(target: "scenelink_transport::session", "send while disconnected");
    }

    #[test]
    fn disconnected_sink_receives_nothing() {
        let mut sink = MockSink::new();
        sink.expect_is_connected().returning(|| false);
        sink.expect_send_text().never();

        let layer = ForwardLayer::new("info", true);
        layer.handle().attach(Arc::new(sink));
        let _guard = install(layer);

        tracing::info!("hello");
    }

    #[test]
    fn disabled_by_default_and_toggleable() {
        let layer = ForwardLayer::new("info", false);
        let handle = layer.handle();
        let sink = Arc::new(Recorder {
            connected: true,
            ..Recorder::default()
        });
        handle.attach(sink.clone());
        let _guard = install(layer);

        tracing::info!("first");
        assert!(sink.sent.lock().is_empty());

        handle.set_enabled(true);
        assert!(handle.is_enabled());
        tracing::info!("second");
        assert_eq!(sink.sent.lock().len(), 1);

        handle.detach();
        tracing::info!("third");
        assert_eq!(sink.sent.lock().len(), 1);
    }

    #[test]
    fn bad_min_level_defaults_to_info() {
        let layer = ForwardLayer::new("loud", true);
        assert!(layer.should_forward(Level::INFO, "x"));
        assert!(!layer.should_forward(Level::DEBUG, "x"));
    }
}
