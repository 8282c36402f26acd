//! The send seam between bridge logic and the transport.

use serde::Serialize;

/// Anything that can push a text frame to the connected peer.
///
/// Implementations must be callable from any thread. A send while
/// disconnected is logged and dropped; callers never see a failure.
pub trait Outbound: Send + Sync {
    /// Queue a text frame for delivery.
    fn send_text(&self, text: String);

    /// Whether a peer is currently connected.
    fn is_connected(&self) -> bool;
}

/// Serialize an envelope and send it. Encoding failures are logged.
pub fn send_envelope<T: Serialize>(out: &dyn Outbound, envelope: &T) {
    match serde_json::to_string(envelope) {
        Ok(text) => out.send_text(text),
        Err(e) => tracing::error!(error = %e, "failed to encode envelope"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use parking_lot::Mutex;
    use serde_json::Map;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl Outbound for Recorder {
        fn send_text(&self, text: String) {
            self.0.lock().push(text);
        }
        fn is_connected(&self) -> bool {
            true
        }
    }

    #[test]
    fn send_envelope_encodes_json() {
        let rec = Recorder::default();
        send_envelope(&rec, &Event::new("system.heartbeat", Map::new()));
        let sent = rec.0.lock();
        assert_eq!(sent.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&sent[0]).unwrap();
        assert_eq!(v["method"], "system.heartbeat");
    }
}
