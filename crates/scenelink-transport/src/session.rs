//! The outbound WebSocket session.
//!
//! One [`Session`] owns one connection to a fixed endpoint. After
//! [`Session::start`] it keeps that connection alive on its own: a reconnect
//! ticker dials again whenever the socket is down, and a heartbeat ticker
//! sends `system.heartbeat` while it is up. [`Session::send`] is the only
//! entry point meant for arbitrary threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use serde_json::Map;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use scenelink_core::{Event, Outbound, send_envelope};

use crate::errors::TransportError;
use crate::ticker::{TickControl, run_ticker};

/// Event method sent by the heartbeat ticker.
pub const HEARTBEAT_METHOD: &str = "system.heartbeat";

/// Session timing and endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// `ws://` or `wss://` URL.
    pub endpoint: String,
    /// Reconnect ticker period.
    pub reconnect_interval: Duration,
    /// Heartbeat ticker period.
    pub heartbeat_interval: Duration,
}

impl SessionConfig {
    /// Config with the default 5s reconnect and 10s heartbeat periods.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            reconnect_interval: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(10),
        }
    }
}

/// Notifications delivered to subscribers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// A connection was established.
    Connected,
    /// A text frame arrived.
    Message(String),
    /// The connection closed or failed.
    Disconnected {
        /// Close or error diagnostic.
        reason: String,
    },
}

/// A self-healing WebSocket client session.
pub struct Session {
    config: SessionConfig,
    wants_connection: AtomicBool,
    connected: AtomicBool,
    connecting: AtomicBool,
    started: AtomicBool,
    attempts: AtomicU64,
    /// Send side of the live socket's writer. Guarded so `send` can run from any thread.
    outbound: Mutex<Option<mpsc::UnboundedSender<Message>>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<TransportEvent>>>,
    /// Cancels the tickers.
    shutdown: CancellationToken,
    /// Cancels the current socket.
    connection: Mutex<Option<CancellationToken>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("endpoint", &self.config.endpoint)
            .field("connected", &self.is_connected())
            .field("attempts", &self.connect_attempts())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an idle session. Nothing happens until [`start`](Self::start).
    pub fn new(config: SessionConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            wants_connection: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            connecting: AtomicBool::new(false),
            started: AtomicBool::new(false),
            attempts: AtomicU64::new(0),
            outbound: Mutex::new(None),
            subscribers: Mutex::new(Vec::new()),
            shutdown: CancellationToken::new(),
            connection: Mutex::new(None),
        })
    }

    /// Endpoint this session dials.
    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Non-blocking connection snapshot.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Connection attempts made so far.
    pub fn connect_attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Receive connection events and inbound frames.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<TransportEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.lock().push(tx);
        rx
    }

    fn notify(&self, event: &TransportEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Begin connecting and arm both tickers. Must be called inside a Tokio runtime.
    ///
    /// Calling it again while the session is running does nothing.
    pub fn start(self: &Arc<Self>) {
        if self.shutdown.is_cancelled() || self.started.swap(true, Ordering::SeqCst) {
            debug!("start ignored, session already running");
            return;
        }
        self.wants_connection.store(true, Ordering::SeqCst);
        info!(endpoint = %self.config.endpoint, "transport session starting");

        self.spawn_connect();

        let session = Arc::clone(self);
        let _reconnect = tokio::spawn(run_ticker(
            self.config.reconnect_interval,
            self.shutdown.clone(),
            move || session.reconnect_tick(),
        ));
        let session = Arc::clone(self);
        let _heartbeat = tokio::spawn(run_ticker(
            self.config.heartbeat_interval,
            self.shutdown.clone(),
            move || session.heartbeat_tick(),
        ));
    }

    /// Disarm both tickers and close the connection. Final: the session never reconnects.
    pub fn shutdown(&self) {
        self.wants_connection.store(false, Ordering::SeqCst);
        self.shutdown.cancel();
        if let Some(token) = self.connection.lock().take() {
            token.cancel();
        }
        info!("transport session shut down");
    }

    /// Queue a text frame. Dropped with a log when not connected.
    pub fn send(&self, text: String) {
        let outbound = self.outbound.lock();
        match outbound.as_ref() {
            Some(tx) if self.is_connected() => {
                if tx.send(Message::Text(text.into())).is_err() {
                    debug!("send dropped, writer closed");
                }
            }
            _ => debug!(bytes = text.len(), "send dropped, not connected"),
        }
    }

    fn reconnect_tick(self: &Arc<Self>) -> TickControl {
        if !self.wants_connection.load(Ordering::SeqCst) {
            return TickControl::Stop;
        }
        if !self.is_connected() && !self.connecting.load(Ordering::SeqCst) {
            debug!("reconnect tick, dialing");
            self.spawn_connect();
        }
        TickControl::Continue
    }

    fn heartbeat_tick(&self) -> TickControl {
        if !self.wants_connection.load(Ordering::SeqCst) {
            return TickControl::Stop;
        }
        if self.is_connected() {
            send_envelope(self, &Event::new(HEARTBEAT_METHOD, Map::new()));
        }
        TickControl::Continue
    }

    fn spawn_connect(self: &Arc<Self>) {
        if self.connecting.swap(true, Ordering::SeqCst) {
            return;
        }
        let session = Arc::clone(self);
        let _attempt = tokio::spawn(async move {
            if let Err(error) = session.connect_once().await {
                warn!(%error, "connection attempt failed");
            }
            session.connecting.store(false, Ordering::SeqCst);
        });
    }

    async fn connect_once(self: &Arc<Self>) -> Result<(), TransportError> {
        if self.is_connected() || !self.wants_connection.load(Ordering::SeqCst) {
            return Ok(());
        }
        let _ = self.attempts.fetch_add(1, Ordering::SeqCst);
        let (ws, _) = connect_async(self.config.endpoint.as_str())
            .await
            .map_err(|e| TransportError::Connect {
                endpoint: self.config.endpoint.clone(),
                message: e.to_string(),
            })?;

        let token = CancellationToken::new();
        let registered = {
            // `shutdown` clears the flag before taking this lock, so checking under
            // it guarantees the token is either refused here or cancelled there.
            let mut connection = self.connection.lock();
            let wanted = self.wants_connection.load(Ordering::SeqCst);
            if wanted {
                *connection = Some(token.clone());
            }
            wanted
        };
        if !registered {
            let mut ws = ws;
            let _ = ws.close(None).await;
            return Err(TransportError::ShutDown);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        *self.outbound.lock() = Some(tx);
        self.connected.store(true, Ordering::SeqCst);
        info!(endpoint = %self.config.endpoint, "connected");
        self.notify(&TransportEvent::Connected);

        let session = Arc::clone(self);
        let _pump = tokio::spawn(async move {
            let reason = pump(ws, rx, token, &session).await;
            session.teardown(&reason);
        });
        Ok(())
    }

    /// Detach the dead socket so the next attempt starts clean.
    fn teardown(&self, reason: &str) {
        // Clear before `connected` drops so a fresh dial never has its token taken here.
        let _ = self.connection.lock().take();
        *self.outbound.lock() = None;
        self.connected.store(false, Ordering::SeqCst);
        info!(%reason, "disconnected");
        self.notify(&TransportEvent::Disconnected {
            reason: reason.to_owned(),
        });
    }
}

impl Outbound for Session {
    fn send_text(&self, text: String) {
        self.send(text);
    }

    fn is_connected(&self) -> bool {
        Session::is_connected(self)
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Shuttle frames until the socket dies or `token` fires. Returns the close reason.
async fn pump(
    ws: WsStream,
    mut rx: mpsc::UnboundedReceiver<Message>,
    token: CancellationToken,
    session: &Session,
) -> String {
    let (mut ws_tx, mut ws_rx) = ws.split();
    loop {
        tokio::select! {
            outgoing = rx.recv() => {
                let Some(msg) = outgoing else { return "writer closed".into() };
                if let Err(e) = ws_tx.send(msg).await {
                    return format!("write failed: {e}");
                }
            }
            incoming = ws_rx.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        session.notify(&TransportEvent::Message(text.as_str().to_owned()));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        return frame.map_or_else(
                            || "closed by peer".into(),
                            |f| format!("closed by peer: {} {}", f.code, f.reason.as_str()),
                        );
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return format!("read failed: {e}"),
                    None => return "stream ended".into(),
                }
            }
            () = token.cancelled() => {
                while let Ok(msg) = rx.try_recv() {
                    if ws_tx.send(msg).await.is_err() {
                        break;
                    }
                }
                let _ = ws_tx.send(Message::Close(None)).await;
                return "shutdown".into();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    fn fast_config(endpoint: String) -> SessionConfig {
        SessionConfig {
            endpoint,
            reconnect_interval: Duration::from_millis(50),
            heartbeat_interval: Duration::from_millis(40),
        }
    }

    async fn listener() -> (TcpListener, String) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}", listener.local_addr().unwrap());
        (listener, url)
    }

    async fn accept(listener: &TcpListener) -> tokio_tungstenite::WebSocketStream<tokio::net::TcpStream> {
        let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
        tokio_tungstenite::accept_async(stream).await.unwrap()
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<TransportEvent>) -> TransportEvent {
        timeout(WAIT, rx.recv()).await.unwrap().unwrap()
    }

    async fn next_text(ws: &mut tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>) -> String {
        loop {
            let msg = timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
            if let Message::Text(text) = msg {
                return text.as_str().to_owned();
            }
        }
    }

    // ── connect / send / receive ────────────────────────────────────

    #[tokio::test]
    async fn connects_and_exchanges_frames() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();

        let mut server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        assert!(session.is_connected());

        session.send(r#"{"hello":1}"#.into());
        let mut got = next_text(&mut server).await;
        while got.contains(HEARTBEAT_METHOD) {
            got = next_text(&mut server).await;
        }
        assert_eq!(got, r#"{"hello":1}"#);

        server.send(Message::Text("from peer".into())).await.unwrap();
        assert_eq!(
            next_event(&mut events).await,
            TransportEvent::Message("from peer".into())
        );
        session.shutdown();
    }

    #[tokio::test]
    async fn send_while_disconnected_is_dropped() {
        let session = Session::new(fast_config("ws://127.0.0.1:9".into()));
        session.send("nobody listening".into());
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn start_is_idempotent() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();
        session.start();
        let _server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        assert_eq!(session.connect_attempts(), 1);
        session.shutdown();
    }

    // ── heartbeat ───────────────────────────────────────────────────

    #[tokio::test]
    async fn heartbeat_sent_while_connected() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        session.start();
        let mut server = accept(&listener).await;
        let text = next_text(&mut server).await;
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["type"], "evt");
        assert_eq!(v["method"], HEARTBEAT_METHOD);
        session.shutdown();
    }

    #[test]
    fn heartbeat_tick_only_sends_when_connected() {
        let session = Session::new(fast_config("ws://127.0.0.1:9".into()));
        session.wants_connection.store(true, Ordering::SeqCst);
        assert_eq!(session.heartbeat_tick(), TickControl::Continue);
        session.wants_connection.store(false, Ordering::SeqCst);
        assert_eq!(session.heartbeat_tick(), TickControl::Stop);
    }

    #[tokio::test]
    async fn heartbeat_pauses_while_disconnected_and_resumes_after_reconnect() {
        let (logs, _guard) = scenelink_core::logging::capture_logs();
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();

        let mut server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        server.close(None).await.unwrap();
        assert_matches!(next_event(&mut events).await, TransportEvent::Disconnected { .. });

        // The redial sits in the backlog unanswered, so the session stays down
        // across several heartbeat periods.
        logs.clear();
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!session.is_connected());
        assert!(!logs.has_message("send dropped"));

        let mut server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        let v: serde_json::Value = serde_json::from_str(&next_text(&mut server).await).unwrap();
        assert_eq!(v["method"], HEARTBEAT_METHOD);
        session.shutdown();
    }

    // ── reconnect / shutdown ────────────────────────────────────────

    #[tokio::test]
    async fn reconnects_after_peer_close() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();

        let mut server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        server.close(None).await.unwrap();
        assert_matches!(next_event(&mut events).await, TransportEvent::Disconnected { .. });

        let _server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);
        assert!(session.connect_attempts() >= 2);
        session.shutdown();
    }

    #[tokio::test]
    async fn failed_attempts_retry_until_shutdown() {
        let (listener, url) = listener().await;
        drop(listener);
        let session = Session::new(fast_config(url));
        session.start();
        tokio::time::sleep(Duration::from_millis(300)).await;
        let before = session.connect_attempts();
        assert!(before >= 2, "attempts: {before}");

        session.shutdown();
        tokio::time::sleep(Duration::from_millis(100)).await;
        let after_shutdown = session.connect_attempts();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(session.connect_attempts(), after_shutdown);
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn shutdown_closes_the_socket() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();
        let mut server = accept(&listener).await;
        assert_eq!(next_event(&mut events).await, TransportEvent::Connected);

        session.send("last words".into());
        session.shutdown();
        assert_matches!(
            next_event(&mut events).await,
            TransportEvent::Disconnected { reason } => assert_eq!(reason, "shutdown")
        );
        let mut saw_last = false;
        while let Ok(Some(Ok(msg))) = timeout(WAIT, server.next()).await {
            match msg {
                Message::Text(t) if t.as_str() == "last words" => saw_last = true,
                Message::Close(_) => break,
                _ => {}
            }
        }
        assert!(saw_last);
        session.start();
        assert!(!session.is_connected());
    }

    #[tokio::test]
    async fn shutdown_during_handshake_never_connects() {
        let (listener, url) = listener().await;
        let session = Session::new(fast_config(url));
        let mut events = session.subscribe();
        session.start();

        let (stream, _) = timeout(WAIT, listener.accept()).await.unwrap().unwrap();
        session.shutdown();
        let mut server = tokio_tungstenite::accept_async(stream).await.unwrap();

        loop {
            match timeout(WAIT, server.next()).await.unwrap() {
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            }
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!session.is_connected());
        assert!(session.connection.lock().is_none());
        assert_matches!(events.try_recv(), Err(_));
    }
}
