//! Transport errors.

use thiserror::Error;

/// Failures of a single connection attempt.
///
/// These never escape the session: the reconnect ticker logs them and
/// retries on its next period.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The WebSocket handshake failed.
    #[error("failed to connect to {endpoint}: {message}")]
    Connect {
        /// Endpoint dialed.
        endpoint: String,
        /// Handshake diagnostic.
        message: String,
    },

    /// `shutdown()` ran while the attempt was in flight.
    #[error("session shut down during connect")]
    ShutDown,
}
