//! Structured logging with `tracing`.
//!
//! - [`init_subscriber`] installs the stderr `fmt` subscriber
//! - [`FieldVisitor`] extracts the message and fields from an event; shared by
//!   the test capture layer and the peer log forwarder
//! - [`capture_logs`] installs a thread-local capture subscriber for tests

pub mod test_utils;
mod visitor;

pub use test_utils::{CapturedEvent, CapturedLogs, capture_logs};
pub use visitor::FieldVisitor;

/// Build the env filter: `RUST_LOG` wins, otherwise `level`.
pub fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Initialize the global tracing subscriber with stderr output only.
///
/// Call once at startup. Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_subscriber_does_not_panic() {
        init_subscriber("warn");
        init_subscriber("debug");
    }
}
