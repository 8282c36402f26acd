//! # scenelink-logging
//!
//! Peer log forwarding for the SceneLink bridge.
//!
//! [`ForwardLayer`] is a [`tracing_subscriber::Layer`] that turns tracing
//! events into `log.entry` event envelopes and pushes them through the
//! [`Outbound`](scenelink_core::Outbound) seam while a peer is connected.
//! Forwarding is off until enabled through the [`ForwardHandle`].

#![deny(unsafe_code)]

pub mod forward;

pub use forward::{ForwardHandle, ForwardLayer, LOG_ENTRY_METHOD, peer_level};

/// Initialize the global subscriber with stderr output and peer forwarding.
///
/// Composes the `fmt` layer with a [`ForwardLayer`] on a shared
/// [`tracing_subscriber::Registry`]. Call once at startup.
pub fn init_subscriber_with_forwarding(level: &str, layer: ForwardLayer) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(scenelink_core::logging::env_filter(level))
        .with(fmt_layer)
        .with(layer)
        .try_init();
}
