//! # scenelink-core
//!
//! Shared vocabulary for the SceneLink bridge.
//!
//! - **Envelope**: the `ver`/`type`/`id`/`method` JSON wrapper for requests,
//!   responses and events, with lenient decoding
//! - **Errors**: [`BridgeError`] taxonomy and the HTTP-like response codes
//! - **Outbound**: the thread-safe send seam every component writes through
//! - **Logging**: `tracing` subscriber setup and log capture for tests

#![deny(unsafe_code)]

pub mod envelope;
pub mod errors;
pub mod logging;
pub mod outbound;

pub use envelope::{Envelope, EnvelopeKind, Event, PROTOCOL_VERSION, Request, Response};
pub use errors::{BridgeError, codes};
pub use outbound::{Outbound, send_envelope};
