//! # scenelink-transport
//!
//! The single outbound WebSocket connection to the peer.
//!
//! - **Session**: connect, mutex-guarded send, subscriber fan-out
//! - **Tickers**: fixed-period reconnect and heartbeat tasks that re-arm
//!   themselves until told to stop

#![deny(unsafe_code)]

pub mod errors;
pub mod session;
pub mod ticker;

pub use errors::TransportError;
pub use session::{HEARTBEAT_METHOD, Session, SessionConfig, TransportEvent};
pub use ticker::{TickControl, TickerExit, run_ticker};
