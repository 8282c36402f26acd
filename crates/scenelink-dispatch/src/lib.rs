//! # scenelink-dispatch
//!
//! Routes decoded requests to handlers on the host thread.
//!
//! - **Registry**: method name to [`CommandHandler`], populated once at startup
//! - **Dispatcher**: envelope decoding, routing, response correlation and the
//!   deferred hop onto the host thread
//! - **Observer**: operator notifications for peer responses
//! - **Lifecycle**: `project.info` / `project.closed` events
//! - **Pump**: transport events to the dispatcher
//! - **Handlers**: the built-in `entity.*` and `project.*` commands

#![deny(unsafe_code)]

pub mod context;
pub mod dispatcher;
pub mod handlers;
pub mod lifecycle;
pub mod observer;
pub mod pump;
pub mod registry;

pub use context::HandlerContext;
pub use dispatcher::Dispatcher;
pub use lifecycle::{PROJECT_CLOSED_EVENT, PROJECT_INFO_EVENT, send_project_closed, send_project_info};
pub use observer::{Notification, ResponseObserver};
pub use pump::run_pump;
pub use registry::{CommandHandler, HandlerResult, MethodRegistry, Reply};
