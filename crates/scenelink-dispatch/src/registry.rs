//! Method registry.

use std::collections::HashMap;
use std::sync::Arc;

use scenelink_core::{BridgeError, codes};
use serde_json::{Map, Value};

use crate::context::HandlerContext;

/// A handler's answer: response code plus `data`.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    /// Response code.
    pub code: u16,
    /// Response body.
    pub data: Value,
}

impl Reply {
    /// A 200 reply.
    pub fn ok(data: Value) -> Self {
        Self {
            code: codes::OK,
            data,
        }
    }

    /// A reply with an explicit code and a full body.
    ///
    /// Partial batches use this to report per-item results alongside a
    /// failure code.
    pub fn with_code(code: u16, data: Value) -> Self {
        Self { code, data }
    }
}

/// Handler outcome. Errors become error responses at the dispatcher.
pub type HandlerResult = Result<Reply, BridgeError>;

/// Trait implemented by every command handler.
///
/// Handlers run on the host thread and must not block on I/O.
pub trait CommandHandler: Send + Sync {
    /// Execute the handler with the request payload.
    fn handle(&self, payload: &Map<String, Value>, ctx: &mut HandlerContext<'_>) -> HandlerResult;
}

/// Registry mapping method names to handlers.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl MethodRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a method name, replacing any previous one.
    pub fn register(&mut self, method: &str, handler: impl CommandHandler + 'static) {
        let _ = self.handlers.insert(method.to_owned(), Arc::new(handler));
    }

    /// Handler for `method`.
    pub fn get(&self, method: &str) -> Option<&Arc<dyn CommandHandler>> {
        self.handlers.get(method)
    }

    /// List all registered method names (sorted).
    pub fn methods(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Check whether a method is registered.
    pub fn has_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }
}

impl std::fmt::Debug for MethodRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MethodRegistry")
            .field("methods", &self.methods())
            .finish()
    }
}
