//! Response codes and the bridge error taxonomy.

use serde_json::{Map, Value, json};

/// HTTP-like response codes carried in the `code` field of a response.
pub mod codes {
    /// Success.
    pub const OK: u16 = 200;
    /// Malformed request or missing required field.
    pub const BAD_REQUEST: u16 = 400;
    /// Nothing matched, or unknown method.
    pub const NOT_FOUND: u16 = 404;
    /// Conflicting state (duplicate subscription and the like).
    pub const CONFLICT: u16 = 409;
    /// Unexpected internal failure.
    pub const INTERNAL: u16 = 500;
    /// Capability unavailable in the current host mode.
    pub const NOT_IMPLEMENTED: u16 = 501;
}

/// Error type shared by the dispatcher, resolver, property bridge and handlers.
///
/// Every variant is recovered at the handler boundary and turned into a
/// response code plus a `data` object; none escape to the host.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum BridgeError {
    /// The inbound message could not be parsed into an envelope.
    #[error("malformed envelope: {message}")]
    Protocol {
        /// Parser diagnostic.
        message: String,
    },

    /// No handler is registered for the method.
    #[error("Unknown method: {method}")]
    UnknownMethod {
        /// Requested method name.
        method: String,
    },

    /// Required field missing or of the wrong shape.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Selector had none of `names`, `paths` or `filter`.
    #[error("No valid selector provided: must specify names, paths, or filter")]
    InvalidSelector,

    /// Explicit names/paths were given but none resolved.
    #[error("No entity found matching the specified names/paths")]
    NoExplicitMatch,

    /// The selector resolved to an empty set.
    #[error("No entity matched targets")]
    NoFilterMatch,

    /// No eligible property with that name exists on the entity.
    #[error("Property not found: {property}")]
    PropertyNotFound {
        /// Requested property name.
        property: String,
        /// Closest eligible names, best first.
        suggestions: Vec<String>,
    },

    /// The wire value could not be coerced into the property's kind.
    #[error("{message}")]
    TypeMismatch {
        /// Property being written.
        property: String,
        /// Coercion diagnostic.
        message: String,
        /// Declared kind of the property.
        expected_type: String,
        /// Current stored value, rendered as JSON text.
        current_value: Option<String>,
    },

    /// The host rejected the mutation.
    #[error("{message}")]
    WriteFailure {
        /// Property being written.
        property: String,
        /// Host diagnostic.
        message: String,
    },

    /// Conflicting request.
    #[error("{message}")]
    Conflict {
        /// Description.
        message: String,
    },

    /// Feature requires a host mode that is not active.
    #[error("{message}")]
    CapabilityUnavailable {
        /// Description.
        message: String,
    },

    /// Unexpected failure.
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },
}

impl BridgeError {
    /// Shorthand for [`BridgeError::InvalidParams`].
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Shorthand for [`BridgeError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Response code for this error.
    pub fn code(&self) -> u16 {
        match self {
            Self::Protocol { .. }
            | Self::InvalidParams { .. }
            | Self::InvalidSelector
            | Self::TypeMismatch { .. } => codes::BAD_REQUEST,
            Self::UnknownMethod { .. }
            | Self::NoExplicitMatch
            | Self::NoFilterMatch
            | Self::PropertyNotFound { .. } => codes::NOT_FOUND,
            Self::Conflict { .. } => codes::CONFLICT,
            Self::CapabilityUnavailable { .. } => codes::NOT_IMPLEMENTED,
            Self::WriteFailure { .. } | Self::Internal { .. } => codes::INTERNAL,
        }
    }

    /// Structured details beyond the message, if the variant carries any.
    pub fn details(&self) -> Map<String, Value> {
        let mut details = Map::new();
        match self {
            Self::PropertyNotFound { suggestions, .. } if !suggestions.is_empty() => {
                let _ = details.insert("suggestions".into(), json!(suggestions));
            }
            Self::TypeMismatch {
                expected_type,
                current_value,
                ..
            } => {
                let _ = details.insert("expected_type".into(), json!(expected_type));
                if let Some(current) = current_value {
                    let _ = details.insert("current_value".into(), json!(current));
                }
            }
            _ => {}
        }
        details
    }

    /// The `data` object of an error response: `{"message": ..., ...details}`.
    pub fn to_error_data(&self) -> Value {
        let mut data = Map::new();
        let _ = data.insert("message".into(), Value::String(self.to_string()));
        data.extend(self.details());
        Value::Object(data)
    }
}
