//! Host model errors.

/// Failures raised by the host object model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// No property with that name on the addressed layer.
    #[error("no property named {name}")]
    MissingProperty {
        /// Requested name.
        name: String,
    },

    /// The stored kind does not accept the value.
    #[error("{property} holds {expected}, cannot store this value")]
    KindMismatch {
        /// Property being written.
        property: String,
        /// Declared kind.
        expected: String,
    },

    /// The property may not be edited.
    #[error("{property} is read-only")]
    ReadOnly {
        /// Property being written.
        property: String,
    },

    /// Class name not in the catalog.
    #[error("unknown class: {name}")]
    UnknownClass {
        /// Requested class.
        name: String,
    },

    /// Asset path does not resolve.
    #[error("asset not found: {path}")]
    AssetNotFound {
        /// Requested path.
        path: String,
    },
}

/// Convenience alias for host results.
pub type Result<T> = std::result::Result<T, HostError>;
