use thiserror::Error;

/// Result type for classgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the class lowering pipeline
///
/// Recoverable problems with a single declaration are not errors; they are
/// reported through [`crate::diagnostics::Diagnostics`] and the declaration
/// is skipped.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed declaration bundle: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Unsupported declaration kind '{kind}' in {owner}")]
    UnsupportedDeclaration { kind: String, owner: String },

    #[error("Class writer protocol error: {message}")]
    Writer { message: String },

    #[error("Class file '{class}' failed verification: {message}")]
    Verify { class: String, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl Error {
    /// Create an invariant violation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation { message: message.into() }
    }

    /// Create an unsupported declaration error
    pub fn unsupported(kind: impl Into<String>, owner: impl Into<String>) -> Self {
        Self::UnsupportedDeclaration { kind: kind.into(), owner: owner.into() }
    }

    /// Create a writer protocol error
    pub fn writer(message: impl Into<String>) -> Self {
        Self::Writer { message: message.into() }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config { message: message.into() }
    }

    /// Whether the error signals a contract breach between the front-end and
    /// the lowering engine. Such errors abort the enclosing class tree.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvariantViolation { .. } | Self::UnsupportedDeclaration { .. } | Self::Writer { .. }
        )
    }
}
