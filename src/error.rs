//! Errors returned to callers of the resource handler

/// Result type alias for handler operations.
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Failures that stop an operation before a response can be produced.
///
/// Provider failures are never reported here; they are normalized into an
/// error response instead.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// A request field was not a valid JSON document.
    #[error("invalid request payload in '{field}': {source}")]
    InvalidRequestPayload {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the operation.
    #[error("operation '{operation}' was cancelled")]
    Cancelled { operation: &'static str },

    /// A response could not be encoded.
    #[error("failed to encode response: {0}")]
    ResponseEncoding(#[source] serde_json::Error),
}

impl HandlerError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
