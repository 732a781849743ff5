//! Error types for declarations and frozen lists

use crate::registry::ReturnShape;
use crate::tag::TagKind;
use thiserror::Error;

/// Errors raised while declaring, loading, or binding tagged functions.
///
/// All of these surface at startup, before any tagged call runs.
#[derive(Debug, Error)]
pub enum DeclarationError {
    #[error("tag '{tag}' declared more than once on {function}")]
    DuplicateTag { function: String, tag: TagKind },

    #[error("function already declared: {0}")]
    DuplicateFunction(String),

    #[error("{function} returns a {shape} value but declares sequence tags {tags}")]
    TypeMismatch {
        function: String,
        shape: ReturnShape,
        tags: String,
    },

    #[error("{function} is declared to return a {declared} value but is bound to a {bound} body")]
    ShapeMismatch {
        function: String,
        declared: ReturnShape,
        bound: ReturnShape,
    },

    #[error("unknown tag: {0}")]
    UnknownTag(String),

    #[error("Declaration file parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for declaration operations
pub type DeclarationResult<T> = Result<T, DeclarationError>;

/// Raised by a frozen `List` when a caller tries to change it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("unsupported mutation: {operation} on a frozen list")]
    Unsupported { operation: &'static str },
}
