// src/annotations/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// The annotation is absent or empty.
    #[error("annotation '{0}' is missing")]
    MissingAnnotation(String),
    #[error("annotation '{key}' has malformed value '{value}': {reason}")]
    MalformedAnnotation {
        key: String,
        value: String,
        reason: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl AnnotationError {
    pub fn is_missing(&self) -> bool {
        matches!(self, AnnotationError::MissingAnnotation(_))
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, AnnotationError::MalformedAnnotation { .. })
    }
}
