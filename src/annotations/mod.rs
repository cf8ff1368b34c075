// src/annotations/mod.rs
pub mod error;
pub mod healthcheck;

pub use error::AnnotationError;

use crate::ingress::{Annotations, Ingress};

pub const DEFAULT_ANNOTATION_PREFIX: &str = "alb.ingress.kubernetes.io";

/// A parser for one family of annotations on an Ingress.
pub trait IngressAnnotation {
    type Output;

    fn parse(&self, ing: &Ingress) -> Result<Self::Output, AnnotationError>;
}

pub fn annotation_with_prefix(prefix: &str, suffix: &str) -> String {
    format!("{}/{}", prefix, suffix)
}

// Empty values count as absent.
fn lookup<'a>(annotations: &'a Annotations, key: &str) -> Result<&'a str, AnnotationError> {
    match annotations.get(key) {
        Some(value) if !value.is_empty() => Ok(value.as_str()),
        _ => Err(AnnotationError::MissingAnnotation(key.to_string())),
    }
}

pub fn get_string_annotation(
    annotations: &Annotations,
    key: &str,
) -> Result<String, AnnotationError> {
    lookup(annotations, key).map(str::to_string)
}

pub fn get_u64_annotation(annotations: &Annotations, key: &str) -> Result<u64, AnnotationError> {
    let value = lookup(annotations, key)?;
    value
        .parse::<u64>()
        .map_err(|e| AnnotationError::MalformedAnnotation {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
