// src/annotations/healthcheck/mod.rs
use std::cell::OnceCell;

pub use self::config::{
    Config, Protocol, UnknownProtocol, DEFAULT_INTERVAL_SECONDS, DEFAULT_PATH, DEFAULT_PORT,
    DEFAULT_TIMEOUT_SECONDS,
};
mod config;

use super::{
    annotation_with_prefix, get_string_annotation, get_u64_annotation, AnnotationError,
    IngressAnnotation, DEFAULT_ANNOTATION_PREFIX,
};
use crate::config::Configuration;
use crate::ingress::{Annotations, Ingress};
use crate::resolver::{ResolveError, Resolver};

const PATH: &str = "healthcheck-path";
const PORT: &str = "healthcheck-port";
const PROTOCOL: &str = "healthcheck-protocol";
const INTERVAL_SECONDS: &str = "healthcheck-interval-seconds";
const TIMEOUT_SECONDS: &str = "healthcheck-timeout-seconds";

/// Reads the `healthcheck-*` annotations of an Ingress. Keys absent on the
/// Ingress are looked up on its default backend Service before falling back
/// to the constant defaults.
pub struct Parser<R> {
    resolver: R,
    prefix: String,
}

impl<R: Resolver> Parser<R> {
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            prefix: DEFAULT_ANNOTATION_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    fn key(&self, name: &str) -> String {
        annotation_with_prefix(&self.prefix, name)
    }

    fn backend_annotations(&self, ing: &Ingress) -> Option<Annotations> {
        let backend = ing.default_backend()?;
        let log = slog_scope::logger();

        match self
            .resolver
            .get_service(ing.namespace(), &backend.service_name)
        {
            Ok(service) => Some(service.metadata.annotations),
            Err(ResolveError::NotFound(key)) => {
                slog::debug!(log, "Default backend not found, using constant defaults";
                    "ingress" => format!("{}/{}", ing.namespace(), ing.name()),
                    "service" => key,
                );
                None
            }
            Err(e) => {
                slog::warn!(log, "Default backend lookup failed, using constant defaults";
                    "ingress" => format!("{}/{}", ing.namespace(), ing.name()),
                    "err" => e.to_string(),
                );
                None
            }
        }
    }
}

impl<R: Resolver> IngressAnnotation for Parser<R> {
    type Output = Config;

    fn parse(&self, ing: &Ingress) -> Result<Config, AnnotationError> {
        let lookup = Lookup {
            parser: self,
            ing,
            backend: OnceCell::new(),
        };

        let path = lookup.get(PATH, get_string_annotation)?;
        let port = lookup.get(PORT, get_string_annotation)?;
        let protocol = lookup
            .get(PROTOCOL, get_string_annotation)?
            .and_then(|value| match value.parse::<Protocol>() {
                Ok(protocol) => Some(protocol),
                Err(e) => {
                    slog::warn!(slog_scope::logger(), "Ignoring health check protocol";
                        "ingress" => format!("{}/{}", ing.namespace(), ing.name()),
                        "err" => e.to_string(),
                    );
                    None
                }
            });
        let interval_seconds = lookup.get(INTERVAL_SECONDS, get_u64_annotation)?;
        let timeout_seconds = lookup.get(TIMEOUT_SECONDS, get_u64_annotation)?;

        Ok(Config {
            path: Some(path.unwrap_or_else(|| DEFAULT_PATH.to_string())),
            port: Some(port.unwrap_or_else(|| DEFAULT_PORT.to_string())),
            protocol,
            interval_seconds: Some(interval_seconds.unwrap_or(DEFAULT_INTERVAL_SECONDS)),
            timeout_seconds: Some(timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
        })
    }
}

// Per-parse view over the Ingress annotations and, resolved at most once, the
// annotations of its default backend.
struct Lookup<'a, R> {
    parser: &'a Parser<R>,
    ing: &'a Ingress,
    backend: OnceCell<Option<Annotations>>,
}

impl<R: Resolver> Lookup<'_, R> {
    fn backend(&self) -> Option<&Annotations> {
        self.backend
            .get_or_init(|| self.parser.backend_annotations(self.ing))
            .as_ref()
    }

    fn get<T>(
        &self,
        name: &str,
        read: fn(&Annotations, &str) -> Result<T, AnnotationError>,
    ) -> Result<Option<T>, AnnotationError> {
        let key = self.parser.key(name);

        match read(self.ing.annotations(), &key) {
            Ok(value) => return Ok(Some(value)),
            Err(e) if !e.is_missing() => return Err(e),
            Err(_) => {}
        }

        let Some(annotations) = self.backend() else {
            return Ok(None);
        };
        match read(annotations, &key) {
            Ok(value) => {
                slog::debug!(slog_scope::logger(), "Inherited annotation from default backend";
                    "ingress" => format!("{}/{}", self.ing.namespace(), self.ing.name()),
                    "key" => key,
                );
                Ok(Some(value))
            }
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Caller-side guard around [`Config::merge`]: every input must be present
/// and the target must be fully populated.
pub fn merge(
    source: Option<&Config>,
    target: Option<&Config>,
    cfg: Option<&Configuration>,
) -> Result<Config, AnnotationError> {
    let source = source.ok_or_else(|| {
        AnnotationError::InvalidArgument("source health check config is required".to_string())
    })?;
    let target = target.ok_or_else(|| {
        AnnotationError::InvalidArgument("target health check config is required".to_string())
    })?;
    let cfg = cfg.ok_or_else(|| {
        AnnotationError::InvalidArgument("global configuration is required".to_string())
    })?;

    if !target.is_complete() {
        return Err(AnnotationError::InvalidArgument(format!(
            "target health check config is incomplete: {:?}",
            target
        )));
    }

    Ok(source.merge(target, cfg))
}
