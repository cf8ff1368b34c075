//! Turns `alb.ingress.kubernetes.io/healthcheck-*` annotations on an Ingress
//! into target-group health-check settings and resolves them against the
//! deployment-wide defaults.
pub mod annotations;
pub mod config;
pub mod ingress;
pub mod logger;
pub mod resolver;

pub use annotations::healthcheck::{self, Config as HealthCheckConfig};
pub use annotations::{AnnotationError, IngressAnnotation};
pub use config::Configuration;
