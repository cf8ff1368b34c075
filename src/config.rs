// config.rs
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use validator::Validate;

use crate::annotations::healthcheck::{
    Config, Protocol, DEFAULT_INTERVAL_SECONDS, DEFAULT_PATH, DEFAULT_PORT,
    DEFAULT_TIMEOUT_SECONDS,
};
use crate::annotations::DEFAULT_ANNOTATION_PREFIX;

pub mod validate;

pub const CLUSTER_NAME_ENV: &str = "CLUSTER_NAME";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
    #[error("invalid {field} '{value}': {reason}")]
    InvalidName {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Health-check values applied when neither the Ingress nor its backend
/// overrides them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckDefaults {
    #[serde(default = "default_path")]
    #[validate(custom(function = "validate::validate_health_check_path"))]
    pub path: String,
    #[serde(default = "default_port")]
    #[validate(length(min = 1))]
    pub port: String,
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_path() -> String {
    DEFAULT_PATH.to_string()
}
fn default_port() -> String {
    DEFAULT_PORT.to_string()
}
fn default_interval_seconds() -> u64 {
    DEFAULT_INTERVAL_SECONDS
}
fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl Default for HealthCheckDefaults {
    fn default() -> Self {
        Self {
            path: default_path(),
            port: default_port(),
            interval_seconds: default_interval_seconds(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Deployment-wide defaults owned by the controller.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default)]
    #[validate(length(max = 11))]
    pub cluster_name: String,
    #[serde(default = "default_backend_protocol")]
    pub default_backend_protocol: Protocol,
    #[serde(default = "default_annotation_prefix")]
    #[validate(length(min = 1, max = 253))]
    pub annotation_prefix: String,
    #[serde(default)]
    #[validate(nested)]
    pub health_check: HealthCheckDefaults,
}

fn default_backend_protocol() -> Protocol {
    Protocol::Http
}
fn default_annotation_prefix() -> String {
    DEFAULT_ANNOTATION_PREFIX.to_string()
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            cluster_name: String::new(),
            default_backend_protocol: default_backend_protocol(),
            annotation_prefix: default_annotation_prefix(),
            health_check: HealthCheckDefaults::default(),
        }
    }
}

impl Configuration {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Reads the file if given, otherwise starts from the defaults, then
    /// applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        self.override_cluster_name(std::env::var(CLUSTER_NAME_ENV).ok());
    }

    /// Replaces the cluster name unless `name` is absent or empty.
    pub fn override_cluster_name(&mut self, name: Option<String>) {
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            self.cluster_name = name;
        }
    }

    /// Field constraints first, then the name formats.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()?;
        validate::validate_cluster_name(&self.cluster_name)?;
        validate::validate_annotation_prefix(&self.annotation_prefix)?;
        Ok(())
    }

    /// The fallback health-check config every Ingress is merged against.
    pub fn default_health_check(&self) -> Config {
        Config {
            path: Some(self.health_check.path.clone()),
            port: Some(self.health_check.port.clone()),
            protocol: Some(self.default_backend_protocol),
            interval_seconds: Some(self.health_check.interval_seconds),
            timeout_seconds: Some(self.health_check.timeout_seconds),
        }
    }
}
