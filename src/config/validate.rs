// src/config/validate.rs
use regex::Regex;
use std::sync::OnceLock;
use validator::ValidationError;

use super::ConfigError;

static CLUSTER_NAME_RE: OnceLock<Regex> = OnceLock::new();
static PREFIX_RE: OnceLock<Regex> = OnceLock::new();

// Load balancer names are derived from the cluster name, so it must be a
// short DNS label.
pub fn validate_cluster_name(name: &str) -> Result<(), ConfigError> {
    if name.is_empty() {
        return Err(ConfigError::InvalidName {
            field: "cluster name",
            value: name.to_string(),
            reason: "a cluster name must be defined".to_string(),
        });
    }

    let re = CLUSTER_NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("valid cluster name regex")
    });
    if !re.is_match(name) {
        return Err(ConfigError::InvalidName {
            field: "cluster name",
            value: name.to_string(),
            reason: "must contain only alphanumeric characters or '-', starting and ending with alphanumeric".to_string(),
        });
    }
    Ok(())
}

pub fn validate_annotation_prefix(prefix: &str) -> Result<(), ConfigError> {
    let re = PREFIX_RE.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$")
            .expect("valid prefix regex")
    });
    if !re.is_match(prefix) {
        return Err(ConfigError::InvalidName {
            field: "annotation prefix",
            value: prefix.to_string(),
            reason: "must be a lowercase DNS subdomain".to_string(),
        });
    }
    Ok(())
}

pub fn validate_health_check_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::new("health_check_path")
            .with_message("health check path must start with '/'".into()));
    }
    Ok(())
}
