// src/annotations/healthcheck/config.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::Configuration;

pub const DEFAULT_PATH: &str = "/";
pub const DEFAULT_PORT: &str = "traffic-port";
pub const DEFAULT_INTERVAL_SECONDS: u64 = 15;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
    Tcp,
    Udp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown protocol '{0}'")]
pub struct UnknownProtocol(pub String);

impl FromStr for Protocol {
    type Err = UnknownProtocol;

    /// Case-insensitive, no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            _ => Err(UnknownProtocol(s.to_string())),
        }
    }
}

/// Health-check settings for one routing resource. Every field is optional so
/// that a parsed, partial, and merged configuration share one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<u64>,
}

impl Config {
    /// Every field is set.
    pub fn is_complete(&self) -> bool {
        self.path.is_some()
            && self.port.is_some()
            && self.protocol.is_some()
            && self.interval_seconds.is_some()
            && self.timeout_seconds.is_some()
    }

    /// Resolves `self` (the resource-level config) against `target`. A field
    /// of `self` still at its default yields to the target's value. Protocol
    /// is compared against the deployment's default backend protocol instead
    /// of a constant.
    pub fn merge(&self, target: &Config, cfg: &Configuration) -> Config {
        Config {
            path: pick(&self.path, &target.path, path_is_default),
            port: pick(&self.port, &target.port, port_is_default),
            protocol: pick(&self.protocol, &target.protocol, |p| {
                protocol_is_default(p, cfg.default_backend_protocol)
            }),
            interval_seconds: pick(
                &self.interval_seconds,
                &target.interval_seconds,
                interval_is_default,
            ),
            timeout_seconds: pick(
                &self.timeout_seconds,
                &target.timeout_seconds,
                timeout_is_default,
            ),
        }
    }
}

fn pick<T: Clone>(
    source: &Option<T>,
    target: &Option<T>,
    is_default: impl Fn(&Option<T>) -> bool,
) -> Option<T> {
    if is_default(source) {
        target.clone()
    } else {
        source.clone()
    }
}

// Default detection is by value: a field equal to its default is treated as
// never overridden. Unset counts as default.

fn path_is_default(path: &Option<String>) -> bool {
    path.as_deref().map_or(true, |p| p == DEFAULT_PATH)
}

fn port_is_default(port: &Option<String>) -> bool {
    port.as_deref().map_or(true, |p| p == DEFAULT_PORT)
}

fn protocol_is_default(protocol: &Option<Protocol>, default: Protocol) -> bool {
    protocol.map_or(true, |p| p == default)
}

fn interval_is_default(interval: &Option<u64>) -> bool {
    interval.map_or(true, |i| i == DEFAULT_INTERVAL_SECONDS)
}

fn timeout_is_default(timeout: &Option<u64>) -> bool {
    timeout.map_or(true, |t| t == DEFAULT_TIMEOUT_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(protocol: Protocol) -> Configuration {
        Configuration {
            default_backend_protocol: protocol,
            ..Default::default()
        }
    }

    fn config(path: &str, port: &str, protocol: Protocol, interval: u64, timeout: u64) -> Config {
        Config {
            path: Some(path.to_string()),
            port: Some(port.to_string()),
            protocol: Some(protocol),
            interval_seconds: Some(interval),
            timeout_seconds: Some(timeout),
        }
    }

    #[test]
    fn merge_keeps_explicit_source() {
        let source = config("PathA", "PortA", Protocol::Udp, 42, 43);
        let target = config("PathB", "PortB", Protocol::Tcp, 52, 53);

        let merged = source.merge(&target, &global(Protocol::Tcp));
        assert_eq!(merged, source);
    }

    #[test]
    fn merge_replaces_defaults_with_target() {
        let source = config(
            DEFAULT_PATH,
            DEFAULT_PORT,
            Protocol::Tcp,
            DEFAULT_INTERVAL_SECONDS,
            DEFAULT_TIMEOUT_SECONDS,
        );
        let target = config("PathB", "PortB", Protocol::Udp, 52, 53);

        let merged = source.merge(&target, &global(Protocol::Tcp));
        assert_eq!(merged, target);
    }

    #[test]
    fn merge_resolves_each_field_independently() {
        let source = config(
            "/ping",
            DEFAULT_PORT,
            Protocol::Https,
            DEFAULT_INTERVAL_SECONDS,
            7,
        );
        let target = config("/", "8080", Protocol::Http, 30, 10);

        let merged = source.merge(&target, &global(Protocol::Http));
        assert_eq!(merged, config("/ping", "8080", Protocol::Https, 30, 7));
    }

    #[test]
    fn protocol_default_follows_global_configuration() {
        let source = config("/a", "81", Protocol::Http, 20, 8);
        let target = config("/b", "82", Protocol::Udp, 21, 9);

        let as_default = source.merge(&target, &global(Protocol::Http));
        assert_eq!(as_default.protocol, Some(Protocol::Udp));

        let as_explicit = source.merge(&target, &global(Protocol::Https));
        assert_eq!(as_explicit.protocol, Some(Protocol::Http));
    }

    #[test]
    fn unset_source_fields_take_target() {
        let target = config("/b", "82", Protocol::Udp, 21, 9);

        let merged = Config::default().merge(&target, &global(Protocol::Http));
        assert_eq!(merged, target);
        assert!(merged.is_complete());
    }

    #[test]
    fn merge_is_idempotent_against_same_target() {
        let gd = global(Protocol::Http);
        let target = config("/b", "82", Protocol::Udp, 21, 9);
        let sources = [
            config("/a", DEFAULT_PORT, Protocol::Http, 20, DEFAULT_TIMEOUT_SECONDS),
            config(DEFAULT_PATH, "9000", Protocol::Tcp, DEFAULT_INTERVAL_SECONDS, 3),
            Config::default(),
        ];

        for source in sources {
            let once = source.merge(&target, &gd);
            assert_eq!(once.merge(&target, &gd), once);
        }
    }

    #[test]
    fn merge_does_not_mutate_inputs() {
        let source = config(DEFAULT_PATH, "81", Protocol::Http, 20, 8);
        let target = config("/b", "82", Protocol::Udp, 21, 9);
        let (source_before, target_before) = (source.clone(), target.clone());

        let _ = source.merge(&target, &global(Protocol::Http));
        assert_eq!(source, source_before);
        assert_eq!(target, target_before);
    }

    #[test]
    fn protocol_parses_case_insensitively() {
        assert_eq!("HTTPS".parse::<Protocol>(), Ok(Protocol::Https));
        assert_eq!("Udp".parse::<Protocol>(), Ok(Protocol::Udp));
        assert_eq!(
            " udp ".parse::<Protocol>(),
            Err(UnknownProtocol(" udp ".to_string()))
        );
        assert!("sctp".parse::<Protocol>().is_err());
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
    }

    #[test]
    fn serializes_camel_case_without_unset_fields() {
        let cfg = Config {
            interval_seconds: Some(10),
            protocol: Some(Protocol::Https),
            ..Default::default()
        };
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "protocol": "https", "intervalSeconds": 10 })
        );
    }
}
