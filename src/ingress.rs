// src/ingress.rs
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Annotations = FxHashMap<String, String>;

fn default_namespace() -> String {
    "default".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "FxHashMap::is_empty")]
    pub annotations: Annotations,
}

/// A port reference that is either a number or a named port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntOrString {
    Int(i32),
    String(String),
}

impl Default for IntOrString {
    fn default() -> Self {
        IntOrString::Int(0)
    }
}

impl fmt::Display for IntOrString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntOrString::Int(port) => write!(f, "{}", port),
            IntOrString::String(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressBackend {
    pub service_name: String,
    pub service_port: IntOrString,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpIngressPath {
    #[serde(default)]
    pub path: Option<String>,
    pub backend: IngressBackend,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HttpIngressRuleValue {
    #[serde(default)]
    pub paths: Vec<HttpIngressPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngressRule {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub http: Option<HttpIngressRuleValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngressSpec {
    #[serde(default)]
    pub backend: Option<IngressBackend>,
    #[serde(default)]
    pub rules: Vec<IngressRule>,
}

/// The routing resource. Only its metadata and backend references are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingress {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: IngressSpec,
}

impl Ingress {
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.metadata.namespace
    }

    pub fn annotations(&self) -> &Annotations {
        &self.metadata.annotations
    }

    pub fn default_backend(&self) -> Option<&IngressBackend> {
        self.spec.backend.as_ref()
    }

    /// Default backend first, then every rule path backend in declaration order.
    pub fn backends(&self) -> impl Iterator<Item = &IngressBackend> {
        self.spec.backend.iter().chain(
            self.spec
                .rules
                .iter()
                .filter_map(|rule| rule.http.as_ref())
                .flat_map(|http| http.paths.iter().map(|p| &p.backend)),
        )
    }
}

/// Backend Service as seen by the resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub metadata: ObjectMeta,
}

impl Service {
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
metadata:
  name: foo
  annotations:
    alb.ingress.kubernetes.io/healthcheck-path: /healthz
spec:
  backend:
    serviceName: default-backend
    servicePort: 80
  rules:
    - host: foo.bar.com
      http:
        paths:
          - path: /foo
            backend:
              serviceName: foo-svc
              servicePort: http
"#;

    #[test]
    fn deserializes_manifest() {
        let ing: Ingress = serde_yaml::from_str(MANIFEST).unwrap();

        assert_eq!(ing.name(), "foo");
        assert_eq!(ing.namespace(), "default");
        assert_eq!(
            ing.annotations()
                .get("alb.ingress.kubernetes.io/healthcheck-path")
                .map(String::as_str),
            Some("/healthz")
        );
        assert_eq!(
            ing.default_backend().map(|b| b.service_name.as_str()),
            Some("default-backend")
        );
    }

    #[test]
    fn backends_lists_default_then_rules() {
        let ing: Ingress = serde_yaml::from_str(MANIFEST).unwrap();
        let backends: Vec<_> = ing.backends().collect();

        assert_eq!(backends.len(), 2);
        assert_eq!(backends[0].service_port, IntOrString::Int(80));
        assert_eq!(backends[1].service_name, "foo-svc");
        assert_eq!(backends[1].service_port.to_string(), "http");
    }

    #[test]
    fn service_key_is_namespaced() {
        let svc = Service {
            metadata: ObjectMeta {
                name: "web".to_string(),
                namespace: "shop".to_string(),
                ..Default::default()
            },
        };
        assert_eq!(svc.key(), "shop/web");
    }
}
