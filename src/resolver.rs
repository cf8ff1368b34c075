// src/resolver.rs
use crate::ingress::Service;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("service '{0}' not found")]
    NotFound(String),
    #[error("service store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookups of objects an Ingress refers to.
pub trait Resolver: Send + Sync {
    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ResolveError>;
}

impl<R: Resolver + ?Sized> Resolver for std::sync::Arc<R> {
    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ResolveError> {
        (**self).get_service(namespace, name)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ResolveError> {
        (**self).get_service(namespace, name)
    }
}

/// In-memory resolver keyed by `namespace/name`.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    services: FxHashMap<String, Service>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, service: Service) -> Option<Service> {
        self.services.insert(service.key(), service)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl FromIterator<Service> for StaticResolver {
    fn from_iter<I: IntoIterator<Item = Service>>(iter: I) -> Self {
        let mut resolver = StaticResolver::new();
        for service in iter {
            resolver.insert(service);
        }
        resolver
    }
}

impl Resolver for StaticResolver {
    fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ResolveError> {
        let key = format!("{}/{}", namespace, name);
        self.services
            .get(&key)
            .cloned()
            .ok_or(ResolveError::NotFound(key))
    }
}
