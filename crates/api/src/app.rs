//! Application assembly: freeze the registry, wire the services, bind the
//! transport.

use std::sync::Arc;

use axum::Router;

use routegate_core::{Registry, RegistryError};

use crate::adapter;
use crate::config::Config;
use crate::routes;
use crate::services::{Services, build_services};

/// Freeze the full route set into a registry. Fails on duplicate mounts.
pub fn build_registry() -> Result<Registry<Services>, RegistryError> {
    Registry::load(routes::definitions())
}

/// Build the complete application from configuration.
pub fn build_app(config: &Config) -> Result<(Router, Arc<Registry<Services>>, Arc<Services>), RegistryError> {
    let registry = Arc::new(build_registry()?);
    let services = build_services(config);
    let router = adapter::bind(registry.clone(), services.clone(), config.request_timeout);
    Ok((router, registry, services))
}
