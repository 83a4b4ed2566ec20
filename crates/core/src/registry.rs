//! The process-wide route table.
//!
//! Built exactly once during startup from the static definition list, then
//! frozen: the dispatcher and the contract generator only ever read it
//! (shared behind an `Arc`, no locking). Duplicate (path, method) pairs are
//! a hard load failure, never a silent overwrite.

use std::collections::HashMap;

use thiserror::Error;

use crate::path::normalize;
use crate::route::{AuthRequirement, Method, MethodEntry, RawDefinition};

/// Registry load failure. The table is discarded; there is no partial
/// registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate route registration for {method} {path}")]
    DuplicateRoute { path: String, method: Method },

    #[error("route '{name}' declares no methods")]
    EmptyRoute { name: String },
}

/// One registered route: a normalized path plus its per-method entries.
pub struct RouteEntry<S> {
    pub path: String,
    pub name: &'static str,
    pub description: &'static str,
    pub authenticate: AuthRequirement,
    pub methods: Vec<MethodEntry<S>>,
}

/// The frozen route table. `S` is the service bundle handlers receive.
pub struct Registry<S> {
    routes: Vec<RouteEntry<S>>,
    /// (route index, method index) by (path, method).
    index: HashMap<(String, Method), (usize, usize)>,
}

impl<S> std::fmt::Debug for Registry<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("routes", &self.routes.len())
            .finish_non_exhaustive()
    }
}

impl<S> Registry<S> {
    /// Single discovery pass over the raw definitions.
    ///
    /// Resolves each definition's declared path (or its source-relative
    /// fallback), normalizes it, and rejects the whole load on the first
    /// duplicate (path, method) pair. Emits one structured registration
    /// record per route.
    pub fn load(
        definitions: impl IntoIterator<Item = RawDefinition<S>>,
    ) -> Result<Self, RegistryError> {
        let mut routes: Vec<RouteEntry<S>> = Vec::new();
        let mut index: HashMap<(String, Method), (usize, usize)> = HashMap::new();

        for definition in definitions {
            if definition.methods.is_empty() {
                return Err(RegistryError::EmptyRoute {
                    name: definition.name.to_string(),
                });
            }

            let path = normalize(definition.path.unwrap_or(definition.source));
            let route_idx = routes.len();

            for (method_idx, entry) in definition.methods.iter().enumerate() {
                let key = (path.clone(), entry.method);
                if index.contains_key(&key) {
                    return Err(RegistryError::DuplicateRoute {
                        path,
                        method: entry.method,
                    });
                }
                index.insert(key, (route_idx, method_idx));
            }

            let methods: Vec<String> = definition
                .methods
                .iter()
                .map(|entry| entry.method.to_string())
                .collect();
            tracing::info!(
                path = %path,
                name = definition.name,
                description = definition.description,
                methods = ?methods,
                "route registered"
            );

            routes.push(RouteEntry {
                path,
                name: definition.name,
                description: definition.description,
                authenticate: definition.authenticate,
                methods: definition.methods,
            });
        }

        Ok(Self { routes, index })
    }

    /// Look up the entry for a (path, method) pair. The path must already
    /// be canonical; the transport adapter binds canonical paths only.
    pub fn find(&self, path: &str, method: Method) -> Option<(&RouteEntry<S>, &MethodEntry<S>)> {
        let (route_idx, method_idx) = self.index.get(&(path.to_string(), method))?;
        let route = &self.routes[*route_idx];
        Some((route, &route.methods[*method_idx]))
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[RouteEntry<S>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::route::{Handler, ResponseShape};

    fn noop_handler() -> Handler<()> {
        Arc::new(|ctx| {
            Box::pin(async move { Ok(ctx.reply.code(200)?.message("ok")?) })
        })
    }

    fn definition(path: Option<&'static str>, source: &'static str, methods: Vec<Method>) -> RawDefinition<()> {
        RawDefinition {
            name: "Test",
            description: "test route",
            path,
            source,
            authenticate: AuthRequirement::None,
            methods: methods
                .into_iter()
                .map(|method| MethodEntry {
                    method,
                    schema: None,
                    responses: vec![ResponseShape::new(200)],
                    handler: noop_handler(),
                })
                .collect(),
        }
    }

    #[test]
    fn declared_path_wins_over_source() {
        let registry = Registry::load(vec![definition(
            Some("/declared"),
            "some/file.rs",
            vec![Method::Get],
        )])
        .unwrap();
        assert!(registry.find("/declared", Method::Get).is_some());
        assert!(registry.find("/some/file", Method::Get).is_none());
    }

    #[test]
    fn source_fallback_is_normalized() {
        let registry = Registry::load(vec![definition(None, "auth/index.rs", vec![Method::Get])])
            .unwrap();
        assert!(registry.find("/auth", Method::Get).is_some());
    }

    #[test]
    fn duplicate_path_method_fails_the_load() {
        let err = Registry::load(vec![
            definition(Some("/auth/login"), "a.rs", vec![Method::Post]),
            // Normalizes to the same path.
            definition(None, "auth/login.rs", vec![Method::Post]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateRoute {
                path: "/auth/login".to_string(),
                method: Method::Post,
            }
        );
    }

    #[test]
    fn same_path_different_methods_coexist() {
        let registry = Registry::load(vec![definition(
            Some("/thing"),
            "thing.rs",
            vec![Method::Get, Method::Post],
        )])
        .unwrap();
        assert!(registry.find("/thing", Method::Get).is_some());
        assert!(registry.find("/thing", Method::Post).is_some());
        assert!(registry.find("/thing", Method::Delete).is_none());
    }

    #[test]
    fn routes_keep_insertion_order() {
        let registry = Registry::load(vec![
            definition(Some("/b"), "b.rs", vec![Method::Get]),
            definition(Some("/a"), "a.rs", vec![Method::Get]),
        ])
        .unwrap();
        let paths: Vec<&str> = registry.routes().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a"]);
    }

    #[test]
    fn empty_route_is_rejected() {
        let err = Registry::load(vec![definition(Some("/x"), "x.rs", vec![])]).unwrap_err();
        assert!(matches!(err, RegistryError::EmptyRoute { .. }));
    }
}
