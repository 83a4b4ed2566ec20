//! Route definitions: the inert values the registry is loaded from.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;
use crate::identity::{Identity, Role};
use crate::reply::{Reply, ReplyBuilder};
use crate::request::InboundRequest;
use crate::schema::Schema;

/// HTTP methods the gateway dispatches. Ordering is the fixed method order
/// used by the contract generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl core::fmt::Display for Method {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication requirement of a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequirement {
    /// Anonymous access.
    None,
    /// Any authenticated identity.
    Required,
    /// Authenticated identity holding one of the listed roles.
    RequiredRoles(Vec<Role>),
}

impl AuthRequirement {
    pub fn is_required(&self) -> bool {
        !matches!(self, AuthRequirement::None)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Declared response shapes (consumed by the contract generator)
// ─────────────────────────────────────────────────────────────────────────────

/// Structural description of a `data` value, declared per response code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataShape {
    String,
    Integer,
    Boolean,
    Object { fields: Vec<DataField> },
    List { item: Box<DataShape> },
}

/// Named field inside an object shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataField {
    pub name: &'static str,
    #[serde(flatten)]
    pub shape: DataShape,
}

impl DataShape {
    pub fn object(fields: Vec<(&'static str, DataShape)>) -> Self {
        DataShape::Object {
            fields: fields
                .into_iter()
                .map(|(name, shape)| DataField { name, shape })
                .collect(),
        }
    }

    pub fn list(item: DataShape) -> Self {
        DataShape::List { item: Box::new(item) }
    }
}

/// One status code a handler can produce, with the shape of its success
/// `data` when the code belongs to the success family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseShape {
    pub code: u16,
    pub data: Option<DataShape>,
}

impl ResponseShape {
    pub fn new(code: u16) -> Self {
        Self { code, data: None }
    }

    pub fn with_data(code: u16, data: DataShape) -> Self {
        Self {
            code,
            data: Some(data),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a handler may observe: the resolved identity (when the route
/// requires authentication), the validated body, the shared services, the
/// raw inbound request, and the pending reply builder it must consume.
pub struct HandlerContext<S> {
    pub identity: Option<Identity>,
    pub body: Value,
    pub services: Arc<S>,
    pub request: Arc<InboundRequest>,
    pub reply: ReplyBuilder,
}

/// Boxed handler future.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Reply, GatewayError>> + Send>>;

/// A route handler. The handler alone selects a status code and sends
/// exactly one payload; the dispatcher imposes no default.
pub type Handler<S> = Arc<dyn Fn(HandlerContext<S>) -> HandlerFuture + Send + Sync>;

/// Per-method entry of a route definition.
pub struct MethodEntry<S> {
    pub method: Method,
    pub schema: Option<Schema>,
    /// Every status code this method's handler can produce. Drives the
    /// generated client contract; the reply builder enforces the families
    /// at runtime.
    pub responses: Vec<ResponseShape>,
    pub handler: Handler<S>,
}

/// A raw route definition as written in the static route list, before
/// normalization and registration.
pub struct RawDefinition<S> {
    pub name: &'static str,
    pub description: &'static str,
    /// Declared path. When absent, `source` is normalized instead.
    pub path: Option<&'static str>,
    /// Source-relative location of the definition, the fallback path.
    pub source: &'static str,
    pub authenticate: AuthRequirement,
    pub methods: Vec<MethodEntry<S>>,
}
