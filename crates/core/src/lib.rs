//! `routegate-core` — transport-agnostic routing engine.
//!
//! Path normalization, the frozen route registry, the status-code reply
//! contract with its typed builder, request schemas, and the inbound
//! request model. No HTTP framework types cross this boundary.

pub mod error;
pub mod identity;
pub mod pagination;
pub mod path;
pub mod registry;
pub mod reply;
pub mod request;
pub mod route;
pub mod schema;

pub use error::{GatewayError, HandlerResult};
pub use identity::{Identity, Role};
pub use pagination::PageRequest;
pub use path::normalize;
pub use registry::{Registry, RegistryError, RouteEntry};
pub use reply::{
    ContractViolation, ErrorBody, Family, ListMetadata, Reply, ReplyBuilder, ReplyPayload,
    SelectedReply, SuccessBody, family_of,
};
pub use request::InboundRequest;
pub use route::{
    AuthRequirement, DataField, DataShape, Handler, HandlerContext, HandlerFuture, Method,
    MethodEntry, RawDefinition, ResponseShape,
};
pub use schema::{FieldError, FieldKind, FieldRule, Schema, issues_to_value, validate};
