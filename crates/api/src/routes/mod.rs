//! Route definitions.
//!
//! Each file exposes one `definition()` returning a `RawDefinition`; the
//! registry derives the mount path from the declared `source` unless a
//! `path` overrides it. New routes are added to `definitions()` below.

use serde_json::Value;

use routegate_core::RawDefinition;

use crate::services::Services;

pub mod auth;
pub mod home;
pub mod users;

/// The complete route set, in mount order.
pub fn definitions() -> Vec<RawDefinition<Services>> {
    vec![
        home::definition(),
        auth::signup::definition(),
        auth::login::definition(),
        auth::logout::definition(),
        users::definition(),
    ]
}

/// Read a string field out of a validated body. Validation has already
/// established presence and type for required fields, so absent optional
/// fields decay to the empty string.
pub(crate) fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name).and_then(Value::as_str).unwrap_or_default()
}
