//! Authenticated principal attached to a request after resolution.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role granted to a principal.
///
/// Kept as a closed enum: route definitions reference roles statically and
/// the contract generator emits them into the client artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Administrator,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Administrator => "administrator",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal for one request.
///
/// Only an authentication strategy produces one of these; handlers receive
/// it read-only and never a password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    /// Secondary verification field: tokens carry it alongside the id and
    /// both must match the stored record.
    pub uuid: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub language: String,
    pub role: Role,
}
