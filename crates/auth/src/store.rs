//! Identity storage boundary.
//!
//! The gateway only needs a handful of lookups; persistence itself is an
//! external collaborator, so the trait is narrow and the in-memory
//! implementation doubles as the dev/test store.

use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use routegate_core::{Identity, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique constraint on email or username.
    #[error("a user with the provided email or username already exists")]
    Duplicate,

    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Stored user row. The only place a password hash lives; it never crosses
/// into an [`Identity`] or a reply payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: i64,
    pub uuid: Uuid,
    pub name: String,
    pub username: String,
    pub email: String,
    pub language: String,
    pub role: Role,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id,
            uuid: self.uuid,
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            language: self.language.clone(),
            role: self.role,
        }
    }

    /// Password-free projection for list/detail payloads.
    pub fn public_json(&self) -> Value {
        json!({
            "id": self.id,
            "name": self.name,
            "username": self.username,
            "email": self.email,
            "language": self.language,
            "role": self.role,
        })
    }
}

/// Insert payload; id, uuid and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub username: String,
    pub email: String,
    pub language: String,
    pub role: Role,
    pub password_hash: String,
}

#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;
    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError>;
    /// One page of users in insertion order, plus the total count.
    async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<UserRecord>, u64), StoreError>;
}

/// In-memory store: a locked vec with an id sequence.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    users: RwLock<Vec<UserRecord>>,
    next_id: AtomicI64,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<UserRecord>>, StoreError> {
        self.users
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

#[async_trait]
impl IdentityStore for InMemoryIdentityStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.read()?.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.read()?.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.read()?.iter().find(|u| u.username == username).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut users = self
            .users
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))?;

        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(StoreError::Duplicate);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            uuid: Uuid::now_v7(),
            name: user.name,
            username: user.username,
            email: user.email,
            language: user.language,
            role: user.role,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn list(&self, offset: u64, limit: u64) -> Result<(Vec<UserRecord>, u64), StoreError> {
        let users = self.read()?;
        let total = users.len() as u64;
        let page = users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((page, total))
    }
}
