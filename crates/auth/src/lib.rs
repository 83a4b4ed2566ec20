//! `routegate-auth` — authentication for the gateway.
//!
//! Strategies inspect a transport-agnostic request and produce an
//! identity-or-failure; the resolver races them and layers role
//! authorization on top. Token signing (jsonwebtoken) and password hashing
//! (bcrypt) are collaborators, wrapped thinly here.

pub mod bearer;
pub mod password;
pub mod resolver;
pub mod session;
pub mod store;
pub mod strategy;
pub mod token;

pub use bearer::BearerStrategy;
pub use password::{BcryptHasher, PasswordError, PasswordHasher};
pub use resolver::Resolver;
pub use session::{SESSION_COOKIE, SessionStrategy};
pub use store::{IdentityStore, InMemoryIdentityStore, NewUser, StoreError, UserRecord};
pub use strategy::{AuthStrategy, StrategyFailure, StrategyOutcome};
pub use token::{BearerClaims, TokenError, TokenService};
