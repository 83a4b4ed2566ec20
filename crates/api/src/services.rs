//! Shared service bundle handed to every handler.

use std::sync::Arc;

use routegate_auth::{
    BcryptHasher, BearerStrategy, IdentityStore, InMemoryIdentityStore, PasswordHasher, Resolver,
    SessionStrategy, TokenService,
};

use crate::config::Config;

/// Process-wide collaborators: identity store, password hasher, token
/// signer/verifier, and the authentication resolver. Built once at startup
/// and shared by `Arc`.
pub struct Services {
    pub store: Arc<dyn IdentityStore>,
    pub passwords: Arc<dyn PasswordHasher>,
    pub tokens: Arc<TokenService>,
    pub resolver: Resolver,
}

/// Wire the default service graph: in-memory store, bcrypt, HS256 tokens,
/// and the bearer + session strategy pair.
pub fn build_services(config: &Config) -> Arc<Services> {
    let store: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.as_bytes(),
        config.token_ttl,
    ));

    let resolver = Resolver::new(vec![
        Arc::new(BearerStrategy::new(tokens.clone(), store.clone())),
        Arc::new(SessionStrategy::new(tokens.clone(), store.clone())),
    ]);

    Arc::new(Services {
        store,
        passwords: Arc::new(BcryptHasher::new(config.bcrypt_cost)),
        tokens,
        resolver,
    })
}
