//! Session-cookie strategy.
//!
//! Reads the server-signed `session` cookie and runs the same
//! verify-and-load pipeline as the bearer strategy. Kept separate so the
//! resolver can race header-based and cookie-based credentials.

use std::sync::Arc;

use async_trait::async_trait;

use routegate_core::InboundRequest;

use crate::bearer::verify_and_load;
use crate::store::IdentityStore;
use crate::strategy::{AuthStrategy, StrategyFailure, StrategyOutcome};
use crate::token::TokenService;

pub const SESSION_COOKIE: &str = "session";

pub struct SessionStrategy {
    tokens: Arc<TokenService>,
    store: Arc<dyn IdentityStore>,
}

impl SessionStrategy {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, store }
    }
}

#[async_trait]
impl AuthStrategy for SessionStrategy {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn attempt(&self, request: &InboundRequest) -> StrategyOutcome {
        let Some(token) = request.cookie(SESSION_COOKIE) else {
            return StrategyOutcome::Failure(StrategyFailure::new(401, "Session cookie required"));
        };

        verify_and_load(&self.tokens, &self.store, token).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Duration;
    use serde_json::json;

    use routegate_core::{Method, Role};

    use super::*;
    use crate::store::{InMemoryIdentityStore, NewUser};

    #[tokio::test]
    async fn session_cookie_authenticates() {
        let tokens = Arc::new(TokenService::new(b"test-secret", Duration::minutes(10)));
        let store: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
        let user = store
            .insert(NewUser {
                name: "Alice Doe".to_string(),
                username: "alice".to_string(),
                email: "a@b.com".to_string(),
                language: "en".to_string(),
                role: Role::User,
                password_hash: "$hash".to_string(),
            })
            .await
            .unwrap();
        let token = tokens.sign(&user.identity()).unwrap();

        let strategy = SessionStrategy::new(tokens, store);
        let request = InboundRequest::new(
            Method::Get,
            "/",
            HashMap::from([("cookie".to_string(), format!("session={token}"))]),
            HashMap::new(),
            json!(null),
        );

        assert!(matches!(
            strategy.attempt(&request).await,
            StrategyOutcome::Success(_)
        ));
    }

    #[tokio::test]
    async fn missing_cookie_fails_with_401() {
        let tokens = Arc::new(TokenService::new(b"test-secret", Duration::minutes(10)));
        let store: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
        let strategy = SessionStrategy::new(tokens, store);
        let request = InboundRequest::new(
            Method::Get,
            "/",
            HashMap::new(),
            HashMap::new(),
            json!(null),
        );

        assert_eq!(
            strategy.attempt(&request).await,
            StrategyOutcome::Failure(StrategyFailure::new(401, "Session cookie required"))
        );
    }
}
