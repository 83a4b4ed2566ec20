//! Bearer-token strategy.
//!
//! Reads a signed token from the `Authorization` header or the `Bearer`
//! cookie, verifies signature and time window, then loads the identity by
//! id and re-checks the uuid claim against the stored record. Each
//! verification failure mode keeps its own reply code; unexpected faults
//! surface as 500, never as a generic 401.

use std::sync::Arc;

use async_trait::async_trait;

use routegate_core::InboundRequest;

use crate::store::IdentityStore;
use crate::strategy::{AuthStrategy, StrategyFailure, StrategyOutcome};
use crate::token::{TokenError, TokenService};

pub struct BearerStrategy {
    tokens: Arc<TokenService>,
    store: Arc<dyn IdentityStore>,
}

impl BearerStrategy {
    pub fn new(tokens: Arc<TokenService>, store: Arc<dyn IdentityStore>) -> Self {
        Self { tokens, store }
    }

    fn token_from<'a>(&self, request: &'a InboundRequest) -> Option<&'a str> {
        request.bearer_token().or_else(|| request.cookie("Bearer"))
    }
}

#[async_trait]
impl AuthStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        "bearer"
    }

    async fn attempt(&self, request: &InboundRequest) -> StrategyOutcome {
        let Some(token) = self.token_from(request) else {
            return StrategyOutcome::Failure(StrategyFailure::new(
                401,
                "Authentication token required",
            ));
        };

        verify_and_load(&self.tokens, &self.store, token).await
    }
}

/// Shared by the bearer and session strategies: token -> claims -> identity.
pub(crate) async fn verify_and_load(
    tokens: &TokenService,
    store: &Arc<dyn IdentityStore>,
    token: &str,
) -> StrategyOutcome {
    let claims = match tokens.verify(token) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            return StrategyOutcome::Failure(StrategyFailure::new(401, "Token has expired"));
        }
        Err(TokenError::NotYetValid) => {
            return StrategyOutcome::Failure(StrategyFailure::new(401, "Token is not yet valid"));
        }
        Err(TokenError::Invalid) => {
            return StrategyOutcome::Failure(StrategyFailure::new(
                401,
                "Invalid authentication token",
            ));
        }
        Err(TokenError::Internal(reason)) => {
            tracing::error!(%reason, "token verification fault");
            return StrategyOutcome::Failure(StrategyFailure::new(500, "Internal server error"));
        }
    };

    match store.find_by_id(claims.sub).await {
        Ok(Some(user)) if user.uuid == claims.uuid => StrategyOutcome::Success(user.identity()),
        Ok(_) => StrategyOutcome::Failure(StrategyFailure::new(404, "User not found")),
        Err(err) => {
            tracing::error!(error = %err, "identity store fault during authentication");
            StrategyOutcome::Failure(StrategyFailure::new(500, "Internal server error"))
        }
    }
}
