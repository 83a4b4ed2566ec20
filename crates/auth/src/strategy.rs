//! The authentication strategy boundary.

use async_trait::async_trait;

use routegate_core::{Identity, InboundRequest};

/// Typed failure produced by a strategy. The code is one of the error
/// family's; the resolver surfaces it verbatim when no strategy succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub code: u16,
    pub message: String,
}

impl StrategyFailure {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Outcome of one per-request strategy attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    Success(Identity),
    Failure(StrategyFailure),
}

/// A pluggable authentication strategy.
///
/// Strategies are stateless templates: each call inspects the request and
/// produces a fresh outcome. Attempts are read-only and idempotent, which
/// is what lets the resolver race them and abandon losers.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn attempt(&self, request: &InboundRequest) -> StrategyOutcome;
}
