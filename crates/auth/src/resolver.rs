//! Strategy resolution: first-success-wins race plus role authorization.

use std::sync::Arc;

use tokio::task::JoinSet;

use routegate_core::{AuthRequirement, Identity, InboundRequest};

use crate::strategy::{AuthStrategy, StrategyFailure, StrategyOutcome};

/// Races the configured strategies for each request that needs
/// authentication and layers the role check on top.
pub struct Resolver {
    strategies: Vec<Arc<dyn AuthStrategy>>,
}

impl Resolver {
    pub fn new(strategies: Vec<Arc<dyn AuthStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve authentication for one request.
    ///
    /// Routes without a requirement resolve to `Ok(None)` untouched. For the
    /// rest, every strategy attempts concurrently against the same request;
    /// the first success wins and the remaining attempts are aborted
    /// (advisory only, attempts are read-only). When all strategies fail,
    /// the surfaced failure is the first strategy's explicit one, falling
    /// back to a plain 401 only when no strategy produced a typed failure.
    ///
    /// A successful authentication against a role-restricted route is then
    /// checked against the required role set; a mismatch is always a 401,
    /// regardless of how the strategy would have failed.
    pub async fn resolve(
        &self,
        request: Arc<InboundRequest>,
        requirement: &AuthRequirement,
    ) -> Result<Option<Identity>, StrategyFailure> {
        let required_roles = match requirement {
            AuthRequirement::None => return Ok(None),
            AuthRequirement::Required => None,
            AuthRequirement::RequiredRoles(roles) => Some(roles.as_slice()),
        };

        let mut attempts: JoinSet<(usize, StrategyOutcome)> = JoinSet::new();
        for (idx, strategy) in self.strategies.iter().enumerate() {
            let strategy = strategy.clone();
            let request = request.clone();
            attempts.spawn(async move { (idx, strategy.attempt(&request).await) });
        }

        let mut failures: Vec<Option<StrategyFailure>> = vec![None; self.strategies.len()];
        let mut identity: Option<Identity> = None;

        while let Some(joined) = attempts.join_next().await {
            match joined {
                Ok((_, StrategyOutcome::Success(resolved))) => {
                    identity = Some(resolved);
                    attempts.abort_all();
                    break;
                }
                Ok((idx, StrategyOutcome::Failure(failure))) => {
                    tracing::debug!(
                        strategy = self.strategies[idx].name(),
                        code = failure.code,
                        message = %failure.message,
                        "authentication strategy failed"
                    );
                    failures[idx] = Some(failure);
                }
                // A panicked attempt is an untyped fault; it contributes no
                // failure of its own and must not mask the typed ones.
                Err(join_err) if !join_err.is_cancelled() => {
                    tracing::error!(error = %join_err, "authentication strategy attempt fault");
                }
                Err(_) => {}
            }
        }

        let Some(identity) = identity else {
            let failure = failures
                .into_iter()
                .flatten()
                .next()
                .unwrap_or_else(|| StrategyFailure::new(401, "Unauthorized"));
            return Err(failure);
        };

        if let Some(roles) = required_roles
            && !roles.contains(&identity.role)
        {
            return Err(StrategyFailure::new(401, "Unauthorized"));
        }

        Ok(Some(identity))
    }
}
