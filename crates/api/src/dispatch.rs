//! Request dispatch: resolver, then validator, then handler.
//!
//! Ordering is fixed — authentication strictly precedes schema validation,
//! which strictly precedes handler invocation — so a handler never observes
//! an unauthenticated or unvalidated request. Every failure mode at this
//! boundary becomes a reply; unexpected faults become a 500 with a generic
//! message and are never remapped to 401.

use std::sync::Arc;

use routegate_core::{
    GatewayError, HandlerContext, InboundRequest, MethodEntry, Reply, ReplyBuilder, RouteEntry,
    issues_to_value, validate,
};

use crate::services::Services;

/// Run one matched (route, method) against one request, producing the one
/// reply the transport will write back.
pub async fn dispatch(
    route: &RouteEntry<Services>,
    entry: &MethodEntry<Services>,
    services: Arc<Services>,
    request: Arc<InboundRequest>,
) -> Reply {
    let identity = match services
        .resolver
        .resolve(request.clone(), &route.authenticate)
        .await
    {
        Ok(identity) => identity,
        Err(failure) => {
            tracing::debug!(
                path = route.path,
                code = failure.code,
                "authentication failed"
            );
            return Reply::error_for(failure.code, failure.message, None);
        }
    };

    let body = match validate(entry.schema.as_ref(), request.body()) {
        Ok(body) => body,
        Err(issues) => {
            return Reply::error_for(400, "Validation failed", Some(issues_to_value(&issues)));
        }
    };

    let context = HandlerContext {
        identity,
        body,
        services,
        request,
        reply: ReplyBuilder::new(),
    };

    match (entry.handler)(context).await {
        Ok(reply) => reply,
        Err(GatewayError::Contract(violation)) => {
            tracing::error!(
                path = route.path,
                method = %entry.method,
                error = %violation,
                "handler violated the reply contract"
            );
            Reply::error_for(500, "Internal server error", None)
        }
        Err(GatewayError::Internal(reason)) => {
            tracing::error!(
                path = route.path,
                method = %entry.method,
                %reason,
                "handler fault"
            );
            Reply::error_for(500, "Internal server error", None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use routegate_core::{
        AuthRequirement, Method, Registry, ReplyPayload, ResponseShape, Schema, FieldRule,
        RawDefinition,
    };
    use routegate_auth::Resolver;

    use super::*;
    use crate::services::Services;

    fn bare_services() -> Arc<Services> {
        crate::services::build_services(&crate::config::Config {
            jwt_secret: "test-secret".to_string(),
            port: 0,
            request_timeout: std::time::Duration::from_secs(5),
            token_ttl: chrono::Duration::minutes(10),
            bcrypt_cost: 4,
        })
    }

    fn request_with_body(body: serde_json::Value) -> Arc<InboundRequest> {
        Arc::new(InboundRequest::new(
            Method::Post,
            "/echo",
            HashMap::new(),
            HashMap::new(),
            body,
        ))
    }

    fn echo_registry(authenticate: AuthRequirement) -> Registry<Services> {
        Registry::load(vec![RawDefinition {
            name: "Echo",
            description: "echoes the validated body",
            path: Some("/echo"),
            source: "echo.rs",
            authenticate,
            methods: vec![routegate_core::MethodEntry {
                method: Method::Post,
                schema: Some(Schema::new(vec![FieldRule::email("email")])),
                responses: vec![ResponseShape::new(200)],
                handler: Arc::new(|ctx| {
                    Box::pin(async move { Ok(ctx.reply.code(200)?.data("echo", ctx.body)?) })
                }),
            }],
        }])
        .unwrap()
    }

    #[tokio::test]
    async fn invalid_body_short_circuits_with_400() {
        let registry = echo_registry(AuthRequirement::None);
        let (route, entry) = registry.find("/echo", Method::Post).unwrap();

        let reply = dispatch(
            route,
            entry,
            bare_services(),
            request_with_body(json!({"email": "nope"})),
        )
        .await;

        assert_eq!(reply.status(), 400);
        match reply.payload() {
            ReplyPayload::Error(body) => {
                assert_eq!(body.message, "Validation failed");
                let issues = body.error.as_ref().unwrap();
                assert_eq!(issues["issues"][0]["field"], "email");
            }
            other => panic!("expected error payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_body_reaches_the_handler() {
        let registry = echo_registry(AuthRequirement::None);
        let (route, entry) = registry.find("/echo", Method::Post).unwrap();

        let reply = dispatch(
            route,
            entry,
            bare_services(),
            request_with_body(json!({"email": "a@b.com", "noise": 1})),
        )
        .await;

        assert_eq!(reply.status(), 200);
        match reply.payload() {
            ReplyPayload::Success(body) => {
                // The handler sees the decoded body, not the raw one.
                assert_eq!(body.data, Some(json!({"email": "a@b.com"})));
            }
            other => panic!("expected success payload, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn authentication_runs_before_validation() {
        let registry = echo_registry(AuthRequirement::Required);
        let (route, entry) = registry.find("/echo", Method::Post).unwrap();

        // The body is invalid too, but the auth failure must win.
        let reply = dispatch(
            route,
            entry,
            bare_services(),
            request_with_body(json!({"email": "nope"})),
        )
        .await;

        assert_eq!(reply.status(), 401);
    }

    #[tokio::test]
    async fn contract_violation_surfaces_as_500_not_401() {
        let services = Arc::new(Services {
            store: Arc::new(routegate_auth::InMemoryIdentityStore::new()),
            passwords: Arc::new(routegate_auth::BcryptHasher::new(4)),
            tokens: Arc::new(routegate_auth::TokenService::new(
                b"test-secret",
                chrono::Duration::minutes(10),
            )),
            resolver: Resolver::new(vec![]),
        });

        let registry: Registry<Services> = Registry::load(vec![RawDefinition {
            name: "Broken",
            description: "sends an error body for a success code",
            path: Some("/broken"),
            source: "broken.rs",
            authenticate: AuthRequirement::None,
            methods: vec![routegate_core::MethodEntry {
                method: Method::Get,
                schema: None,
                responses: vec![ResponseShape::new(200)],
                handler: Arc::new(|ctx| {
                    Box::pin(async move { Ok(ctx.reply.code(200)?.error("oops")?) })
                }),
            }],
        }])
        .unwrap();
        let (route, entry) = registry.find("/broken", Method::Get).unwrap();

        let reply = dispatch(route, entry, services, request_with_body(json!(null))).await;
        assert_eq!(reply.status(), 500);
    }
}
