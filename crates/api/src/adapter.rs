//! axum adapter: binds the frozen registry onto an `axum::Router`.
//!
//! The adapter is the only place HTTP-framework types appear. Each
//! registered (path, method) pair becomes one axum route whose handler
//! converts the raw request into the engine's `InboundRequest`, runs the
//! dispatcher under the per-request timeout, and writes the reply back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{MethodFilter, MethodRouter},
};
use serde_json::Value;

use routegate_core::{InboundRequest, Method, Registry, Reply};

use crate::dispatch::dispatch;
use crate::services::Services;

const BODY_LIMIT: usize = 1024 * 1024;

/// Everything one bound route needs to dispatch.
#[derive(Clone)]
struct DispatchTarget {
    registry: Arc<Registry<Services>>,
    services: Arc<Services>,
    route_idx: usize,
    method_idx: usize,
    timeout: Duration,
}

/// Build the transport router from the frozen registry.
pub fn bind(
    registry: Arc<Registry<Services>>,
    services: Arc<Services>,
    timeout: Duration,
) -> Router {
    // The registry may hold one path under several definitions with
    // disjoint methods; axum accepts each path once, so method routers are
    // merged per path before mounting.
    let mut routers: Vec<(String, MethodRouter)> = Vec::new();
    let mut by_path: HashMap<String, usize> = HashMap::new();

    for (route_idx, route) in registry.routes().iter().enumerate() {
        let slot = *by_path.entry(route.path.clone()).or_insert_with(|| {
            routers.push((route.path.clone(), MethodRouter::new()));
            routers.len() - 1
        });

        for (method_idx, entry) in route.methods.iter().enumerate() {
            let target = DispatchTarget {
                registry: registry.clone(),
                services: services.clone(),
                route_idx,
                method_idx,
                timeout,
            };
            let method_router = std::mem::take(&mut routers[slot].1);
            routers[slot].1 = method_router.on(method_filter(entry.method), move |req: Request| {
                handle(req, target.clone())
            });
        }
    }

    let mut router = Router::new();
    for (path, method_router) in routers {
        router = router.route(&path, method_router);
    }
    router
}

fn method_filter(method: Method) -> MethodFilter {
    match method {
        Method::Get => MethodFilter::GET,
        Method::Post => MethodFilter::POST,
        Method::Put => MethodFilter::PUT,
        Method::Delete => MethodFilter::DELETE,
    }
}

async fn handle(req: Request, target: DispatchTarget) -> Response {
    let route = &target.registry.routes()[target.route_idx];
    let entry = &route.methods[target.method_idx];

    let (parts, body) = req.into_parts();

    let mut headers: HashMap<String, String> = HashMap::new();
    for (name, value) in &parts.headers {
        if let Ok(value) = value.to_str() {
            headers.insert(name.as_str().to_string(), value.to_string());
        }
    }

    let query = parts
        .uri
        .query()
        .map(parse_query)
        .unwrap_or_default();

    let body = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) if !bytes.is_empty() => {
            serde_json::from_slice::<Value>(&bytes).unwrap_or(Value::Null)
        }
        _ => Value::Null,
    };

    let request = Arc::new(InboundRequest::new(
        entry.method,
        route.path.clone(),
        headers,
        query,
        body,
    ));

    let reply = match tokio::time::timeout(
        target.timeout,
        dispatch(route, entry, target.services.clone(), request),
    )
    .await
    {
        Ok(reply) => reply,
        Err(_) => {
            tracing::error!(path = route.path, method = %entry.method, "request timed out");
            Reply::error_for(500, "Request timed out", None)
        }
    };

    to_response(reply)
}

fn parse_query(raw: &str) -> HashMap<String, String> {
    serde_urlencoded::from_str(raw).unwrap_or_default()
}

fn to_response(reply: Reply) -> Response {
    let status =
        StatusCode::from_u16(reply.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(reply.payload().clone())).into_response()
}
