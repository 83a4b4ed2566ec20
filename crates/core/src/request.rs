//! Transport-agnostic view of one inbound HTTP request.
//!
//! The dispatcher and the authentication strategies work against this type
//! so the engine can sit in front of any HTTP transport; the axum adapter
//! in the api crate does the conversion.

use std::collections::HashMap;

use serde_json::Value;

use crate::route::Method;

/// One inbound request, immutable for the lifetime of its dispatch.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    method: Method,
    path: String,
    /// Header names lowercased; last occurrence wins.
    headers: HashMap<String, String>,
    query: HashMap<String, String>,
    /// Parsed JSON body; `Null` when the request carried none (or carried
    /// bytes that were not JSON — schema validation reports that case).
    body: Value,
}

impl InboundRequest {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        headers: HashMap<String, String>,
        query: HashMap<String, String>,
        body: Value,
    ) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self {
            method,
            path: path.into(),
            headers,
            query,
            body,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Value of a cookie from the `Cookie` header, if present.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        let header = self.header("cookie")?;
        for pair in header.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            if parts.next() == Some(name) {
                return parts.next();
            }
        }
        None
    }

    /// Bearer token from the `Authorization` header. Accepts both the
    /// `Bearer <token>` form and a bare token.
    pub fn bearer_token(&self) -> Option<&str> {
        let header = self.header("authorization")?.trim();
        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .unwrap_or(header)
            .trim();
        (!token.is_empty()).then_some(token)
    }
}
