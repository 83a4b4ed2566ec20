//! Generic typed client over the gateway's envelope discipline.
//!
//! Builds requests from a path + method + optional payload and narrows the
//! response by status code: error-family codes decode into the error
//! envelope, success-family codes into the success envelope. Anything else
//! is a contract breach on the server side and is reported as such.

use serde_json::Value;
use thiserror::Error;

use routegate_core::{ErrorBody, Family, ListMetadata, Method, SuccessBody, family_of};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("status {0} is outside the reply contract")]
    UnexpectedStatus(u16),
}

/// A decoded reply, narrowed by the family owning its status code.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Success {
        code: u16,
        message: String,
        data: Option<Value>,
        metadata: Option<ListMetadata>,
    },
    Failure {
        code: u16,
        message: String,
        error: Option<Value>,
    },
}

impl ApiResponse {
    pub fn status(&self) -> u16 {
        match self {
            ApiResponse::Success { code, .. } | ApiResponse::Failure { code, .. } => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiResponse::Success { .. })
    }
}

/// Minimal typed RPC client.
pub struct Client {
    host: String,
    bearer: Option<String>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            bearer: None,
            http: reqwest::Client::new(),
        }
    }

    /// Attach a bearer token to every subsequent query.
    pub fn auth(&mut self, bearer: impl Into<String>) -> &mut Self {
        self.bearer = Some(bearer.into());
        self
    }

    /// Perform one call. GET requests send the payload as query parameters;
    /// every other method sends it as a JSON body.
    pub async fn query(
        &self,
        path: &str,
        method: Method,
        payload: Option<&Value>,
    ) -> Result<ApiResponse, ClientError> {
        let url = format!("{}{}", self.host, path);
        let mut request = match method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };

        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        if let Some(payload) = payload {
            request = match method {
                Method::Get => request.query(&query_pairs(payload)),
                _ => request.json(payload),
            };
        }

        let response = request.send().await?;
        let code = response.status().as_u16();

        match family_of(code) {
            Some(Family::Success) => {
                let body: SuccessBody = response.json().await?;
                Ok(ApiResponse::Success {
                    code,
                    message: body.message,
                    data: body.data,
                    metadata: body.metadata,
                })
            }
            Some(Family::Error) => {
                let body: ErrorBody = response.json().await?;
                Ok(ApiResponse::Failure {
                    code,
                    message: body.message,
                    error: body.error,
                })
            }
            None => Err(ClientError::UnexpectedStatus(code)),
        }
    }
}

fn query_pairs(payload: &Value) -> Vec<(String, String)> {
    let Value::Object(object) = payload else {
        return Vec::new();
    };
    object
        .iter()
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_pairs_render_scalars_without_quotes() {
        let pairs = query_pairs(&json!({"page": 2, "q": "alice"}));
        assert!(pairs.contains(&("page".to_string(), "2".to_string())));
        assert!(pairs.contains(&("q".to_string(), "alice".to_string())));
    }

    #[test]
    fn non_object_payload_yields_no_query_parameters() {
        assert!(query_pairs(&json!("scalar")).is_empty());
    }
}
