//! Signed bearer tokens (HS256).
//!
//! The signing primitive is jsonwebtoken; this module pins the claims model
//! and keeps the verification failure modes distinct, because the bearer
//! strategy maps each one to a specific reply code.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use routegate_core::Identity;

/// Claims carried by a gateway token: the user id plus the secondary
/// verification uuid. Both must match the stored record on verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BearerClaims {
    pub sub: i64,
    pub uuid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Distinct verification failure modes. Never collapsed into one generic
/// error here; the strategies decide the reply code per mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token is not yet valid")]
    NotYetValid,

    #[error("malformed token or invalid signature")]
    Invalid,

    #[error("token processing failed: {0}")]
    Internal(String),
}

/// HS256 signer/verifier bound to one secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Sign a token for `identity`, valid from now for the configured ttl.
    pub fn sign(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = BearerClaims {
            sub: identity.id,
            uuid: identity.uuid,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Internal(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<BearerClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;

        match jsonwebtoken::decode::<BearerClaims>(token, &self.decoding, &validation) {
            Ok(data) => Ok(data.claims),
            Err(err) => Err(match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::ImmatureSignature => TokenError::NotYetValid,
                ErrorKind::InvalidToken
                | ErrorKind::InvalidSignature
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => TokenError::Invalid,
                _ => TokenError::Internal(err.to_string()),
            }),
        }
    }
}
