//! Reply contract: status-code families, response envelopes, and the typed
//! reply builder.
//!
//! Every status code the gateway can emit belongs to exactly one family.
//! Success codes carry `{message, data?, metadata?}` where `metadata` is
//! present iff `data` is a collection; error codes carry `{message, error?}`.
//! The builder walks an explicit `Pending -> Selected(code) -> Sent` state
//! machine: selecting a code narrows the acceptable payloads to the family
//! that owns it, and sending consumes the builder so a second send is
//! unrepresentable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Status codes of the success family.
pub const SUCCESS_CODES: [u16; 2] = [200, 201];

/// Status codes of the error family.
pub const ERROR_CODES: [u16; 7] = [400, 401, 403, 404, 409, 422, 500];

/// The two payload families of the reply contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    Success,
    Error,
}

/// Family owning `code`, or `None` when the code is outside the contract.
pub fn family_of(code: u16) -> Option<Family> {
    if SUCCESS_CODES.contains(&code) {
        Some(Family::Success)
    } else if ERROR_CODES.contains(&code) {
        Some(Family::Error)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Envelopes
// ─────────────────────────────────────────────────────────────────────────────

/// Collection paging metadata, present exactly when `data` is a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMetadata {
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub page_size: u64,
}

/// Success-family envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ListMetadata>,
}

/// Error-family envelope. `error` carries structured detail such as
/// field-level validation issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// A payload tagged with the family it claims to belong to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReplyPayload {
    Success(SuccessBody),
    Error(ErrorBody),
}

impl ReplyPayload {
    pub fn family(&self) -> Family {
        match self {
            ReplyPayload::Success(_) => Family::Success,
            ReplyPayload::Error(_) => Family::Error,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Contract violations
// ─────────────────────────────────────────────────────────────────────────────

/// Programmer error against the reply contract. Distinct from request
/// validation failure: a violation means the handler itself misbehaved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractViolation {
    #[error("status code {0} is not part of the reply contract")]
    UnknownCode(u16),

    #[error("payload family {payload:?} does not own status code {code}")]
    FamilyMismatch { code: u16, payload: Family },

    #[error("collection data requires list metadata for status code {0}")]
    MissingMetadata(u16),

    #[error("list metadata is only valid for collection data (status code {0})")]
    UnexpectedMetadata(u16),
}

// ─────────────────────────────────────────────────────────────────────────────
// Typed reply builder: Pending -> Selected -> Sent
// ─────────────────────────────────────────────────────────────────────────────

/// Pending state. Handed to a handler; the handler must select a code
/// before it can send anything.
#[derive(Debug)]
pub struct ReplyBuilder {
    _private: (),
}

impl ReplyBuilder {
    pub fn new() -> Self {
        Self { _private: () }
    }

    /// Transition `Pending -> Selected(code)`.
    pub fn code(self, code: u16) -> Result<SelectedReply, ContractViolation> {
        let family = family_of(code).ok_or(ContractViolation::UnknownCode(code))?;
        Ok(SelectedReply { code, family })
    }
}

impl Default for ReplyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Selected state: the acceptable payload shapes are narrowed to the family
/// owning `code`. Sending consumes the value, so `Sent` happens at most once.
#[derive(Debug)]
pub struct SelectedReply {
    code: u16,
    family: Family,
}

impl SelectedReply {
    pub fn status(&self) -> u16 {
        self.code
    }

    /// Transition `Selected -> Sent`, rejecting payloads of the wrong family.
    pub fn send(self, payload: ReplyPayload) -> Result<Reply, ContractViolation> {
        if payload.family() != self.family {
            return Err(ContractViolation::FamilyMismatch {
                code: self.code,
                payload: payload.family(),
            });
        }
        if let ReplyPayload::Success(body) = &payload {
            let is_list = matches!(body.data, Some(Value::Array(_)));
            if is_list && body.metadata.is_none() {
                return Err(ContractViolation::MissingMetadata(self.code));
            }
            if !is_list && body.metadata.is_some() {
                return Err(ContractViolation::UnexpectedMetadata(self.code));
            }
        }
        Ok(Reply {
            code: self.code,
            payload,
        })
    }

    /// Success reply with a message only.
    pub fn message(self, message: impl Into<String>) -> Result<Reply, ContractViolation> {
        self.send(ReplyPayload::Success(SuccessBody {
            message: message.into(),
            data: None,
            metadata: None,
        }))
    }

    /// Success reply with a scalar or object `data` value.
    pub fn data(self, message: impl Into<String>, data: Value) -> Result<Reply, ContractViolation> {
        self.send(ReplyPayload::Success(SuccessBody {
            message: message.into(),
            data: Some(data),
            metadata: None,
        }))
    }

    /// Success reply with collection data and its paging metadata.
    pub fn list(
        self,
        message: impl Into<String>,
        items: Vec<Value>,
        metadata: ListMetadata,
    ) -> Result<Reply, ContractViolation> {
        self.send(ReplyPayload::Success(SuccessBody {
            message: message.into(),
            data: Some(Value::Array(items)),
            metadata: Some(metadata),
        }))
    }

    /// Error reply with a message only.
    pub fn error(self, message: impl Into<String>) -> Result<Reply, ContractViolation> {
        self.send(ReplyPayload::Error(ErrorBody {
            message: message.into(),
            error: None,
        }))
    }

    /// Error reply with structured detail.
    pub fn error_with(
        self,
        message: impl Into<String>,
        error: Value,
    ) -> Result<Reply, ContractViolation> {
        self.send(ReplyPayload::Error(ErrorBody {
            message: message.into(),
            error: Some(error),
        }))
    }
}

/// Sent state: the one reply this request will produce.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    code: u16,
    payload: ReplyPayload,
}

impl Reply {
    pub fn status(&self) -> u16 {
        self.code
    }

    pub fn payload(&self) -> &ReplyPayload {
        &self.payload
    }

    /// Infallible error-family constructor for the dispatch pipeline.
    ///
    /// Codes outside the error family are coerced to 500; the pipeline must
    /// always be able to answer, even when the failure it is reporting
    /// carried a malformed code.
    pub fn error_for(code: u16, message: impl Into<String>, error: Option<Value>) -> Reply {
        let code = match family_of(code) {
            Some(Family::Error) => code,
            _ => 500,
        };
        Reply {
            code,
            payload: ReplyPayload::Error(ErrorBody {
                message: message.into(),
                error,
            }),
        }
    }
}
