//! Declarative request schemas and the payload validator.
//!
//! A schema is a flat list of named field rules. Validation either decodes
//! the body into a JSON object containing exactly the declared fields, or
//! fails with field-level issues the dispatcher turns into a 400 reply.
//! Handlers never observe a partially decoded body.

use serde::Serialize;
use serde_json::{Map, Value, json};

/// Shape constraint for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8 text with optional length bounds (inclusive).
    Text {
        min: Option<usize>,
        max: Option<usize>,
    },
    /// Structurally valid email address.
    Email,
}

/// One named rule of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldRule {
    pub fn text(name: &'static str, min: Option<usize>, max: Option<usize>) -> Self {
        Self {
            name,
            kind: FieldKind::Text { min, max },
            required: true,
        }
    }

    pub fn email(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Email,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Request schema for one route method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub fields: Vec<FieldRule>,
}

impl Schema {
    pub fn new(fields: Vec<FieldRule>) -> Self {
        Self { fields }
    }
}

/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Structured error detail carried in the 400 envelope.
pub fn issues_to_value(issues: &[FieldError]) -> Value {
    json!({ "issues": issues })
}

/// Validate `body` against `schema`.
///
/// No schema means the method takes no request body: validation trivially
/// succeeds with an empty object. Otherwise the body must be a JSON object
/// and every rule must hold; the decoded value contains exactly the
/// declared fields.
pub fn validate(schema: Option<&Schema>, body: &Value) -> Result<Value, Vec<FieldError>> {
    let Some(schema) = schema else {
        return Ok(Value::Object(Map::new()));
    };

    let Value::Object(object) = body else {
        return Err(vec![FieldError::new("body", "Expected a JSON object body")]);
    };

    let mut decoded = Map::new();
    let mut issues = Vec::new();

    for rule in &schema.fields {
        match object.get(rule.name) {
            None | Some(Value::Null) => {
                if rule.required {
                    issues.push(FieldError::new(rule.name, "Field is required"));
                }
            }
            Some(value) => match check_field(rule, value) {
                Ok(()) => {
                    decoded.insert(rule.name.to_string(), value.clone());
                }
                Err(issue) => issues.push(issue),
            },
        }
    }

    if issues.is_empty() {
        Ok(Value::Object(decoded))
    } else {
        Err(issues)
    }
}

fn check_field(rule: &FieldRule, value: &Value) -> Result<(), FieldError> {
    let Value::String(text) = value else {
        return Err(FieldError::new(rule.name, "Expected a string"));
    };

    match rule.kind {
        FieldKind::Text { min, max } => {
            let len = text.chars().count();
            if let Some(min) = min
                && len < min
            {
                return Err(FieldError::new(
                    rule.name,
                    format!("Must be at least {min} characters"),
                ));
            }
            if let Some(max) = max
                && len > max
            {
                return Err(FieldError::new(
                    rule.name,
                    format!("Must be at most {max} characters"),
                ));
            }
            Ok(())
        }
        FieldKind::Email => {
            if is_email(text) {
                Ok(())
            } else {
                Err(FieldError::new(rule.name, "Invalid email address"))
            }
        }
    }
}

// Structural check only: one '@', non-empty local part, dotted domain.
fn is_email(text: &str) -> bool {
    let mut parts = text.splitn(2, '@');
    let (Some(local), Some(domain)) = (parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let mut labels = domain.split('.');
    labels.clone().count() >= 2 && labels.all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn signup_schema() -> Schema {
        Schema::new(vec![
            FieldRule::email("email"),
            FieldRule::text("password", Some(8), Some(30)),
        ])
    }

    #[test]
    fn absent_schema_accepts_anything() {
        let decoded = validate(None, &json!("whatever")).unwrap();
        assert_eq!(decoded, json!({}));
    }

    #[test]
    fn both_invalid_fields_are_reported() {
        let issues = validate(
            Some(&signup_schema()),
            &json!({"email": "not-an-email", "password": "short"}),
        )
        .unwrap_err();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.field == "email"));
        assert!(issues.iter().any(|i| i.field == "password"));
    }

    #[test]
    fn missing_required_field_is_reported() {
        let issues = validate(Some(&signup_schema()), &json!({"email": "a@b.com"})).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "password");
    }

    #[test]
    fn decoded_body_contains_only_declared_fields() {
        let decoded = validate(
            Some(&signup_schema()),
            &json!({"email": "a@b.com", "password": "password1", "extra": true}),
        )
        .unwrap();
        assert_eq!(decoded, json!({"email": "a@b.com", "password": "password1"}));
    }

    #[test]
    fn non_object_body_fails_when_schema_declared() {
        let issues = validate(Some(&signup_schema()), &Value::Null).unwrap_err();
        assert_eq!(issues[0].field, "body");
    }

    #[test]
    fn email_structure() {
        assert!(is_email("a@b.com"));
        assert!(is_email("first.last@sub.example.org"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@"));
        assert!(!is_email("a@b"));
        assert!(!is_email("a b@c.com"));
        assert!(!is_email("a@b..com"));
    }
}
