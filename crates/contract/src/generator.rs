//! Offline contract generation.
//!
//! A structural walk over the frozen registry that emits the client-facing
//! type map: path -> method -> {request, response, auth}. No code text is
//! synthesized; the contract is a plain declarative value whose JSON
//! rendering is byte-deterministic (routes in registration order, methods
//! in fixed order, responses sorted by status code, struct fields in
//! declaration order — no hash maps anywhere).

use serde::Serialize;

use routegate_core::{
    AuthRequirement, DataShape, Family, FieldKind, Method, Registry, Role, Schema, family_of,
};

/// Request-side descriptor for one field of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
}

/// Response descriptor for one status code: which family owns it and, for
/// success codes, the shape of `data`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractResponse {
    pub code: u16,
    pub family: Family,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<DataShape>,
}

/// Authentication requirement as it appears in the artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContractAuth {
    None,
    Required,
    RequiredRoles { roles: Vec<Role> },
}

impl From<&AuthRequirement> for ContractAuth {
    fn from(requirement: &AuthRequirement) -> Self {
        match requirement {
            AuthRequirement::None => ContractAuth::None,
            AuthRequirement::Required => ContractAuth::Required,
            AuthRequirement::RequiredRoles(roles) => ContractAuth::RequiredRoles {
                roles: roles.clone(),
            },
        }
    }
}

/// One method of one route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractMethod {
    pub method: Method,
    /// `None` means the method takes no request body.
    pub request: Option<Vec<RequestField>>,
    pub responses: Vec<ContractResponse>,
    pub auth: ContractAuth,
}

/// One route of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractRoute {
    pub path: String,
    pub name: &'static str,
    pub description: &'static str,
    pub methods: Vec<ContractMethod>,
}

/// The full generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contract {
    pub routes: Vec<ContractRoute>,
}

impl Contract {
    /// Deterministic JSON rendering of the artifact.
    pub fn to_json_string(&self) -> String {
        // Serialization of these types cannot fail: no maps, no non-string
        // keys, no non-finite floats.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn write_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_json_string())
    }
}

/// Walk the frozen registry and derive the contract.
pub fn generate<S>(registry: &Registry<S>) -> Contract {
    let mut routes = Vec::with_capacity(registry.len());

    for route in registry.routes() {
        let auth = ContractAuth::from(&route.authenticate);

        let mut methods: Vec<ContractMethod> = route
            .methods
            .iter()
            .map(|entry| {
                let mut responses: Vec<ContractResponse> = entry
                    .responses
                    .iter()
                    .map(|shape| ContractResponse {
                        code: shape.code,
                        // Codes outside the contract cannot be selected by
                        // the reply builder; default them to the error
                        // family rather than panic in an offline pass.
                        family: family_of(shape.code).unwrap_or(Family::Error),
                        data: shape.data.clone(),
                    })
                    .collect();
                responses.sort_by_key(|response| response.code);

                ContractMethod {
                    method: entry.method,
                    request: entry.schema.as_ref().map(request_fields),
                    responses,
                    auth: auth.clone(),
                }
            })
            .collect();
        methods.sort_by_key(|entry| entry.method);

        routes.push(ContractRoute {
            path: route.path.clone(),
            name: route.name,
            description: route.description,
            methods,
        });
    }

    Contract { routes }
}

fn request_fields(schema: &Schema) -> Vec<RequestField> {
    schema
        .fields
        .iter()
        .map(|rule| match rule.kind {
            FieldKind::Text { min, max } => RequestField {
                name: rule.name,
                ty: "string",
                required: rule.required,
                min,
                max,
            },
            FieldKind::Email => RequestField {
                name: rule.name,
                ty: "email",
                required: rule.required,
                min: None,
                max: None,
            },
        })
        .collect()
}
