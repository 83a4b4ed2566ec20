use std::sync::Arc;

use serde_json::Value;

use routegate_core::{
    AuthRequirement, DataShape, GatewayError, HandlerContext, Method, MethodEntry, PageRequest,
    RawDefinition, Reply, ResponseShape, Role, issues_to_value,
};

use crate::services::Services;

pub fn definition() -> RawDefinition<Services> {
    RawDefinition {
        name: "UserDirectory",
        description: "Paginated listing of registered users, administrators only",
        path: None,
        source: "users.rs",
        authenticate: AuthRequirement::RequiredRoles(vec![Role::Administrator]),
        methods: vec![MethodEntry {
            method: Method::Get,
            schema: None,
            responses: vec![
                ResponseShape::with_data(
                    200,
                    DataShape::list(DataShape::object(vec![
                        ("id", DataShape::Integer),
                        ("uuid", DataShape::String),
                        ("name", DataShape::String),
                        ("username", DataShape::String),
                        ("email", DataShape::String),
                        ("language", DataShape::String),
                        ("role", DataShape::String),
                    ])),
                ),
                ResponseShape::new(400),
                ResponseShape::new(401),
            ],
            handler: Arc::new(|ctx| Box::pin(handle(ctx))),
        }],
    }
}

async fn handle(ctx: HandlerContext<Services>) -> Result<Reply, GatewayError> {
    let page = match PageRequest::from_request(&ctx.request) {
        Ok(page) => page,
        Err(issues) => {
            return Ok(ctx
                .reply
                .code(400)?
                .error_with("Validation failed", issues_to_value(&issues))?);
        }
    };

    let (records, total) = ctx
        .services
        .store
        .list(page.offset(), page.page_size)
        .await
        .map_err(|e| GatewayError::internal(e.to_string()))?;

    let items: Vec<Value> = records.iter().map(|record| record.public_json()).collect();

    Ok(ctx
        .reply
        .code(200)?
        .list("Users fetched successfully", items, page.metadata(total))?)
}
