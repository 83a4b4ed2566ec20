use std::sync::Arc;

use serde_json::json;

use routegate_core::{
    AuthRequirement, DataShape, FieldRule, GatewayError, HandlerContext, Method, MethodEntry,
    RawDefinition, Reply, ResponseShape, Schema,
};

use crate::routes::field;
use crate::services::Services;

const REJECT_MESSAGE: &str = "Invalid email or password";

pub fn definition() -> RawDefinition<Services> {
    RawDefinition {
        name: "UserLogin",
        description: "Authenticates a user by email and password and issues a bearer token",
        path: None,
        source: "auth/login.rs",
        authenticate: AuthRequirement::None,
        methods: vec![MethodEntry {
            method: Method::Post,
            schema: Some(Schema::new(vec![
                FieldRule::email("email"),
                FieldRule::text("password", Some(8), None),
            ])),
            responses: vec![
                ResponseShape::with_data(200, DataShape::String),
                ResponseShape::new(403),
            ],
            handler: Arc::new(|ctx| Box::pin(handle(ctx))),
        }],
    }
}

async fn handle(ctx: HandlerContext<Services>) -> Result<Reply, GatewayError> {
    let user = match ctx
        .services
        .store
        .find_by_email(field(&ctx.body, "email"))
        .await
        .map_err(|e| GatewayError::internal(e.to_string()))?
    {
        Some(user) => user,
        None => return Ok(ctx.reply.code(403)?.error(REJECT_MESSAGE)?),
    };

    let matches = ctx
        .services
        .passwords
        .verify(field(&ctx.body, "password"), &user.password_hash)
        .map_err(|e| GatewayError::internal(e.to_string()))?;
    if !matches {
        return Ok(ctx.reply.code(403)?.error(REJECT_MESSAGE)?);
    }

    let token = ctx
        .services
        .tokens
        .sign(&user.identity())
        .map_err(|e| GatewayError::internal(e.to_string()))?;

    Ok(ctx.reply.code(200)?.data("Login successful", json!(token))?)
}
