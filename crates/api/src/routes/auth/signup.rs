use std::sync::Arc;

use serde_json::json;

use routegate_auth::{NewUser, StoreError};
use routegate_core::{
    AuthRequirement, DataShape, FieldRule, GatewayError, HandlerContext, Method, MethodEntry,
    RawDefinition, Reply, ResponseShape, Role, Schema,
};

use crate::routes::field;
use crate::services::Services;

const CONFLICT_MESSAGE: &str =
    "A user with the provided email or username already exists. Please use different credentials.";

pub fn definition() -> RawDefinition<Services> {
    RawDefinition {
        name: "UserRegistration",
        description: "Handles new user registration, including validation and secure password storage",
        path: None,
        source: "auth/signup.rs",
        authenticate: AuthRequirement::None,
        methods: vec![MethodEntry {
            method: Method::Post,
            schema: Some(Schema::new(vec![
                FieldRule::text("name", Some(4), Some(100)),
                FieldRule::text("username", Some(4), None),
                FieldRule::email("email"),
                FieldRule::text("language", None, None),
                FieldRule::text("password", Some(8), Some(30)),
            ])),
            responses: vec![
                ResponseShape::with_data(
                    201,
                    DataShape::object(vec![
                        ("id", DataShape::Integer),
                        ("name", DataShape::String),
                        ("username", DataShape::String),
                        ("email", DataShape::String),
                    ]),
                ),
                ResponseShape::new(422),
            ],
            handler: Arc::new(|ctx| Box::pin(handle(ctx))),
        }],
    }
}

async fn handle(ctx: HandlerContext<Services>) -> Result<Reply, GatewayError> {
    let email = field(&ctx.body, "email");
    let username = field(&ctx.body, "username");

    let exists = ctx
        .services
        .store
        .find_by_email(email)
        .await
        .map_err(|e| GatewayError::internal(e.to_string()))?
        .is_some()
        || ctx
            .services
            .store
            .find_by_username(username)
            .await
            .map_err(|e| GatewayError::internal(e.to_string()))?
            .is_some();
    if exists {
        return Ok(ctx.reply.code(422)?.error(CONFLICT_MESSAGE)?);
    }

    let password_hash = ctx
        .services
        .passwords
        .hash(field(&ctx.body, "password"))
        .map_err(|e| GatewayError::internal(e.to_string()))?;

    let user = match ctx
        .services
        .store
        .insert(NewUser {
            name: field(&ctx.body, "name").to_string(),
            username: username.to_string(),
            email: email.to_string(),
            language: field(&ctx.body, "language").to_string(),
            role: Role::User,
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        // Lost a race with a concurrent registration.
        Err(StoreError::Duplicate) => {
            return Ok(ctx.reply.code(422)?.error(CONFLICT_MESSAGE)?);
        }
        Err(err) => return Err(GatewayError::internal(err.to_string())),
    };

    Ok(ctx.reply.code(201)?.data(
        "User registered successfully!",
        json!({
            "id": user.id,
            "name": user.name,
            "username": user.username,
            "email": user.email,
        }),
    )?)
}
