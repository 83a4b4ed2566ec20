use std::sync::Arc;

use routegate_core::{
    AuthRequirement, GatewayError, HandlerContext, Method, MethodEntry, RawDefinition, Reply,
    ResponseShape,
};

use crate::services::Services;

pub fn definition() -> RawDefinition<Services> {
    RawDefinition {
        name: "UserLogout",
        description: "Ends the authenticated session",
        path: None,
        source: "auth/logout.rs",
        authenticate: AuthRequirement::Required,
        methods: vec![MethodEntry {
            method: Method::Post,
            schema: None,
            responses: vec![ResponseShape::new(200), ResponseShape::new(401)],
            handler: Arc::new(|ctx| Box::pin(handle(ctx))),
        }],
    }
}

// Tokens are stateless, so logout is a contract point for clients rather
// than a server-side invalidation.
async fn handle(ctx: HandlerContext<Services>) -> Result<Reply, GatewayError> {
    Ok(ctx.reply.code(200)?.message("Logged out successfully")?)
}
