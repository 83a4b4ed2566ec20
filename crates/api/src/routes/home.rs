use std::sync::Arc;

use routegate_core::{
    AuthRequirement, GatewayError, HandlerContext, Method, MethodEntry, RawDefinition, Reply,
    ResponseShape,
};

use crate::services::Services;

pub fn definition() -> RawDefinition<Services> {
    RawDefinition {
        name: "Home",
        description: "Home API",
        path: None,
        source: "index.rs",
        authenticate: AuthRequirement::None,
        methods: vec![MethodEntry {
            method: Method::Get,
            schema: None,
            responses: vec![ResponseShape::new(200)],
            handler: Arc::new(|ctx| Box::pin(handle(ctx))),
        }],
    }
}

async fn handle(ctx: HandlerContext<Services>) -> Result<Reply, GatewayError> {
    Ok(ctx.reply.code(200)?.message("Hello World")?)
}
