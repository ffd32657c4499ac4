//! HTTP gateway state and router assembly
//! HTTP网关状态与路由组装

use anyhow::Context;
use axum::{http::HeaderValue, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use super::interpreter::CompletionInterpreter;
use super::routes::create_routes;

/// HTTP gateway state / HTTP网关状态
#[derive(Clone)]
pub struct GatewayState {
    pub interpreter: Arc<CompletionInterpreter>,
}

impl GatewayState {
    pub fn new(interpreter: CompletionInterpreter) -> Self {
        Self {
            interpreter: Arc::new(interpreter),
        }
    }
}

/// CORS for a single origin, any method or header / 单一来源的CORS，允许任意方法与头
pub fn build_cors_layer(allowed_origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(allowed_origin)
        .with_context(|| format!("invalid CORS origin '{}'", allowed_origin))?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Create HTTP gateway router / 创建HTTP网关路由器
pub fn create_gateway_router(state: GatewayState, allowed_origin: &str) -> anyhow::Result<Router> {
    Ok(create_routes(state).layer(build_cors_layer(allowed_origin)?))
}
