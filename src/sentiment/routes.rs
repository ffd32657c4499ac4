//! HTTP routes for the Sentiment Aura API
//! Sentiment Aura API的HTTP路由

use axum::{
    routing::{get, post},
    Router,
};

use super::gateway::GatewayState;
use super::handlers::{health_check, process_text, root};

/// Create HTTP routes / 创建HTTP路由
pub fn create_routes(state: GatewayState) -> Router {
    Router::new()
        // Liveness endpoints / 存活检查端点
        .route("/", get(root))
        .route("/health", get(health_check))
        // Sentiment analysis / 情感分析
        .route("/process_text", post(process_text))
        .with_state(state)
}
