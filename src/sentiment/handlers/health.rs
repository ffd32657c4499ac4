use axum::Json;
use serde_json::json;

use crate::sentiment::types::HealthResponse;

/// Root liveness payload / 根路径存活信息
pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// Health check endpoint / 健康检查端点
pub async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "aura"
    }))
}
