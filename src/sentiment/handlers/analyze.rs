//! Sentiment analysis handler / 情感分析处理器

use axum::{extract::State, response::Json};
use std::time::Instant;
use tracing::info;

use crate::sentiment::error::AnalysisError;
use crate::sentiment::gateway::GatewayState;
use crate::sentiment::types::{AnalysisRequest, AnalysisResult};

/// Analyze the sentiment of one text / 分析一段文本的情感
pub async fn process_text(
    State(state): State<GatewayState>,
    Json(req): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResult>, AnalysisError> {
    let started = Instant::now();
    let outcome = state.interpreter.analyze(&req).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(result) => {
            info!(
                sentiment_type = %result.sentiment_type,
                score = result.sentiment_score,
                degraded = result.degraded,
                elapsed_ms,
                "text processed"
            );
            Ok(Json(result))
        }
        Err(e) => {
            info!(status = e.status_code().as_u16(), elapsed_ms, "text processing failed");
            Err(e)
        }
    }
}
