//! Tests for Aura HTTP handlers / Aura HTTP处理器测试

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::sentiment::config::LlmConfig;
    use crate::sentiment::error::CompletionError;
    use crate::sentiment::gateway::GatewayState;
    use crate::sentiment::interpreter::{CompletionInterpreter, SamplingParams};
    use crate::sentiment::routes::create_routes;
    use crate::sentiment::test_utils::StaticBackend;

    fn app_with(backend: StaticBackend) -> Router {
        create_routes(GatewayState::new(CompletionInterpreter::new(
            Arc::new(backend),
            SamplingParams::from(&LlmConfig::default()),
        )))
    }

    async fn post_text(app: Router, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/process_text")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_root_payload() {
        let app = app_with(StaticBackend::ok("{}"));
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            json!({
                "status": "running",
                "message": "Sentiment Aura API is live",
                "version": "1.0.0"
            })
        );
    }

    #[tokio::test]
    async fn test_health_payload() {
        let app = app_with(StaticBackend::ok("{}"));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "aura");
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_fenced_completion_returned_verbatim() {
        let raw = "```json\n{\"sentiment_score\":0.9,\"sentiment_type\":\"positive\",\"intensity\":0.8,\"keywords\":[\"great\"]}\n```";
        let (status, body) = post_text(app_with(StaticBackend::ok(raw)), r#"{"text":"great"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "sentiment_score": 0.9,
                "sentiment_type": "positive",
                "intensity": 0.8,
                "keywords": ["great"]
            })
        );
    }

    #[tokio::test]
    async fn test_unparseable_completion_returns_fallback() {
        let (status, body) = post_text(
            app_with(StaticBackend::ok("I cannot comply.")),
            r#"{"text":"anything"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sentiment_score"], json!(0.0));
        assert_eq!(body["sentiment_type"], "neutral");
        assert_eq!(body["intensity"], json!(0.0));
        assert_eq!(body["keywords"], json!(["error", "json", "parsing"]));
        assert_eq!(body["degraded"], json!(true));
    }

    #[tokio::test]
    async fn test_missing_keywords_is_500() {
        let raw = r#"{"sentiment_score":0.1,"sentiment_type":"neutral","intensity":0.1}"#;
        let (status, body) = post_text(app_with(StaticBackend::ok(raw)), r#"{"text":"x"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().contains("keywords"));
    }

    #[tokio::test]
    async fn test_timeout_is_504() {
        let (status, body) = post_text(
            app_with(StaticBackend::err(CompletionError::timeout("operation timed out"))),
            r#"{"text":"x"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            body,
            json!({ "detail": "Response to LLM time out! Please try again!" })
        );
    }

    #[tokio::test]
    async fn test_transport_error_is_502() {
        let (status, body) = post_text(
            app_with(StaticBackend::err(CompletionError::transport(
                "error sending request: connection refused",
            ))),
            r#"{"text":"x"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }

    #[tokio::test]
    async fn test_wrong_value_type_is_500() {
        let raw = r#"{"sentiment_score":"very","sentiment_type":"positive","intensity":0.1,"keywords":[]}"#;
        let (status, body) = post_text(app_with(StaticBackend::ok(raw)), r#"{"text":"x"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Internal server error:"));
    }

    #[tokio::test]
    async fn test_prompt_reaches_backend_unmodified() {
        let backend = StaticBackend::ok("I cannot comply.");
        let seen = backend.seen();
        let text = "I absolutely love this! \"quoted\" {braces}";
        let body = json!({ "text": text }).to_string();
        let (status, _) = post_text(app_with(backend), &body).await;
        assert_eq!(status, StatusCode::OK);

        let requests = seen.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].messages[1].content.contains(text));
    }

    #[tokio::test]
    async fn test_invalid_body_is_client_error() {
        let (status, _) = post_text(app_with(StaticBackend::ok("{}")), r#"{"txt":"x"}"#).await;
        assert!(status.is_client_error());

        let (status, _) = post_text(app_with(StaticBackend::ok("{}")), r#"{"text": 5}"#).await;
        assert!(status.is_client_error());

        let (status, _) = post_text(app_with(StaticBackend::ok("{}")), "not json").await;
        assert!(status.is_client_error());
    }
}
