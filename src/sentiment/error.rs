//! Error types for sentiment analysis
//! 情感分析的错误类型

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Fixed detail returned for upstream timeouts / 上游超时的固定提示
pub const TIMEOUT_DETAIL: &str = "Response to LLM time out! Please try again!";

/// Failure modes of a completion backend call / 补全后端调用的失败类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionErrorKind {
    /// The call exceeded its deadline / 调用超时
    Timeout,
    /// Connection, I/O or non-success status / 连接、I/O或非成功状态
    Transport,
    /// 2xx response whose body is not a completion envelope / 2xx响应但响应体格式错误
    InvalidResponse,
}

/// Completion backend error / 补全后端错误
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub message: String,
}

impl CompletionError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: CompletionErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: CompletionErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: CompletionErrorKind::InvalidResponse,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CompletionError::timeout(err.to_string())
        } else {
            CompletionError::transport(err.to_string())
        }
    }
}

/// Analysis error surfaced to HTTP callers / 返回给HTTP调用方的分析错误
///
/// Unparseable completions are not represented here: they degrade to
/// `AnalysisResult::fallback()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Upstream call timed out / 上游调用超时
    #[error("{}", TIMEOUT_DETAIL)]
    UpstreamTimeout,

    /// Upstream transport failure / 上游传输失败
    #[error("Error communicating with LLM API: {0}!")]
    UpstreamTransport(String),

    /// Upstream JSON lacked an expected key / 上游JSON缺少预期字段
    #[error("Unexpected response format from LLM: {0}!")]
    UpstreamSchema(String),

    /// Anything else / 其他错误
    #[error("Internal server error: {0}!")]
    Internal(String),
}

impl AnalysisError {
    pub fn missing_key(key: &str) -> Self {
        AnalysisError::UpstreamSchema(format!("missing key '{}'", key))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AnalysisError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            AnalysisError::UpstreamTransport(_) => StatusCode::BAD_GATEWAY,
            AnalysisError::UpstreamSchema(_) | AnalysisError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<CompletionError> for AnalysisError {
    fn from(err: CompletionError) -> Self {
        match err.kind {
            CompletionErrorKind::Timeout => AnalysisError::UpstreamTimeout,
            CompletionErrorKind::Transport => AnalysisError::UpstreamTransport(err.message),
            CompletionErrorKind::InvalidResponse => AnalysisError::UpstreamSchema(err.message),
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Result type alias for analysis operations / 分析操作的结果类型别名
pub type AnalysisOutcome<T> = Result<T, AnalysisError>;
