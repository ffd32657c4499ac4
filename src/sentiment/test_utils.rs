//! Test utilities for the sentiment service / 情感服务测试工具

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::completion::{ChatCompletionRequest, CompletionBackend};
use super::error::CompletionError;

/// Backend returning a canned answer and recording requests
/// 返回固定结果并记录请求的后端
pub struct StaticBackend {
    answer: Result<String, CompletionError>,
    seen: Arc<Mutex<Vec<ChatCompletionRequest>>>,
}

impl StaticBackend {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            answer: Ok(content.into()),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn err(error: CompletionError) -> Self {
        Self {
            answer: Err(error),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn seen(&self) -> Arc<Mutex<Vec<ChatCompletionRequest>>> {
        self.seen.clone()
    }
}

#[async_trait]
impl CompletionBackend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn complete(&self, req: &ChatCompletionRequest) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().push(req.clone());
        self.answer.clone()
    }
}
