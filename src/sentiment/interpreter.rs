//! Completion interpreter: prompt → remote model → validated result
//! 补全解释器：提示 → 远程模型 → 经过校验的结果

use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::completion::{ChatCompletionRequest, ChatMessage, CompletionBackend};
use super::config::LlmConfig;
use super::error::{AnalysisError, AnalysisOutcome};
use super::extract::extract_json_candidate;
use super::prompt::{PromptBuilder, SYSTEM_PROMPT};
use super::types::{AnalysisRequest, AnalysisResult};

/// Keys the completion JSON must carry, in reporting order / 补全JSON必须包含的字段
pub const REQUIRED_KEYS: [&str; 4] = ["sentiment_score", "sentiment_type", "intensity", "keywords"];

/// Advisory keyword count requested by the prompt / 提示中要求的关键词数量
const KEYWORD_RANGE: std::ops::RangeInclusive<usize> = 3..=5;

/// Sampling parameters for each outbound call / 每次出站调用的采样参数
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl From<&LlmConfig> for SamplingParams {
    fn from(cfg: &LlmConfig) -> Self {
        Self {
            model: cfg.model.clone(),
            temperature: cfg.temperature,
            max_tokens: cfg.max_tokens,
        }
    }
}

/// Interpretation of a raw completion / 原始补全的解释结果
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// The completion yielded a valid result / 补全产生了有效结果
    Parsed(AnalysisResult),
    /// The completion was not JSON; the fallback is used / 补全不是JSON，使用回退结果
    Degraded { candidate: String },
}

impl Interpretation {
    pub fn into_result(self) -> AnalysisResult {
        match self {
            Interpretation::Parsed(result) => result,
            Interpretation::Degraded { .. } => AnalysisResult::fallback(),
        }
    }
}

/// Turns a completion text into an `Interpretation` / 将补全文本转换为解释结果
///
/// Invalid JSON degrades; a non-object or missing key is a schema error;
/// wrongly typed values are internal errors.
pub fn interpret_completion(raw: &str) -> AnalysisOutcome<Interpretation> {
    let candidate = extract_json_candidate(raw);

    let value = match serde_json::from_str::<Value>(&candidate) {
        Ok(v) => v,
        Err(e) => {
            debug!(error = %e, "completion is not valid JSON");
            return Ok(Interpretation::Degraded { candidate });
        }
    };

    let mut object: Map<String, Value> = match value {
        Value::Object(map) => map,
        other => {
            return Err(AnalysisError::UpstreamSchema(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            )))
        }
    };

    if let Some(missing) = REQUIRED_KEYS.iter().find(|k| !object.contains_key(**k)) {
        return Err(AnalysisError::missing_key(missing));
    }

    // Only the fallback path may mark a result degraded.
    object.remove("degraded");
    let result: AnalysisResult = serde_json::from_value(Value::Object(object))
        .map_err(|e| AnalysisError::Internal(e.to_string()))?;

    Ok(Interpretation::Parsed(result))
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Sends prompts to a backend and interprets the answers
/// 向后端发送提示并解释返回结果
#[derive(Clone)]
pub struct CompletionInterpreter {
    backend: Arc<dyn CompletionBackend>,
    prompts: PromptBuilder,
    params: SamplingParams,
}

impl CompletionInterpreter {
    pub fn new(backend: Arc<dyn CompletionBackend>, params: SamplingParams) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
            params,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Builds the outbound request for `request` / 为请求构建出站调用
    pub fn build_request(&self, request: &AnalysisRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.params.model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(self.prompts.render(request)),
            ],
            temperature: self.params.temperature,
            max_tokens: self.params.max_tokens,
        }
    }

    /// Analyze one text with a single upstream attempt / 单次上游调用分析文本
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisOutcome<AnalysisResult> {
        debug!(chars = request.text.chars().count(), "analyzing text");
        let outbound = self.build_request(request);

        let raw = self.backend.complete(&outbound).await.map_err(|e| {
            error!(backend = %self.backend.name(), kind = ?e.kind, error = %e, "completion call failed");
            AnalysisError::from(e)
        })?;

        match interpret_completion(&raw)? {
            Interpretation::Parsed(result) => {
                if !KEYWORD_RANGE.contains(&result.keywords.len()) {
                    warn!(
                        count = result.keywords.len(),
                        "model returned keyword count outside 3-5"
                    );
                }
                if !result.is_consistent() {
                    debug!(
                        score = result.sentiment_score,
                        sentiment_type = %result.sentiment_type,
                        "sentiment_type disagrees with score thresholds"
                    );
                }
                Ok(result)
            }
            Interpretation::Degraded { candidate } => {
                warn!(content = %candidate, "JSON parse error, returning neutral fallback");
                Ok(AnalysisResult::fallback())
            }
        }
    }
}
