//! Request and result types for sentiment analysis
//! 情感分析的请求与结果类型

use serde::{Deserialize, Serialize};

/// Score above which a result is classified positive / 判定为积极的分数阈值
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Score below which a result is classified negative / 判定为消极的分数阈值
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Keywords returned when the completion could not be parsed
/// 无法解析补全时返回的关键词
pub const FALLBACK_KEYWORDS: [&str; 3] = ["error", "json", "parsing"];

/// Inbound analysis request / 分析请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Sentiment category / 情感类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentType {
    Positive,
    Negative,
    Neutral,
}

impl SentimentType {
    /// Classify a score using the thresholds given to the model
    /// 使用提示中的阈值对分数分类
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentType::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentType::Negative
        } else {
            SentimentType::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentType::Positive => "positive",
            SentimentType::Negative => "negative",
            SentimentType::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for SentimentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Structured sentiment assessment / 结构化情感评估
///
/// `degraded` is only present on the wire when the result is the fixed
/// fallback produced for an unparseable completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment_score: f64,
    pub sentiment_type: SentimentType,
    pub intensity: f64,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub degraded: bool,
}

impl AnalysisResult {
    /// Neutral result returned in place of a parse failure
    /// 解析失败时返回的中性结果
    pub fn fallback() -> Self {
        Self {
            sentiment_score: 0.0,
            sentiment_type: SentimentType::Neutral,
            intensity: 0.0,
            keywords: FALLBACK_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            degraded: true,
        }
    }

    /// Whether `sentiment_type` agrees with the score thresholds
    /// 情感类别是否与分数阈值一致
    pub fn is_consistent(&self) -> bool {
        SentimentType::from_score(self.sentiment_score) == self.sentiment_type
    }
}

/// Liveness payload for `GET /` / 存活检查响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "running".to_string(),
            message: "Sentiment Aura API is live".to_string(),
            version: "1.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_score_thresholds() {
        assert_eq!(SentimentType::from_score(0.95), SentimentType::Positive);
        assert_eq!(SentimentType::from_score(0.21), SentimentType::Positive);
        assert_eq!(SentimentType::from_score(0.2), SentimentType::Neutral);
        assert_eq!(SentimentType::from_score(0.0), SentimentType::Neutral);
        assert_eq!(SentimentType::from_score(-0.2), SentimentType::Neutral);
        assert_eq!(SentimentType::from_score(-0.85), SentimentType::Negative);
    }

    #[test]
    fn test_sentiment_type_wire_names() {
        assert_eq!(json!(SentimentType::Positive), json!("positive"));
        assert_eq!(json!(SentimentType::Negative), json!("negative"));
        assert_eq!(json!(SentimentType::Neutral), json!("neutral"));
        assert!(serde_json::from_value::<SentimentType>(json!("mixed")).is_err());
    }

    #[test]
    fn test_result_omits_degraded_when_false() {
        let result = AnalysisResult {
            sentiment_score: 0.9,
            sentiment_type: SentimentType::Positive,
            intensity: 0.8,
            keywords: vec!["great".to_string()],
            degraded: false,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(
            value,
            json!({
                "sentiment_score": 0.9,
                "sentiment_type": "positive",
                "intensity": 0.8,
                "keywords": ["great"]
            })
        );
    }

    #[test]
    fn test_fallback_body() {
        let value = serde_json::to_value(AnalysisResult::fallback()).unwrap();
        assert_eq!(value["sentiment_score"], json!(0.0));
        assert_eq!(value["sentiment_type"], "neutral");
        assert_eq!(value["intensity"], json!(0.0));
        assert_eq!(value["keywords"], json!(["error", "json", "parsing"]));
        assert_eq!(value["degraded"], json!(true));
    }

    #[test]
    fn test_is_consistent() {
        let mut result = AnalysisResult::fallback();
        assert!(result.is_consistent());
        result.sentiment_score = 0.7;
        assert!(!result.is_consistent());
    }

    #[test]
    fn test_health_response_default() {
        let health = HealthResponse::default();
        assert_eq!(health.status, "running");
        assert_eq!(health.message, "Sentiment Aura API is live");
        assert_eq!(health.version, "1.0.0");
    }
}
