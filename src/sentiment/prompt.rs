//! Prompt construction for the completion backend
//! 补全后端的提示构建
//!
//! The template is fixed; the caller's text is the only substitution and is
//! embedded verbatim.

use std::fmt::Write;

use super::types::AnalysisRequest;

/// System instruction sent ahead of every prompt / 每次请求的系统指令
pub const SYSTEM_PROMPT: &str =
    "You are a sentiment analysis expert. Respond only with valid JSON.";

const PREAMBLE: &str = "Analyze the sentiment of the following text and respond ONLY with valid JSON (no markdown, no code blocks, no explanation).";

const FORMAT: &str = r#"Response format (respond with ONLY this JSON, nothing else):
{
    "sentiment_score": <float between -1.0 and 1.0>,
    "sentiment_type": "<positive, negative, or neutral>",
    "intensity": <float between 0.0 and 1.0>,
    "keywords": ["<keyword1>", "<keyword2>", "<keyword3>"]
}"#;

const RULES: &str = r#"Rules:
- sentiment_score: -1.0 (very negative) to 0.0 (neutral) to 1.0 (very positive)
- sentiment_type: "positive" if score > 0.2, "negative" if score < -0.2, else "neutral"
- intensity: 0.0 (very weak emotion) to 1.0 (very strong emotion)
- keywords: Extract 3-5 most important emotional or topical words from the text"#;

/// Worked examples as (input text, expected JSON) / 示例（输入文本，期望JSON）
pub const EXAMPLES: [(&str, &str); 3] = [
    (
        "I absolutely love this!",
        r#"{"sentiment_score": 0.95, "sentiment_type": "positive", "intensity": 0.95, "keywords": ["absolutely", "love", "enthusiasm"]}"#,
    ),
    (
        "This is terrible and frustrating.",
        r#"{"sentiment_score": -0.85, "sentiment_type": "negative", "intensity": 0.85, "keywords": ["terrible", "frustrating", "distress"]}"#,
    ),
    (
        "Let me think about it.",
        r#"{"sentiment_score": 0.0, "sentiment_type": "neutral", "intensity": 0.2, "keywords": ["think", "consider", "noncommittal"]}"#,
    ),
];

const CLOSING: &str = "Remember: Respond ONLY with the JSON object, no other text!";

/// Renders the analysis prompt / 渲染分析提示
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, request: &AnalysisRequest) -> String {
        let mut out = String::with_capacity(1024 + request.text.len());
        out.push_str(PREAMBLE);
        out.push_str("\n\nText: \"");
        out.push_str(&request.text);
        out.push_str("\"\n\n");
        out.push_str(FORMAT);
        out.push_str("\n\n");
        out.push_str(RULES);
        out.push_str("\n\nExamples:\n");
        for (text, json) in EXAMPLES.iter() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "Text: \"{}\" -> {}", text, json);
        }
        out.push('\n');
        out.push_str(CLOSING);
        out
    }
}

/// Shorthand for `PromptBuilder::new().render(request)`
pub fn build_prompt(request: &AnalysisRequest) -> String {
    PromptBuilder::new().render(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::types::{AnalysisResult, SentimentType};

    #[test]
    fn test_prompt_contains_literal_text() {
        let prompt = build_prompt(&AnalysisRequest::new("I absolutely love this!"));
        assert!(prompt.contains("Text: \"I absolutely love this!\""));
    }

    #[test]
    fn test_prompt_does_not_escape_input() {
        let raw = "quote \" brace { newline\n ``` end";
        let prompt = build_prompt(&AnalysisRequest::new(raw));
        assert!(prompt.contains(raw));
    }

    #[test]
    fn test_prompt_names_fields_and_thresholds() {
        let prompt = build_prompt(&AnalysisRequest::new("x"));
        for field in ["sentiment_score", "sentiment_type", "intensity", "keywords"] {
            assert!(prompt.contains(field), "missing field {}", field);
        }
        assert!(prompt.contains("score > 0.2"));
        assert!(prompt.contains("score < -0.2"));
        assert!(prompt.contains("-1.0"));
        assert!(prompt.contains("no code blocks"));
        assert!(prompt.ends_with(CLOSING));
    }

    #[test]
    fn test_example_lines_are_rendered_one_per_line() {
        let prompt = build_prompt(&AnalysisRequest::new("z"));
        for (text, json) in EXAMPLES.iter() {
            let line = format!("Text: \"{}\" -> {}\n", text, json);
            assert!(prompt.contains(&line), "missing example line {:?}", line);
        }
        assert!(prompt.contains("Examples:\nText: \""));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let req = AnalysisRequest::new("same input");
        assert_eq!(build_prompt(&req), build_prompt(&req));
    }

    #[test]
    fn test_examples_follow_their_own_rules() {
        for (text, json) in EXAMPLES.iter() {
            let result: AnalysisResult = serde_json::from_str(json).unwrap();
            assert!(result.is_consistent(), "example {:?} is inconsistent", text);
            assert!((3..=5).contains(&result.keywords.len()));
            assert!(build_prompt(&AnalysisRequest::new("y")).contains(json));
        }
        let first: AnalysisResult = serde_json::from_str(EXAMPLES[0].1).unwrap();
        assert_eq!(first.sentiment_type, SentimentType::Positive);
        assert!(first.sentiment_score > 0.2);
    }
}
