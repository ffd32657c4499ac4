//! Sentiment Aura: LLM-backed sentiment analysis over HTTP
//! Sentiment Aura：基于LLM的HTTP情感分析服务

// Shared modules / 共享模块
pub mod config;

// Service-specific modules / 服务特定模块
pub mod sentiment;

// Re-exports / 重新导出
pub use config::*;
