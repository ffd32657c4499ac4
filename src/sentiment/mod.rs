//! Sentiment Aura service module
//! Sentiment Aura 服务模块
//!
//! Free-form text goes in, a structured sentiment assessment comes out. The
//! analysis itself is delegated to a remote chat-completion model.
//!
//! ## Architecture / 架构
//!
//! ```text
//! POST /process_text
//!        │
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │  HTTP Gateway   │───▶│  Interpreter    │───▶│  Completion API │
//! │  HTTP网关       │    │  补全解释器     │    │  补全后端       │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                          │            ▲
//!                   PromptBuilder   extract (fence strip + brace scan)
//! ```
//!
//! ## Module Structure / 模块结构
//!
//! - `config`: CLI arguments and layered configuration / 命令行与分层配置
//! - `prompt`: prompt template / 提示模板
//! - `completion`: chat-completion backends / 聊天补全后端
//! - `extract`: JSON recovery from completion text / 从补全文本提取JSON
//! - `interpreter`: call, repair and validation / 调用、修复与校验
//! - `handlers`, `routes`, `gateway`, `http_gateway`: HTTP surface / HTTP接口

pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod handlers;
pub mod http_gateway;
pub mod interpreter;
pub mod prompt;
pub mod routes;
pub mod types;

#[cfg(test)]
pub mod handlers_test;
#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types / 重新导出常用类型
pub use completion::{ChatCompletionClient, CompletionBackend};
pub use error::{AnalysisError, CompletionError};
pub use http_gateway::HttpGateway;
pub use interpreter::CompletionInterpreter;
pub use types::*;
