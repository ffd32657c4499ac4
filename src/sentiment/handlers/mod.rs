//! HTTP handlers for the Sentiment Aura API
//! Sentiment Aura API的HTTP处理器

pub mod analyze;
pub mod health;

pub use analyze::*;
pub use health::*;
