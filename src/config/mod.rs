//! Configuration management shared by the Sentiment Aura binaries
//! Sentiment Aura共享的配置管理
//!
//! Service-specific configuration (HTTP address, CORS origin, LLM backend)
//! lives in `crate::sentiment::config`; this module only carries the pieces
//! every binary needs: server/log base structures and tracing setup.
//! 服务特定配置位于`crate::sentiment::config`；此模块只包含所有二进制共用的部分。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Base configuration shared by all applications / 所有应用程序共享的基础配置
pub mod base;
pub use base::*;

/// Common logging configuration / 通用日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive / 日志级别或过滤指令
    pub level: String,
    /// Log format (json, compact, pretty) / 日志格式
    pub format: String,
    /// Enable file logging / 启用文件日志
    pub file_enabled: bool,
    /// Log file path / 日志文件路径
    pub file_path: Option<PathBuf>,
}

static FILE_LOG_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_enabled: false,
            file_path: None,
        }
    }
}

/// Output format selected by `LoggingConfig::format` / 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
    Pretty,
}

impl LogFormat {
    /// Unknown values fall back to pretty output / 未知值回退为pretty
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }
}

fn open_log_file(path: &PathBuf) -> Result<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create log dir: {}", parent.display()))?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file: {}", path.display()))
}

/// Initialize tracing based on logging configuration
/// 基于日志配置初始化跟踪
///
/// `RUST_LOG` takes precedence over `config.level`. When a file sink is
/// configured it is written compact (or json when the stdout format is json).
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.level.trim().is_empty() {
            EnvFilter::new("info")
        } else {
            EnvFilter::new(config.level.clone())
        }
    });

    let file_writer = match (config.file_enabled, config.file_path.as_ref()) {
        (true, Some(path)) => {
            let (writer, guard) = tracing_appender::non_blocking(open_log_file(path)?);
            let _ = FILE_LOG_GUARD.set(guard);
            Some(writer)
        }
        _ => None,
    };

    let format = LogFormat::parse(&config.format);

    let stdout_json = (format == LogFormat::Json).then(|| {
        fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_level(true)
    });
    let stdout_compact = (format == LogFormat::Compact).then(|| {
        fmt::layer()
            .compact()
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_level(true)
    });
    let stdout_pretty = (format == LogFormat::Pretty).then(|| {
        fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_level(true)
    });

    let (file_json, file_compact) = match file_writer {
        Some(writer) if format == LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(writer),
            ),
            None,
        ),
        Some(writer) => (
            None,
            Some(
                fmt::layer()
                    .compact()
                    .with_ansi(false)
                    .with_target(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(writer),
            ),
        ),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_json)
        .with(stdout_compact)
        .with(stdout_pretty)
        .with(file_json)
        .with(file_compact)
        .try_init()
        .context("tracing subscriber already initialized")?;

    Ok(())
}
