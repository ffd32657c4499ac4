//! Sentiment Aura service configuration
//! Sentiment Aura服务配置

use anyhow::{bail, Context};
use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::base::{LogConfig, ServerConfig};

/// Environment variable holding the completion API secret / 补全API密钥的环境变量
pub const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Prefix for configuration overrides from the environment / 环境变量覆盖前缀
pub const ENV_PREFIX: &str = "AURA_";

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Aura command line arguments / Aura命令行参数
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "aura",
    version = "1.0.0",
    about = "Sentiment Aura API\nSentiment Aura 情感分析API",
    long_about = "Sentiment Aura accepts free-form text and returns a structured sentiment assessment produced by a remote LLM.\nSentiment Aura接收自由文本并返回由远程LLM生成的结构化情感评估。"
)]
pub struct CliArgs {
    /// Configuration file path / 配置文件路径
    #[arg(short, long, value_name = "FILE", help = "Configuration file path / 配置文件路径")]
    pub config: Option<String>,

    /// HTTP server address / HTTP服务器地址
    #[arg(long, value_name = "ADDR", help = "HTTP server address (e.g., 0.0.0.0:8000) / HTTP服务器地址")]
    pub http_addr: Option<String>,

    /// Allowed CORS origin / 允许的CORS来源
    #[arg(long, value_name = "ORIGIN", help = "Allowed CORS origin / 允许的CORS来源")]
    pub allowed_origin: Option<String>,

    /// Completion model name / 补全模型名称
    #[arg(long, value_name = "MODEL", help = "Completion model name / 补全模型名称")]
    pub model: Option<String>,

    /// Completion API URL / 补全API地址
    #[arg(long, value_name = "URL", help = "Chat completion endpoint URL / 聊天补全端点URL")]
    pub api_url: Option<String>,

    /// Upstream timeout in milliseconds / 上游超时（毫秒）
    #[arg(long, value_name = "MS", help = "Upstream request timeout in milliseconds / 上游请求超时（毫秒）")]
    pub timeout_ms: Option<u64>,

    /// Log level / 日志级别
    #[arg(long, value_name = "LEVEL", help = "Log level (trace, debug, info, warn, error) / 日志级别")]
    pub log_level: Option<String>,

    /// Log format / 日志格式
    #[arg(long, value_name = "FORMAT", help = "Log format (pretty, compact, json) / 日志格式")]
    pub log_format: Option<String>,

    /// Print the effective configuration and exit / 打印生效配置并退出
    #[arg(long)]
    pub print_config: bool,
}

/// Completion API secret with redacted Debug output / 调试输出时隐藏的API密钥
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_blank() {
            f.write_str("ApiKey(<unset>)")
        } else {
            f.write_str("ApiKey(<redacted>)")
        }
    }
}

/// CORS configuration / CORS配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// The single origin allowed to call the API / 唯一允许调用API的来源
    pub allowed_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: DEFAULT_ALLOWED_ORIGIN.to_string(),
        }
    }
}

/// Completion backend configuration / 补全后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    #[serde(skip_serializing)]
    pub api_key: ApiKey,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: 200,
            timeout_ms: 10_000,
            api_key: ApiKey::default(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Aura service configuration / Aura服务配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuraConfig {
    /// HTTP server configuration / HTTP服务器配置
    pub http: ServerConfig,
    /// Logging configuration / 日志配置
    pub log: LogConfig,
    /// CORS configuration / CORS配置
    pub cors: CorsConfig,
    /// Completion backend configuration / 补全后端配置
    pub llm: LlmConfig,
}

impl AuraConfig {
    /// Load configuration with CLI arguments override / 使用CLI参数覆盖加载配置
    ///
    /// Precedence (lowest to highest): defaults, TOML file, `AURA_*`
    /// environment, `GROQ_API_KEY`, CLI flags.
    pub fn load_with_cli(args: &CliArgs) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        match &args.config {
            Some(path) => {
                let p = PathBuf::from(path);
                if p.exists() {
                    figment = figment.merge(Toml::file(p));
                } else {
                    tracing::info!("Config file '{}' not found, using defaults", path);
                }
            }
            None => {
                if let Some(home_path) = Self::home_config_path() {
                    if home_path.exists() {
                        figment = figment.merge(Toml::file(home_path));
                    }
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: Self = figment
            .extract()
            .context("Failed to load configuration")?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.llm.api_key = ApiKey::new(key);
            }
        }

        config.apply_cli(args)?;
        Ok(config)
    }

    /// `$AURA_HOME/.aura/config.toml`, falling back to `$HOME`
    fn home_config_path() -> Option<PathBuf> {
        let base_home = std::env::var_os("AURA_HOME").or_else(|| std::env::var_os("HOME"))?;
        Some(PathBuf::from(base_home).join(".aura").join("config.toml"))
    }

    fn apply_cli(&mut self, args: &CliArgs) -> anyhow::Result<()> {
        if let Some(http_addr) = &args.http_addr {
            self.http.addr = http_addr
                .parse()
                .with_context(|| format!("invalid --http-addr '{}'", http_addr))?;
        }
        if let Some(origin) = &args.allowed_origin {
            self.cors.allowed_origin = origin.clone();
        }
        if let Some(model) = &args.model {
            self.llm.model = model.clone();
        }
        if let Some(api_url) = &args.api_url {
            self.llm.api_url = api_url.clone();
        }
        if let Some(timeout_ms) = args.timeout_ms {
            self.llm.timeout_ms = timeout_ms;
        }
        if let Some(log_level) = &args.log_level {
            self.log.level = log_level.clone();
        }
        if let Some(log_format) = &args.log_format {
            self.log.format = log_format.clone();
        }
        Ok(())
    }

    /// Startup preconditions / 启动前置条件检查
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.llm.api_key.is_blank() {
            bail!("{} not found in environment variables!", API_KEY_ENV);
        }
        if self.llm.timeout_ms == 0 {
            bail!("llm.timeout_ms must be greater than zero");
        }
        if self.llm.max_tokens == 0 {
            bail!("llm.max_tokens must be greater than zero");
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!("llm.temperature must be within [0.0, 2.0], got {}", self.llm.temperature);
        }
        if !(self.llm.api_url.starts_with("http://") || self.llm.api_url.starts_with("https://")) {
            bail!("llm.api_url must be an http(s) URL, got '{}'", self.llm.api_url);
        }
        if self.llm.model.trim().is_empty() {
            bail!("llm.model must not be empty");
        }
        axum::http::HeaderValue::from_str(&self.cors.allowed_origin).with_context(|| {
            format!("invalid cors.allowed_origin '{}'", self.cors.allowed_origin)
        })?;
        Ok(())
    }

    /// Effective configuration as TOML, secret omitted / 生效配置的TOML形式（不含密钥）
    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to render configuration")
    }
}
