//! Sentiment Aura API main entry point
//! Sentiment Aura API 主入口点

use clap::Parser;
use sentiment_aura::config::init_tracing;
use sentiment_aura::sentiment::completion::ChatCompletionClient;
use sentiment_aura::sentiment::config::{AuraConfig, CliArgs};
use sentiment_aura::sentiment::gateway::GatewayState;
use sentiment_aura::sentiment::interpreter::{CompletionInterpreter, SamplingParams};
use sentiment_aura::sentiment::HttpGateway;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration / 读取配置前加载.env
    let dotenv_path = dotenvy::dotenv().ok();

    // Parse command line arguments / 解析命令行参数
    let args = CliArgs::parse();
    let config = AuraConfig::load_with_cli(&args)?;

    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // Initialize logging with configuration / 使用配置初始化日志
    init_tracing(&config.log.to_logging_config())?;

    if let Some(path) = dotenv_path {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    // Refuse to start without the completion API secret / 缺少API密钥时拒绝启动
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {:#}", e);
        return Err(e);
    }

    let backend = ChatCompletionClient::new(
        "groq",
        config.llm.api_url.clone(),
        config.llm.api_key.clone(),
        config.llm.timeout(),
    );

    tracing::info!("Sentiment Aura starting with:");
    tracing::info!("  - HTTP server on: {}", config.http.addr);
    tracing::info!("  - CORS origin: {}", config.cors.allowed_origin);
    tracing::info!("  - Completion API: {}", backend.api_url());
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Timeout: {}ms", backend.timeout().as_millis());
    let interpreter =
        CompletionInterpreter::new(Arc::new(backend), SamplingParams::from(&config.llm));
    let state = GatewayState::new(interpreter);

    let http_gateway = HttpGateway::new(
        config.http.addr,
        config.cors.allowed_origin.clone(),
        state,
    );
    let http_addr = http_gateway.addr();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let http_handle = tokio::spawn(async move {
        if let Err(e) = http_gateway
            .start_with_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
        {
            tracing::error!("HTTP gateway error: {}", e);
        }
    });

    tracing::info!("Sentiment Aura started: http://{}", http_addr);

    tokio::select! {
        res = tokio::signal::ctrl_c() => {
            res?;
            tracing::info!("Sentiment Aura shutting down");
        }
        _ = wait_finished(&http_handle) => {
            tracing::warn!("HTTP gateway exited");
        }
    }
    let _ = shutdown_tx.send(());

    let timeout = std::time::Duration::from_secs(5);
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if http_handle.is_finished() {
            break;
        }
        if tokio::time::Instant::now() >= deadline {
            tracing::warn!("Shutdown timeout reached, aborting server");
            http_handle.abort();
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }

    Ok(())
}

async fn wait_finished(handle: &tokio::task::JoinHandle<()>) {
    while !handle.is_finished() {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    }
}
