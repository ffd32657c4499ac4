//! HTTP server lifecycle for the Sentiment Aura API
//! Sentiment Aura API的HTTP服务器生命周期

use anyhow::Result;
use std::net::SocketAddr;
use tracing::{error, info};

use super::gateway::{create_gateway_router, GatewayState};

/// Aura HTTP gateway / Aura HTTP网关
pub struct HttpGateway {
    addr: SocketAddr,
    allowed_origin: String,
    state: GatewayState,
}

impl HttpGateway {
    /// Create a new HTTP gateway / 创建新的HTTP网关
    pub fn new(addr: SocketAddr, allowed_origin: impl Into<String>, state: GatewayState) -> Self {
        Self {
            addr,
            allowed_origin: allowed_origin.into(),
            state,
        }
    }

    /// Get the HTTP address / 获取HTTP地址
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start and stop when `shutdown` resolves / 启动并在`shutdown`完成时停止
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let (listener, app) = self.prepare().await?;
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("Aura HTTP gateway error: {}", e);
            return Err(e.into());
        }
        Ok(())
    }

    async fn prepare(self) -> Result<(tokio::net::TcpListener, axum::Router)> {
        info!("Starting Aura HTTP gateway on {}", self.addr);
        info!(
            "Completion backend: {}",
            self.state.interpreter.backend_name()
        );

        let app = create_gateway_router(self.state, &self.allowed_origin)?;
        let listener = tokio::net::TcpListener::bind(self.addr).await?;

        info!(
            "Aura HTTP gateway listening on {} (CORS origin: {})",
            listener.local_addr()?,
            self.allowed_origin
        );
        Ok((listener, app))
    }
}
