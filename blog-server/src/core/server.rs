//! 服务器实现
//!
//! HTTP 服务器启动与优雅关闭

use tokio::net::TcpListener;

use crate::api;
use crate::core::{Config, ServerState};
use crate::utils::{AppError, AppResult};

/// HTTP 服务器
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// 初始化状态并持续服务，直到收到 Ctrl-C
    pub async fn run(&self) -> AppResult<()> {
        let state = ServerState::initialize(&self.config).await?;

        let app = api::build_app(state);

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
        tracing::info!(%addr, environment = %self.config.environment, "Blog server listening");

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| AppError::internal(format!("HTTP server error: {e}")))?;

        Ok(())
    }
}
