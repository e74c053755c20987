//! blog-server - dashboard backend for the blog/CMS
//!
//! Serves the public category and menu endpoints plus the permission-gated
//! dashboard API over a single SQLite database.

use anyhow::Context;
use blog_server::{Config, Server, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("Invalid configuration")?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    tracing::info!(
        environment = %config.environment,
        database = %config.database_url,
        "Starting blog-server"
    );
    if config.is_production() && config.admin.is_some() {
        tracing::warn!("ADMIN_PASSWORD is set in production; remove it once the first admin exists");
    }

    Server::new(config)
        .run()
        .await
        .context("Server stopped with an error")?;

    Ok(())
}
