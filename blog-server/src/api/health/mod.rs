//! 健康检查路由
//!
//! | path | method | auth |
//! |------|------|------|
//! | /health | GET | none |
//!
//! ```json
//! { "status": "healthy", "version": "0.1.0", "database": { "status": "ok", "latencyMs": 0 } }
//! ```

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    version: &'static str,
    database: CheckResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let started = std::time::Instant::now();
    let database = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => CheckResult {
            status: "ok",
            latency_ms: Some(started.elapsed().as_millis() as u64),
            message: None,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Health check database probe failed");
            CheckResult {
                status: "error",
                latency_ms: None,
                message: Some("database unavailable".into()),
            }
        }
    };

    Json(HealthResponse {
        status: if database.status == "ok" { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
