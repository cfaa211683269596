/// Welcome and health check endpoints
///
/// ```text
/// GET /        → {"message": "Welcome to the TaskDesk API"}
/// GET /health  → {"status": "healthy", "version": "0.1.0", "database": "connected", ...}
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use taskdesk_shared::db::pool::{get_pool_stats, health_check as probe_database};

/// Root response
#[derive(Debug, Serialize, Deserialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    /// Pool connections currently checked out
    pub connections_in_use: usize,

    /// Pool connections currently idle
    pub connections_idle: usize,
}

pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: "Welcome to the TaskDesk API".to_string(),
    })
}

/// Reports whether the database answers
///
/// Always 200; a failing database shows up as `degraded`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match probe_database(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };
    let stats = get_pool_stats(&state.db);

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        connections_in_use: stats.in_use,
        connections_idle: stats.idle,
    })
}
