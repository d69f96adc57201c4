//! Liveness and readiness endpoints. No authentication.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Serialize;

use crate::api::AppState;

/// Readiness response
#[derive(Serialize)]
struct ReadyResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status. Failure details go to the log, never to the client.
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/ping", get(ping))
}

/// Liveness check
async fn health() -> &'static str {
    "OK"
}

/// Target of the keep-alive pinger
async fn ping() -> &'static str {
    "Pong!"
}

/// Readiness check with database connectivity
async fn ready(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let healthy = match state.database.ping().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database ping failed");
            false
        }
    };

    let response = ReadyResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database: ServiceStatus {
            status: if healthy { "healthy" } else { "unhealthy" },
        },
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
