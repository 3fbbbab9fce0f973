//! Health check handlers

use axum::{extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{error::Result, models::serialize_timestamp, responses::ApiResponse, state::AppState};

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    pub version: String,

    /// Deployment environment from config
    pub environment: String,

    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,

    /// Whole seconds since startup
    pub uptime_secs: u64,
}

/// Readiness check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResponse {
    pub ready: bool,
    pub service: String,
    /// Number of items currently stored
    pub item_count: usize,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config().service.environment.clone(),
        timestamp: Utc::now(),
        uptime_secs: state.uptime().as_secs(),
    };

    ApiResponse::ok(response)
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK once the store answers; a poisoned store surfaces as 500.
pub async fn readiness(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let item_count = state.items().store().len()?;
    let response = ReadinessResponse {
        ready: true,
        service: state.config().service.name.clone(),
        item_count,
    };

    Ok(ApiResponse::ok(response))
}
