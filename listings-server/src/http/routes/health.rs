//! Liveness and store reachability
//!
//! `GET /health` answers 200 while the listing store responds to a ping and
//! 503 once it stops, so a load balancer can drain the instance.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub store: &'static str,
    pub version: &'static str,
}

async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, store) = if state.service.store_ready().await {
        (StatusCode::OK, "ok", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };

    let body = HealthResponse {
        status,
        store,
        version: env!("CARGO_PKG_VERSION"),
    };
    (code, Json(body))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
