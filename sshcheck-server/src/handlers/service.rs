use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};

use crate::infra::app_state::AppState;

pub async fn ping_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "sshcheck registry is running",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "entries": state.registry().len(),
        "staleness_secs": state.registry().staleness().as_secs(),
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
