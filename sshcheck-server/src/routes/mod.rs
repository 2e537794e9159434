use axum::{
    Router,
    routing::{get, post},
};
use sshcheck_core::api::routes::{creds, service};

use crate::{handlers, infra::app_state::AppState};

/// Credential registry endpoints consumed by scan loops and dashboards.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route(creds::UPDATE, post(handlers::update_creds_handler))
        .route(creds::CLEAR, post(handlers::clear_creds_handler))
        .route(creds::LIST, get(handlers::list_creds_handler))
}

/// Liveness and health probes.
pub fn create_service_router() -> Router<AppState> {
    Router::new()
        .route(service::PING, get(handlers::ping_handler))
        .route(service::HEALTH, get(handlers::health_handler))
}
