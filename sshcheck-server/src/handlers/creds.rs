use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use sshcheck_core::{
    api::{MessageResponse, UpsertCredentials},
    types::RegistryEntry,
};
use tracing::{debug, info};

use crate::infra::{
    app_state::AppState,
    errors::{AppError, AppResult},
};

pub async fn update_creds_handler(
    State(state): State<AppState>,
    payload: Result<Json<UpsertCredentials>, JsonRejection>,
) -> AppResult<Json<MessageResponse>> {
    let Json(update) = payload?;
    if update.ip.trim().is_empty() {
        return Err(AppError::unprocessable("ip must not be empty"));
    }
    if update.user.is_empty() {
        return Err(AppError::unprocessable("user must not be empty"));
    }

    let entry = state.registry().upsert(&update);
    debug!(
        target: "registry",
        team = entry.team,
        host = %entry.ip,
        user = %entry.user,
        "credential upserted"
    );

    Ok(Json(MessageResponse::new("Credentials updated successfully")))
}

/// Body-less prune using the configured staleness threshold.
pub async fn clear_creds_handler(
    State(state): State<AppState>,
) -> Json<MessageResponse> {
    let removed = state.registry().prune();
    if removed > 0 {
        info!(
            target: "registry",
            removed,
            remaining = state.registry().len(),
            "cleared outdated credentials"
        );
    }

    Json(MessageResponse::new("Outdated credentials cleared successfully"))
}

pub async fn list_creds_handler(
    State(state): State<AppState>,
) -> Json<Vec<RegistryEntry>> {
    Json(state.registry().list())
}
