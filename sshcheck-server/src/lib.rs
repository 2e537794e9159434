//! # sshcheck server
//!
//! The credential registry service. Scan loops `POST` confirmed credentials
//! to `/api/update_creds` and ask for stale ones to be dropped through
//! `/api/clear_creds`; dashboards poll `/api/creds`.

pub mod handlers;
pub mod infra;
pub mod routes;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use tracing_subscriber::{
    EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

pub use infra::{
    app_state::AppState,
    config::{ServeArgs, ServerConfig},
};

/// Build the full router with CORS and request tracing.
pub fn create_app(state: AppState) -> Router {
    let cors_layer = cors_layer(&state.config().cors_allowed_origins);

    Router::new()
        .merge(routes::create_service_router())
        .merge(routes::create_api_router())
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `debug`.
pub fn init_tracing(debug: bool) {
    let default_filter = if debug {
        "info,registry=debug,sshcheck_server=debug,tower_http=debug"
    } else {
        "info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
