pub mod config;
pub mod logging;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;

use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::middleware::cors::cors_layer;
use crate::state::AppState;

/// Builds the production application: services wired from `config`, the
/// word mapping read from disk.
pub async fn create_app(config: &Config) -> axum::Router {
    let state = AppState::from_config(config).await;
    build_app(state, &config.cors_origins)
}

/// Router over an already constructed state, with tracing and CORS.
pub fn build_app(state: AppState, cors_origins: &[String]) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}
