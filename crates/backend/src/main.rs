//! SteamGuessr Backend Server
//!
//! Provides:
//! - Steam profile validation with library statistics kept in the session
//! - Classic guessing rounds built from the player's own library
//! - Dashboard data and a raw player-summary proxy for the frontend

mod config;
mod error;
mod hints;
mod identity;
mod routes;
mod session;
mod steam_api;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use steamguessr_core::HintCatalog;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::session::SessionStore;
use crate::steam_api::{SteamApi, SteamClient};

pub struct AppState {
    pub steam: Arc<dyn SteamApi>,
    pub catalog: HintCatalog,
    pub sessions: SessionStore,
    pub config: Config,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "steamguessr_backend=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let catalog = HintCatalog::load(&config.hints_registry_path)
        .expect("Failed to load hint registry");
    tracing::info!(path = %config.hints_registry_path, hints = catalog.len(), "Loaded hint registry");

    let steam = SteamClient::new(config.steam_api_key.clone(), config.steam_http_timeout)
        .expect("Failed to build Steam HTTP client");

    let state = Arc::new(AppState {
        steam: Arc::new(steam),
        catalog,
        sessions: SessionStore::new(config.session_lifetime),
        config: config.clone(),
    });

    let app = routes::router(state)
        .layer(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    tracing::info!("Starting server on {}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
