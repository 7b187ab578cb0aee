//! REST API routes

pub mod classic;
pub mod dashboard;
pub mod validation;

pub use classic::*;
pub use dashboard::*;
pub use validation::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // Profile validation (both names are in use by the frontend)
        .route("/initiate-user", post(validate_user))
        .route("/validate-user", post(validate_user))
        .route("/get-basic-info", post(get_basic_info))
        // Game modes
        .route("/api/classic", post(classic_round))
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}
