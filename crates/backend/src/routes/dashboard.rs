//! Dashboard data for a validated user

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::AppError;
use crate::session::{ALL_GAMES_KEY, CSRF_TOKEN_KEY, USER_STEAM_ID_KEY};
use crate::AppState;

const NO_STEAM_ID: &str = "No Steam ID in session";

/// Everything validation stored, without the answer pool
/// GET /api/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Map<String, Value>>, AppError> {
    let session_id = state
        .sessions
        .current(&headers)
        .await
        .ok_or_else(|| AppError::NotFound(NO_STEAM_ID.to_string()))?;

    let mut values = state.sessions.all(&session_id).await;
    if !values.contains_key(USER_STEAM_ID_KEY) {
        return Err(AppError::NotFound(NO_STEAM_ID.to_string()));
    }

    values.remove(CSRF_TOKEN_KEY);
    values.remove(ALL_GAMES_KEY);
    Ok(Json(values))
}
