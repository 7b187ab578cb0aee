//! Classic guessing round

use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use steamguessr_core::{Difficulty, HintPayload, LibraryGame};

use crate::error::AppError;
use crate::hints::HintResolver;
use crate::AppState;

const NO_GAMES: &str = "No games found in session";
const NO_VALID_GAMES: &str = "No valid games found in session";

#[derive(Debug, Serialize)]
pub struct RoundGame {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub cover_url: Option<String>,
}

impl From<&LibraryGame> for RoundGame {
    fn from(game: &LibraryGame) -> Self {
        Self {
            id: game.id,
            name: game.name.clone(),
            cover_url: game.cover_url.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ClassicRound {
    pub hints_data: BTreeMap<Difficulty, HintPayload>,
    pub game: RoundGame,
}

/// Pick a random game from the session library and one hint per difficulty
/// POST /api/classic
pub async fn classic_round(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ClassicRound>, AppError> {
    let session_id = state
        .sessions
        .current(&headers)
        .await
        .ok_or_else(|| AppError::NotFound(NO_GAMES.to_string()))?;

    let games = state.sessions.library(&session_id).await;
    if games.is_empty() {
        return Err(AppError::NotFound(NO_GAMES.to_string()));
    }

    let valid: Vec<&LibraryGame> = games.iter().filter(|game| game.is_valid()).collect();

    let (target, hints) = {
        let mut rng = rand::thread_rng();
        let target = *valid
            .choose(&mut rng)
            .ok_or_else(|| AppError::NotFound(NO_VALID_GAMES.to_string()))?;
        (target, state.catalog.select_random_hints(&mut rng)?)
    };

    let hints_data = HintResolver::new(state.steam.as_ref())
        .resolve_data(&hints, target)
        .await?;

    tracing::debug!(appid = ?target.id, pool = valid.len(), "Classic round ready");

    Ok(Json(ClassicRound {
        hints_data,
        game: RoundGame::from(target),
    }))
}
