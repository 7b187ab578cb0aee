//! In-memory `SteamApi` and router helpers for handler and resolver tests

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use steamguessr_core::{
    AppDetails, HintCatalog, OwnedGame, OwnedGamesResponse, PlayerSummary, SteamSpyData,
    PUBLIC_VISIBILITY_STATE,
};
use tower::ServiceExt;

use crate::config::Config;
use crate::session::SessionStore;
use crate::steam_api::{SteamApi, SteamApiError};
use crate::AppState;

const SHIPPED_REGISTRY: &str = include_str!("../../../registry/hints.json");

#[derive(Default)]
pub struct Calls {
    pub player_summary: AtomicUsize,
    pub vanity: AtomicUsize,
    pub owned_games: AtomicUsize,
    pub app_details: AtomicUsize,
    pub steamspy: AtomicUsize,
    pub current_players: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        [
            &self.player_summary,
            &self.vanity,
            &self.owned_games,
            &self.app_details,
            &self.steamspy,
            &self.current_players,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

#[derive(Default)]
pub struct FakeSteam {
    players: HashMap<String, PlayerSummary>,
    vanity: HashMap<String, String>,
    owned_games: HashMap<String, Vec<OwnedGame>>,
    app_details: HashMap<u64, AppDetails>,
    steamspy: HashMap<u64, SteamSpyData>,
    current_players: HashMap<u64, u64>,
    player_summary_down: bool,
    pub calls: Calls,
}

impl FakeSteam {
    pub fn with_player(mut self, player: PlayerSummary) -> Self {
        self.players.insert(player.steamid.clone(), player);
        self
    }

    pub fn with_vanity(mut self, name: &str, steam_id: &str) -> Self {
        self.vanity.insert(name.to_string(), steam_id.to_string());
        self
    }

    pub fn with_owned_games(mut self, steam_id: &str, games: Vec<OwnedGame>) -> Self {
        self.owned_games.insert(steam_id.to_string(), games);
        self
    }

    pub fn with_app_details(mut self, appid: u64, details: AppDetails) -> Self {
        self.app_details.insert(appid, details);
        self
    }

    pub fn with_steamspy(mut self, appid: u64, data: SteamSpyData) -> Self {
        self.steamspy.insert(appid, data);
        self
    }

    pub fn with_current_players(mut self, appid: u64, count: u64) -> Self {
        self.current_players.insert(appid, count);
        self
    }

    pub fn with_player_summary_down(mut self) -> Self {
        self.player_summary_down = true;
        self
    }
}

#[async_trait]
impl SteamApi for FakeSteam {
    async fn fetch_player_summaries_raw(&self, steam_id: &str) -> Result<Value, SteamApiError> {
        self.calls.player_summary.fetch_add(1, Ordering::SeqCst);
        if self.player_summary_down {
            return Err(SteamApiError::Status(503));
        }
        let players: Vec<&PlayerSummary> = self.players.get(steam_id).into_iter().collect();
        Ok(serde_json::json!({ "response": { "players": players } }))
    }

    async fn resolve_vanity_url(&self, vanity_name: &str) -> Option<String> {
        self.calls.vanity.fetch_add(1, Ordering::SeqCst);
        self.vanity.get(vanity_name).cloned()
    }

    async fn fetch_owned_games(&self, steam_id: &str) -> OwnedGamesResponse {
        self.calls.owned_games.fetch_add(1, Ordering::SeqCst);
        let games = self.owned_games.get(steam_id).cloned().unwrap_or_default();
        OwnedGamesResponse {
            game_count: games.len() as u32,
            games,
        }
    }

    async fn fetch_app_details(&self, appid: u64) -> Option<AppDetails> {
        self.calls.app_details.fetch_add(1, Ordering::SeqCst);
        self.app_details.get(&appid).cloned()
    }

    async fn fetch_steamspy_data(&self, appid: u64) -> Option<SteamSpyData> {
        self.calls.steamspy.fetch_add(1, Ordering::SeqCst);
        self.steamspy.get(&appid).cloned()
    }

    async fn fetch_current_players(&self, appid: u64) -> Option<u64> {
        self.calls.current_players.fetch_add(1, Ordering::SeqCst);
        self.current_players.get(&appid).copied()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Player created September 12, 2003, currently online
pub fn player(steam_id: &str, public: bool) -> PlayerSummary {
    PlayerSummary {
        steamid: steam_id.to_string(),
        personaname: Some("gaben".to_string()),
        profileurl: Some(format!("https://steamcommunity.com/profiles/{}/", steam_id)),
        avatarfull: Some("https://avatars.steamstatic.com/gaben_full.jpg".to_string()),
        personastate: 1,
        communityvisibilitystate: if public { PUBLIC_VISIBILITY_STATE } else { 1 },
        timecreated: Some(1063324800),
    }
}

pub fn owned_game(appid: Option<u64>, name: &str, playtime: u32) -> OwnedGame {
    OwnedGame {
        appid,
        name: Some(name.to_string()),
        playtime_forever: playtime,
        rtime_last_played: None,
    }
}

// ============================================================================
// Router helpers
// ============================================================================

/// Router backed by `steam` and the registry shipped in `registry/hints.json`
pub fn test_app(steam: Arc<FakeSteam>) -> (Router, Arc<AppState>) {
    test_app_with_registry(steam, SHIPPED_REGISTRY)
}

pub fn test_app_with_registry(steam: Arc<FakeSteam>, registry: &str) -> (Router, Arc<AppState>) {
    let config = Config::default();
    let state = Arc::new(AppState {
        steam,
        catalog: HintCatalog::from_json(registry).unwrap(),
        sessions: SessionStore::new(config.session_lifetime),
        config,
    });
    (crate::routes::router(state.clone()), state)
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub struct TestResponse {
    pub status: StatusCode,
    /// `name=value` part of a `Set-Cookie` header, if one was sent
    pub cookie: Option<String>,
    pub text: String,
    /// Parsed body, `Null` when the body is not JSON
    pub json: Value,
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();

    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(String::from);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let json = serde_json::from_str(&text).unwrap_or(Value::Null);

    TestResponse { status, cookie, text, json }
}
