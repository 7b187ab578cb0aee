//! Steam Web API, Steam store and SteamSpy calls from the backend
//!
//! Every lookup is a GET with a fixed timeout and at most two attempts.
//! Ordinary upstream failures (non-200, bad JSON, timeouts) are logged and
//! turned into "no data"; callers treat absence as unknown.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use steamguessr_core::{AppDetails, OwnedGamesResponse, PlayerSummary, SteamSpyData};
use thiserror::Error;

const STEAM_API_BASE: &str = "https://api.steampowered.com";
const STORE_BASE: &str = "https://store.steampowered.com";
const STEAMSPY_BASE: &str = "https://steamspy.com";

const API_PLAYER_SUMMARIES: &str = "/ISteamUser/GetPlayerSummaries/v2/";
const API_RESOLVE_VANITY: &str = "/ISteamUser/ResolveVanityURL/v1/";
const API_OWNED_GAMES: &str = "/IPlayerService/GetOwnedGames/v1/";
const API_CURRENT_PLAYERS: &str = "/ISteamUserStats/GetNumberOfCurrentPlayers/v1/";
const STORE_APP_DETAILS: &str = "/api/appdetails";
const STEAMSPY_API: &str = "/api.php";

const MAX_ATTEMPTS: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(100);

#[derive(Debug, Error)]
pub enum SteamApiError {
    #[error("network error: {0}")]
    Http(reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("malformed upstream response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for SteamApiError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs carry the API key
        SteamApiError::Http(e.without_url())
    }
}

/// Log an upstream failure: transport errors at `error`, anything Steam answered at `warn`
macro_rules! log_failure {
    ($err:expr, $($rest:tt)+) => {
        match &$err {
            SteamApiError::Http(_) => tracing::error!(error = %$err, $($rest)+),
            _ => tracing::warn!(error = %$err, $($rest)+),
        }
    };
}

impl SteamApiError {
    fn is_transient(&self) -> bool {
        match self {
            SteamApiError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            SteamApiError::Status(status) => *status == 429 || *status >= 500,
            SteamApiError::Malformed(_) => false,
        }
    }
}

/// Upstream lookups the handlers and the hint resolver depend on
#[async_trait]
pub trait SteamApi: Send + Sync {
    /// Raw `GetPlayerSummaries` body
    async fn fetch_player_summaries_raw(&self, steam_id: &str) -> Result<Value, SteamApiError>;

    /// First player of the summary, `None` if Steam knows no such account
    async fn fetch_player_summary(
        &self,
        steam_id: &str,
    ) -> Result<Option<PlayerSummary>, SteamApiError> {
        let body = self.fetch_player_summaries_raw(steam_id).await?;
        let player = body["response"]["players"]
            .get(0)
            .cloned()
            .and_then(|p| serde_json::from_value(p).ok());
        Ok(player)
    }

    /// Numeric Steam ID for a custom profile name
    async fn resolve_vanity_url(&self, vanity_name: &str) -> Option<String>;

    /// Owned games with app info; empty on failure
    async fn fetch_owned_games(&self, steam_id: &str) -> OwnedGamesResponse;

    async fn fetch_app_details(&self, appid: u64) -> Option<AppDetails>;

    async fn fetch_steamspy_data(&self, appid: u64) -> Option<SteamSpyData>;

    async fn fetch_current_players(&self, appid: u64) -> Option<u64>;
}

/// reqwest-backed [`SteamApi`]
pub struct SteamClient {
    http: reqwest::Client,
    api_key: String,
    api_base: String,
    store_base: String,
    steamspy_base: String,
}

impl SteamClient {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SteamApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("SteamGuessr/1.0")
            .build()?;

        Ok(Self {
            http,
            api_key: api_key.unwrap_or_default(),
            api_base: STEAM_API_BASE.to_string(),
            store_base: STORE_BASE.to_string(),
            steamspy_base: STEAMSPY_BASE.to_string(),
        })
    }

    /// Point every lookup at one host
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_base = base.to_string();
        self.store_base = base.to_string();
        self.steamspy_base = base.to_string();
        self
    }

    async fn get_json(&self, url: &str) -> Result<Value, SteamApiError> {
        let mut attempt = 1;
        loop {
            match self.try_get_json(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < MAX_ATTEMPTS && e.is_transient() => {
                    tracing::debug!(attempt, error = %e, "Retrying upstream request");
                    tokio::time::sleep(RETRY_BACKOFF).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get_json(&self, url: &str) -> Result<Value, SteamApiError> {
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SteamApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| SteamApiError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl SteamApi for SteamClient {
    async fn fetch_player_summaries_raw(&self, steam_id: &str) -> Result<Value, SteamApiError> {
        let url = format!(
            "{}{}?key={}&steamids={}",
            self.api_base,
            API_PLAYER_SUMMARIES,
            self.api_key,
            urlencoding::encode(steam_id)
        );

        self.get_json(&url).await.inspect_err(|e| {
            log_failure!(e, steam_id = %steam_id, "Failed to fetch player summary");
        })
    }

    async fn resolve_vanity_url(&self, vanity_name: &str) -> Option<String> {
        let url = format!(
            "{}{}?key={}&vanityurl={}",
            self.api_base,
            API_RESOLVE_VANITY,
            self.api_key,
            urlencoding::encode(vanity_name)
        );

        match self.get_json(&url).await {
            Ok(body) if body["response"]["success"].as_i64() == Some(1) => {
                body["response"]["steamid"].as_str().map(String::from)
            }
            Ok(_) => {
                tracing::warn!(vanity = %vanity_name, "Failed to resolve vanity URL");
                None
            }
            Err(e) => {
                log_failure!(e, vanity = %vanity_name, "Vanity URL lookup failed");
                None
            }
        }
    }

    async fn fetch_owned_games(&self, steam_id: &str) -> OwnedGamesResponse {
        if steam_id.is_empty() {
            tracing::warn!("Empty Steam ID provided to fetch_owned_games");
            return OwnedGamesResponse::default();
        }

        let input = serde_json::json!({
            "steamid": steam_id,
            "include_appinfo": true,
            "include_played_free_games": true
        });

        let url = format!(
            "{}{}?key={}&input_json={}&format=json",
            self.api_base,
            API_OWNED_GAMES,
            self.api_key,
            urlencoding::encode(&input.to_string())
        );

        let body = match self.get_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                log_failure!(e, steam_id = %steam_id, "Steam API error when fetching owned games");
                return OwnedGamesResponse::default();
            }
        };

        match serde_json::from_value(body["response"].clone()) {
            Ok(owned) => owned,
            Err(e) => {
                tracing::warn!(steam_id = %steam_id, error = %e, "Unexpected owned games payload");
                OwnedGamesResponse::default()
            }
        }
    }

    async fn fetch_app_details(&self, appid: u64) -> Option<AppDetails> {
        let url = format!("{}{}?appids={}", self.store_base, STORE_APP_DETAILS, appid);

        let mut body = match self.get_json(&url).await {
            Ok(body) => body,
            Err(e) => {
                log_failure!(e, appid, "Failed to fetch store app details");
                return None;
            }
        };

        // { "<appid>": { "success": true, "data": { ... } } }
        let entry = body.get_mut(appid.to_string())?.take();
        if entry["success"].as_bool() != Some(true) {
            tracing::warn!(appid, "Store has no details for app");
            return None;
        }

        serde_json::from_value(entry["data"].clone())
            .inspect_err(|e| tracing::warn!(appid, error = %e, "Unexpected app details payload"))
            .ok()
    }

    async fn fetch_steamspy_data(&self, appid: u64) -> Option<SteamSpyData> {
        let url = format!(
            "{}{}?request=appdetails&appid={}",
            self.steamspy_base, STEAMSPY_API, appid
        );

        match self.get_json(&url).await {
            Ok(body) => serde_json::from_value(body)
                .inspect_err(|e| tracing::warn!(appid, error = %e, "Unexpected SteamSpy payload"))
                .ok(),
            Err(e) => {
                log_failure!(e, appid, "Failed to fetch SteamSpy data");
                None
            }
        }
    }

    async fn fetch_current_players(&self, appid: u64) -> Option<u64> {
        let url = format!(
            "{}{}?appid={}&key={}",
            self.api_base, API_CURRENT_PLAYERS, appid, self.api_key
        );

        match self.get_json(&url).await {
            Ok(body) if body["response"]["result"].as_i64() == Some(1) => {
                body["response"]["player_count"].as_u64()
            }
            Ok(_) => None,
            Err(e) => {
                log_failure!(e, appid, "Failed to fetch current players");
                None
            }
        }
    }
}
