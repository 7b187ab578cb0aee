//! Server-side session store
//!
//! Sessions are keyed by a random id carried in the `steamguessr_session`
//! cookie and hold a flat key/value map, the same keys the frontend reads.
//! Writes are last-write-wins; idle sessions expire after the configured
//! lifetime.

use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::Response;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use steamguessr_core::{LibraryGame, SessionSnapshot};
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "steamguessr_session";
pub const CSRF_TOKEN_KEY: &str = "_token";
pub const USER_STEAM_ID_KEY: &str = "userSteamID";
pub const PUBLIC_PROFILE_KEY: &str = "publicProfile";
pub const ALL_GAMES_KEY: &str = "allGames";

const SESSION_ID_LENGTH: usize = 40;

struct SessionEntry {
    values: Map<String, Value>,
    last_seen: Instant,
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
    lifetime: Duration,
}

impl SessionStore {
    pub fn new(lifetime: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            lifetime,
        }
    }

    /// Create a new session holding only a fresh CSRF token
    pub async fn start(&self) -> String {
        let id = random_token(SESSION_ID_LENGTH);
        let mut values = Map::new();
        values.insert(CSRF_TOKEN_KEY.to_string(), Value::String(random_token(SESSION_ID_LENGTH)));

        let mut sessions = self.sessions.write().await;
        let lifetime = self.lifetime;
        sessions.retain(|_, entry| entry.last_seen.elapsed() <= lifetime);
        sessions.insert(id.clone(), SessionEntry { values, last_seen: Instant::now() });
        id
    }

    /// Id of the live session named by the request cookie, if any
    pub async fn current(&self, headers: &HeaderMap) -> Option<String> {
        let id = session_id_from_headers(headers)?;
        self.touch(&id).await.then_some(id)
    }

    /// The request's live session, or a new one plus the `Set-Cookie` value announcing it
    pub async fn ensure(&self, headers: &HeaderMap) -> (String, Option<String>) {
        match self.current(headers).await {
            Some(id) => (id, None),
            None => {
                let id = self.start().await;
                let cookie = session_cookie(&id);
                (id, Some(cookie))
            }
        }
    }

    /// Refresh the idle timer; drops the session and returns false once expired
    async fn touch(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(id) {
            Some(entry) if entry.last_seen.elapsed() <= self.lifetime => {
                entry.last_seen = Instant::now();
                true
            }
            Some(_) => {
                sessions.remove(id);
                false
            }
            None => false,
        }
    }

    pub async fn get(&self, id: &str, key: &str) -> Option<Value> {
        let sessions = self.sessions.read().await;
        sessions.get(id)?.values.get(key).cloned()
    }

    /// All values of a session
    pub async fn all(&self, id: &str) -> Map<String, Value> {
        let sessions = self.sessions.read().await;
        sessions.get(id).map(|entry| entry.values.clone()).unwrap_or_default()
    }

    /// Merge `values` into the session, overwriting existing keys
    pub async fn put(&self, id: &str, values: Map<String, Value>) {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(id) {
            entry.values.extend(values);
        }
    }

    /// Forget every key except the ones in `preserve`
    pub async fn clear_except(&self, id: &str, preserve: &[&str]) {
        let mut sessions = self.sessions.write().await;
        if let Some(entry) = sessions.get_mut(id) {
            entry.values.retain(|key, _| preserve.contains(&key.as_str()));
        }
    }

    pub async fn store_snapshot(
        &self,
        id: &str,
        snapshot: &SessionSnapshot,
    ) -> Result<(), serde_json::Error> {
        match serde_json::to_value(snapshot)? {
            Value::Object(values) => {
                self.put(id, values).await;
                Ok(())
            }
            _ => Err(serde::ser::Error::custom("session snapshot is not an object")),
        }
    }

    /// The guessing-game answer pool stored at validation
    pub async fn library(&self, id: &str) -> Vec<LibraryGame> {
        self.get(id, ALL_GAMES_KEY)
            .await
            .and_then(|games| serde_json::from_value(games).ok())
            .unwrap_or_default()
    }
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(id: &str) -> String {
    format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, id)
}

/// Attach `Set-Cookie` when a session was created for this request
pub fn with_session_cookie(mut response: Response, cookie: Option<String>) -> Response {
    if let Some(cookie) = cookie.and_then(|c| HeaderValue::from_str(&c).ok()) {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    response
}
