//! Server configuration from environment variables

use std::str::FromStr;
use std::time::Duration;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_REGISTRY_PATH: &str = "registry/hints.json";
const DEFAULT_TOP_GAMES_COUNT: usize = 5;
const DEFAULT_SESSION_LIFETIME_MINUTES: u64 = 120;
const DEFAULT_STEAM_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub steam_api_key: Option<String>,
    pub bind_address: String,
    pub hints_registry_path: String,
    pub top_games_count: usize,
    pub session_lifetime: Duration,
    pub steam_http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            steam_api_key: None,
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            hints_registry_path: DEFAULT_REGISTRY_PATH.to_string(),
            top_games_count: DEFAULT_TOP_GAMES_COUNT,
            session_lifetime: Duration::from_secs(DEFAULT_SESSION_LIFETIME_MINUTES * 60),
            steam_http_timeout: Duration::from_secs(DEFAULT_STEAM_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let steam_api_key = lookup("STEAM_API_KEY").filter(|key| !key.is_empty());
        if steam_api_key.is_none() {
            tracing::warn!("STEAM_API_KEY not set - Steam lookups will return no data");
        }

        let session_minutes = parse_or(
            &lookup,
            "SESSION_LIFETIME_MINUTES",
            DEFAULT_SESSION_LIFETIME_MINUTES,
        );
        let timeout_secs = parse_or(
            &lookup,
            "STEAM_HTTP_TIMEOUT_SECS",
            DEFAULT_STEAM_HTTP_TIMEOUT_SECS,
        );

        Self {
            steam_api_key,
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            hints_registry_path: lookup("HINTS_REGISTRY_PATH")
                .unwrap_or_else(|| DEFAULT_REGISTRY_PATH.to_string()),
            top_games_count: parse_or(&lookup, "TOP_GAMES_COUNT", DEFAULT_TOP_GAMES_COUNT),
            session_lifetime: Duration::from_secs(session_minutes * 60),
            steam_http_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(name) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = name, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
    }
}
