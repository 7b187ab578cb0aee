//! Profile validation and the raw player-summary proxy

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use steamguessr_core::account::account_creation;
use steamguessr_core::identity::{extract_identifier, persona_state_meaning, validate_numeric_id};
use steamguessr_core::{stats, PlayerSummary, SessionSnapshot, ValidationStatus};

use crate::error::AppError;
use crate::identity;
use crate::session::{with_session_cookie, CSRF_TOKEN_KEY, PUBLIC_PROFILE_KEY, USER_STEAM_ID_KEY};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ValidateUserRequest {
    #[serde(rename = "userSteamID")]
    pub user_steam_id: String,
    #[serde(rename = "isCustomID")]
    pub is_custom_id: bool,
}

#[derive(Debug, Serialize)]
pub struct ValidateUserResponse {
    #[serde(rename = "userSteamID")]
    pub user_steam_id: Option<String>,
    #[serde(rename = "isPublicProfile")]
    pub is_public_profile: bool,
    pub status: ValidationStatus,
    pub code: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidateUserResponse {
    fn invalid(error: String) -> Self {
        Self {
            user_steam_id: None,
            is_public_profile: false,
            status: ValidationStatus::Invalid,
            code: ValidationStatus::Invalid.code(),
            error: Some(error),
        }
    }

    fn resolved(steam_id: String, is_public: bool) -> Self {
        let status = ValidationStatus::determine(Some(steam_id.as_str()), is_public);
        Self {
            user_steam_id: Some(steam_id),
            is_public_profile: is_public,
            status,
            code: status.code(),
            error: None,
        }
    }
}

/// Resolve the submitted identity, classify the profile and, for public
/// profiles, store identity and library statistics in the session.
/// POST /initiate-user, POST /validate-user
pub async fn validate_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<ValidateUserRequest>, JsonRejection>,
) -> Response {
    let (session_id, cookie) = state.sessions.ensure(&headers).await;

    let response = match body {
        Ok(Json(request)) => validate(&state, &session_id, request).await.into_response(),
        Err(rejection) => AppError::BadRequest(rejection.body_text()).into_response(),
    };

    with_session_cookie(response, cookie)
}

async fn validate(
    state: &AppState,
    session_id: &str,
    request: ValidateUserRequest,
) -> (StatusCode, Json<ValidateUserResponse>) {
    state.sessions.clear_except(session_id, &[CSRF_TOKEN_KEY]).await;

    let steam_id = match identity::resolve(
        state.steam.as_ref(),
        &request.user_steam_id,
        request.is_custom_id,
    )
    .await
    {
        Ok(steam_id) => steam_id,
        Err(e) => {
            tracing::info!(input = %request.user_steam_id, error = %e, "Could not resolve Steam ID");
            return (StatusCode::NOT_FOUND, Json(ValidateUserResponse::invalid(e.to_string())));
        }
    };

    let player = match state.steam.fetch_player_summary(&steam_id).await {
        Ok(Some(player)) => Some(player),
        Ok(None) => {
            tracing::info!(steam_id = %steam_id, "No Steam account for ID");
            return (
                StatusCode::NOT_FOUND,
                Json(ValidateUserResponse::invalid(format!("no Steam account found for {}", steam_id))),
            );
        }
        Err(e) => {
            tracing::warn!(steam_id = %steam_id, error = %e, "Player summary unavailable, treating profile as private");
            None
        }
    };

    match player.filter(PlayerSummary::is_public) {
        Some(player) => {
            let snapshot = build_snapshot(state, &steam_id, &player).await;
            if let Err(e) = state.sessions.store_snapshot(session_id, &snapshot).await {
                tracing::error!(steam_id = %steam_id, error = %e, "Failed to write session");
            }
            tracing::info!(
                steam_id = %steam_id,
                games = snapshot.total_games_owned,
                "Validated public profile"
            );
            (StatusCode::OK, Json(ValidateUserResponse::resolved(steam_id, true)))
        }
        None => {
            let mut values = Map::new();
            values.insert(USER_STEAM_ID_KEY.to_string(), Value::String(steam_id.clone()));
            values.insert(PUBLIC_PROFILE_KEY.to_string(), Value::Bool(false));
            state.sessions.put(session_id, values).await;

            tracing::info!(steam_id = %steam_id, "Validated private profile");
            (StatusCode::OK, Json(ValidateUserResponse::resolved(steam_id, false)))
        }
    }
}

async fn build_snapshot(state: &AppState, steam_id: &str, player: &PlayerSummary) -> SessionSnapshot {
    let owned = state.steam.fetch_owned_games(steam_id).await;
    let game_stats = stats::compute_all(&owned.games, state.config.top_games_count);
    let creation = account_creation(player.timecreated, Utc::now());

    SessionSnapshot {
        user_steam_id: steam_id.to_string(),
        persona_state: persona_state_meaning(player.personastate).to_string(),
        public_profile: true,
        steam_profile_url: player.profileurl.clone(),
        profile_picture_url: player.avatarfull.clone(),
        username: player.personaname.clone(),
        time_created: creation.date,
        account_age: creation.age,
        total_games_owned: game_stats.game_count,
        total_playtime_minutes: game_stats.total_playtime_minutes,
        average_playtime_minutes: game_stats.average_playtime_minutes,
        median_playtime_minutes: game_stats.median_playtime_minutes,
        top_games: game_stats.top_games,
        played_percentage: game_stats.played_percentage,
        all_games: stats::library_games(&owned.games),
    }
}

#[derive(Debug, Deserialize)]
pub struct BasicInfoRequest {
    #[serde(rename = "userSteamID")]
    pub user_steam_id: String,
}

/// Raw `GetPlayerSummaries` body for a numeric Steam ID
/// POST /get-basic-info
pub async fn get_basic_info(
    State(state): State<Arc<AppState>>,
    body: Result<Json<BasicInfoRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let steam_id = validate_numeric_id(extract_identifier(&request.user_steam_id))
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let summary = state.steam.fetch_player_summaries_raw(steam_id).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use crate::test_support::{
        get_request, owned_game, player, post_json, send, test_app, FakeSteam,
    };
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    const GABEN: &str = "76561197960287930";

    fn public_steam() -> FakeSteam {
        FakeSteam::default()
            .with_player(player(GABEN, true))
            .with_vanity("gaben", GABEN)
            .with_owned_games(
                GABEN,
                vec![
                    owned_game(Some(10), "Counter-Strike", 60),
                    owned_game(Some(20), "Team Fortress Classic", 120),
                    owned_game(Some(30), "Day of Defeat", 30),
                ],
            )
    }

    #[tokio::test]
    async fn test_public_profile_fills_session() {
        let (app, _) = test_app(Arc::new(public_steam()));

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": GABEN, "isCustomID": false }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.json,
            json!({ "userSteamID": GABEN, "isPublicProfile": true, "status": "public", "code": 3 })
        );
        let cookie = response.cookie.expect("new session cookie");

        let dashboard = send(&app, get_request("/api/dashboard", Some(&cookie))).await;
        assert_eq!(dashboard.status, StatusCode::OK);
        assert_eq!(dashboard.json["userSteamID"], GABEN);
        assert_eq!(dashboard.json["publicProfile"], true);
        assert_eq!(dashboard.json["username"], "gaben");
        assert_eq!(dashboard.json["personaState"], "Online");
        assert_eq!(dashboard.json["timeCreated"], "September 12, 2003");
        assert_eq!(dashboard.json["totalGamesOwned"], 3);
        assert_eq!(dashboard.json["totalPlaytimeMinutes"], 210);
        assert_eq!(dashboard.json["averagePlaytimeMinutes"], 70.0);
        assert_eq!(dashboard.json["medianPlaytimeMinutes"], 60.0);
        assert_eq!(dashboard.json["topGames"][0]["name"], "Team Fortress Classic");
        assert_eq!(dashboard.json["playedPercentage"], 100.0);
    }

    #[tokio::test]
    async fn test_custom_id_is_resolved() {
        let steam = Arc::new(public_steam());
        let (app, _) = test_app(steam.clone());

        let response = send(
            &app,
            post_json(
                "/initiate-user",
                json!({ "userSteamID": "https://steamcommunity.com/id/gaben/", "isCustomID": true }),
                None,
            ),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["userSteamID"], GABEN);
        assert_eq!(steam.calls.vanity.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_private_profile() {
        let steam = Arc::new(FakeSteam::default().with_player(player(GABEN, false)));
        let (app, _) = test_app(steam.clone());

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": GABEN, "isCustomID": false }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(
            response.json,
            json!({ "userSteamID": GABEN, "isPublicProfile": false, "status": "private", "code": 2 })
        );
        // Library is only fetched for public profiles
        assert_eq!(steam.calls.owned_games.load(Ordering::SeqCst), 0);

        let cookie = response.cookie.unwrap();
        let dashboard = send(&app, get_request("/api/dashboard", Some(&cookie))).await;
        assert_eq!(dashboard.json, json!({ "userSteamID": GABEN, "publicProfile": false }));
    }

    #[tokio::test]
    async fn test_summary_outage_counts_as_private() {
        let steam = FakeSteam::default()
            .with_player(player(GABEN, true))
            .with_player_summary_down();
        let (app, _) = test_app(Arc::new(steam));

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": GABEN, "isCustomID": false }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["status"], "private");
    }

    #[tokio::test]
    async fn test_unresolvable_vanity_is_invalid() {
        let (app, _) = test_app(Arc::new(FakeSteam::default()));

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": "nobody", "isCustomID": true }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json["status"], "invalid");
        assert_eq!(response.json["code"], 1);
        assert_eq!(response.json["userSteamID"], serde_json::Value::Null);
        assert_eq!(response.json["isPublicProfile"], false);
        assert!(response.json["error"].is_string());
    }

    #[tokio::test]
    async fn test_non_numeric_raw_id_skips_steam() {
        let steam = Arc::new(FakeSteam::default());
        let (app, _) = test_app(steam.clone());

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": "gaben", "isCustomID": false }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json["status"], "invalid");
        assert_eq!(steam.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_unknown_account_is_invalid() {
        let (app, _) = test_app(Arc::new(FakeSteam::default()));

        let response = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": "123", "isCustomID": false }), None),
        )
        .await;

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json["status"], "invalid");
    }

    #[tokio::test]
    async fn test_revalidation_replaces_previous_user() {
        let other = "76561197960287931";
        let steam = public_steam().with_player(player(other, false));
        let (app, _) = test_app(Arc::new(steam));

        let first = send(
            &app,
            post_json("/validate-user", json!({ "userSteamID": GABEN, "isCustomID": false }), None),
        )
        .await;
        let cookie = first.cookie.unwrap();

        let second = send(
            &app,
            post_json(
                "/validate-user",
                json!({ "userSteamID": other, "isCustomID": false }),
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(second.status, StatusCode::OK);
        // Existing session is reused
        assert_eq!(second.cookie, None);

        let dashboard = send(&app, get_request("/api/dashboard", Some(&cookie))).await;
        assert_eq!(dashboard.json, json!({ "userSteamID": other, "publicProfile": false }));
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (app, _) = test_app(Arc::new(FakeSteam::default()));

        let response = send(&app, post_json("/validate-user", json!({ "userSteamID": 42 }), None)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.json["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_fields_are_bad_request() {
        let steam = Arc::new(FakeSteam::default());
        let (app, _) = test_app(steam.clone());

        for body in [json!({}), json!({ "userSteamID": GABEN }), json!({ "isCustomID": true })] {
            let response = send(&app, post_json("/validate-user", body, None)).await;
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
            assert!(response.json["error"].is_string());
        }
        assert_eq!(steam.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_basic_info_proxies_raw_summary() {
        let steam = Arc::new(FakeSteam::default().with_player(player(GABEN, true)));
        let (app, _) = test_app(steam);

        let response = send(
            &app,
            post_json(
                "/get-basic-info",
                json!({ "userSteamID": format!("https://steamcommunity.com/profiles/{}", GABEN) }),
                None,
            ),
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["response"]["players"][0]["steamid"], GABEN);
    }

    #[tokio::test]
    async fn test_basic_info_rejects_non_numeric_id() {
        let steam = Arc::new(FakeSteam::default());
        let (app, _) = test_app(steam.clone());

        let response = send(&app, post_json("/get-basic-info", json!({ "userSteamID": "gaben" }), None)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(steam.calls.total(), 0);
    }

    #[tokio::test]
    async fn test_basic_info_without_id_is_bad_request() {
        let (app, _) = test_app(Arc::new(FakeSteam::default()));

        let response = send(&app, post_json("/get-basic-info", json!({}), None)).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_basic_info_upstream_failure_is_bad_gateway() {
        let steam = FakeSteam::default().with_player_summary_down();
        let (app, _) = test_app(Arc::new(steam));

        let response = send(&app, post_json("/get-basic-info", json!({ "userSteamID": GABEN }), None)).await;
        assert_eq!(response.status, StatusCode::BAD_GATEWAY);
        assert!(response.json["error"].is_string());
    }
}
