//! Data models shared between the core calculations and the backend

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::account::AccountAge;
use crate::error::HintError;

// ============================================================================
// Steam Web API payloads
// ============================================================================

/// Raw owned game entry from `IPlayerService/GetOwnedGames`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnedGame {
    #[serde(default)]
    pub appid: Option<u64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Total playtime in minutes
    #[serde(default)]
    pub playtime_forever: u32,
    #[serde(default)]
    pub rtime_last_played: Option<i64>,
}

/// The `response` object of `GetOwnedGames`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnedGamesResponse {
    #[serde(default)]
    pub game_count: u32,
    #[serde(default)]
    pub games: Vec<OwnedGame>,
}

/// One player from `ISteamUser/GetPlayerSummaries`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub steamid: String,
    #[serde(default)]
    pub personaname: Option<String>,
    #[serde(default)]
    pub profileurl: Option<String>,
    #[serde(default)]
    pub avatarfull: Option<String>,
    #[serde(default)]
    pub personastate: u8,
    /// 3 means the profile is public
    #[serde(default)]
    pub communityvisibilitystate: u8,
    #[serde(default)]
    pub timecreated: Option<i64>,
}

/// `communityvisibilitystate` value of a public profile
pub const PUBLIC_VISIBILITY_STATE: u8 = 3;

impl PlayerSummary {
    pub fn is_public(&self) -> bool {
        self.communityvisibilitystate == PUBLIC_VISIBILITY_STATE
    }
}

// ============================================================================
// Steam store / SteamSpy payloads
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metacritic {
    #[serde(default)]
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Recommendations {
    #[serde(default)]
    pub total: u64,
}

/// The `data` object of a store `appdetails` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppDetails {
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub metacritic: Option<Metacritic>,
    #[serde(default)]
    pub recommendations: Option<Recommendations>,
    /// Object with `minimum`/`recommended` HTML, or an empty array when the
    /// store has nothing to show
    #[serde(default)]
    pub pc_requirements: serde_json::Value,
}

impl AppDetails {
    /// The `minimum` PC requirements HTML, if the store provided any
    pub fn minimum_requirements(&self) -> Option<&str> {
        self.pc_requirements
            .get("minimum")
            .and_then(|m| m.as_str())
            .filter(|m| !m.is_empty())
    }
}

/// SteamSpy `appdetails` response (only the fields hints use)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SteamSpyData {
    #[serde(default)]
    pub positive: u64,
    #[serde(default)]
    pub negative: u64,
    /// Estimated owner range, e.g. "1,000,000 .. 2,000,000"
    #[serde(default)]
    pub owners: Option<String>,
}

// ============================================================================
// Derived library data
// ============================================================================

/// A game in the guessing pool, as stored in the session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryGame {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub cover_url: Option<String>,
    #[serde(default)]
    pub playtime: u32,
    #[serde(default)]
    pub last_played: Option<i64>,
}

impl LibraryGame {
    /// Usable as a round answer: has an id and a non-empty name
    pub fn is_valid(&self) -> bool {
        self.id.is_some() && self.name.as_deref().is_some_and(|n| !n.is_empty())
    }
}

/// Most played game entry shown on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopGame {
    pub appid: Option<u64>,
    pub name: Option<String>,
    pub playtime_forever: u32,
    pub cover_url: Option<String>,
}

/// Aggregated statistics over an owned-games list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub game_count: usize,
    pub total_playtime_minutes: u64,
    pub average_playtime_minutes: f64,
    pub median_playtime_minutes: f64,
    pub top_games: Vec<TopGame>,
    pub played_percentage: f64,
}

// ============================================================================
// Hints
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One unit of game information a hint can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKey {
    FirstLetter,
    ScrambledName,
    BannerUrl,
    Playtime,
    Developer,
    Publisher,
    Tags,
    ReleaseDate,
    ReviewRatio,
    TotalReviews,
    RequiredDiskSpace,
    LastPlayed,
    TotalOwners,
    CurrentPlayers,
}

impl DataKey {
    pub const ALL: [DataKey; 14] = [
        DataKey::FirstLetter,
        DataKey::ScrambledName,
        DataKey::BannerUrl,
        DataKey::Playtime,
        DataKey::Developer,
        DataKey::Publisher,
        DataKey::Tags,
        DataKey::ReleaseDate,
        DataKey::ReviewRatio,
        DataKey::TotalReviews,
        DataKey::RequiredDiskSpace,
        DataKey::LastPlayed,
        DataKey::TotalOwners,
        DataKey::CurrentPlayers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DataKey::FirstLetter => "first_letter",
            DataKey::ScrambledName => "scrambled_name",
            DataKey::BannerUrl => "banner_url",
            DataKey::Playtime => "playtime",
            DataKey::Developer => "developer",
            DataKey::Publisher => "publisher",
            DataKey::Tags => "tags",
            DataKey::ReleaseDate => "release_date",
            DataKey::ReviewRatio => "review_ratio",
            DataKey::TotalReviews => "total_reviews",
            DataKey::RequiredDiskSpace => "required_disk_space",
            DataKey::LastPlayed => "last_played",
            DataKey::TotalOwners => "total_owners",
            DataKey::CurrentPlayers => "current_players",
        }
    }

    /// Keys answered from store/SteamSpy/player-count lookups need an app id
    pub fn requires_app_id(self) -> bool {
        !matches!(
            self,
            DataKey::FirstLetter
                | DataKey::ScrambledName
                | DataKey::BannerUrl
                | DataKey::Playtime
                | DataKey::LastPlayed
        )
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKey {
    type Err = HintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HintError::UnknownKey(s.to_string()))
    }
}

/// A resolved piece of hint data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HintValue {
    Count(u64),
    Text(String),
    List(Vec<String>),
}

impl From<String> for HintValue {
    fn from(value: String) -> Self {
        HintValue::Text(value)
    }
}

impl From<u64> for HintValue {
    fn from(value: u64) -> Self {
        HintValue::Count(value)
    }
}

impl From<Vec<String>> for HintValue {
    fn from(value: Vec<String>) -> Self {
        HintValue::List(value)
    }
}

/// A hint as declared in the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintDefinition {
    pub difficulty: Difficulty,
    pub name: String,
    /// Kept as written in the registry; validated when the hint is resolved
    pub needed_data_keys: Vec<String>,
}

/// The hint picked for one difficulty in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedHint {
    pub difficulty: Difficulty,
    pub hint_name: String,
    pub needed_data_keys: Vec<String>,
}

impl From<&HintDefinition> for SelectedHint {
    fn from(def: &HintDefinition) -> Self {
        Self {
            difficulty: def.difficulty,
            hint_name: def.name.clone(),
            needed_data_keys: def.needed_data_keys.clone(),
        }
    }
}

/// A selected hint together with the data resolved for the target game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HintPayload {
    #[serde(flatten)]
    pub hint: SelectedHint,
    pub data: BTreeMap<DataKey, Option<HintValue>>,
}

// ============================================================================
// Session snapshot
// ============================================================================

/// Everything the validation flow persists for later requests.
///
/// Field names match the keys the frontend reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(rename = "userSteamID")]
    pub user_steam_id: String,
    pub persona_state: String,
    pub public_profile: bool,
    #[serde(rename = "steamProfileURL")]
    pub steam_profile_url: Option<String>,
    #[serde(rename = "profilePictureURL")]
    pub profile_picture_url: Option<String>,
    pub username: Option<String>,
    pub time_created: Option<String>,
    pub account_age: Option<AccountAge>,
    pub total_games_owned: usize,
    pub total_playtime_minutes: u64,
    pub average_playtime_minutes: f64,
    pub median_playtime_minutes: f64,
    pub top_games: Vec<TopGame>,
    pub played_percentage: f64,
    #[serde(default)]
    pub all_games: Vec<LibraryGame>,
}
