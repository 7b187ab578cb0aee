//! Owned-games statistics
//!
//! All functions are total over any games list: missing fields count as
//! zero/absent and an empty library yields zeroed stats.

use crate::models::{GameStats, LibraryGame, OwnedGame, TopGame};

const COVER_URL_BASE: &str = "https://steamcdn-a.akamaihd.net/steam/apps";

/// Capsule image for an app, `None` when the app id is unknown
pub fn cover_url(appid: Option<u64>) -> Option<String> {
    appid.map(|id| format!("{}/{}/capsule_616x353.jpg", COVER_URL_BASE, id))
}

/// Compute every statistic in one pass over the caller's list.
pub fn compute_all(games: &[OwnedGame], top_n: usize) -> GameStats {
    GameStats {
        game_count: game_count(games),
        total_playtime_minutes: total_playtime_minutes(games),
        average_playtime_minutes: average_playtime_minutes(games),
        median_playtime_minutes: median_playtime_minutes(games),
        top_games: top_games(games, top_n),
        played_percentage: played_percentage(games),
    }
}

pub fn game_count(games: &[OwnedGame]) -> usize {
    games.len()
}

pub fn total_playtime_minutes(games: &[OwnedGame]) -> u64 {
    games.iter().map(|g| g.playtime_forever as u64).sum()
}

pub fn average_playtime_minutes(games: &[OwnedGame]) -> f64 {
    let count = game_count(games);
    if count == 0 {
        return 0.0;
    }
    total_playtime_minutes(games) as f64 / count as f64
}

pub fn median_playtime_minutes(games: &[OwnedGame]) -> f64 {
    let mut playtimes: Vec<u32> = games.iter().map(|g| g.playtime_forever).collect();
    if playtimes.is_empty() {
        return 0.0;
    }
    playtimes.sort_unstable();

    let mid = playtimes.len() / 2;
    if playtimes.len() % 2 == 0 {
        (playtimes[mid - 1] as f64 + playtimes[mid] as f64) / 2.0
    } else {
        playtimes[mid] as f64
    }
}

/// Most played games first; equal playtimes keep their library order.
pub fn top_games(games: &[OwnedGame], top_n: usize) -> Vec<TopGame> {
    let mut sorted: Vec<&OwnedGame> = games.iter().collect();
    sorted.sort_by(|a, b| b.playtime_forever.cmp(&a.playtime_forever));

    sorted
        .into_iter()
        .take(top_n)
        .map(|game| TopGame {
            appid: game.appid,
            name: game.name.clone(),
            playtime_forever: game.playtime_forever,
            cover_url: cover_url(game.appid),
        })
        .collect()
}

/// Share of games with any playtime, 0-100 rounded to two decimals
pub fn played_percentage(games: &[OwnedGame]) -> f64 {
    let total = game_count(games);
    if total == 0 {
        return 0.0;
    }
    let played = games.iter().filter(|g| g.playtime_forever > 0).count();
    round_to(played as f64 / total as f64 * 100.0, 2)
}

/// Project the library into the guessing-game answer pool
pub fn library_games(games: &[OwnedGame]) -> Vec<LibraryGame> {
    games
        .iter()
        .map(|game| LibraryGame {
            id: game.appid,
            name: game.name.clone(),
            cover_url: cover_url(game.appid),
            playtime: game.playtime_forever,
            last_played: game.rtime_last_played,
        })
        .collect()
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
