//! Pure helpers that turn game, store and SteamSpy data into hint values
//!
//! The backend resolver does the fetching and caching; everything that can
//! be computed from already-fetched data lives here.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

use crate::models::{AppDetails, SteamSpyData};
use crate::stats::round_to;

/// Labels tried, in order, when looking for the storage requirement.
/// Each label is matched both right after a closing `</strong>` and inline.
static DISK_SPACE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["Storage", "Hard Drive", "Disk Space", "HDD"]
        .iter()
        .flat_map(|label| {
            [
                format!(r"(?i){}:\s*</strong>\s*([^<]+)", label),
                format!(r"(?i){}:\s*([^<]+)", label),
            ]
        })
        .filter_map(|pattern| Regex::new(&pattern).ok())
        .collect()
});

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

static TRAILING_AVAILABILITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(available space|available|of free space|of free|free space|free)\s*$")
        .expect("static regex")
});

/// Uppercased first character of the name
pub fn first_letter(name: Option<&str>) -> Option<String> {
    let first = name?.chars().next()?;
    Some(first.to_uppercase().collect())
}

/// The name's characters in random order
pub fn scrambled_name<R: Rng + ?Sized>(name: Option<&str>, rng: &mut R) -> Option<String> {
    let name = name.filter(|n| !n.is_empty())?;
    let mut chars: Vec<char> = name.chars().collect();
    chars.shuffle(rng);
    Some(chars.into_iter().collect())
}

pub fn developer(details: &AppDetails) -> Option<String> {
    details.developers.first().cloned()
}

pub fn publisher(details: &AppDetails) -> Option<String> {
    details.publishers.first().cloned()
}

/// Genre descriptions, in store order
pub fn tags(details: &AppDetails) -> Vec<String> {
    details.genres.iter().map(|g| g.description.clone()).collect()
}

pub fn release_date(details: &AppDetails) -> Option<String> {
    details.release_date.as_ref()?.date.clone()
}

/// Positive review percentage from SteamSpy, or the Metacritic score when
/// SteamSpy has no reviews for the game.
pub fn review_ratio(spy: Option<&SteamSpyData>, details: Option<&AppDetails>) -> Option<String> {
    if let Some(spy) = spy {
        let total = spy.positive + spy.negative;
        if total > 0 {
            let ratio = round_to(spy.positive as f64 / total as f64 * 100.0, 1);
            return Some(format!("{}%", ratio));
        }
    }

    let score = details?.metacritic.as_ref()?.score?;
    Some(format!("{}%", score))
}

/// Review count from SteamSpy, falling back to store recommendations
pub fn total_reviews(spy: Option<&SteamSpyData>, details: Option<&AppDetails>) -> u64 {
    match spy {
        Some(spy) => spy.positive + spy.negative,
        None => details
            .and_then(|d| d.recommendations.as_ref())
            .map(|r| r.total)
            .unwrap_or(0),
    }
}

/// Storage requirement from the minimum PC requirements HTML, e.g. "50 GB"
pub fn required_disk_space(details: &AppDetails) -> Option<String> {
    let minimum = details.minimum_requirements()?;
    extract_disk_space(minimum)
}

pub fn extract_disk_space(requirements_html: &str) -> Option<String> {
    let captured = DISK_SPACE_PATTERNS
        .iter()
        .find_map(|re| re.captures(requirements_html))?
        .get(1)?
        .as_str();

    let stripped = HTML_TAG.replace_all(captured, "");
    let space = TRAILING_AVAILABILITY.replace(stripped.trim(), "");
    let space = space.trim();
    (!space.is_empty()).then(|| space.to_string())
}

/// Unix timestamp as "June 15, 2023" (UTC); `None` for missing or non-positive stamps
pub fn format_date(timestamp: Option<i64>) -> Option<String> {
    let timestamp = timestamp.filter(|&t| t > 0)?;
    let dt = chrono::DateTime::from_timestamp(timestamp, 0)?;
    Some(dt.format("%B %-d, %Y").to_string())
}
