//! Resolve user input (profile URL, custom name or numeric ID) to a numeric Steam ID

use steamguessr_core::identity::{extract_identifier, validate_numeric_id};
use steamguessr_core::ResolutionError;

use crate::steam_api::SteamApi;

pub async fn resolve(
    steam: &dyn SteamApi,
    input: &str,
    is_custom_id: bool,
) -> Result<String, ResolutionError> {
    let segment = extract_identifier(input);
    if segment.is_empty() {
        return Err(ResolutionError::Empty);
    }

    if is_custom_id {
        return steam
            .resolve_vanity_url(segment)
            .await
            .ok_or_else(|| ResolutionError::NotFound(segment.to_string()));
    }

    validate_numeric_id(segment).map(String::from)
}
