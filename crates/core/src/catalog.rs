//! Static hint registry and per-round hint selection
//!
//! Registry format (`registry/hints.json`):
//!
//! ```json
//! { "hints": { "easy": { "First Letter": { "neededData": ["first_letter"] } } } }
//! ```

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{HintError, RegistryError};
use crate::models::{Difficulty, HintDefinition, SelectedHint};

#[derive(Deserialize)]
struct RawHint {
    #[serde(rename = "neededData")]
    needed_data: Vec<String>,
}

/// Parsed hint registry, grouped by difficulty
#[derive(Debug, Clone, Default)]
pub struct HintCatalog {
    hints: BTreeMap<Difficulty, Vec<HintDefinition>>,
}

impl HintCatalog {
    /// Read and validate the registry file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| RegistryError::missing(path, e))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, RegistryError> {
        let mut root: serde_json::Value = serde_json::from_str(content)?;

        let hints = match root.get_mut("hints") {
            Some(hints) if hints.is_object() => hints.take(),
            _ => return Err(RegistryError::MissingHintsKey),
        };
        let raw: BTreeMap<String, BTreeMap<String, RawHint>> = serde_json::from_value(hints)?;

        let mut catalog = HintCatalog::default();
        for (difficulty_name, entries) in raw {
            let difficulty: Difficulty = difficulty_name
                .parse()
                .map_err(RegistryError::UnknownDifficulty)?;

            let definitions = catalog.hints.entry(difficulty).or_default();
            definitions.extend(entries.into_iter().map(|(name, hint)| HintDefinition {
                difficulty,
                name,
                needed_data_keys: hint.needed_data,
            }));
        }

        Ok(catalog)
    }

    pub fn hints_for(&self, difficulty: Difficulty) -> &[HintDefinition] {
        self.hints.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of hint definitions across all difficulties
    pub fn len(&self) -> usize {
        self.hints.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pick one hint per difficulty, uniformly at random.
    ///
    /// A round needs all three difficulties, so an empty difficulty is an error.
    pub fn select_random_hints<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<BTreeMap<Difficulty, SelectedHint>, HintError> {
        Difficulty::ALL
            .into_iter()
            .map(|difficulty| {
                self.hints_for(difficulty)
                    .choose(rng)
                    .map(|def| (difficulty, SelectedHint::from(def)))
                    .ok_or(HintError::NoHintsForDifficulty(difficulty))
            })
            .collect()
    }
}
