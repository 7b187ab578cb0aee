//! Hint data resolution for one classic round
//!
//! A `HintResolver` lives for a single round. Store, SteamSpy and
//! player-count lookups are cached per app id for that round only, so a
//! game needing several store-backed keys costs one upstream call each.

use std::collections::{BTreeMap, HashMap};

use steamguessr_core::hint_data;
use steamguessr_core::{
    AppDetails, DataKey, Difficulty, HintError, HintPayload, HintValue, LibraryGame,
    SelectedHint, SteamSpyData,
};

use crate::steam_api::SteamApi;

pub struct HintResolver<'a> {
    steam: &'a dyn SteamApi,
    app_details: HashMap<u64, Option<AppDetails>>,
    steamspy: HashMap<u64, Option<SteamSpyData>>,
    current_players: HashMap<u64, u64>,
}

impl<'a> HintResolver<'a> {
    pub fn new(steam: &'a dyn SteamApi) -> Self {
        Self {
            steam,
            app_details: HashMap::new(),
            steamspy: HashMap::new(),
            current_players: HashMap::new(),
        }
    }

    /// Resolve every needed data key of every selected hint against `game`
    pub async fn resolve_data(
        &mut self,
        hints: &BTreeMap<Difficulty, SelectedHint>,
        game: &LibraryGame,
    ) -> Result<BTreeMap<Difficulty, HintPayload>, HintError> {
        // Every key must be known before anything is fetched
        let parsed = hints
            .iter()
            .map(|(difficulty, hint)| -> Result<_, HintError> {
                let keys = hint
                    .needed_data_keys
                    .iter()
                    .map(|key| key.parse::<DataKey>())
                    .collect::<Result<Vec<_>, _>>()?;
                Ok((*difficulty, hint, keys))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut payloads = BTreeMap::new();

        for (difficulty, hint, keys) in parsed {
            let mut data = BTreeMap::new();
            for key in keys {
                data.insert(key, self.resolve_key(key, game).await);
            }

            payloads.insert(
                difficulty,
                HintPayload {
                    hint: hint.clone(),
                    data,
                },
            );
        }

        Ok(payloads)
    }

    /// Value for a single key; `None` when the data is unavailable
    pub async fn resolve_key(&mut self, key: DataKey, game: &LibraryGame) -> Option<HintValue> {
        let appid = match (key.requires_app_id(), game.id) {
            (true, None) => return None,
            (_, id) => id.unwrap_or_default(),
        };

        match key {
            DataKey::FirstLetter => hint_data::first_letter(game.name.as_deref()).map(HintValue::from),
            DataKey::ScrambledName => scramble(game.name.as_deref()).map(HintValue::from),
            DataKey::BannerUrl => game.cover_url.clone().map(HintValue::from),
            DataKey::Playtime => Some(HintValue::Count(game.playtime as u64)),
            DataKey::LastPlayed => hint_data::format_date(game.last_played).map(HintValue::from),
            DataKey::Developer => self
                .app_details(appid)
                .await
                .and_then(hint_data::developer)
                .map(HintValue::from),
            DataKey::Publisher => self
                .app_details(appid)
                .await
                .and_then(hint_data::publisher)
                .map(HintValue::from),
            DataKey::Tags => {
                let tags = self.app_details(appid).await.map(hint_data::tags);
                Some(HintValue::List(tags.unwrap_or_default()))
            }
            DataKey::ReleaseDate => self
                .app_details(appid)
                .await
                .and_then(hint_data::release_date)
                .map(HintValue::from),
            DataKey::ReviewRatio => {
                let spy = self.steamspy(appid).await.cloned();
                if let Some(ratio) = hint_data::review_ratio(spy.as_ref(), None) {
                    return Some(HintValue::Text(ratio));
                }
                let details = self.app_details(appid).await;
                hint_data::review_ratio(spy.as_ref(), details).map(HintValue::from)
            }
            DataKey::TotalReviews => {
                let spy = self.steamspy(appid).await.cloned();
                let details = if spy.is_some() {
                    None
                } else {
                    self.app_details(appid).await
                };
                Some(HintValue::Count(hint_data::total_reviews(spy.as_ref(), details)))
            }
            DataKey::RequiredDiskSpace => self
                .app_details(appid)
                .await
                .and_then(hint_data::required_disk_space)
                .map(HintValue::from),
            DataKey::TotalOwners => self
                .steamspy(appid)
                .await
                .and_then(|spy| spy.owners.clone())
                .map(HintValue::from),
            DataKey::CurrentPlayers => Some(HintValue::Count(self.current_players(appid).await)),
        }
    }

    async fn app_details(&mut self, appid: u64) -> Option<&AppDetails> {
        if !self.app_details.contains_key(&appid) {
            let details = self.steam.fetch_app_details(appid).await;
            self.app_details.insert(appid, details);
        }
        self.app_details.get(&appid).and_then(Option::as_ref)
    }

    async fn steamspy(&mut self, appid: u64) -> Option<&SteamSpyData> {
        if !self.steamspy.contains_key(&appid) {
            let data = self.steam.fetch_steamspy_data(appid).await;
            self.steamspy.insert(appid, data);
        }
        self.steamspy.get(&appid).and_then(Option::as_ref)
    }

    async fn current_players(&mut self, appid: u64) -> u64 {
        if let Some(&count) = self.current_players.get(&appid) {
            return count;
        }
        let count = self.steam.fetch_current_players(appid).await.unwrap_or(0);
        self.current_players.insert(appid, count);
        count
    }
}

fn scramble(name: Option<&str>) -> Option<String> {
    hint_data::scrambled_name(name, &mut rand::thread_rng())
}
