use std::collections::HashSet;

use shared::{
    domain::{CollectionRef, CollectionVisibility, GameMode},
    protocol::CreateRoundRequest,
};

use crate::error::SessionError;

pub const MIN_PLAYERS: usize = 3;
pub const MIN_IMPOSTORS: usize = 1;

/// Largest impostor count offered for `players` players.
pub fn max_impostors(players: usize) -> usize {
    players / 2
}

/// Everything needed to ask the backend for a new round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSetup {
    pub mode: GameMode,
    pub collection: CollectionRef,
    pub players: Vec<String>,
    pub impostor_count: usize,
}

impl RoundSetup {
    pub fn new(
        mode: GameMode,
        collection: CollectionRef,
        players: impl IntoIterator<Item = impl Into<String>>,
        impostor_count: usize,
    ) -> Self {
        Self {
            mode,
            collection,
            players: players.into_iter().map(Into::into).collect(),
            impostor_count,
        }
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.mode.name.trim().is_empty() {
            return Err(SessionError::invalid_configuration("a game mode is required"));
        }
        if self.collection.name.trim().is_empty() {
            return Err(SessionError::invalid_configuration("a collection is required"));
        }
        if self.collection.visibility != CollectionVisibility::General
            && self.collection.code.is_none()
        {
            return Err(SessionError::invalid_configuration(format!(
                "collection '{}' needs a code",
                self.collection.name
            )));
        }

        if self.players.len() < MIN_PLAYERS {
            return Err(SessionError::invalid_configuration(format!(
                "at least {MIN_PLAYERS} players are required, got {}",
                self.players.len()
            )));
        }

        let mut seen = HashSet::with_capacity(self.players.len());
        for (index, name) in self.players.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                return Err(SessionError::invalid_configuration(format!(
                    "player {} has no name",
                    index + 1
                )));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(SessionError::invalid_configuration(format!(
                    "player name '{name}' is used twice"
                )));
            }
        }

        let max = max_impostors(self.players.len());
        if !(MIN_IMPOSTORS..=max).contains(&self.impostor_count) {
            return Err(SessionError::invalid_configuration(format!(
                "impostor count must be between {MIN_IMPOSTORS} and {max}, got {}",
                self.impostor_count
            )));
        }

        Ok(())
    }

    pub fn to_request(&self) -> Result<CreateRoundRequest, SessionError> {
        self.validate()?;
        let players: Vec<String> = self.players.iter().map(|p| p.trim().to_string()).collect();
        Ok(CreateRoundRequest {
            mode: self.mode.name.clone(),
            collection_name: self.collection.name.clone(),
            collection_code: self.collection.code.clone(),
            collection_visibility: self.collection.visibility,
            player_count: players.len(),
            impostor_count: self.impostor_count,
            players,
        })
    }
}

#[cfg(test)]
#[path = "tests/setup_tests.rs"]
mod tests;
