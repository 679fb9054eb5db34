use std::collections::HashSet;

use shared::{
    domain::CollectionVisibility,
    protocol::{CollectionWord, CreateCollectionRequest, UpdateCollectionRequest},
};

use crate::error::SessionError;

pub const MIN_WORDS: usize = 3;

/// A user collection being created or edited locally before it is sent to the
/// backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDraft {
    pub name: String,
    pub words: Vec<CollectionWord>,
}

impl CollectionDraft {
    pub fn new(
        name: impl Into<String>,
        words: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            words: words.into_iter().map(CollectionWord::new).collect(),
        }
    }

    /// Starts an edit from the words the backend already stores.
    pub fn from_saved(name: impl Into<String>, words: Vec<CollectionWord>) -> Self {
        Self {
            name: name.into(),
            words,
        }
    }

    pub fn add_word(&mut self, word: impl Into<String>) {
        self.words.push(CollectionWord::new(word));
    }

    /// Removes every entry matching `word`, ignoring case. Returns whether
    /// anything was removed.
    pub fn remove_word(&mut self, word: &str) -> bool {
        let before = self.words.len();
        self.words
            .retain(|entry| !entry.word.trim().eq_ignore_ascii_case(word.trim()));
        self.words.len() != before
    }

    /// Words that will actually be sent: trimmed, blanks dropped.
    fn kept_words(&self) -> impl Iterator<Item = CollectionWord> + '_ {
        self.words
            .iter()
            .filter(|entry| !entry.word.trim().is_empty())
            .map(|entry| CollectionWord {
                id: entry.id,
                word: entry.word.trim().to_string(),
            })
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        if self.name.trim().is_empty() {
            return Err(SessionError::invalid_collection("a name is required"));
        }

        let mut seen = HashSet::with_capacity(self.words.len());
        for entry in self.kept_words() {
            if !seen.insert(entry.word.to_lowercase()) {
                return Err(SessionError::invalid_collection(format!(
                    "word '{}' is listed twice",
                    entry.word
                )));
            }
        }

        if seen.len() < MIN_WORDS {
            return Err(SessionError::invalid_collection(format!(
                "at least {MIN_WORDS} words are required, got {}",
                seen.len()
            )));
        }

        Ok(())
    }

    pub fn to_create_request(&self) -> Result<CreateCollectionRequest, SessionError> {
        self.validate()?;
        Ok(CreateCollectionRequest {
            name: self.name.trim().to_string(),
            words: self.kept_words().map(|entry| entry.word).collect(),
        })
    }

    pub fn to_update_request(
        &self,
        visibility: CollectionVisibility,
    ) -> Result<UpdateCollectionRequest, SessionError> {
        self.validate()?;
        if visibility == CollectionVisibility::General {
            return Err(SessionError::invalid_collection(
                "user collections cannot be made general",
            ));
        }
        Ok(UpdateCollectionRequest {
            name: self.name.trim().to_string(),
            visibility,
            words: self.kept_words().collect(),
        })
    }
}

#[cfg(test)]
#[path = "tests/collection_tests.rs"]
mod tests;
