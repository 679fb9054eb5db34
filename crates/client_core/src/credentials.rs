use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use shared::domain::GameId;
use tokio::fs;
use tracing::debug;

use crate::error::CredentialError;

const CREDENTIALS_FILE: &str = "credentials.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_game_id: Option<GameId>,
}

impl Credentials {
    pub fn logged_in(token: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            user_name: Some(user_name.into()),
            current_game_id: None,
        }
    }

    pub fn bearer(&self) -> Option<&str> {
        self.token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn is_logged_in(&self) -> bool {
        self.bearer().is_some()
    }
}

/// Credentials persisted as a small JSON file in the client's data directory.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CREDENTIALS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means nobody is logged in yet.
    pub async fn load(&self) -> Result<Credentials, CredentialError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(source) => return Err(self.io_error(source)),
        };
        serde_json::from_slice(&raw).map_err(|source| CredentialError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    pub async fn save(&self, credentials: &Credentials) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }
        let raw = serde_json::to_vec_pretty(credentials).map_err(|source| {
            CredentialError::Corrupt {
                path: self.path.display().to_string(),
                source,
            }
        })?;
        fs::write(&self.path, raw)
            .await
            .map_err(|source| self.io_error(source))?;
        debug!("credentials: saved to {}", self.path.display());
        Ok(())
    }

    pub async fn remember_game(&self, game_id: GameId) -> Result<(), CredentialError> {
        let mut credentials = self.load().await?;
        credentials.current_game_id = Some(game_id);
        self.save(&credentials).await
    }

    pub async fn clear(&self) -> Result<(), CredentialError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    fn io_error(&self, source: std::io::Error) -> CredentialError {
        CredentialError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
#[path = "tests/credentials_tests.rs"]
mod tests;
