use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "spotimpostor";
const ENV_PREFIX: &str = "SPOTIMPOSTOR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
    pub data_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/api".into(),
            data_dir: PathBuf::from("./.spotimpostor"),
        }
    }
}

impl Settings {
    /// Defaults, then `spotimpostor.toml` (or `config_file`), then
    /// `SPOTIMPOSTOR__*` environment variables.
    pub fn load(config_file: Option<&Path>) -> anyhow::Result<Self> {
        Self::from_sources(
            config_file,
            Environment::with_prefix(ENV_PREFIX).separator("__"),
        )
    }

    fn from_sources(config_file: Option<&Path>, env: Environment) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let file = match config_file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("api_base_url", defaults.api_base_url)?
            .set_default("data_dir", defaults.data_dir.display().to_string())?
            .add_source(file)
            .add_source(env)
            .build()
            .context("failed to read settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    pub fn with_overrides(mut self, api_url: Option<String>, data_dir: Option<PathBuf>) -> Self {
        if let Some(api_url) = api_url {
            self.api_base_url = api_url;
        }
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
