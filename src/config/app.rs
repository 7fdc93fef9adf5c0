// src/config/app.rs
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use super::defaults::*;
use crate::consts::DEFAULT_CONFIG_FILE;
use crate::error::CoreError;

/// Run configuration, built once and passed by reference
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_keys")]
    pub keys: Keys,
    #[serde(default = "default_pillar")]
    pub pillar: PillarOptions,
    #[serde(default = "default_rotation")]
    pub rotation: Rotation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Keys {
    #[serde(default = "default_public_keyring")]
    pub public_keyring: PathBuf,
    #[serde(default = "default_secret_keyring")]
    pub secret_keyring: PathBuf,
    /// Recipient name, e-mail or key ID; decrypt-only runs may leave it unset
    #[serde(default)]
    pub pgp_key_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PillarOptions {
    /// Only the subtree under this top-level key is transformed
    #[serde(default)]
    pub top_level_element: Option<String>,
    #[serde(default = "default_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rotation {
    /// Concurrent rotations; unset means one per available CPU
    #[serde(default)]
    pub workers: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keys: default_keys(),
            pillar: default_pillar(),
            rotation: default_rotation(),
        }
    }
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a file, falling back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        if !path.exists() {
            warn!("{} not found, using built-in defaults", path.display());
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::FileIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Apply `SECURE_PILLAR_*` overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_PUBRING) {
            self.keys.public_keyring = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_SECRING) {
            self.keys.secret_keyring = PathBuf::from(v);
        }
        if let Some(v) = lookup(ENV_PGP_KEY) {
            self.keys.pgp_key_name = Some(v);
        }
        if let Some(v) = lookup(ENV_ELEMENT) {
            self.pillar.top_level_element = Some(v);
        }
    }

    /// The configured scope, treating an empty name as unset
    pub fn scope(&self) -> Option<&str> {
        self.pillar
            .top_level_element
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

/// Load the config named by `SECURE_PILLAR_CONFIG` (or `secure-pillar.toml`),
/// then apply environment overrides
pub fn load() -> Result<Config, CoreError> {
    let config_path =
        std::env::var(ENV_CONFIG).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

    let mut conf = Config::load_from(Path::new(&config_path))?;
    conf.apply_env();
    Ok(conf)
}
