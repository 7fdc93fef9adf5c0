// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{Keys, PillarOptions, Rotation};
use crate::consts::{DEFAULT_PUB_RING, DEFAULT_SEC_RING, SLS_EXTENSION};

pub const ENV_CONFIG: &str = "SECURE_PILLAR_CONFIG";
pub const ENV_PUBRING: &str = "SECURE_PILLAR_PUBRING";
pub const ENV_SECRING: &str = "SECURE_PILLAR_SECRING";
pub const ENV_PGP_KEY: &str = "SECURE_PILLAR_PGP_KEY";
pub const ENV_ELEMENT: &str = "SECURE_PILLAR_ELEMENT";
pub const ENV_PASSPHRASE: &str = "SECURE_PILLAR_PASSPHRASE";

pub fn default_public_keyring() -> PathBuf {
    PathBuf::from(DEFAULT_PUB_RING)
}

pub fn default_secret_keyring() -> PathBuf {
    PathBuf::from(DEFAULT_SEC_RING)
}

pub fn default_extension() -> String {
    SLS_EXTENSION.into()
}

pub fn default_keys() -> Keys {
    Keys {
        public_keyring: default_public_keyring(),
        secret_keyring: default_secret_keyring(),
        pgp_key_name: None,
    }
}

pub fn default_pillar() -> PillarOptions {
    PillarOptions {
        top_level_element: None,
        extension: default_extension(),
    }
}

pub fn default_rotation() -> Rotation {
    Rotation { workers: None }
}
