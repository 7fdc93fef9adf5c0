// src/config/mod.rs
//! Configuration system for secure-pillar
//!
//! Explicit config object with TOML + env overrides. Nothing global:
//! callers load it once and hand it to `Pki::new` and `Pillar`.

pub use app::{load, Config, Keys, PillarOptions, Rotation};
pub use defaults::{
    ENV_CONFIG, ENV_ELEMENT, ENV_PASSPHRASE, ENV_PGP_KEY, ENV_PUBRING, ENV_SECRING,
};

mod app;
mod defaults;
