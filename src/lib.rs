// src/lib.rs
//! secure-pillar: PGP-encrypted values inside Salt pillar files
//!
//! Features:
//! - Encrypt, decrypt and identify every string value in a YAML document
//! - Optional scope: only one top-level key is ever touched
//! - Directory sweeps, warn-and-continue on per-file errors
//! - Concurrent key rotation, each file written once and atomically
//! - Pure-Rust OpenPGP (rPGP) against GnuPG keyrings

pub mod aliases;
pub mod config;
pub mod consts;
pub mod core;
pub mod enums;
pub mod pillar;
pub mod rotate_keys;
pub mod sweep;

pub mod error;

// Re-export everything users need at the crate root
pub use aliases::{KeyPassphrase, PlainText};
pub use config::{load as load_config, Config};
pub use crate::core::{Cipher, Destination, Node, Pki, Result as CoreResult, Scalar};
pub use enums::{Action, WalkPolicy};
pub use error::{CoreError, CryptoError};
pub use pillar::{Pillar, Secret};
pub use rotate_keys::{rotate_file, RotationReport, Rotator};
pub use sweep::{sweep_dir, SweepReport};
