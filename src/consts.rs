// src/consts.rs
//! Shared constants: document markers and defaults

/// Armor header that marks a scalar as PGP ciphertext
pub const PGP_HEADER: &str = "-----BEGIN PGP MESSAGE-----";

/// Renderer line written at the top of every encrypted document
pub const SLS_HEADER: &str = "#!yaml|gpg\n\n";

/// File name marker used when discovering documents in a directory
pub const SLS_EXTENSION: &str = ".sls";

/// Lines containing this are rejected before parsing
pub const INCLUDE_DIRECTIVE: &str = "include:";

/// Separator for path addressing ("secure_vars:db:password")
pub const PATH_SEPARATOR: char = ':';

/// Default GnuPG keyring locations
pub const DEFAULT_PUB_RING: &str = "~/.gnupg/pubring.gpg";
pub const DEFAULT_SEC_RING: &str = "~/.gnupg/secring.gpg";

/// Config file looked up in the working directory unless overridden
pub const DEFAULT_CONFIG_FILE: &str = "secure-pillar.toml";

/// Mode for newly written documents
pub const NEW_FILE_MODE: u32 = 0o644;
