// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;
use std::string::FromUtf8Error;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO error on {}: {source}", .path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("contains include directives (line {line})")]
    IncludeDirective { line: usize },

    #[error("Crypto operation failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{} has no sls files", .0.display())]
    EmptyDirectory(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("{} is not a regular file", .0.display())]
    NotAFile(PathBuf),

    #[error("unable to find path: '{0}'")]
    PathNotFound(String),

    #[error("at '{path}': {source}")]
    AtPath {
        path: String,
        #[source]
        source: Box<CoreError>,
    },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("rotation worker for {} panicked", .0.display())]
    WorkerPanicked(PathBuf),
}

impl CoreError {
    /// Strip positional context and return the underlying failure
    pub fn root_cause(&self) -> &CoreError {
        match self {
            CoreError::AtPath { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failures of the OpenPGP provider; recoverable, surfaced per value
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("PGP error: {0}")]
    Pgp(#[from] pgp::errors::Error),

    #[error("cannot read keyring {}: {source}", .path.display())]
    Keyring {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to find key '{name}' in {}", .ring.display())]
    KeyNotFound { name: String, ring: PathBuf },

    #[error("no recipient key configured for encryption")]
    NoRecipient,

    #[error("no private keys loaded")]
    NoSecretKeys,

    #[error("unable to find key for ids used")]
    UnknownRecipient,

    #[error("decrypted message has no literal content")]
    EmptyMessage,

    #[error("decrypted value is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}
