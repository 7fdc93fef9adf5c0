// src/enums.rs
//! Public enum types used throughout the crate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do with every reachable scalar of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Encrypt,
    Decrypt,
    /// Read-only: report which key each ciphertext was encrypted to
    Identify,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Encrypt => "encrypt",
            Action::Decrypt => "decrypt",
            Action::Identify => "identify",
        }
    }

    /// Identify output is a report, not a document
    pub fn writes_header(&self) -> bool {
        !matches!(self, Action::Identify)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encrypt" => Ok(Action::Encrypt),
            "decrypt" => Ok(Action::Decrypt),
            "identify" | "validate" | "keys" => Ok(Action::Identify),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// How the tree walker reacts to a failing leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkPolicy {
    /// Keep the original value, record the failure, continue with siblings
    #[default]
    BestEffort,
    /// Abort the whole walk on the first failure
    StopOnError,
}
