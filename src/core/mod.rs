// src/core/mod.rs
pub mod crypto;
pub mod file;
pub mod leaf;
pub mod node;
pub mod path;
pub mod pki;
pub mod util;
pub mod walk;

pub use crypto::{is_encrypted, Cipher};
pub use file::*;
pub use node::{parse, parse_str, serialize, Node, Scalar};
pub use pki::Pki;
pub use util::*;
pub use walk::{walk, Walked};

pub type Result<T> = std::result::Result<T, crate::error::CoreError>;
