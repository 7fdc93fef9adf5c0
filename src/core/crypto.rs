// src/core/crypto.rs
//! Cryptographic provider seam (no I/O, no document structure)
//!
//! The engine only ever talks to a `Cipher`. `Pki` is the OpenPGP
//! implementation; tests plug in their own.

use crate::aliases::PlainText;
use crate::consts::PGP_HEADER;
use crate::error::CryptoError;

pub type Result<T> = std::result::Result<T, CryptoError>;

/// Per-value encrypt / decrypt / recipient lookup.
///
/// Implementations are read-only after construction; rotation shares one
/// instance across worker threads, hence the `Sync` bound there.
pub trait Cipher {
    /// Encrypt to the configured recipient, returning armored text
    fn encrypt(&self, plaintext: &str) -> Result<String>;

    /// Decrypt armored ciphertext with the loaded private keys
    fn decrypt(&self, armored: &str) -> Result<PlainText>;

    /// Key IDs the armored message was encrypted to
    fn recipient_key_ids(&self, armored: &str) -> Result<Vec<u64>>;

    /// Human-readable identity (user ID) owning `key_id`, if known
    fn identity_for(&self, key_id: u64) -> Option<String>;
}

impl<C: Cipher + ?Sized> Cipher for &C {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        (**self).encrypt(plaintext)
    }

    fn decrypt(&self, armored: &str) -> Result<PlainText> {
        (**self).decrypt(armored)
    }

    fn recipient_key_ids(&self, armored: &str) -> Result<Vec<u64>> {
        (**self).recipient_key_ids(armored)
    }

    fn identity_for(&self, key_id: u64) -> Option<String> {
        (**self).identity_for(key_id)
    }
}

/// Is this scalar PGP ciphertext?
pub fn is_encrypted(value: &str) -> bool {
    value.trim_start().starts_with(PGP_HEADER)
}
