// src/core/leaf.rs
//! Leaf transformer: one scalar, one action
//!
//! Never looks at document structure. Encryption is idempotent: a value
//! that already carries the PGP header is returned as-is.

use crate::core::crypto::{is_encrypted, Cipher};
use crate::enums::Action;
use crate::error::CryptoError;

pub type Result<T> = std::result::Result<T, CryptoError>;

pub fn transform<C: Cipher + ?Sized>(cipher: &C, value: &str, action: Action) -> Result<String> {
    match action {
        Action::Encrypt => encrypt_value(cipher, value),
        Action::Decrypt => decrypt_value(cipher, value),
        Action::Identify => key_info(cipher, value),
    }
}

pub fn encrypt_value<C: Cipher + ?Sized>(cipher: &C, value: &str) -> Result<String> {
    if is_encrypted(value) {
        return Ok(value.to_string());
    }
    cipher.encrypt(value)
}

/// Plaintext leaves the zeroizing `PlainText` here: the returned `String`
/// becomes part of the tree and is not wiped on drop.
pub fn decrypt_value<C: Cipher + ?Sized>(cipher: &C, value: &str) -> Result<String> {
    if !is_encrypted(value) {
        return Ok(value.to_string());
    }
    let plaintext = cipher.decrypt(value)?;
    Ok(plaintext.expose_secret().clone())
}

/// `"<KEYID>: <identity>"` for ciphertext, empty for anything else.
/// The first recipient key with a known identity wins.
pub fn key_info<C: Cipher + ?Sized>(cipher: &C, value: &str) -> Result<String> {
    if !is_encrypted(value) {
        return Ok(String::new());
    }
    cipher
        .recipient_key_ids(value)?
        .into_iter()
        .find_map(|id| {
            cipher
                .identity_for(id)
                .map(|identity| format!("{id:016X}: {identity}"))
        })
        .ok_or(CryptoError::UnknownRecipient)
}
