// src/core/pki.rs
//! OpenPGP provider backed by rPGP
//!
//! Loads a public and a private keyring (binary GnuPG export or ASCII
//! armor), resolves the recipient key by name, e-mail or key ID, and
//! implements `Cipher` on top of them. Read-only after construction.

use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::{KeyId, PublicKeyTrait};
use pgp::{Deserializable, Message, SignedPublicKey, SignedSecretKey};
use tracing::{debug, warn};

use crate::aliases::{KeyPassphrase, PlainText};
use crate::config::{Keys, ENV_PASSPHRASE};
use crate::core::crypto::{Cipher, Result};
use crate::core::util::expand_tilde;
use crate::error::CryptoError;

const SYMMETRIC_ALGORITHM: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

pub struct Pki {
    public_keyring: PathBuf,
    recipient: Option<SignedPublicKey>,
    pub_ring: Vec<SignedPublicKey>,
    sec_ring: Vec<SignedSecretKey>,
    passphrase: Option<KeyPassphrase>,
}

impl fmt::Debug for Pki {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pki")
            .field("public_keyring", &self.public_keyring)
            .field("public_keys", &self.pub_ring.len())
            .field("secret_keys", &self.sec_ring.len())
            .field("has_recipient", &self.recipient.is_some())
            .finish()
    }
}

impl Pki {
    /// Load both keyrings named in the config and resolve the recipient.
    ///
    /// The public keyring is mandatory. An unreadable private keyring is
    /// only a warning: encryption still works, decryption will not.
    /// The passphrase, if any, comes from `SECURE_PILLAR_PASSPHRASE`.
    pub fn new(keys: &Keys) -> Result<Self> {
        let public_keyring = expand_tilde(&keys.public_keyring);
        let secret_keyring = expand_tilde(&keys.secret_keyring);

        let pub_bytes = read_keyring(&public_keyring)?;
        let pub_ring = parse_public_keys(&pub_bytes)?;

        let sec_ring = match read_keyring(&secret_keyring)
            .and_then(|bytes| parse_secret_keys(&bytes))
        {
            Ok(ring) => {
                if ring.is_empty() {
                    warn!("{} is empty!", secret_keyring.display());
                }
                ring
            }
            Err(err) => {
                warn!("cannot read private keys: {err}");
                Vec::new()
            }
        };

        let mut pki = Pki {
            public_keyring,
            recipient: None,
            pub_ring,
            sec_ring,
            passphrase: std::env::var(ENV_PASSPHRASE).ok().map(KeyPassphrase::new),
        };

        if let Some(name) = keys.pgp_key_name.as_deref().filter(|n| !n.is_empty()) {
            pki = pki.with_recipient(name)?;
        }
        Ok(pki)
    }

    /// Build from in-memory keyrings (either may be armored or binary)
    pub fn from_keyrings(public: &[u8], secret: &[u8]) -> Result<Self> {
        Ok(Pki {
            public_keyring: PathBuf::from("<memory>"),
            recipient: None,
            pub_ring: parse_public_keys(public)?,
            sec_ring: parse_secret_keys(secret)?,
            passphrase: None,
        })
    }

    /// Select the key new ciphertext is encrypted to
    pub fn with_recipient(mut self, name: &str) -> Result<Self> {
        let key = self
            .pub_ring
            .iter()
            .find(|key| key_matches(key, name))
            .cloned()
            .ok_or_else(|| CryptoError::KeyNotFound {
                name: name.to_string(),
                ring: self.public_keyring.clone(),
            })?;
        debug!("encrypting to key {}", hex::encode_upper(key.key_id()));
        self.recipient = Some(key);
        Ok(self)
    }

    pub fn with_passphrase(mut self, passphrase: KeyPassphrase) -> Self {
        self.passphrase = Some(passphrase);
        self
    }

    pub fn public_key_count(&self) -> usize {
        self.pub_ring.len()
    }

    pub fn secret_key_count(&self) -> usize {
        self.sec_ring.len()
    }

    pub fn has_recipient(&self) -> bool {
        self.recipient.is_some()
    }

    fn open(&self, armored: &str) -> Result<(Message, Vec<KeyId>)> {
        if self.sec_ring.is_empty() {
            return Err(CryptoError::NoSecretKeys);
        }
        let (message, _headers) = Message::from_string(armored.trim())?;
        let keys: Vec<&SignedSecretKey> = self.sec_ring.iter().collect();
        let passphrase = self
            .passphrase
            .as_ref()
            .map(|p| p.expose_secret().clone())
            .unwrap_or_default();
        Ok(message.decrypt(|| passphrase.clone(), &keys)?)
    }
}

impl Cipher for Pki {
    fn encrypt(&self, plaintext: &str) -> Result<String> {
        let recipient = self.recipient.as_ref().ok_or(CryptoError::NoRecipient)?;
        // binary literal: text mode would rewrite line endings to CRLF
        let message = Message::new_literal_bytes("", plaintext.as_bytes());
        let mut rng = rand::thread_rng();

        let encrypted = match recipient
            .public_subkeys
            .iter()
            .find(|sub| sub.is_encryption_key())
        {
            Some(subkey) => {
                message.encrypt_to_keys_seipdv1(&mut rng, SYMMETRIC_ALGORITHM, &[subkey])?
            }
            None => message.encrypt_to_keys_seipdv1(&mut rng, SYMMETRIC_ALGORITHM, &[recipient])?,
        };

        Ok(encrypted.to_armored_string(None.into())?)
    }

    fn decrypt(&self, armored: &str) -> Result<PlainText> {
        let (decrypted, _ids) = self.open(armored)?;
        let content = decrypted.get_content()?.ok_or(CryptoError::EmptyMessage)?;
        Ok(PlainText::new(String::from_utf8(content)?))
    }

    fn recipient_key_ids(&self, armored: &str) -> Result<Vec<u64>> {
        let (_, ids) = self.open(armored)?;
        Ok(ids.iter().filter_map(key_id_u64).collect())
    }

    fn identity_for(&self, key_id: u64) -> Option<String> {
        let secret = self.sec_ring.iter().find(|key| {
            key_id_u64(&key.key_id()) == Some(key_id)
                || key
                    .secret_subkeys
                    .iter()
                    .any(|sub| key_id_u64(&sub.key.key_id()) == Some(key_id))
        });
        if let Some(key) = secret {
            return key.details.users.first().map(|u| u.id.id().to_string());
        }

        self.pub_ring
            .iter()
            .find(|key| {
                key_id_u64(&key.key_id()) == Some(key_id)
                    || key
                        .public_subkeys
                        .iter()
                        .any(|sub| key_id_u64(&sub.key.key_id()) == Some(key_id))
            })
            .and_then(|key| key.details.users.first())
            .map(|u| u.id.id().to_string())
    }
}

fn read_keyring(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|source| CryptoError::Keyring {
        path: path.to_path_buf(),
        source,
    })
}

fn is_armored(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"-----BEGIN PGP")
}

fn parse_public_keys(bytes: &[u8]) -> Result<Vec<SignedPublicKey>> {
    if is_armored(bytes) {
        let (keys, _headers) = SignedPublicKey::from_armor_many(Cursor::new(bytes))?;
        Ok(keys.collect::<std::result::Result<Vec<_>, _>>()?)
    } else {
        Ok(SignedPublicKey::from_bytes_many(Cursor::new(bytes))
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn parse_secret_keys(bytes: &[u8]) -> Result<Vec<SignedSecretKey>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    if is_armored(bytes) {
        let (keys, _headers) = SignedSecretKey::from_armor_many(Cursor::new(bytes))?;
        Ok(keys.collect::<std::result::Result<Vec<_>, _>>()?)
    } else {
        Ok(SignedSecretKey::from_bytes_many(Cursor::new(bytes))
            .collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

fn key_id_u64(id: &KeyId) -> Option<u64> {
    let bytes: [u8; 8] = id.as_ref().try_into().ok()?;
    Some(u64::from_be_bytes(bytes))
}

/// Match on full user ID, its name part, its e-mail, or a hex key ID
/// (long or short form, optional `0x`)
fn key_matches(key: &SignedPublicKey, name: &str) -> bool {
    let wanted = name.trim();
    if wanted.is_empty() {
        return false;
    }

    let hex_id = hex::encode_upper(key.key_id());
    let as_id = wanted.trim_start_matches("0x").to_ascii_uppercase();
    if (as_id.len() == 8 || as_id.len() == 16) && hex_id.ends_with(&as_id) {
        return true;
    }

    key.details
        .users
        .iter()
        .any(|user| user_id_matches(&user.id.id().to_string(), wanted))
}

fn user_id_matches(user_id: &str, wanted: &str) -> bool {
    if user_id == wanted {
        return true;
    }
    match (user_id.find('<'), user_id.rfind('>')) {
        (Some(open), Some(close)) if open < close => {
            let display_name = user_id[..open].trim();
            let email = &user_id[open + 1..close];
            display_name == wanted || email.eq_ignore_ascii_case(wanted)
        }
        _ => false,
    }
}
