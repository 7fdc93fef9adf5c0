// src/aliases.rs
//! Re-exports secure-gate's secret wrappers
//!
//! Anything that holds decrypted material or key unlock data goes through these.

pub use secure_gate::dynamic_alias;

// Passphrase unlocking the private keyring, read from the environment
dynamic_alias!(KeyPassphrase, String);

// Decrypted scalar value on its way back into the document tree
dynamic_alias!(PlainText, String);
