// tests/core/leaf.rs
use secure_pillar::core::is_encrypted;
use secure_pillar::core::leaf::transform;
use secure_pillar::error::CryptoError;
use secure_pillar::Action;

use crate::support::{FakeCipher, FAKE_KEY_ID};

#[test]
fn test_encrypt_produces_armored_text() {
    let cipher = FakeCipher::new();
    let out = transform(&cipher, "plaintext123", Action::Encrypt).unwrap();
    assert!(is_encrypted(&out));
    assert!(out.trim_end().ends_with("-----END PGP MESSAGE-----"));
}

#[test]
fn test_encrypt_is_idempotent() {
    let cipher = FakeCipher::new();
    let once = transform(&cipher, "plaintext123", Action::Encrypt).unwrap();
    let calls = cipher.calls();
    let twice = transform(&cipher, &once, Action::Encrypt).unwrap();

    assert_eq!(once, twice);
    assert_eq!(cipher.calls(), calls, "already-encrypted value must not reach the cipher");
}

#[test]
fn test_decrypt_reverses_encrypt() {
    let cipher = FakeCipher::new();
    let armored = transform(&cipher, "multi\nline\nsecret", Action::Encrypt).unwrap();
    assert_eq!(
        transform(&cipher, &armored, Action::Decrypt).unwrap(),
        "multi\nline\nsecret"
    );
}

#[test]
fn test_decrypt_passes_plaintext_through() {
    let cipher = FakeCipher::new();
    assert_eq!(
        transform(&cipher, "not encrypted", Action::Decrypt).unwrap(),
        "not encrypted"
    );
    assert_eq!(cipher.calls(), 0);
}

#[test]
fn test_decrypt_failure_is_returned_not_swallowed() {
    let cipher = FakeCipher::new();
    let broken = "-----BEGIN PGP MESSAGE-----\n0123456789ABCDEF\nnot-hex\n-----END PGP MESSAGE-----\n";
    assert!(matches!(
        transform(&cipher, broken, Action::Decrypt),
        Err(CryptoError::EmptyMessage)
    ));
}

#[test]
fn test_identify_plaintext_is_empty() {
    let cipher = FakeCipher::new();
    assert_eq!(transform(&cipher, "plain", Action::Identify).unwrap(), "");
}

#[test]
fn test_identify_reports_key_id_and_identity() {
    let cipher = FakeCipher::new();
    let armored = FakeCipher::armor(FAKE_KEY_ID, "x");
    assert_eq!(
        transform(&cipher, &armored, Action::Identify).unwrap(),
        "0123456789ABCDEF: Salt Master <salt-master@example.com>"
    );
}

#[test]
fn test_identify_unknown_key_is_an_error() {
    let cipher = FakeCipher::new();
    let armored = FakeCipher::armor(0xDEAD_BEEF, "x");
    assert!(matches!(
        transform(&cipher, &armored, Action::Identify),
        Err(CryptoError::UnknownRecipient)
    ));
}

#[test]
fn test_ciphertext_detection_tolerates_leading_whitespace() {
    assert!(is_encrypted("\n  -----BEGIN PGP MESSAGE-----\n..."));
    assert!(!is_encrypted("prefix -----BEGIN PGP MESSAGE-----"));
    assert!(!is_encrypted(""));
}
