//! Password cipher tests.
//!
//! Each derivation runs the full PBKDF2 iteration count, so these stay
//! few and targeted.

use base64::{engine::general_purpose::STANDARD, Engine};
use notesafe_crypto::password::{decrypt_with_password, encrypt_with_password, open, seal};
use notesafe_crypto::{content, CryptoError, PASSWORD_PREFIX, SALT_SIZE};

#[test]
fn round_trip() {
    let blob = encrypt_with_password("Private journal", "correct-horse").unwrap();
    assert!(blob.starts_with(PASSWORD_PREFIX));
    assert_eq!(
        decrypt_with_password(&blob, "correct-horse").unwrap(),
        "Private journal"
    );
}

#[test]
fn wrong_password_fails_closed() {
    let blob = encrypt_with_password("Private journal", "correct-horse").unwrap();
    assert_eq!(
        decrypt_with_password(&blob, "battery-staple").unwrap_err(),
        CryptoError::WrongPasswordOrCorrupt
    );
}

#[test]
fn corruption_is_indistinguishable_from_wrong_password() {
    let blob = encrypt_with_password("Private journal", "pw").unwrap();
    let mut payload = STANDARD.decode(&blob[PASSWORD_PREFIX.len()..]).unwrap();
    let last = payload.len() - 1;
    payload[last] ^= 0x80;
    let tampered = format!("{PASSWORD_PREFIX}{}", STANDARD.encode(&payload));

    let corrupt_err = decrypt_with_password(&tampered, "pw").unwrap_err();
    let wrong_err = decrypt_with_password(&blob, "not-pw").unwrap_err();
    assert_eq!(corrupt_err, wrong_err);
    assert_eq!(corrupt_err.to_string(), wrong_err.to_string());
}

#[test]
fn fresh_salt_and_nonce_per_call() {
    let a = encrypt_with_password("same", "pw").unwrap();
    let b = encrypt_with_password("same", "pw").unwrap();
    assert_ne!(a, b);

    let pa = STANDARD.decode(&a[PASSWORD_PREFIX.len()..]).unwrap();
    let pb = STANDARD.decode(&b[PASSWORD_PREFIX.len()..]).unwrap();
    assert_ne!(pa[..SALT_SIZE], pb[..SALT_SIZE]);
}

#[test]
fn master_key_blob_rejected_before_derivation() {
    let key = content::generate_key().unwrap();
    let blob = content::encrypt("x", &key).unwrap();
    assert!(matches!(
        decrypt_with_password(&blob, "pw"),
        Err(CryptoError::Format(_))
    ));
}

#[test]
fn unknown_prefix_is_format_error() {
    assert!(matches!(
        decrypt_with_password("aes:AAAA", "pw"),
        Err(CryptoError::Format(_))
    ));
}

#[test]
fn raw_seal_open_round_trip() {
    let raw_key = [0x42u8; 32];
    let payload = seal(&raw_key, "escrow-pw").unwrap();
    assert_eq!(open(&payload, "escrow-pw").unwrap(), raw_key.to_vec());
}

#[test]
fn password_blob_is_independent_of_master_key() {
    let blob = encrypt_with_password("standalone", "pw").unwrap();
    // No master key exists or is consulted; rotating one changes nothing.
    let _rotated = content::generate_key().unwrap();
    assert_eq!(decrypt_with_password(&blob, "pw").unwrap(), "standalone");
}
