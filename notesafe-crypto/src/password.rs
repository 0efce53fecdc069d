//! Password cipher (`pw-encrypted:` blobs).
//!
//! Each call draws a fresh salt and nonce and derives its own key with
//! PBKDF2-HMAC-SHA256, so password blobs share nothing with each other
//! or with the master key. Payload layout is `salt ‖ nonce ‖ ciphertext`.
//!
//! The raw-payload functions [`seal`] and [`open`] are also what cloud
//! escrow uses to wrap the master key.

use crate::blob::{self, BlobKind};
use crate::cipher::{self, EncryptedData};
use crate::error::{CryptoError, CryptoResult};
use crate::key::{self, DerivedKey, KdfParams, Salt, SALT_SIZE};

/// Derives a key from `password`, generating a fresh salt when none is
/// given. Returns the salt actually used.
pub fn derive_key(password: &str, salt: Option<Salt>) -> (DerivedKey, Salt) {
    let salt = salt.unwrap_or_else(Salt::random);
    let derived = key::derive_key(password, &salt, &KdfParams::default());
    (derived, salt)
}

/// Seals `plaintext` under a key derived from `password`.
/// Returns the raw `salt ‖ nonce ‖ ciphertext` payload.
pub fn seal(plaintext: &[u8], password: &str) -> CryptoResult<Vec<u8>> {
    let (derived, salt) = derive_key(password, None);
    let sealed = cipher::encrypt(derived.as_bytes(), plaintext)?;

    let mut payload = Vec::with_capacity(SALT_SIZE + sealed.len());
    payload.extend_from_slice(salt.as_bytes());
    payload.extend_from_slice(&sealed.to_bytes());
    Ok(payload)
}

/// Opens a raw `salt ‖ nonce ‖ ciphertext` payload.
///
/// Truncation, tampering and a wrong password are all
/// [`CryptoError::WrongPasswordOrCorrupt`].
pub fn open(payload: &[u8], password: &str) -> CryptoResult<Vec<u8>> {
    if payload.len() < SALT_SIZE {
        return Err(CryptoError::WrongPasswordOrCorrupt);
    }
    let (salt_bytes, rest) = payload.split_at(SALT_SIZE);
    let salt_bytes: [u8; SALT_SIZE] = salt_bytes
        .try_into()
        .map_err(|_| CryptoError::WrongPasswordOrCorrupt)?;
    let sealed = EncryptedData::from_bytes(rest).ok_or(CryptoError::WrongPasswordOrCorrupt)?;

    let (derived, _) = derive_key(password, Some(Salt::from_bytes(salt_bytes)));
    cipher::decrypt(derived.as_bytes(), &sealed).map_err(|_| CryptoError::WrongPasswordOrCorrupt)
}

/// Encrypts note text into a `pw-encrypted:` blob.
pub fn encrypt_with_password(plaintext: &str, password: &str) -> CryptoResult<String> {
    let payload = seal(plaintext.as_bytes(), password)?;
    Ok(blob::encode(BlobKind::Password, &payload))
}

/// Decrypts a `pw-encrypted:` blob.
///
/// An `encrypted:` blob or plaintext is a [`CryptoError::Format`] error,
/// raised before any key derivation.
pub fn decrypt_with_password(blob: &str, password: &str) -> CryptoResult<String> {
    let payload = blob::decode(BlobKind::Password, blob)?;
    let bytes = open(&payload, password)?;
    String::from_utf8(bytes).map_err(|_| CryptoError::WrongPasswordOrCorrupt)
}

/// [`encrypt_with_password`] on the blocking pool.
///
/// The KDF is deliberately slow; async callers should use this instead
/// of stalling their executor.
pub async fn encrypt_with_password_async(
    plaintext: String,
    password: String,
) -> CryptoResult<String> {
    tokio::task::spawn_blocking(move || encrypt_with_password(&plaintext, &password))
        .await
        .map_err(|e| CryptoError::Task(e.to_string()))?
}

/// [`decrypt_with_password`] on the blocking pool.
pub async fn decrypt_with_password_async(blob: String, password: String) -> CryptoResult<String> {
    tokio::task::spawn_blocking(move || decrypt_with_password(&blob, &password))
        .await
        .map_err(|e| CryptoError::Task(e.to_string()))?
}
