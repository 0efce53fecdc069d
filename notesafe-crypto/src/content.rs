//! Master-key content cipher (`encrypted:` blobs).

use crate::blob::{self, BlobKind};
use crate::cipher::{self, EncryptedData};
use crate::error::{CryptoError, CryptoResult};
use crate::key::MasterKey;

/// Generates a fresh master key.
pub fn generate_key() -> CryptoResult<MasterKey> {
    MasterKey::generate()
}

/// Encrypts bytes into an `encrypted:` blob under `key`.
pub fn encrypt_bytes(plaintext: &[u8], key: &MasterKey) -> CryptoResult<String> {
    let sealed = cipher::encrypt(key.as_bytes(), plaintext)?;
    Ok(blob::encode(BlobKind::MasterKey, &sealed.to_bytes()))
}

/// Opens an `encrypted:` blob under `key`.
///
/// A blob of any other scheme is rejected with [`CryptoError::Format`]
/// before a decryption is attempted. Wrong key, truncation and tampering
/// all yield [`CryptoError::Decryption`].
pub fn decrypt_bytes(blob: &str, key: &MasterKey) -> CryptoResult<Vec<u8>> {
    let payload = blob::decode(BlobKind::MasterKey, blob)?;
    let sealed = EncryptedData::from_bytes(&payload).ok_or(CryptoError::Decryption)?;
    cipher::decrypt(key.as_bytes(), &sealed)
}

/// Encrypts note text into an `encrypted:` blob.
pub fn encrypt(plaintext: &str, key: &MasterKey) -> CryptoResult<String> {
    encrypt_bytes(plaintext.as_bytes(), key)
}

/// Decrypts an `encrypted:` blob back to note text.
pub fn decrypt(blob: &str, key: &MasterKey) -> CryptoResult<String> {
    let bytes = decrypt_bytes(blob, key)?;
    String::from_utf8(bytes).map_err(|_| CryptoError::Decryption)
}

/// Seal-then-open check that a key is usable.
pub fn key_round_trips(key: &MasterKey) -> bool {
    const CHECK: &str = "notesafe-key-check";
    encrypt(CHECK, key)
        .and_then(|blob| decrypt(&blob, key))
        .is_ok_and(|text| text == CHECK)
}
