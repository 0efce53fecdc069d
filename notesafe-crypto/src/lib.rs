//! Note content encryption for NoteSafe.
//!
//! Two independent schemes protect note content at rest:
//!
//! 1. **Master-key scheme** (`encrypted:`): note content sealed with
//!    ChaCha20-Poly1305 under a session-wide random 256-bit key. See
//!    [`content`].
//!
//! 2. **Password scheme** (`pw-encrypted:`): a single note sealed under a
//!    key derived from a per-note password with PBKDF2-HMAC-SHA256. Each
//!    blob carries its own salt, so it never depends on the master key.
//!    See [`password`].
//!
//! Blobs are self-describing base64 text; the prefix alone decides which
//! scheme may open them (see [`BlobKind`]). Feeding one scheme's blob to
//! the other is a format error, never a decryption attempt.

pub mod blob;
mod cipher;
pub mod content;
mod error;
mod key;
pub mod password;

pub use blob::{BlobKind, MASTER_KEY_PREFIX, PASSWORD_PREFIX};
pub use cipher::{decrypt, encrypt, EncryptedData, NONCE_SIZE, TAG_SIZE};
pub use error::{CryptoError, CryptoResult};
pub use key::{
    derive_key, DerivedKey, KdfParams, MasterKey, Salt, KEY_SIZE, MIN_PBKDF2_ITERATIONS, SALT_SIZE,
};
