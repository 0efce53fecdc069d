//! Crypto error types.
//!
//! Messages are deliberately generic: no variant carries key bytes,
//! passwords or plaintext, and the decryption variants never say *why*
//! an open failed.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors produced by the cipher layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The random source or cipher primitive could not produce a key.
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Master-key blob could not be opened: wrong key, truncated payload
    /// or tag mismatch. These cases are intentionally indistinguishable.
    #[error("decryption failed (wrong key or corrupted data)")]
    Decryption,

    /// Password blob could not be opened. Wrong password and corrupted
    /// data are intentionally indistinguishable.
    #[error("incorrect password or corrupted data")]
    WrongPasswordOrCorrupt,

    /// Unrecognized prefix or undecodable payload. Raised before any
    /// cryptographic attempt is made.
    #[error("invalid blob format: {0}")]
    Format(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// A blocking crypto task was aborted before it completed.
    #[error("crypto task failed: {0}")]
    Task(String),
}
