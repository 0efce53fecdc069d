//! Self-describing blob format.
//!
//! A stored note content field is exactly one of:
//!
//! - plaintext
//! - `encrypted:<base64(nonce ‖ ciphertext)>` (master-key scheme)
//! - `pw-encrypted:<base64(salt ‖ nonce ‖ ciphertext)>` (password scheme)
//!
//! The prefix alone decides which scheme may open a blob.

use crate::error::{CryptoError, CryptoResult};
use base64::{engine::general_purpose::STANDARD, Engine};

/// Prefix of master-key blobs.
pub const MASTER_KEY_PREFIX: &str = "encrypted:";

/// Prefix of password blobs.
pub const PASSWORD_PREFIX: &str = "pw-encrypted:";

/// Which scheme (if any) a content field belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlobKind {
    Plaintext,
    MasterKey,
    Password,
}

impl BlobKind {
    /// Classifies arbitrary note content. Never fails: anything without
    /// a known prefix is plaintext.
    pub fn classify(content: &str) -> Self {
        if content.starts_with(PASSWORD_PREFIX) {
            BlobKind::Password
        } else if content.starts_with(MASTER_KEY_PREFIX) {
            BlobKind::MasterKey
        } else {
            BlobKind::Plaintext
        }
    }

    /// Strict parse: content must carry a known prefix.
    pub fn parse(content: &str) -> CryptoResult<Self> {
        match Self::classify(content) {
            BlobKind::Plaintext => Err(CryptoError::Format(
                "missing or unrecognized scheme prefix".to_string(),
            )),
            kind => Ok(kind),
        }
    }

    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            BlobKind::Plaintext => None,
            BlobKind::MasterKey => Some(MASTER_KEY_PREFIX),
            BlobKind::Password => Some(PASSWORD_PREFIX),
        }
    }

    pub fn is_encrypted(&self) -> bool {
        !matches!(self, BlobKind::Plaintext)
    }
}

/// Wraps a raw payload as `<prefix><base64>`.
pub(crate) fn encode(kind: BlobKind, payload: &[u8]) -> String {
    let prefix = kind.prefix().unwrap_or_default();
    format!("{prefix}{}", STANDARD.encode(payload))
}

/// Checks `blob` carries exactly `expected`'s prefix and base64-decodes
/// the rest.
///
/// A blob of the other scheme is a format error, never a crypto attempt.
pub(crate) fn decode(expected: BlobKind, blob: &str) -> CryptoResult<Vec<u8>> {
    let actual = BlobKind::parse(blob)?;
    if actual != expected {
        return Err(CryptoError::Format(format!(
            "expected {expected:?} blob, found {actual:?} blob"
        )));
    }
    let prefix = expected.prefix().unwrap_or_default();
    STANDARD
        .decode(&blob[prefix.len()..])
        .map_err(|e| CryptoError::Format(format!("invalid base64 payload: {e}")))
}
