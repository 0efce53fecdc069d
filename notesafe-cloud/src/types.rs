//! Shared types for cloud escrow.

use chrono::{DateTime, Utc};
use notesafe_crypto::PASSWORD_PREFIX;
use serde::{Deserialize, Serialize};

/// The single escrow record kept per user.
///
/// `encrypted_key` is `base64(salt ‖ nonce ‖ ciphertext)` where the
/// ciphertext wraps the raw 32-byte master key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudKeyRecord {
    pub encrypted_key: String,
    pub updated_at: DateTime<Utc>,
}

impl CloudKeyRecord {
    pub fn new(encrypted_key: String) -> Self {
        Self {
            encrypted_key,
            updated_at: Utc::now(),
        }
    }

    /// The base64 payload with any `pw-encrypted:` prefix removed.
    pub fn payload(&self) -> &str {
        self.encrypted_key
            .strip_prefix(PASSWORD_PREFIX)
            .unwrap_or(&self.encrypted_key)
    }
}

/// Session tokens for the NoteSafe API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_strips_optional_prefix() {
        let plain = CloudKeyRecord::new("QUJD".to_string());
        let prefixed = CloudKeyRecord::new("pw-encrypted:QUJD".to_string());
        assert_eq!(plain.payload(), "QUJD");
        assert_eq!(prefixed.payload(), "QUJD");
    }
}
