//! Controller configuration.

use serde::{Deserialize, Serialize};

/// Tunables for [`EncryptionController`](crate::EncryptionController).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Notes converted concurrently during a migration pass.
    pub migration_concurrency: usize,

    /// Password prompts shown before an escrow restore gives up.
    pub max_password_attempts: u32,

    /// Shown in place of note content that cannot be decrypted.
    pub undecryptable_placeholder: String,

    /// Run the plaintext → encrypted pass right after enabling.
    pub encrypt_existing_on_enable: bool,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            migration_concurrency: 4,
            max_password_attempts: 3,
            undecryptable_placeholder: "[Unable to decrypt this note]".to_string(),
            encrypt_existing_on_enable: false,
        }
    }
}

impl EncryptionConfig {
    /// Effective concurrency, never below one.
    pub fn concurrency(&self) -> usize {
        self.migration_concurrency.max(1)
    }

    /// Effective attempt limit, never below one.
    pub fn password_attempts(&self) -> u32 {
        self.max_password_attempts.max(1)
    }
}
