//! Interfaces the controller consumes from the rest of the application.

use crate::error::NoteStoreError;
use async_trait::async_trait;

/// A note as seen by the encryption layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    /// Stored content: plaintext or an `encrypted:` / `pw-encrypted:` blob.
    pub content: String,
}

impl Note {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Persistent note storage.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn list_notes_for_user(&self, user_id: &str) -> Result<Vec<Note>, NoteStoreError>;

    async fn update_note_content(&self, note_id: &str, content: &str)
        -> Result<(), NoteStoreError>;
}

/// What the password prompt is being shown for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptContext {
    pub user_id: String,
    /// 1-based attempt number.
    pub attempt: u32,
    pub max_attempts: u32,
    /// The previous password did not open the backup.
    pub previous_attempt_failed: bool,
}

/// Answer from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptResponse {
    Password(String),
    Cancelled,
}

/// Asks the user for their cloud backup password.
#[async_trait]
pub trait PasswordPrompt: Send + Sync {
    async fn request_password(&self, context: PromptContext) -> PromptResponse;
}
