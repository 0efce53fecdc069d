//! Master-key encryption controller for NoteSafe.
//!
//! [`EncryptionController`] is the single entry point the rest of the app
//! uses for note encryption:
//! - Enable/disable state machine ([`EncryptionState`]) with cloud backup
//!   status
//! - Key acquisition through [`KeyManager`](notesafe_keystore::KeyManager)
//!   and [`CloudKeyEscrow`](notesafe_cloud::CloudKeyEscrow)
//! - Bulk note migration through a [`NoteStore`], reported as a
//!   [`MigrationReport`]
//! - Read/write content paths, including placeholder rendering
//!
//! Per-note password protection (`pw-encrypted:`) lives in
//! [`notesafe_crypto::password`] and never goes through the controller.

mod collaborators;
mod config;
mod controller;
mod error;
mod migration;
mod state;

pub use collaborators::{Note, NoteStore, PasswordPrompt, PromptContext, PromptResponse};
pub use config::EncryptionConfig;
pub use controller::{DisplayContent, EncryptionController, ForgetOutcome};
pub use error::{ControllerError, ControllerResult, NoteStoreError};
pub use migration::{MigrationReport, NoteFailure};
pub use state::{BackupStatus, EncryptionState};
