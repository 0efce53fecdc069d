//! Controller error types.

use crate::migration::MigrationReport;
use notesafe_cloud::EscrowError;
use notesafe_crypto::CryptoError;
use notesafe_keystore::KeyStoreError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Failure reported by a [`NoteStore`](crate::NoteStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct NoteStoreError(pub String);

impl NoteStoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors surfaced by [`EncryptionController`](crate::EncryptionController).
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("encryption is not enabled")]
    NotEnabled,

    #[error("password entry cancelled")]
    Cancelled,

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("key storage error: {0}")]
    KeyStore(#[from] KeyStoreError),

    #[error("cloud backup error: {0}")]
    Escrow(#[from] EscrowError),

    #[error("note store error: {0}")]
    NoteStore(#[from] NoteStoreError),

    #[error("{} of {} notes could not be converted", .0.failures.len(), .0.examined)]
    MigrationPartialFailure(MigrationReport),

    #[error("background task failed: {0}")]
    Task(String),
}

impl ControllerError {
    /// A fixed sentence safe to show the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotEnabled => "Encryption is turned off.".to_string(),
            Self::Cancelled => "Encryption was not turned on.".to_string(),
            Self::Crypto(CryptoError::Decryption) => {
                "This note could not be decrypted.".to_string()
            }
            Self::Crypto(CryptoError::WrongPasswordOrCorrupt) => "Incorrect password.".to_string(),
            Self::Crypto(CryptoError::Format(_)) => {
                "This note is in an unrecognized format.".to_string()
            }
            Self::Crypto(CryptoError::KeyGeneration(_)) | Self::KeyStore(KeyStoreError::Crypto(_)) => {
                "An encryption key could not be created.".to_string()
            }
            Self::Crypto(_) => "An encryption error occurred.".to_string(),
            Self::KeyStore(_) => {
                "The encryption key could not be saved on this device.".to_string()
            }
            Self::Escrow(EscrowError::WrongPasswordOrNoRecord) => {
                "Incorrect password, or no cloud backup was found.".to_string()
            }
            Self::Escrow(_) => "The cloud backup service is unavailable.".to_string(),
            Self::NoteStore(_) => "Your notes could not be loaded or saved.".to_string(),
            Self::MigrationPartialFailure(report) => match report.failures.len() {
                1 => "1 note could not be converted.".to_string(),
                n => format!("{n} notes could not be converted."),
            },
            Self::Task(_) => "Something went wrong. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::NoteFailure;

    #[test]
    fn partial_failure_display_counts_notes() {
        let report = MigrationReport {
            examined: 5,
            converted: 3,
            skipped: 0,
            failures: vec![
                NoteFailure::new("a", "boom"),
                NoteFailure::new("b", "boom"),
            ],
        };
        let err = ControllerError::MigrationPartialFailure(report);
        assert_eq!(err.to_string(), "2 of 5 notes could not be converted");
        assert_eq!(err.user_message(), "2 notes could not be converted.");
    }

    #[test]
    fn user_messages_do_not_leak_details() {
        let err = ControllerError::Crypto(CryptoError::Format("bad base64 near 'secret'".into()));
        assert!(!err.user_message().contains("secret"));

        let err = ControllerError::NoteStore(NoteStoreError::new("db path /home/x"));
        assert!(!err.user_message().contains("/home"));
    }

    #[test]
    fn escrow_failure_is_generic() {
        let err = ControllerError::Escrow(EscrowError::WrongPasswordOrNoRecord);
        assert_eq!(
            err.user_message(),
            "Incorrect password, or no cloud backup was found."
        );
    }
}
