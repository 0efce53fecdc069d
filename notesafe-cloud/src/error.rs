//! Cloud escrow error types.

use notesafe_crypto::CryptoError;
use thiserror::Error;

/// Result type for record store / API operations.
pub type CloudResult<T> = Result<T, CloudError>;

/// Result type for escrow operations.
pub type EscrowResult<T> = Result<T, EscrowError>;

/// Transport and backend failures talking to the escrow record store.
#[derive(Debug, Error)]
pub enum CloudError {
    #[error("API request failed: {0}")]
    Api(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Escrow-level failures.
///
/// [`EscrowError::WrongPasswordOrNoRecord`] covers a missing record, a
/// wrong password and a corrupted record alike, so callers cannot test
/// for which users have a backup.
#[derive(Debug, Error)]
pub enum EscrowError {
    #[error("incorrect password or no cloud backup")]
    WrongPasswordOrNoRecord,

    #[error("cloud backend error: {0}")]
    Backend(#[from] CloudError),

    /// Wrapping the key failed (never raised for unwrap failures).
    #[error("key wrapping failed: {0}")]
    Crypto(#[from] CryptoError),

    #[error("escrow task failed: {0}")]
    Task(String),
}
