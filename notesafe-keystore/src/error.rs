use thiserror::Error;

pub type KeyStoreResult<T> = Result<T, KeyStoreError>;

#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// Writing or erasing the stored key failed.
    #[error("failed to persist key: {0}")]
    Persist(String),

    /// Reading the storage slot failed.
    #[error("failed to read key storage: {0}")]
    Read(String),

    /// The stored key is unreadable or fails the liveness check.
    /// [`crate::KeyManager::ensure_key`] treats this as "no key".
    #[error("stored key failed validation: {0}")]
    Validation(String),

    #[error(transparent)]
    Crypto(#[from] notesafe_crypto::CryptoError),
}
