//! Local master key persistence for NoteSafe.
//!
//! The master key lives in one fixed slot of a [`SecureStorage`] backend
//! as base64 raw bytes. [`KeyManager`] validates it on load with an
//! encrypt/decrypt check; anything unreadable is treated as "no key" so a
//! corrupted slot never blocks the user from re-enabling encryption.

mod error;
mod manager;
mod storage;

pub use error::{KeyStoreError, KeyStoreResult};
pub use manager::{KeyManager, MASTER_KEY_SLOT};
pub use storage::{FileSecureStorage, MemorySecureStorage, SecureStorage};
