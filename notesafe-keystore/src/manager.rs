//! Lifecycle of the locally persisted master key.

use crate::error::{KeyStoreError, KeyStoreResult};
use crate::storage::SecureStorage;
use notesafe_crypto::{content, MasterKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fixed storage slot holding the base64 raw master key.
pub const MASTER_KEY_SLOT: &str = "notesafe.master_key";

/// Creates, validates, persists and clears the local master key.
///
/// Stateless over its [`SecureStorage`]: the in-memory copy of the key
/// belongs to whoever called [`KeyManager::ensure_key`].
#[derive(Clone)]
pub struct KeyManager {
    storage: Arc<dyn SecureStorage>,
}

impl KeyManager {
    pub fn new(storage: Arc<dyn SecureStorage>) -> Self {
        Self { storage }
    }

    /// Returns the persisted key if one exists and passes the liveness
    /// check. Unreadable or corrupt keys are logged and reported as absent.
    pub fn ensure_key(&self) -> Option<MasterKey> {
        match self.load_validated() {
            Ok(key) => key,
            Err(e) => {
                warn!("ignoring stored master key: {e}");
                None
            }
        }
    }

    /// Strict variant of [`ensure_key`](Self::ensure_key): surfaces
    /// [`KeyStoreError::Validation`] instead of swallowing it.
    pub fn load_validated(&self) -> KeyStoreResult<Option<MasterKey>> {
        let Some(encoded) = self.storage.get(MASTER_KEY_SLOT)? else {
            debug!("no stored master key");
            return Ok(None);
        };

        let key = MasterKey::from_base64(&encoded)
            .map_err(|e| KeyStoreError::Validation(e.to_string()))?;

        if !content::key_round_trips(&key) {
            return Err(KeyStoreError::Validation(
                "key failed encrypt/decrypt check".to_string(),
            ));
        }
        Ok(Some(key))
    }

    /// Writes the key to the fixed slot, replacing any previous key.
    pub fn persist(&self, key: &MasterKey) -> KeyStoreResult<()> {
        self.storage
            .set(MASTER_KEY_SLOT, &key.to_base64())
            .map_err(|e| match e {
                KeyStoreError::Persist(_) => e,
                other => KeyStoreError::Persist(other.to_string()),
            })?;
        debug!("persisted master key");
        Ok(())
    }

    /// Generates a fresh key and persists it.
    pub fn generate_and_persist(&self) -> KeyStoreResult<MasterKey> {
        let key = content::generate_key()?;
        self.persist(&key)?;
        info!("generated new master key");
        Ok(key)
    }

    /// Erases the stored key. Blobs sealed under it become unreadable
    /// unless the key is escrowed elsewhere.
    pub fn clear(&self) -> KeyStoreResult<()> {
        self.storage.remove(MASTER_KEY_SLOT)?;
        info!("cleared stored master key");
        Ok(())
    }

    /// Whether anything is stored in the key slot (valid or not).
    pub fn has_stored_key(&self) -> bool {
        matches!(self.storage.get(MASTER_KEY_SLOT), Ok(Some(_)))
    }
}
