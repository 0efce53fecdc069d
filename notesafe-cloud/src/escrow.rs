//! Password-protected cloud backup of the master key.
//!
//! The raw master key is wrapped with the password cipher's raw payload
//! construction (fresh PBKDF2 salt + ChaCha20-Poly1305) and stored as the
//! user's single [`CloudKeyRecord`]. Key derivation runs on the blocking
//! pool.

use crate::error::{EscrowError, EscrowResult};
use crate::store::EscrowStore;
use crate::types::CloudKeyRecord;
use base64::{engine::general_purpose::STANDARD, Engine};
use notesafe_crypto::{password, MasterKey};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Backs up and restores the master key through an [`EscrowStore`].
#[derive(Clone)]
pub struct CloudKeyEscrow {
    store: Arc<dyn EscrowStore>,
}

impl CloudKeyEscrow {
    pub fn new(store: Arc<dyn EscrowStore>) -> Self {
        Self { store }
    }

    /// Wraps `key` under `password` and overwrites the user's record.
    pub async fn save(&self, user_id: &str, key: &MasterKey, password: &str) -> EscrowResult<()> {
        let record = wrap_key(key, password).await?;
        self.store.put(user_id, &record).await?;
        info!("saved cloud key backup for user {user_id}");
        Ok(())
    }

    /// Restores the master key from the user's record.
    ///
    /// Missing record, wrong password and a corrupted record all return
    /// [`EscrowError::WrongPasswordOrNoRecord`].
    pub async fn load(&self, user_id: &str, password: &str) -> EscrowResult<MasterKey> {
        let Some(record) = self.store.fetch(user_id).await? else {
            debug!("no cloud key backup for user {user_id}");
            return Err(EscrowError::WrongPasswordOrNoRecord);
        };
        unwrap_key(&record, password).await
    }

    /// Whether the user has a record. No password involved.
    pub async fn exists(&self, user_id: &str) -> EscrowResult<bool> {
        Ok(self.store.exists(user_id).await?)
    }

    /// Re-wraps `key` under `new_password`.
    ///
    /// `old_password` must open the current record first. Nothing is
    /// written unless that succeeds and the new record is fully built, so
    /// a failed rotation leaves the previous record untouched.
    pub async fn rotate_password(
        &self,
        user_id: &str,
        key: &MasterKey,
        old_password: &str,
        new_password: &str,
    ) -> EscrowResult<()> {
        let escrowed = self.load(user_id, old_password).await?;
        if escrowed.as_bytes() != key.as_bytes() {
            warn!("rotating cloud backup for user {user_id} onto a different master key");
        }

        let record = wrap_key(key, new_password).await?;
        self.store.put(user_id, &record).await?;
        info!("rotated cloud backup password for user {user_id}");
        Ok(())
    }

    /// Deletes the user's record.
    pub async fn remove(&self, user_id: &str) -> EscrowResult<()> {
        self.store.delete(user_id).await?;
        info!("removed cloud key backup for user {user_id}");
        Ok(())
    }
}

async fn wrap_key(key: &MasterKey, password: &str) -> EscrowResult<CloudKeyRecord> {
    let key = key.clone();
    let pw = password.to_string();
    let payload = tokio::task::spawn_blocking(move || password::seal(key.as_bytes(), &pw))
        .await
        .map_err(|e| EscrowError::Task(e.to_string()))??;
    Ok(CloudKeyRecord::new(STANDARD.encode(payload)))
}

async fn unwrap_key(record: &CloudKeyRecord, password: &str) -> EscrowResult<MasterKey> {
    let payload = STANDARD
        .decode(record.payload())
        .map_err(|_| EscrowError::WrongPasswordOrNoRecord)?;
    let pw = password.to_string();

    let raw = tokio::task::spawn_blocking(move || password::open(&payload, &pw))
        .await
        .map_err(|e| EscrowError::Task(e.to_string()))?
        .map_err(|_| EscrowError::WrongPasswordOrNoRecord)?;

    MasterKey::from_slice(&raw).map_err(|_| EscrowError::WrongPasswordOrNoRecord)
}
