//! Remote escrow record storage.

use crate::error::CloudResult;
use crate::types::CloudKeyRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Backend holding at most one [`CloudKeyRecord`] per user.
///
/// `put` replaces the user's record in a single step; implementations
/// must never leave a partially written record behind.
#[async_trait]
pub trait EscrowStore: Send + Sync {
    /// Fetches the user's record, `None` if there is none.
    async fn fetch(&self, user_id: &str) -> CloudResult<Option<CloudKeyRecord>>;

    /// Stores the user's record, overwriting any previous one.
    async fn put(&self, user_id: &str, record: &CloudKeyRecord) -> CloudResult<()>;

    /// Cheap presence check.
    async fn exists(&self, user_id: &str) -> CloudResult<bool> {
        Ok(self.fetch(user_id).await?.is_some())
    }

    /// Deletes the user's record. Deleting a missing record is not an error.
    async fn delete(&self, user_id: &str) -> CloudResult<()>;
}

/// In-process record store for tests and offline use.
#[derive(Clone, Default)]
pub struct MemoryEscrowStore {
    records: Arc<RwLock<HashMap<String, CloudKeyRecord>>>,
}

impl MemoryEscrowStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl EscrowStore for MemoryEscrowStore {
    async fn fetch(&self, user_id: &str) -> CloudResult<Option<CloudKeyRecord>> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn put(&self, user_id: &str, record: &CloudKeyRecord) -> CloudResult<()> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), record.clone());
        Ok(())
    }

    async fn exists(&self, user_id: &str) -> CloudResult<bool> {
        Ok(self.records.read().await.contains_key(user_id))
    }

    async fn delete(&self, user_id: &str) -> CloudResult<()> {
        self.records.write().await.remove(user_id);
        Ok(())
    }
}
