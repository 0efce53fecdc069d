//! Secure local storage backends.
//!
//! The key manager only needs a handful of named string slots. Platform
//! keychains can implement [`SecureStorage`]; the workspace ships a
//! file-backed store and an in-memory one.

use crate::error::{KeyStoreError, KeyStoreResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Named string slots in secure local storage.
pub trait SecureStorage: Send + Sync {
    /// Reads a slot. `Ok(None)` when the slot has never been written or
    /// was removed.
    fn get(&self, slot: &str) -> KeyStoreResult<Option<String>>;

    /// Writes a slot, replacing any previous value.
    fn set(&self, slot: &str, value: &str) -> KeyStoreResult<()>;

    /// Erases a slot. Erasing an empty slot is not an error.
    fn remove(&self, slot: &str) -> KeyStoreResult<()>;
}

// ============================================================================
// FileSecureStorage
// ============================================================================

/// One file per slot under a private directory.
pub struct FileSecureStorage {
    dir: PathBuf,
}

impl FileSecureStorage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the default storage directory.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        #[cfg(any(target_os = "macos", target_os = "windows"))]
        {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("NoteSafe")
                .join("keys")
        }

        #[cfg(target_os = "linux")]
        {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("notesafe")
                .join("keys")
        }

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            PathBuf::from("notesafe-keys")
        }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        let name: String = slot
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl SecureStorage for FileSecureStorage {
    fn get(&self, slot: &str) -> KeyStoreResult<Option<String>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| KeyStoreError::Read(e.to_string()))
    }

    fn set(&self, slot: &str, value: &str) -> KeyStoreResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| KeyStoreError::Persist(e.to_string()))?;

        // Write-then-rename so a crash never leaves a half-written key.
        let path = self.slot_path(slot);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, value).map_err(|e| KeyStoreError::Persist(e.to_string()))?;
        restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &path).map_err(|e| KeyStoreError::Persist(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, slot: &str) -> KeyStoreResult<()> {
        let path = self.slot_path(slot);
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| KeyStoreError::Persist(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> KeyStoreResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
        .map_err(|e| KeyStoreError::Persist(e.to_string()))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> KeyStoreResult<()> {
    Ok(())
}

// ============================================================================
// MemorySecureStorage
// ============================================================================

/// Process-local storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySecureStorage {
    slots: RwLock<HashMap<String, String>>,
}

impl MemorySecureStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStorage for MemorySecureStorage {
    fn get(&self, slot: &str) -> KeyStoreResult<Option<String>> {
        let slots = self
            .slots
            .read()
            .map_err(|e| KeyStoreError::Read(e.to_string()))?;
        Ok(slots.get(slot).cloned())
    }

    fn set(&self, slot: &str, value: &str) -> KeyStoreResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| KeyStoreError::Persist(e.to_string()))?;
        slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> KeyStoreResult<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| KeyStoreError::Persist(e.to_string()))?;
        slots.remove(slot);
        Ok(())
    }
}
