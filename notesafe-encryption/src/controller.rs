//! The encryption controller: the only component that holds the master key.
//!
//! Transitions (enable, disable, forget, backup changes and migration
//! passes) are serialized on one lock. Content reads and writes only take
//! short read locks and work against an `Arc` snapshot of the key, so a
//! key replacement never affects an operation already in flight.

use crate::collaborators::{NoteStore, PasswordPrompt, PromptContext, PromptResponse};
use crate::config::EncryptionConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::migration::{self, Direction, MigrationReport};
use crate::state::{BackupStatus, EncryptionState};
use notesafe_cloud::{CloudKeyEscrow, EscrowError};
use notesafe_crypto::{content, BlobKind, CryptoError, MasterKey};
use notesafe_keystore::KeyManager;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// How a stored content field should be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayContent {
    /// Plaintext, either stored as such or decrypted with the master key.
    Text(String),
    /// A `pw-encrypted:` note; the editor must ask for its password.
    PasswordProtected,
    /// An `encrypted:` blob the current key cannot open.
    Placeholder(String),
}

impl DisplayContent {
    /// The string to render.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Placeholder(text) => Some(text),
            Self::PasswordProtected => None,
        }
    }
}

/// Result of [`EncryptionController::forget_key`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForgetOutcome {
    /// Local key and cloud backup are both gone.
    Complete,
    /// Local key is gone; the cloud backup still has to be deleted.
    BackupRemovalPending,
}

/// Orchestrates master-key encryption for one user.
pub struct EncryptionController {
    user_id: String,
    config: EncryptionConfig,
    keys: KeyManager,
    escrow: CloudKeyEscrow,
    notes: Arc<dyn NoteStore>,
    prompt: Arc<dyn PasswordPrompt>,
    state: RwLock<EncryptionState>,
    key: RwLock<Option<Arc<MasterKey>>>,
    transition: Mutex<()>,
}

impl EncryptionController {
    /// Creates a controller in the [`EncryptionState::Disabled`] state.
    ///
    /// The application calls [`enable`](Self::enable) on startup when the
    /// user previously turned encryption on.
    pub fn new(
        user_id: impl Into<String>,
        keys: KeyManager,
        escrow: CloudKeyEscrow,
        notes: Arc<dyn NoteStore>,
        prompt: Arc<dyn PasswordPrompt>,
        config: EncryptionConfig,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            config,
            keys,
            escrow,
            notes,
            prompt,
            state: RwLock::new(EncryptionState::Disabled),
            key: RwLock::new(None),
            transition: Mutex::new(()),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    pub async fn state(&self) -> EncryptionState {
        *self.state.read().await
    }

    pub async fn is_enabled(&self) -> bool {
        self.state().await.is_enabled()
    }

    /// See [`EncryptionState::has_cloud_key`]; false whenever not enabled.
    pub async fn has_cloud_key(&self) -> bool {
        self.state().await.has_cloud_key()
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Disabled → Enabled.
    ///
    /// Adopts the stored local key if it is valid. Otherwise restores the
    /// key from the cloud backup when one exists, prompting for its
    /// password, or generates a new key and asks for a backup. State only
    /// becomes `Enabled` once a key has been adopted; any failure leaves
    /// the controller `Disabled`.
    pub async fn enable(&self) -> ControllerResult<EncryptionState> {
        let _transition = self.transition.lock().await;

        let current = self.state().await;
        if current.is_enabled() {
            debug!("encryption already enabled for user {}", self.user_id);
            return Ok(current);
        }

        let (key, backup) = match self.obtain_key().await {
            Ok(found) => found,
            Err(e) => {
                self.set_state(EncryptionState::Disabled).await;
                return Err(e);
            }
        };

        let key = Arc::new(key);
        *self.key.write().await = Some(key.clone());
        let state = EncryptionState::Enabled { backup };
        self.set_state(state).await;
        info!("encryption enabled for user {} ({backup:?})", self.user_id);

        if self.config.encrypt_existing_on_enable {
            self.run_pass(Some(&*key), Direction::Encrypt)
                .await?
                .into_result()?;
        }
        Ok(state)
    }

    /// Enabled → Disabled.
    ///
    /// Decrypts every `encrypted:` note and writes it back as plaintext.
    /// Per-note failures do not stop the pass; they are returned as
    /// [`ControllerError::MigrationPartialFailure`] after the state has
    /// flipped. Calling this again retries only what is left, so a second
    /// call after a clean pass converts nothing. The local key is kept.
    pub async fn disable(&self) -> ControllerResult<MigrationReport> {
        let _transition = self.transition.lock().await;

        let key = match self.current_key().await {
            Some(key) => Some(key),
            None => {
                let retained = self
                    .with_keys(|keys| keys.ensure_key())
                    .await?
                    .map(Arc::new);
                if retained.is_some() {
                    *self.key.write().await = retained.clone();
                }
                retained
            }
        };

        let report = self.run_pass(key.as_deref(), Direction::Decrypt).await?;
        self.set_state(EncryptionState::Disabled).await;
        info!(
            "encryption disabled for user {} ({} notes decrypted)",
            self.user_id, report.converted
        );
        report.into_result()
    }

    /// Encrypts every plaintext note with the current key.
    pub async fn encrypt_existing_notes(&self) -> ControllerResult<MigrationReport> {
        let _transition = self.transition.lock().await;
        let key = self.active_key().await.ok_or(ControllerError::NotEnabled)?;
        self.run_pass(Some(&*key), Direction::Encrypt)
            .await?
            .into_result()
    }

    /// Abandons the master key: deletes the cloud backup and the local
    /// key, then drops the in-memory copy. Notes still sealed under it
    /// become permanently unreadable.
    ///
    /// An unreachable backup service does not block this. The local key
    /// is still erased and [`ForgetOutcome::BackupRemovalPending`] is
    /// returned; until [`remove_cloud_backup`](Self::remove_cloud_backup)
    /// succeeds, the next [`enable`](Self::enable) offers to restore the
    /// abandoned key.
    pub async fn forget_key(&self) -> ControllerResult<ForgetOutcome> {
        let _transition = self.transition.lock().await;

        let outcome = match self.escrow.remove(&self.user_id).await {
            Ok(()) => ForgetOutcome::Complete,
            Err(EscrowError::Backend(e)) => {
                warn!("cloud backup for user {} not removed: {e}", self.user_id);
                ForgetOutcome::BackupRemovalPending
            }
            Err(e) => return Err(e.into()),
        };

        self.with_keys(|keys| keys.clear()).await??;
        *self.key.write().await = None;
        self.set_state(EncryptionState::Disabled).await;
        warn!("master key abandoned for user {}", self.user_id);
        Ok(outcome)
    }

    // ── Cloud backup ─────────────────────────────────────────────

    /// Backs up the current key under `password`.
    pub async fn create_cloud_backup(&self, password: &str) -> ControllerResult<()> {
        let _transition = self.transition.lock().await;
        let key = self.active_key().await.ok_or(ControllerError::NotEnabled)?;

        self.escrow.save(&self.user_id, &key, password).await?;
        self.set_state(EncryptionState::Enabled {
            backup: BackupStatus::Escrowed,
        })
        .await;
        Ok(())
    }

    /// Deletes the user's cloud backup, e.g. to finish a
    /// [`forget_key`](Self::forget_key) that could not reach the service.
    pub async fn remove_cloud_backup(&self) -> ControllerResult<()> {
        let _transition = self.transition.lock().await;

        self.escrow.remove(&self.user_id).await?;
        let mut state = self.state.write().await;
        if state.has_cloud_key() {
            *state = EncryptionState::Enabled {
                backup: BackupStatus::Prompt,
            };
        }
        Ok(())
    }

    /// Records that the user does not want a cloud backup right now.
    pub async fn dismiss_backup_prompt(&self) {
        let mut state = self.state.write().await;
        if state.should_prompt_backup() {
            *state = EncryptionState::Enabled {
                backup: BackupStatus::Declined,
            };
        }
    }

    /// Re-wraps the cloud backup under a new password.
    pub async fn change_backup_password(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> ControllerResult<()> {
        let _transition = self.transition.lock().await;
        let key = self.active_key().await.ok_or(ControllerError::NotEnabled)?;

        self.escrow
            .rotate_password(&self.user_id, &key, old_password, new_password)
            .await?;
        self.set_state(EncryptionState::Enabled {
            backup: BackupStatus::Escrowed,
        })
        .await;
        Ok(())
    }

    // ── Content paths ────────────────────────────────────────────

    /// Prepares note content for storage: an `encrypted:` blob while
    /// enabled, unchanged plaintext otherwise.
    ///
    /// Content that already carries a scheme prefix is stored as is. A
    /// `pw-encrypted:` note never depends on the master key.
    pub async fn encrypt_for_storage(&self, plaintext: &str) -> ControllerResult<String> {
        if BlobKind::classify(plaintext).is_encrypted() {
            return Ok(plaintext.to_string());
        }
        match self.active_key().await {
            Some(key) => Ok(content::encrypt(plaintext, &key)?),
            None => Ok(plaintext.to_string()),
        }
    }

    /// Returns the plaintext of stored content.
    ///
    /// Plaintext passes through. `encrypted:` blobs are opened with the
    /// held key even while disabled, so leftovers of a partial disable
    /// stay readable. `pw-encrypted:` blobs are rejected with a format
    /// error without any decryption attempt.
    pub async fn decrypt_content(&self, stored: &str) -> ControllerResult<String> {
        match BlobKind::classify(stored) {
            BlobKind::Plaintext => Ok(stored.to_string()),
            BlobKind::Password => Err(CryptoError::Format(
                "password-protected content cannot be opened with the master key".to_string(),
            )
            .into()),
            BlobKind::MasterKey => {
                let key = self
                    .current_key()
                    .await
                    .ok_or(ControllerError::Crypto(CryptoError::Decryption))?;
                Ok(content::decrypt(stored, &key)?)
            }
        }
    }

    /// Like [`decrypt_content`](Self::decrypt_content) but never fails.
    pub async fn display_content(&self, stored: &str) -> DisplayContent {
        if BlobKind::classify(stored) == BlobKind::Password {
            return DisplayContent::PasswordProtected;
        }
        match self.decrypt_content(stored).await {
            Ok(text) => DisplayContent::Text(text),
            Err(e) => {
                debug!("rendering placeholder: {e}");
                DisplayContent::Placeholder(self.config.undecryptable_placeholder.clone())
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────

    async fn set_state(&self, state: EncryptionState) {
        *self.state.write().await = state;
    }

    async fn current_key(&self) -> Option<Arc<MasterKey>> {
        self.key.read().await.clone()
    }

    /// The key, only while enabled.
    async fn active_key(&self) -> Option<Arc<MasterKey>> {
        if !self.is_enabled().await {
            return None;
        }
        self.current_key().await
    }

    async fn obtain_key(&self) -> ControllerResult<(MasterKey, BackupStatus)> {
        if let Some(key) = self.with_keys(|keys| keys.ensure_key()).await? {
            let backup = match self.escrow.exists(&self.user_id).await {
                Ok(true) => BackupStatus::Escrowed,
                Ok(false) => BackupStatus::Prompt,
                Err(e) => {
                    warn!("could not check cloud backup for user {}: {e}", self.user_id);
                    BackupStatus::Prompt
                }
            };
            debug!("adopting stored master key");
            return Ok((key, backup));
        }

        if self.escrow.exists(&self.user_id).await? {
            let key = self.restore_from_escrow().await?;
            let restored = key.clone();
            self.with_keys(move |keys| keys.persist(&restored)).await??;
            return Ok((key, BackupStatus::Escrowed));
        }

        let key = self
            .with_keys(|keys| keys.generate_and_persist())
            .await??;
        Ok((key, BackupStatus::Prompt))
    }

    /// Runs a key store operation on the blocking pool; storage backends
    /// may do file or keychain I/O.
    async fn with_keys<T, F>(&self, op: F) -> ControllerResult<T>
    where
        F: FnOnce(&KeyManager) -> T + Send + 'static,
        T: Send + 'static,
    {
        let keys = self.keys.clone();
        tokio::task::spawn_blocking(move || op(&keys))
            .await
            .map_err(|e| ControllerError::Task(e.to_string()))
    }

    async fn restore_from_escrow(&self) -> ControllerResult<MasterKey> {
        self.set_state(EncryptionState::AwaitingEscrowPassword).await;

        let max_attempts = self.config.password_attempts();
        let mut previous_attempt_failed = false;
        for attempt in 1..=max_attempts {
            let context = PromptContext {
                user_id: self.user_id.clone(),
                attempt,
                max_attempts,
                previous_attempt_failed,
            };
            let password = match self.prompt.request_password(context).await {
                PromptResponse::Password(password) => password,
                PromptResponse::Cancelled => {
                    info!("cloud key restore cancelled for user {}", self.user_id);
                    return Err(ControllerError::Cancelled);
                }
            };

            match self.escrow.load(&self.user_id, &password).await {
                Ok(key) => {
                    info!("restored master key from cloud backup for user {}", self.user_id);
                    return Ok(key);
                }
                Err(EscrowError::WrongPasswordOrNoRecord) => {
                    debug!("cloud key restore attempt {attempt}/{max_attempts} failed");
                    previous_attempt_failed = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(EscrowError::WrongPasswordOrNoRecord.into())
    }

    async fn run_pass(
        &self,
        key: Option<&MasterKey>,
        direction: Direction,
    ) -> ControllerResult<MigrationReport> {
        migration::run(
            self.notes.as_ref(),
            &self.user_id,
            key,
            direction,
            self.config.concurrency(),
        )
        .await
    }
}
