//! Encryption state machine states.

use std::fmt;

/// Whether the master key is backed up in the cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackupStatus {
    /// A cloud record holds this key.
    Escrowed,
    /// No backup yet; the user should be asked to create one.
    Prompt,
    /// The user dismissed the backup prompt.
    Declined,
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncryptionState {
    #[default]
    Disabled,
    /// Enabling is suspended on the password prompt for an escrow restore.
    AwaitingEscrowPassword,
    Enabled { backup: BackupStatus },
}

impl EncryptionState {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled { .. })
    }

    /// True while enabled with a confirmed cloud backup.
    ///
    /// Only meaningful in `Enabled`: `Disabled` and `AwaitingEscrowPassword`
    /// report false even when an escrow record exists remotely.
    pub fn has_cloud_key(&self) -> bool {
        matches!(
            self,
            Self::Enabled {
                backup: BackupStatus::Escrowed
            }
        )
    }

    /// True while the UI should offer to create a cloud backup.
    pub fn should_prompt_backup(&self) -> bool {
        matches!(
            self,
            Self::Enabled {
                backup: BackupStatus::Prompt
            }
        )
    }
}

impl fmt::Display for EncryptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => write!(f, "disabled"),
            Self::AwaitingEscrowPassword => write!(f, "awaiting escrow password"),
            Self::Enabled { backup } => write!(f, "enabled ({backup:?})"),
        }
    }
}
