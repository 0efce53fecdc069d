//! Bulk conversion of a user's notes between plaintext and `encrypted:`.
//!
//! A pass lists the user's notes once and converts only those not already
//! in the target format, so re-running a pass is safe and finishes whatever
//! an earlier pass left behind. `pw-encrypted:` notes are never touched.

use crate::collaborators::{Note, NoteStore};
use crate::error::{ControllerError, ControllerResult};
use futures::stream::{self, StreamExt};
use notesafe_crypto::{content, BlobKind, MasterKey};
use tracing::{debug, info, warn};

/// Direction of a migration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    /// `encrypted:` → plaintext.
    Decrypt,
    /// plaintext → `encrypted:`.
    Encrypt,
}

/// A note that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFailure {
    pub note_id: String,
    pub reason: String,
}

impl NoteFailure {
    pub fn new(note_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            note_id: note_id.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a migration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Notes listed for the user.
    pub examined: usize,
    /// Notes rewritten in the target format.
    pub converted: usize,
    /// Notes already in the target format or not eligible.
    pub skipped: usize,
    pub failures: Vec<NoteFailure>,
}

impl MigrationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// `Err(MigrationPartialFailure)` if any note failed.
    pub fn into_result(self) -> ControllerResult<Self> {
        if self.is_clean() {
            Ok(self)
        } else {
            Err(ControllerError::MigrationPartialFailure(self))
        }
    }

    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Converted => self.converted += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed(failure) => self.failures.push(failure),
        }
    }
}

enum Outcome {
    Converted,
    Skipped,
    Failed(NoteFailure),
}

/// Runs one pass over all of `user_id`'s notes.
///
/// Listing failures abort the pass. Per-note failures are collected in the
/// report and never stop the remaining notes.
pub(crate) async fn run(
    notes: &dyn NoteStore,
    user_id: &str,
    key: Option<&MasterKey>,
    direction: Direction,
    concurrency: usize,
) -> ControllerResult<MigrationReport> {
    let listed = notes.list_notes_for_user(user_id).await?;
    let mut report = MigrationReport {
        examined: listed.len(),
        ..Default::default()
    };
    debug!(
        "migration {direction:?} for user {user_id}: {} notes",
        report.examined
    );

    let outcomes: Vec<Outcome> = stream::iter(listed)
        .map(|note| convert_note(notes, note, key, direction))
        .buffer_unordered(concurrency)
        .collect()
        .await;

    for outcome in outcomes {
        report.record(outcome);
    }

    if report.is_clean() {
        info!(
            "migration {direction:?} for user {user_id}: {} converted, {} skipped",
            report.converted, report.skipped
        );
    } else {
        warn!(
            "migration {direction:?} for user {user_id}: {} converted, {} skipped, {} failed",
            report.converted,
            report.skipped,
            report.failures.len()
        );
    }
    Ok(report)
}

async fn convert_note(
    notes: &dyn NoteStore,
    note: Note,
    key: Option<&MasterKey>,
    direction: Direction,
) -> Outcome {
    let kind = BlobKind::classify(&note.content);
    let eligible = match direction {
        Direction::Decrypt => kind == BlobKind::MasterKey,
        Direction::Encrypt => kind == BlobKind::Plaintext,
    };
    if !eligible {
        return Outcome::Skipped;
    }

    let Some(key) = key else {
        return Outcome::Failed(NoteFailure::new(note.id, "no master key available"));
    };

    let converted = match direction {
        Direction::Decrypt => content::decrypt(&note.content, key),
        Direction::Encrypt => content::encrypt(&note.content, key),
    };
    let converted = match converted {
        Ok(converted) => converted,
        Err(e) => {
            debug!("note {} not converted: {e}", note.id);
            return Outcome::Failed(NoteFailure::new(note.id, e.to_string()));
        }
    };

    match notes.update_note_content(&note.id, &converted).await {
        Ok(()) => Outcome::Converted,
        Err(e) => {
            warn!("failed to write note {}: {e}", note.id);
            Outcome::Failed(NoteFailure::new(note.id, e.to_string()))
        }
    }
}
