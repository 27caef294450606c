use std::path::PathBuf;

use super::{RosterSnapshot, StorageError, save_snapshot};
use crate::tracker::{SignalHandler, TrackerSignal, TrackerState};

/// Writes a snapshot after each committed transition that changed persisted
/// state. Failures are logged and retried on the next commit.
pub struct SnapshotSync {
    path: PathBuf,
    enabled: bool,
    dirty: bool,
    writes: u64,
}

impl SnapshotSync {
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled,
            dirty: false,
            writes: 0,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Snapshots written so far.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn write_now(&mut self, state: &TrackerState) -> Result<(), StorageError> {
        save_snapshot(&self.path, &RosterSnapshot::from(state))?;
        self.writes += 1;
        self.dirty = false;
        Ok(())
    }
}

impl SignalHandler for SnapshotSync {
    fn handle_signal(&mut self, signal: &TrackerSignal, _state: &TrackerState) {
        if signal.is_persistent() {
            self.dirty = true;
        }
    }

    fn on_commit(&mut self, state: &TrackerState) {
        if !self.enabled || !self.dirty {
            return;
        }
        if let Err(err) = self.write_now(state) {
            tracing::warn!(error = %err, path = %self.path.display(), "Autosave failed");
        }
    }
}
