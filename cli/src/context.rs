use std::path::PathBuf;
use std::sync::Arc;

use skirmish_core::{AppConfig, AppConfigExt, SnapshotSync, Tracker, load_snapshot};
use tokio::sync::RwLock;

/// Holds all shared state for the CLI application.
/// This is a lightweight container - logic lives in the tracker.
#[derive(Clone)]
pub struct CliContext {
    pub config: Arc<RwLock<AppConfig>>,
    pub tracker: Arc<RwLock<Tracker>>,
}

impl CliContext {
    /// Load config, build the tracker and restore the last autosaved roster.
    pub fn new() -> Self {
        let config = AppConfig::load();
        let mut tracker = Tracker::from_config(&config);

        match config.snapshot_path() {
            Ok(path) => {
                if path.exists() {
                    match load_snapshot(&path) {
                        Ok(snapshot) => {
                            tracker.restore(snapshot);
                        }
                        Err(err) => tracing::warn!(error = %err, "Ignoring unreadable snapshot"),
                    }
                }
                tracker.add_handler(Box::new(SnapshotSync::new(path, config.autosave)));
            }
            Err(err) => tracing::warn!(error = %err, "Autosave disabled"),
        }

        Self {
            config: Arc::new(RwLock::new(config)),
            tracker: Arc::new(RwLock::new(tracker)),
        }
    }

    /// Explicit path, or the configured snapshot location.
    pub async fn resolve_snapshot_path(&self, path: Option<&str>) -> Result<PathBuf, String> {
        match path {
            Some(path) => Ok(PathBuf::from(path)),
            None => self
                .config
                .read()
                .await
                .snapshot_path()
                .map_err(|e| e.to_string()),
        }
    }
}

impl Default for CliContext {
    fn default() -> Self {
        Self::new()
    }
}
