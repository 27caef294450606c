use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::StorageError;
use crate::results::{AttackResult, ResultLog};
use crate::roster::{Boss, Character, EnemyGroup, Roster};
use crate::tracker::TrackerState;
use crate::turn_order::{TurnOrderEntry, TurnState};

/// Everything the tracker persists.
///
/// `turnOrder` is a cache: it is rebuilt from the roster on load and only the
/// pointer (`currentTurnIndex`) and `round` carry meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterSnapshot {
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub bosses: Vec<Boss>,
    #[serde(default)]
    pub groups: Vec<EnemyGroup>,
    #[serde(default)]
    pub turn_order: Vec<TurnOrderEntry>,
    #[serde(default)]
    pub current_turn_index: usize,
    #[serde(default = "crate::serde_defaults::default_round")]
    pub round: u32,
    #[serde(default)]
    pub results: Vec<AttackResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_target: Option<String>,
}

impl From<&TrackerState> for RosterSnapshot {
    fn from(state: &TrackerState) -> Self {
        Self {
            characters: state.roster.characters.clone(),
            bosses: state.roster.bosses.clone(),
            groups: state.roster.groups.clone(),
            turn_order: state.turn.entries.clone(),
            current_turn_index: state.turn.current_index,
            round: state.turn.round,
            results: state.results.entries().to_vec(),
            selected_target: state.selected_target.clone(),
        }
    }
}

impl RosterSnapshot {
    /// Unpack into tracker state. The turn order still needs a refresh
    /// against the roster before use.
    pub fn into_state(self) -> TrackerState {
        let roster = Roster {
            characters: self.characters,
            bosses: self.bosses,
            groups: self.groups,
        };
        let selected_target = self.selected_target.filter(|id| roster.id_in_use(id));
        TrackerState {
            turn: TurnState {
                entries: self.turn_order,
                current_index: self.current_turn_index,
                round: self.round.max(1),
            },
            results: ResultLog::from_entries(self.results),
            selected_target,
            next_id: roster.len() as u64 + 1,
            roster,
        }
    }
}

pub fn load_snapshot(path: &Path) -> Result<RosterSnapshot, StorageError> {
    let text = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: RosterSnapshot =
        serde_json::from_str(&text).map_err(|source| StorageError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(
        path = %path.display(),
        characters = snapshot.characters.len(),
        bosses = snapshot.bosses.len(),
        groups = snapshot.groups.len(),
        "Loaded roster snapshot"
    );
    Ok(snapshot)
}

/// Write the snapshot, creating the parent directory if needed. The file is
/// written beside the target and renamed into place.
pub fn save_snapshot(path: &Path, snapshot: &RosterSnapshot) -> Result<(), StorageError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    let staging = path.with_extension("json.tmp");
    fs::write(&staging, json).map_err(|source| StorageError::Write {
        path: staging.clone(),
        source,
    })?;
    fs::rename(&staging, path).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "Saved roster snapshot");
    Ok(())
}
