//! Roster snapshot persistence.
//!
//! The whole tracker state is written as one JSON document in the same
//! camelCase shape the browser build exports, so files move freely between
//! the two. Older files are repaired on load (see [`GroupRecord`]).

mod error;
mod migrate;
mod snapshot;
mod sync;


pub use error::StorageError;
pub use migrate::GroupRecord;
pub use snapshot::{RosterSnapshot, load_snapshot, save_snapshot};
pub use sync::SnapshotSync;
