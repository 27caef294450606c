pub mod combat;
pub mod context;
pub mod dice;
pub mod engine;
pub mod results;
pub mod roster;
pub mod serde_defaults;
pub mod storage;
pub mod tracker;
pub mod turn_order;

// Re-exports for convenience
pub use combat::{apply_damage_with_temp_hp, apply_healing, calculate_save_damage, set_temp_hp};
pub use context::{AppConfig, AppConfigExt, ConfigError};
pub use dice::{DiceExpr, DiceError, DiceRoll, SaveRoll, roll_d20, roll_dice, roll_die, roll_saving_throw};
pub use engine::{AoeParams, EntityDamageOverride};
pub use results::{AttackResult, ResultLog};
pub use roster::{Boss, Character, Creature, Defenses, EnemyGroup, Roster, Vitals};
pub use storage::{RosterSnapshot, SnapshotSync, StorageError, load_snapshot, save_snapshot};
pub use tracker::{Command, SignalHandler, Tracker, TrackerSettings, TrackerSignal, TrackerState};
pub use turn_order::{GroupCollection, RefreshRequest, TurnOrderEntry, TurnState};
