use skirmish_types::{EntityKind, HitStatus};

use crate::engine::AoeParams;
use crate::roster::{Boss, Character, EnemyGroup};
use crate::turn_order::RefreshRequest;

/// Every action the tracker accepts.
///
/// Damage and healing amounts that are not positive, and ids that do not
/// exist, turn a command into a no-op.
#[derive(Debug, Clone)]
pub enum Command {
    // --- Roster ---
    /// An empty id is replaced with a fresh one
    AddCharacter(Character),
    UpdateCharacter(Character),
    AddBoss(Boss),
    UpdateBoss(Boss),
    /// An empty id is replaced with a fresh one and creatures renumbered
    AddGroup(EnemyGroup),
    UpdateGroup(EnemyGroup),
    DuplicateGroup {
        id: String,
    },
    ResetGroup {
        id: String,
    },
    Remove {
        kind: EntityKind,
        id: String,
    },
    SetInitiative {
        kind: EntityKind,
        id: String,
        initiative: i32,
    },
    SetInAoe {
        kind: EntityKind,
        id: String,
        in_aoe: bool,
    },
    ClearAllAoe,

    // --- Damage ---
    DamageGroup {
        id: String,
        damage: i32,
        hit_status: HitStatus,
    },
    DamageAllInGroup {
        id: String,
        damage: i32,
        percent_affected: u32,
    },
    /// AoE over flagged groups, logged as one result
    DamageAllGroups(AoeParams),
    /// AoE over groups without logging; the summary is returned in the
    /// `AoeResolved` signal
    DamageAllGroupsInAoeInternal(AoeParams),
    DamageCharacter {
        id: String,
        damage: i32,
        hit_status: HitStatus,
    },
    DamageBoss {
        id: String,
        damage: i32,
        hit_status: HitStatus,
    },
    /// AoE over every flagged character, boss and group
    ApplyAoe(AoeParams),

    // --- Healing ---
    Heal {
        kind: EntityKind,
        id: String,
        amount: i32,
    },
    HealGroupToFull {
        id: String,
    },
    SetTempHp {
        kind: EntityKind,
        id: String,
        amount: i32,
        replace: bool,
    },

    // --- Turns ---
    UpdateTurnOrder(RefreshRequest),
    NextTurn,
    PreviousTurn,
    SelectTarget(Option<String>),

    // --- Results ---
    UpdateResult {
        id: u64,
        message: String,
    },
    RemoveResult {
        id: u64,
    },
    ClearResults,
}
