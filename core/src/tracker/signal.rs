use skirmish_types::EntityKind;

/// Notifications emitted by a committed transition, in the order things
/// happened. Follow-up work (turn-order refresh) appends its own signals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerSignal {
    EntityAdded {
        kind: EntityKind,
        id: String,
    },
    EntityUpdated {
        kind: EntityKind,
        id: String,
    },
    EntityRemoved {
        kind: EntityKind,
        id: String,
    },
    DamageApplied {
        kind: EntityKind,
        id: String,
        damage: i32,
        killed: usize,
    },
    Missed {
        kind: EntityKind,
        id: String,
    },
    /// A character or boss dropped to 0 HP
    EntityDowned {
        kind: EntityKind,
        id: String,
    },
    /// The last living creature in a group died
    GroupDefeated {
        id: String,
    },
    Healed {
        kind: EntityKind,
        id: String,
        amount: i32,
    },
    TempHpChanged {
        kind: EntityKind,
        id: String,
        temp_hp: i32,
    },
    AoeFlagChanged {
        kind: EntityKind,
        id: String,
        in_aoe: bool,
    },
    AoeFlagsCleared,
    /// `summary` is the `; `-joined per-entity text; `logged` is false when
    /// the caller is expected to compose its own result line
    AoeResolved {
        summary: String,
        targets: usize,
        logged: bool,
    },
    TurnChanged {
        index: usize,
        round: u32,
    },
    TurnOrderRefreshed {
        entries: usize,
    },
    TargetSelected {
        id: Option<String>,
    },
    ResultLogged {
        id: u64,
    },
    ResultUpdated {
        id: u64,
    },
    ResultRemoved {
        id: u64,
    },
    ResultsCleared,
    /// State replaced from a snapshot on disk
    SnapshotLoaded,
}

impl TrackerSignal {
    /// Whether the change should reach the snapshot on disk.
    pub fn is_persistent(&self) -> bool {
        !matches!(self, TrackerSignal::SnapshotLoaded)
    }
}
