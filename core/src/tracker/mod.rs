//! The combat tracker: roster state, command dispatch and post-commit work.
//!
//! Every [`Command`] is reduced against a copy of the current state and the
//! copy replaces the state in a single assignment. Work that must observe the
//! committed state (rebuilding the turn order) is queued as a [`FollowUp`] and
//! drained right after the commit; it is idempotent, so queueing it more than
//! once per command is harmless. Registered [`SignalHandler`]s are notified
//! last.

mod command;
mod handler;
mod reducer;
mod signal;


pub use command::Command;
pub use handler::SignalHandler;
pub use reducer::{Env, Transition, reduce};
pub use signal::TrackerSignal;

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use skirmish_types::{AppConfig, EntityKind, HitStatus};

use crate::dice::{DiceExpr, DiceRoll};
use crate::engine::AoeParams;
use crate::results::ResultLog;
use crate::roster::Roster;
use crate::storage::RosterSnapshot;
use crate::turn_order::{RefreshRequest, TurnState};

// ─────────────────────────────────────────────────────────────────────────────
// State
// ─────────────────────────────────────────────────────────────────────────────

/// Everything a transition can change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackerState {
    pub roster: Roster,
    pub turn: TurnState,
    pub results: ResultLog,
    /// Entity the front end is targeting
    pub selected_target: Option<String>,
    /// Counter for generated entity ids
    pub next_id: u64,
}

impl TrackerState {
    /// Next unused id for a new entity: `c1`, `b2`, `g3`, ...
    pub fn fresh_id(&mut self, kind: EntityKind) -> String {
        let prefix = match kind {
            EntityKind::Character => "c",
            EntityKind::Boss => "b",
            EntityKind::Group => "g",
        };
        loop {
            self.next_id += 1;
            let id = format!("{prefix}{}", self.next_id);
            if !self.roster.id_in_use(&id) {
                return id;
            }
        }
    }
}

/// Tracker options taken from [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSettings {
    /// Used when an AoE does not say whether a save halves damage
    pub half_on_save: bool,
    /// Results log cap (0 = unlimited)
    pub max_results: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for TrackerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            half_on_save: config.default_half_on_save,
            max_results: config.max_results,
        }
    }
}

/// Work scheduled by a transition to run after it commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUp {
    RefreshTurnOrder(RefreshRequest),
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracker
// ─────────────────────────────────────────────────────────────────────────────

pub struct Tracker {
    state: TrackerState,
    settings: TrackerSettings,
    rng: StdRng,
    follow_ups: VecDeque<FollowUp>,
    handlers: Vec<Box<dyn SignalHandler + Send + Sync>>,
}

impl Tracker {
    pub fn new(settings: TrackerSettings) -> Self {
        Self::with_rng(settings, StdRng::from_entropy())
    }

    /// Tracker with reproducible dice.
    pub fn with_seed(settings: TrackerSettings, seed: u64) -> Self {
        Self::with_rng(settings, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let settings = TrackerSettings::from(config);
        match config.rng_seed {
            Some(seed) => Self::with_seed(settings, seed),
            None => Self::new(settings),
        }
    }

    fn with_rng(settings: TrackerSettings, rng: StdRng) -> Self {
        Self {
            state: TrackerState::default(),
            settings,
            rng,
            follow_ups: VecDeque::new(),
            handlers: Vec::new(),
        }
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: TrackerSettings) {
        self.settings = settings;
    }

    pub fn add_handler(&mut self, handler: Box<dyn SignalHandler + Send + Sync>) {
        self.handlers.push(handler);
    }

    // --- Dispatch ---

    /// Reduce, commit, drain follow-ups, notify. Returns every signal the
    /// command produced; an empty list means nothing changed.
    pub fn dispatch(&mut self, command: Command) -> Vec<TrackerSignal> {
        tracing::debug!(?command, "Dispatching");
        let mut next = self.state.clone();
        let mut env = Env {
            rng: &mut self.rng,
            settings: &self.settings,
        };
        let Some(transition) = reduce(&mut next, command, &mut env) else {
            tracing::debug!("Command was a no-op");
            return Vec::new();
        };

        self.state = next;
        self.follow_ups.extend(transition.follow_ups);
        let mut signals = transition.signals;
        self.drain_follow_ups(&mut signals);
        self.notify(&signals);
        signals
    }

    fn drain_follow_ups(&mut self, signals: &mut Vec<TrackerSignal>) {
        while let Some(follow_up) = self.follow_ups.pop_front() {
            match follow_up {
                FollowUp::RefreshTurnOrder(request) => {
                    if self.state.turn.refresh(&self.state.roster, &request) {
                        signals.push(TrackerSignal::TurnOrderRefreshed {
                            entries: self.state.turn.entries.len(),
                        });
                    }
                }
            }
        }
    }

    fn notify(&mut self, signals: &[TrackerSignal]) {
        for handler in &mut self.handlers {
            handler.handle_signals(signals, &self.state);
            handler.on_commit(&self.state);
        }
    }

    // --- Persistence ---

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot::from(&self.state)
    }

    /// Replace the whole state from a snapshot and rebuild the turn order
    /// around the stored pointer.
    pub fn restore(&mut self, snapshot: RosterSnapshot) -> Vec<TrackerSignal> {
        let mut state = snapshot.into_state();
        state.turn.refresh(&state.roster, &RefreshRequest::default());
        self.state = state;
        self.follow_ups.clear();

        let signals = vec![TrackerSignal::SnapshotLoaded];
        self.notify(&signals);
        signals
    }

    // --- Operations ---

    /// Single-target damage: the first living creature takes the hit.
    pub fn apply_damage_to_group(&mut self, id: &str, damage: i32, hit_status: HitStatus) -> Vec<TrackerSignal> {
        self.dispatch(Command::DamageGroup {
            id: id.to_string(),
            damage,
            hit_status,
        })
    }

    /// The first `ceil(alive * percent / 100)` living creatures each take
    /// the full damage.
    pub fn apply_damage_to_all_in_group(
        &mut self,
        id: &str,
        damage: i32,
        percent_affected: u32,
    ) -> Vec<TrackerSignal> {
        self.dispatch(Command::DamageAllInGroup {
            id: id.to_string(),
            damage,
            percent_affected,
        })
    }

    pub fn apply_damage_to_all_groups(&mut self, params: AoeParams) -> Vec<TrackerSignal> {
        self.dispatch(Command::DamageAllGroups(params))
    }

    /// Group AoE without a log entry. Returns the `; `-joined summary for the
    /// caller to fold into its own message, or `None` if nothing was hit.
    pub fn apply_damage_to_all_groups_in_aoe_internal(&mut self, params: AoeParams) -> Option<String> {
        self.dispatch(Command::DamageAllGroupsInAoeInternal(params))
            .into_iter()
            .find_map(|signal| match signal {
                TrackerSignal::AoeResolved { summary, .. } => Some(summary),
                _ => None,
            })
    }

    pub fn apply_aoe(&mut self, params: AoeParams) -> Vec<TrackerSignal> {
        self.dispatch(Command::ApplyAoe(params))
    }

    pub fn update_turn_order(
        &mut self,
        reset_to_start: bool,
        removed: Option<(EntityKind, &str)>,
    ) -> Vec<TrackerSignal> {
        self.dispatch(Command::UpdateTurnOrder(RefreshRequest {
            reset_to_start,
            removed: removed.map(|(kind, id)| (kind, id.to_string())),
        }))
    }

    /// Roll dice with the tracker's generator, so seeded sessions replay.
    pub fn roll(&mut self, expr: &DiceExpr) -> DiceRoll {
        expr.roll(&mut self.rng)
    }

    pub fn next_turn(&mut self) -> Vec<TrackerSignal> {
        self.dispatch(Command::NextTurn)
    }

    pub fn previous_turn(&mut self) -> Vec<TrackerSignal> {
        self.dispatch(Command::PreviousTurn)
    }
}
