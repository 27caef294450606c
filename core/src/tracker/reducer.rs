//! State transitions.
//!
//! [`reduce`] mutates a private copy of the state. Returning `None` means the
//! command was a no-op and the copy is thrown away, so a rejected command can
//! never leave a partial change behind.

use rand::rngs::StdRng;
use skirmish_types::{EntityKind, HitStatus};

use super::{Command, FollowUp, TrackerSettings, TrackerSignal, TrackerState};
use crate::engine::group_damage::kill_suffix;
use crate::engine::{
    AoeParams, apply_aoe_to_groups, apply_aoe_to_vitals, damage_first_alive, damage_percentage,
    heal_group, heal_group_to_full, set_group_temp_hp,
};
use crate::results::AttackResult;
use crate::roster::Vitals;
use crate::turn_order::RefreshRequest;

/// What reducing a command needs besides the state.
pub struct Env<'a> {
    pub rng: &'a mut StdRng,
    pub settings: &'a TrackerSettings,
}

/// Side products of a transition, handed to the tracker on commit.
#[derive(Debug, Default)]
pub struct Transition {
    pub signals: Vec<TrackerSignal>,
    pub follow_ups: Vec<FollowUp>,
}

impl Transition {
    fn signal(&mut self, signal: TrackerSignal) {
        self.signals.push(signal);
    }

    fn refresh_turn_order(&mut self) {
        self.follow_ups
            .push(FollowUp::RefreshTurnOrder(RefreshRequest::default()));
    }
}

pub fn reduce(state: &mut TrackerState, command: Command, env: &mut Env<'_>) -> Option<Transition> {
    let mut tx = Transition::default();
    let applied = match command {
        // --- Roster ---
        Command::AddCharacter(mut character) => {
            if character.id.is_empty() || state.roster.id_in_use(&character.id) {
                character.id = state.fresh_id(EntityKind::Character);
            }
            tx.signal(TrackerSignal::EntityAdded {
                kind: EntityKind::Character,
                id: character.id.clone(),
            });
            state.roster.characters.push(character);
            tx.refresh_turn_order();
            true
        }
        Command::UpdateCharacter(character) => {
            let id = character.id.clone();
            updated(&mut tx, EntityKind::Character, id, state.roster.update_character(character))
        }
        Command::AddBoss(mut boss) => {
            if boss.id.is_empty() || state.roster.id_in_use(&boss.id) {
                boss.id = state.fresh_id(EntityKind::Boss);
            }
            tx.signal(TrackerSignal::EntityAdded {
                kind: EntityKind::Boss,
                id: boss.id.clone(),
            });
            state.roster.bosses.push(boss);
            tx.refresh_turn_order();
            true
        }
        Command::UpdateBoss(boss) => {
            let id = boss.id.clone();
            updated(&mut tx, EntityKind::Boss, id, state.roster.update_boss(boss))
        }
        Command::AddGroup(mut group) => {
            if group.id.is_empty() || state.roster.id_in_use(&group.id) {
                group.assign_id(state.fresh_id(EntityKind::Group));
            }
            group.recompute_aggregates();
            tx.signal(TrackerSignal::EntityAdded {
                kind: EntityKind::Group,
                id: group.id.clone(),
            });
            state.roster.groups.push(group);
            tx.refresh_turn_order();
            true
        }
        Command::UpdateGroup(group) => {
            let id = group.id.clone();
            updated(&mut tx, EntityKind::Group, id, state.roster.update_group(group))
        }
        Command::DuplicateGroup { id } => duplicate_group(state, &mut tx, &id),
        Command::ResetGroup { id } => {
            let changed = state.roster.reset_group(&id);
            updated(&mut tx, EntityKind::Group, id, changed)
        }
        Command::Remove { kind, id } => remove(state, &mut tx, kind, id),
        Command::SetInitiative {
            kind,
            id,
            initiative,
        } => {
            let changed = state.roster.set_initiative(kind, &id, initiative);
            updated(&mut tx, kind, id, changed)
        }
        Command::SetInAoe { kind, id, in_aoe } => {
            let changed = state.roster.set_in_aoe(kind, &id, in_aoe);
            if changed {
                tx.signal(TrackerSignal::AoeFlagChanged { kind, id, in_aoe });
            }
            changed
        }
        Command::ClearAllAoe => {
            let changed = state.roster.clear_aoe_flags();
            if changed {
                tx.signal(TrackerSignal::AoeFlagsCleared);
            }
            changed
        }

        // --- Damage ---
        Command::DamageGroup {
            id,
            damage,
            hit_status,
        } => damage_group(state, env, &mut tx, &id, damage, hit_status),
        Command::DamageAllInGroup {
            id,
            damage,
            percent_affected,
        } => damage_all_in_group(state, env, &mut tx, &id, damage, percent_affected),
        Command::DamageAllGroups(params) => aoe_groups_only(state, env, &mut tx, &params, true),
        Command::DamageAllGroupsInAoeInternal(params) => {
            aoe_groups_only(state, env, &mut tx, &params, false)
        }
        Command::DamageCharacter {
            id,
            damage,
            hit_status,
        } => damage_vitals(state, env, &mut tx, EntityKind::Character, &id, damage, hit_status),
        Command::DamageBoss {
            id,
            damage,
            hit_status,
        } => damage_vitals(state, env, &mut tx, EntityKind::Boss, &id, damage, hit_status),
        Command::ApplyAoe(params) => apply_aoe(state, env, &mut tx, &params),

        // --- Healing ---
        Command::Heal { kind, id, amount } => heal(state, env, &mut tx, kind, &id, amount),
        Command::HealGroupToFull { id } => heal_to_full(state, env, &mut tx, &id),
        Command::SetTempHp {
            kind,
            id,
            amount,
            replace,
        } => temp_hp(state, env, &mut tx, kind, &id, amount, replace),

        // --- Turns ---
        Command::UpdateTurnOrder(request) => {
            let changed = state.turn.refresh(&state.roster, &request);
            if changed {
                tx.signal(TrackerSignal::TurnOrderRefreshed {
                    entries: state.turn.entries.len(),
                });
            }
            changed
        }
        Command::NextTurn => advance_turn(state, &mut tx, true),
        Command::PreviousTurn => advance_turn(state, &mut tx, false),
        Command::SelectTarget(target) => {
            let valid = target.as_deref().is_none_or(|id| state.roster.id_in_use(id));
            if valid && state.selected_target != target {
                state.selected_target = target.clone();
                tx.signal(TrackerSignal::TargetSelected { id: target });
                true
            } else {
                false
            }
        }

        // --- Results ---
        Command::UpdateResult { id, message } => {
            let changed = state.results.update(id, message);
            if changed {
                tx.signal(TrackerSignal::ResultUpdated { id });
            }
            changed
        }
        Command::RemoveResult { id } => {
            let changed = state.results.remove(id);
            if changed {
                tx.signal(TrackerSignal::ResultRemoved { id });
            }
            changed
        }
        Command::ClearResults => {
            let changed = state.results.clear();
            if changed {
                tx.signal(TrackerSignal::ResultsCleared);
            }
            changed
        }
    };

    applied.then_some(tx)
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn log(state: &mut TrackerState, env: &Env<'_>, tx: &mut Transition, result: AttackResult) {
    let id = state.results.push(result, env.settings.max_results);
    tx.signal(TrackerSignal::ResultLogged { id });
}

fn updated(tx: &mut Transition, kind: EntityKind, id: String, changed: bool) -> bool {
    if changed {
        tx.signal(TrackerSignal::EntityUpdated { kind, id });
        tx.refresh_turn_order();
    }
    changed
}

fn miss(state: &mut TrackerState, env: &Env<'_>, tx: &mut Transition, kind: EntityKind, id: &str, name: &str) {
    let result = AttackResult::new(format!("{name}: Miss!"))
        .with_target(kind, id)
        .with_hit_status(HitStatus::Miss);
    log(state, env, tx, result);
    tx.signal(TrackerSignal::Missed {
        kind,
        id: id.to_string(),
    });
}

// ─────────────────────────────────────────────────────────────────────────────
// Roster
// ─────────────────────────────────────────────────────────────────────────────

fn duplicate_group(state: &mut TrackerState, tx: &mut Transition, id: &str) -> bool {
    if state.roster.group(id).is_none() {
        return false;
    }
    let new_id = state.fresh_id(EntityKind::Group);
    if state.roster.duplicate_group(id, &new_id).is_none() {
        return false;
    }
    tx.signal(TrackerSignal::EntityAdded {
        kind: EntityKind::Group,
        id: new_id,
    });
    tx.refresh_turn_order();
    true
}

fn remove(state: &mut TrackerState, tx: &mut Transition, kind: EntityKind, id: String) -> bool {
    if !state.roster.remove(kind, &id) {
        return false;
    }
    if state.selected_target.as_deref() == Some(id.as_str()) {
        state.selected_target = None;
        tx.signal(TrackerSignal::TargetSelected { id: None });
    }
    tx.follow_ups
        .push(FollowUp::RefreshTurnOrder(RefreshRequest::removed(kind, id.clone())));
    tx.signal(TrackerSignal::EntityRemoved { kind, id });
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Damage
// ─────────────────────────────────────────────────────────────────────────────

fn damage_group(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    id: &str,
    damage: i32,
    hit_status: HitStatus,
) -> bool {
    if damage <= 0 {
        return false;
    }
    let Some(group) = state.roster.group_mut(id) else {
        return false;
    };
    let name = group.name.clone();
    if hit_status.is_miss() {
        miss(state, env, tx, EntityKind::Group, id, &name);
        return true;
    }
    let Some(outcome) = damage_first_alive(group, damage) else {
        return false;
    };

    let message = format!(
        "{name}: {} for {damage} damage{}",
        hit_status.label(),
        kill_suffix(&outcome)
    );
    log(
        state,
        env,
        tx,
        AttackResult::new(message)
            .with_damage(damage)
            .with_target(EntityKind::Group, id)
            .with_hit_status(hit_status),
    );
    group_damaged(tx, id, damage, outcome.killed, outcome.group_emptied());
    true
}

fn damage_all_in_group(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    id: &str,
    damage: i32,
    percent_affected: u32,
) -> bool {
    let Some(group) = state.roster.group_mut(id) else {
        return false;
    };
    let alive_before = group.count;
    let Some(outcome) = damage_percentage(group, damage, percent_affected) else {
        return false;
    };
    let message = format!(
        "{}: {damage} damage to {} of {alive_before}{}",
        group.name,
        outcome.affected,
        kill_suffix(&outcome)
    );
    log(
        state,
        env,
        tx,
        AttackResult::new(message)
            .with_damage(damage)
            .with_target(EntityKind::Group, id),
    );
    group_damaged(tx, id, damage, outcome.killed, outcome.group_emptied());
    true
}

fn group_damaged(tx: &mut Transition, id: &str, damage: i32, killed: usize, emptied: bool) {
    tx.signal(TrackerSignal::DamageApplied {
        kind: EntityKind::Group,
        id: id.to_string(),
        damage,
        killed,
    });
    if emptied {
        tx.signal(TrackerSignal::GroupDefeated { id: id.to_string() });
    }
    tx.refresh_turn_order();
}

fn damage_vitals(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    kind: EntityKind,
    id: &str,
    damage: i32,
    hit_status: HitStatus,
) -> bool {
    if damage <= 0 {
        return false;
    }
    let Some(entity) = state.roster.vitals_mut(kind, id) else {
        return false;
    };
    let name = entity.name().to_string();
    if hit_status.is_miss() {
        miss(state, env, tx, kind, id, &name);
        return true;
    }
    let downed = entity.take_damage(damage);

    let suffix = if downed { ", down" } else { "" };
    let message = format!("{name}: {} for {damage} damage{suffix}", hit_status.label());
    log(
        state,
        env,
        tx,
        AttackResult::new(message)
            .with_damage(damage)
            .with_target(kind, id)
            .with_hit_status(hit_status),
    );
    tx.signal(TrackerSignal::DamageApplied {
        kind,
        id: id.to_string(),
        damage,
        killed: usize::from(downed),
    });
    if downed {
        tx.signal(TrackerSignal::EntityDowned {
            kind,
            id: id.to_string(),
        });
    }
    tx.refresh_turn_order();
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Area Effects
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the group part of an AoE. Returns the per-group summaries, or
/// `None` when nothing was targeted.
fn resolve_group_aoe(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    params: &AoeParams,
) -> Option<Vec<String>> {
    let half = env.settings.half_on_save;
    let outcomes = apply_aoe_to_groups(&mut state.roster.groups, params, half, &mut *env.rng)?;
    for outcome in &outcomes {
        tx.signal(TrackerSignal::DamageApplied {
            kind: EntityKind::Group,
            id: outcome.group_id.clone(),
            damage: outcome.resolved.damage,
            killed: outcome.distribution.killed,
        });
        if outcome.distribution.group_emptied() {
            tx.signal(TrackerSignal::GroupDefeated {
                id: outcome.group_id.clone(),
            });
        }
    }
    tx.refresh_turn_order();
    Some(outcomes.into_iter().map(|o| o.summary).collect())
}

fn aoe_groups_only(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    params: &AoeParams,
    log_result: bool,
) -> bool {
    let Some(summaries) = resolve_group_aoe(state, env, tx, params) else {
        return false;
    };
    let summary = summaries.join("; ");
    if log_result {
        let message = format!("{}: {summary}", params.describe());
        log(state, env, tx, AttackResult::new(message).with_damage(params.damage).aoe());
    }
    tx.signal(TrackerSignal::AoeResolved {
        summary,
        targets: summaries.len(),
        logged: log_result,
    });
    true
}

/// Characters, then bosses, then groups; one combined result line.
fn apply_aoe(state: &mut TrackerState, env: &mut Env<'_>, tx: &mut Transition, params: &AoeParams) -> bool {
    if params.damage <= 0 {
        return false;
    }
    let half = env.settings.half_on_save;

    let mut summaries = Vec::new();
    let characters = apply_aoe_to_vitals(
        EntityKind::Character,
        &mut state.roster.characters,
        params,
        half,
        &mut *env.rng,
    );
    let bosses = apply_aoe_to_vitals(EntityKind::Boss, &mut state.roster.bosses, params, half, &mut *env.rng);
    for (kind, outcome) in characters
        .into_iter()
        .map(|o| (EntityKind::Character, o))
        .chain(bosses.into_iter().map(|o| (EntityKind::Boss, o)))
    {
        tx.signal(TrackerSignal::DamageApplied {
            kind,
            id: outcome.id.clone(),
            damage: outcome.resolved.damage,
            killed: usize::from(outcome.downed),
        });
        if outcome.downed {
            tx.signal(TrackerSignal::EntityDowned { kind, id: outcome.id });
        }
        summaries.push(outcome.summary);
    }

    if let Some(groups) = resolve_group_aoe(state, env, tx, params) {
        summaries.extend(groups);
    }
    if summaries.is_empty() {
        return false;
    }

    let summary = summaries.join("; ");
    let message = format!("{}: {summary}", params.describe());
    log(state, env, tx, AttackResult::new(message).with_damage(params.damage).aoe());
    tx.signal(TrackerSignal::AoeResolved {
        summary,
        targets: summaries.len(),
        logged: true,
    });
    tx.refresh_turn_order();
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Healing
// ─────────────────────────────────────────────────────────────────────────────

fn heal(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    kind: EntityKind,
    id: &str,
    amount: i32,
) -> bool {
    if amount <= 0 {
        return false;
    }
    let message = match kind {
        EntityKind::Group => {
            let Some(group) = state.roster.group_mut(id) else {
                return false;
            };
            if !heal_group(group, amount) {
                return false;
            }
            format!("{}: Healed {amount} HP ({} alive)", group.name, group.count)
        }
        _ => {
            let Some(entity) = state.roster.vitals_mut(kind, id) else {
                return false;
            };
            let before = entity.current_hp();
            entity.heal(amount);
            if entity.current_hp() == before {
                return false;
            }
            format!("{}: Healed {amount} HP", entity.name())
        }
    };
    log(
        state,
        env,
        tx,
        AttackResult::new(message)
            .with_healing(amount)
            .with_target(kind, id),
    );
    tx.signal(TrackerSignal::Healed {
        kind,
        id: id.to_string(),
        amount,
    });
    tx.refresh_turn_order();
    true
}

fn heal_to_full(state: &mut TrackerState, env: &mut Env<'_>, tx: &mut Transition, id: &str) -> bool {
    let Some(group) = state.roster.group_mut(id) else {
        return false;
    };
    let before = group.total_current_hp();
    if !heal_group_to_full(group) {
        return false;
    }
    let restored = i32::try_from(group.total_current_hp() - before).unwrap_or(i32::MAX);
    let message = format!("{}: Healed to full ({} alive)", group.name, group.count);
    log(
        state,
        env,
        tx,
        AttackResult::new(message)
            .with_healing(restored)
            .with_target(EntityKind::Group, id),
    );
    tx.signal(TrackerSignal::Healed {
        kind: EntityKind::Group,
        id: id.to_string(),
        amount: restored,
    });
    tx.refresh_turn_order();
    true
}

fn temp_hp(
    state: &mut TrackerState,
    env: &mut Env<'_>,
    tx: &mut Transition,
    kind: EntityKind,
    id: &str,
    amount: i32,
    replace: bool,
) -> bool {
    if amount < 0 {
        return false;
    }
    let (name, value) = match kind {
        EntityKind::Group => {
            let Some(group) = state.roster.group_mut(id) else {
                return false;
            };
            let before = group.clone();
            set_group_temp_hp(group, amount, replace);
            if *group == before {
                return false;
            }
            (group.name.clone(), group.temp_hp)
        }
        _ => {
            let Some(entity) = state.roster.vitals_mut(kind, id) else {
                return false;
            };
            let before = entity.temp_hp();
            entity.grant_temp_hp(amount, replace);
            if entity.temp_hp() == before {
                return false;
            }
            (entity.name().to_string(), entity.temp_hp())
        }
    };
    let message = if replace {
        format!("{name}: Temp HP set to {value}")
    } else {
        format!("{name}: +{amount} temp HP ({value} total)")
    };
    log(state, env, tx, AttackResult::new(message).with_target(kind, id));
    tx.signal(TrackerSignal::TempHpChanged {
        kind,
        id: id.to_string(),
        temp_hp: value,
    });
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Turns
// ─────────────────────────────────────────────────────────────────────────────

/// Move the turn pointer. Landing on a group collection selects its first
/// group as the target.
fn advance_turn(state: &mut TrackerState, tx: &mut Transition, forward: bool) -> bool {
    let moved = if forward {
        state.turn.next().is_some()
    } else {
        state.turn.previous().is_some()
    };
    let Some(entry) = state.turn.current().filter(|_| moved) else {
        return false;
    };
    let target = entry
        .as_collection()
        .and_then(|c| c.first_id())
        .map(str::to_string);
    tracing::info!(
        name = entry.name(),
        index = state.turn.current_index,
        round = state.turn.round,
        "Turn changed"
    );

    tx.signal(TrackerSignal::TurnChanged {
        index: state.turn.current_index,
        round: state.turn.round,
    });
    if let Some(target) = target
        && state.selected_target.as_deref() != Some(target.as_str())
    {
        state.selected_target = Some(target.clone());
        tx.signal(TrackerSignal::TargetSelected { id: Some(target) });
    }
    true
}
