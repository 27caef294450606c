//! Area-effect resolution.
//!
//! Every entity caught in the area resolves its own saving throw (or takes a
//! caller-supplied result), then takes the resulting damage. Groups apply it
//! to every living creature. The `in_aoe` flag is cleared on everything
//! touched.

use hashbrown::HashMap;
use rand::Rng;
use skirmish_types::{DamageModifier, EntityKind, SaveType, SavingThrows};

use super::group_damage::{DistributionOutcome, damage_every_alive, kill_suffix};
use crate::combat::calculate_save_damage;
use crate::dice::{SaveRoll, roll_saving_throw};
use crate::roster::{EnemyGroup, Vitals};

/// A save rolled outside the tracker, plus how to scale the damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityDamageOverride {
    pub succeeded: bool,
    pub roll: i32,
    pub total_roll: i32,
    pub modifier: DamageModifier,
    /// Replaces the scaled damage entirely
    pub custom_damage: Option<i32>,
    /// Added after scaling; the result is floored at 0
    pub adjustment: i32,
}

/// Parameters for one area-effect pass.
#[derive(Debug, Clone, Default)]
pub struct AoeParams {
    pub damage: i32,
    pub save_type: Option<SaveType>,
    pub save_dc: Option<i32>,
    /// `None` falls back to the tracker's configured default
    pub half_on_save: Option<bool>,
    /// Keyed `"<kind>-<id>"`, e.g. `"group-g1"`
    pub entity_damage_modifiers: HashMap<String, EntityDamageOverride>,
    /// Hit every group, not just the ones flagged `in_aoe`
    pub apply_to_all: bool,
}

impl AoeParams {
    pub fn new(damage: i32) -> Self {
        Self {
            damage,
            ..Self::default()
        }
    }

    pub fn with_save(mut self, save_type: SaveType, dc: i32) -> Self {
        self.save_type = Some(save_type);
        self.save_dc = Some(dc);
        self
    }

    pub fn half_on_save(mut self, half: bool) -> Self {
        self.half_on_save = Some(half);
        self
    }

    pub fn with_override(mut self, kind: EntityKind, id: &str, value: EntityDamageOverride) -> Self {
        self.entity_damage_modifiers.insert(kind.override_key(id), value);
        self
    }

    pub fn apply_to_all(mut self) -> Self {
        self.apply_to_all = true;
        self
    }

    /// Header for the combined log line, e.g. `"AoE 12 dmg, DC 14 DEX"`.
    pub fn describe(&self) -> String {
        match (self.save_type, self.save_dc) {
            (Some(save), Some(dc)) => {
                format!("AoE {} dmg, DC {} {}", self.damage, dc, save.abbrev())
            }
            _ => format!("AoE {} dmg", self.damage),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Save Resolution
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No save was asked for
    NotRequired,
    Rolled(SaveRoll),
    /// Supplied by the caller through an override
    Reported { roll: i32, total: i32, succeeded: bool },
}

impl SaveOutcome {
    fn label(&self) -> Option<String> {
        let (roll, total, succeeded) = match *self {
            SaveOutcome::NotRequired => return None,
            SaveOutcome::Rolled(r) => (r.roll, r.total, r.succeeded),
            SaveOutcome::Reported {
                roll,
                total,
                succeeded,
            } => (roll, total, succeeded),
        };
        let verb = if succeeded { "Save" } else { "Fail" };
        Some(format!("{verb} ({total}: {roll}{:+})", total.saturating_sub(roll)))
    }
}

/// Damage one entity takes from the area, with how it was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDamage {
    pub save: SaveOutcome,
    pub damage: i32,
    tag: String,
}

impl ResolvedDamage {
    /// `"<name>: Save (15: 12+3) (½ dmg), 6 damage<extra>"`
    pub fn summary(&self, name: &str, extra: &str) -> String {
        match self.save.label() {
            Some(save) => format!("{name}: {save}{}, {} damage{extra}", self.tag, self.damage),
            None => format!("{name}: {} damage{extra}", self.damage),
        }
    }
}

/// Decide the damage for one entity: caller override first, then a rolled
/// save when the pass names one, otherwise full damage.
///
/// `params.half_on_save` wins over `default_half_on_save` when set.
pub fn resolve_entity_damage(
    params: &AoeParams,
    default_half_on_save: bool,
    override_key: &str,
    saving_throws: Option<&SavingThrows>,
    rng: &mut impl Rng,
) -> ResolvedDamage {
    if let Some(ov) = params.entity_damage_modifiers.get(override_key) {
        let (scaled, mut tag) = match ov.custom_damage {
            Some(custom) => (custom, " (custom)".to_string()),
            None => (ov.modifier.apply(params.damage), ov.modifier.tag().to_string()),
        };
        if ov.adjustment != 0 {
            tag.push_str(&format!(" ({:+} adj)", ov.adjustment));
        }
        return ResolvedDamage {
            save: SaveOutcome::Reported {
                roll: ov.roll,
                total: ov.total_roll,
                succeeded: ov.succeeded,
            },
            damage: scaled.saturating_add(ov.adjustment).max(0),
            tag,
        };
    }

    if let (Some(save_type), Some(dc)) = (params.save_type, params.save_dc) {
        let half_on_save = params.half_on_save.unwrap_or(default_half_on_save);
        let bonus = saving_throws.map(|s| s.bonus(save_type)).unwrap_or(0);
        let roll = roll_saving_throw(rng, bonus, dc);
        let damage = calculate_save_damage(params.damage, roll.succeeded, half_on_save);
        let tag = match (roll.succeeded, half_on_save) {
            (false, _) => String::new(),
            (true, true) => DamageModifier::Half.tag().to_string(),
            (true, false) => DamageModifier::None.tag().to_string(),
        };
        return ResolvedDamage {
            save: SaveOutcome::Rolled(roll),
            damage,
            tag,
        };
    }

    ResolvedDamage {
        save: SaveOutcome::NotRequired,
        damage: params.damage,
        tag: String::new(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

/// Per-group result of an AoE pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAoeOutcome {
    pub group_id: String,
    pub resolved: ResolvedDamage,
    pub distribution: DistributionOutcome,
    pub summary: String,
}

/// Resolve the area against groups. Returns `None` without touching anything
/// when damage is not positive or no group is targeted.
pub fn apply_aoe_to_groups(
    groups: &mut [EnemyGroup],
    params: &AoeParams,
    default_half_on_save: bool,
    rng: &mut impl Rng,
) -> Option<Vec<GroupAoeOutcome>> {
    if params.damage <= 0 {
        return None;
    }
    if !groups.iter().any(|g| params.apply_to_all || g.in_aoe) {
        return None;
    }

    let mut outcomes = Vec::new();
    for group in groups.iter_mut().filter(|g| params.apply_to_all || g.in_aoe) {
        let key = EntityKind::Group.override_key(&group.id);
        let resolved =
            resolve_entity_damage(params, default_half_on_save, &key, group.saving_throws.as_ref(), rng);
        let distribution = damage_every_alive(group, resolved.damage);
        group.in_aoe = false;

        let summary = resolved.summary(&group.name, &kill_suffix(&distribution));
        tracing::debug!(group = %group.id, damage = resolved.damage, killed = distribution.killed, "AoE resolved for group");
        outcomes.push(GroupAoeOutcome {
            group_id: group.id.clone(),
            resolved,
            distribution,
            summary,
        });
    }
    Some(outcomes)
}

// ─────────────────────────────────────────────────────────────────────────────
// Characters / Bosses
// ─────────────────────────────────────────────────────────────────────────────

/// Per-entity result for single-pool entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VitalsAoeOutcome {
    pub id: String,
    pub resolved: ResolvedDamage,
    pub downed: bool,
    pub summary: String,
}

/// Resolve the area against characters or bosses flagged `in_aoe`.
pub fn apply_aoe_to_vitals<V: Vitals>(
    kind: EntityKind,
    entities: &mut [V],
    params: &AoeParams,
    default_half_on_save: bool,
    rng: &mut impl Rng,
) -> Vec<VitalsAoeOutcome> {
    if params.damage <= 0 {
        return Vec::new();
    }

    let mut outcomes = Vec::new();
    for entity in entities.iter_mut().filter(|e| e.in_aoe()) {
        let key = kind.override_key(entity.id());
        let resolved =
            resolve_entity_damage(params, default_half_on_save, &key, entity.saving_throws(), rng);
        let downed = entity.take_damage(resolved.damage);
        entity.set_in_aoe(false);

        let extra = if downed { ", down" } else { "" };
        outcomes.push(VitalsAoeOutcome {
            id: entity.id().to_string(),
            summary: resolved.summary(entity.name(), extra),
            resolved,
            downed,
        });
    }
    outcomes
}
