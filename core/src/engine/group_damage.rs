//! Distribution of a damage pool across the creatures of one group.
//!
//! Creatures are always targeted in array order; no HP-based sorting is done.

use crate::roster::EnemyGroup;

/// What a distribution pass did to a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionOutcome {
    /// Damage applied to each affected creature
    pub damage: i32,
    /// Creatures that received damage
    pub affected: usize,
    pub killed: usize,
    /// Alive creatures after the pass
    pub remaining: usize,
}

impl DistributionOutcome {
    pub fn group_emptied(&self) -> bool {
        self.remaining == 0 && self.killed > 0
    }
}

/// Number of creatures hit when `percent_affected` of the living are targeted.
pub fn affected_count(alive: usize, percent_affected: u32) -> usize {
    let percent = percent_affected.clamp(1, 100) as usize;
    (alive * percent).div_ceil(100)
}

/// Damage the given creatures (by index), each taking the full pool, then
/// refresh group aggregates.
fn distribute(group: &mut EnemyGroup, targets: &[usize], damage: i32) -> DistributionOutcome {
    let mut killed = 0;
    for &idx in targets {
        if let Some(creature) = group.creatures.get_mut(idx)
            && creature.take_damage(damage)
        {
            killed += 1;
        }
    }
    group.recompute_aggregates();

    DistributionOutcome {
        damage,
        affected: targets.len(),
        killed,
        remaining: group.count,
    }
}

/// Single-target mode: the first alive creature takes the hit.
///
/// Returns `None` (no change) when damage is not positive or nothing is alive.
pub fn damage_first_alive(group: &mut EnemyGroup, damage: i32) -> Option<DistributionOutcome> {
    if damage <= 0 {
        return None;
    }
    let first = *group.alive_indices().first()?;
    Some(distribute(group, &[first], damage))
}

/// Percentage mode: the first `ceil(alive * percent / 100)` alive creatures
/// each take the full pool.
pub fn damage_percentage(
    group: &mut EnemyGroup,
    damage: i32,
    percent_affected: u32,
) -> Option<DistributionOutcome> {
    if damage <= 0 {
        return None;
    }
    let alive = group.alive_indices();
    if alive.is_empty() {
        return None;
    }
    let take = affected_count(alive.len(), percent_affected);
    Some(distribute(group, &alive[..take], damage))
}

/// AoE mode: every alive creature takes the full pool.
///
/// Zero damage is allowed here (a successful save with no damage still
/// counts as the group being caught in the area).
pub fn damage_every_alive(group: &mut EnemyGroup, damage: i32) -> DistributionOutcome {
    let alive = group.alive_indices();
    if damage <= 0 {
        group.recompute_aggregates();
        return DistributionOutcome {
            damage: 0,
            affected: alive.len(),
            killed: 0,
            remaining: group.count,
        };
    }
    distribute(group, &alive, damage)
}

// ─────────────────────────────────────────────────────────────────────────────
// Log messages
// ─────────────────────────────────────────────────────────────────────────────

pub fn kill_suffix(outcome: &DistributionOutcome) -> String {
    match (outcome.killed, outcome.remaining) {
        (0, _) => String::new(),
        (k, 0) => format!(", {k} killed (all defeated)"),
        (k, _) => format!(", {k} killed"),
    }
}
