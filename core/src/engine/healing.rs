use crate::combat::{apply_healing, set_temp_hp};
use crate::roster::EnemyGroup;

/// Heal every living creature by `amount`, capped at the group's max HP.
/// Dead creatures stay dead. Returns true if any HP changed.
pub fn heal_group(group: &mut EnemyGroup, amount: i32) -> bool {
    if amount <= 0 {
        return false;
    }
    let max_hp = group.max_hp;
    let mut changed = false;
    for creature in group.creatures.iter_mut().filter(|c| c.is_alive()) {
        let healed = apply_healing(amount, creature.current_hp, max_hp);
        changed |= healed != creature.current_hp;
        creature.current_hp = healed;
    }
    group.recompute_aggregates();
    changed
}

/// Restore every creature, including the fallen, to full HP.
pub fn heal_group_to_full(group: &mut EnemyGroup) -> bool {
    let before = group.clone();
    group.restore_all();
    *group != before
}

/// Grant temp HP to every living creature. Returns false when there was
/// nothing to grant it to.
pub fn set_group_temp_hp(group: &mut EnemyGroup, amount: i32, replace: bool) -> bool {
    if amount < 0 || group.is_defeated() {
        return false;
    }
    for creature in group.creatures.iter_mut().filter(|c| c.is_alive()) {
        creature.temp_hp = set_temp_hp(amount, creature.temp_hp, replace).max(0);
    }
    group.recompute_aggregates();
    true
}
