//! Hit point arithmetic shared by every damage and healing path.
//!
//! All functions are pure and operate on plain HP values so they can be used
//! for characters, bosses and individual creatures alike.

/// Result of applying damage to a `(current, temp)` HP pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageApplied {
    pub new_current_hp: i32,
    pub new_temp_hp: i32,
}

/// Apply damage, consuming temporary HP first.
///
/// Non-positive damage is a no-op. Temp HP absorbs 1:1 up to its full value,
/// the remainder comes off current HP, floored at 0.
pub fn apply_damage_with_temp_hp(damage: i32, current_hp: i32, temp_hp: i32) -> DamageApplied {
    if damage <= 0 {
        return DamageApplied {
            new_current_hp: current_hp,
            new_temp_hp: temp_hp,
        };
    }

    let temp = temp_hp.max(0);
    let absorbed = damage.min(temp);
    let remaining = damage - absorbed;

    DamageApplied {
        new_current_hp: (current_hp - remaining).max(0),
        new_temp_hp: temp - absorbed,
    }
}

/// Heal up to `max_hp`. Never touches temp HP.
pub fn apply_healing(amount: i32, current_hp: i32, max_hp: i32) -> i32 {
    if amount <= 0 {
        return current_hp;
    }
    current_hp.saturating_add(amount).min(max_hp)
}

/// New temp HP value. `replace` overwrites, otherwise the amount stacks.
/// Stacking saturates at `i32::MAX`.
pub fn set_temp_hp(amount: i32, existing: i32, replace: bool) -> i32 {
    if amount < 0 {
        return existing;
    }
    if replace { amount } else { existing.saturating_add(amount) }
}

/// Damage taken after a saving throw.
pub fn calculate_save_damage(base_damage: i32, saved: bool, half_on_save: bool) -> i32 {
    match (saved, half_on_save) {
        (false, _) => base_damage,
        (true, true) => base_damage / 2,
        (true, false) => 0,
    }
}

/// Mean HP rounded half-up, matching how the tracker displays group HP.
pub fn rounded_mean(total: i64, count: usize) -> i32 {
    if count == 0 {
        return 0;
    }
    let n = count as i64;
    // floor((2 * total + n) / (2 * n)) == round-half-up for non-negative totals
    ((2 * total + n).div_euclid(2 * n)) as i32
}
