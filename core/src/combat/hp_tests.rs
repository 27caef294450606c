use super::*;

// ═══════════════════════════════════════════════════════════════════════════
// Temp HP Absorption
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_temp_hp_absorbs_before_current() {
    let result = apply_damage_with_temp_hp(15, 12, 3);
    assert_eq!(result.new_temp_hp, 0);
    assert_eq!(result.new_current_hp, 0);
}

#[test]
fn test_temp_hp_partially_consumed() {
    let result = apply_damage_with_temp_hp(4, 20, 10);
    assert_eq!(result.new_temp_hp, 6);
    assert_eq!(result.new_current_hp, 20);
}

#[test]
fn test_non_positive_damage_is_noop() {
    for damage in [0, -5] {
        let result = apply_damage_with_temp_hp(damage, 9, 4);
        assert_eq!(result.new_current_hp, 9);
        assert_eq!(result.new_temp_hp, 4);
    }
}

#[test]
fn test_absorption_law_holds_over_a_grid() {
    for damage in 1..40 {
        for current in 0..25 {
            for temp in 0..15 {
                let r = apply_damage_with_temp_hp(damage, current, temp);
                assert_eq!(r.new_temp_hp, (temp - damage).max(0));
                let expected = (current - (damage - temp).max(0)).max(0);
                assert_eq!(r.new_current_hp, expected);
                assert!(r.new_current_hp >= 0);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Healing / Temp HP / Saves
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_healing_never_exceeds_max() {
    for amount in -3..30 {
        for current in 0..=20 {
            assert!(apply_healing(amount, current, 20) <= 20);
        }
    }
    assert_eq!(apply_healing(5, 10, 20), 15);
    assert_eq!(apply_healing(0, 10, 20), 10);
}

#[test]
fn test_set_temp_hp_replace_and_stack() {
    assert_eq!(set_temp_hp(5, 3, true), 5);
    assert_eq!(set_temp_hp(5, 3, false), 8);
    assert_eq!(set_temp_hp(-1, 3, true), 3);
    assert_eq!(set_temp_hp(0, 3, true), 0);
}

#[test]
fn test_huge_amounts_saturate() {
    assert_eq!(apply_healing(i32::MAX, 5, 20), 20);
    assert_eq!(apply_healing(i32::MAX, 0, i32::MAX), i32::MAX);
    assert_eq!(set_temp_hp(i32::MAX, 5, false), i32::MAX);
    assert_eq!(set_temp_hp(i32::MAX, 0, true), i32::MAX);
}

#[test]
fn test_save_damage_law() {
    for d in 0..30 {
        assert_eq!(calculate_save_damage(d, false, true), d);
        assert_eq!(calculate_save_damage(d, false, false), d);
        assert_eq!(calculate_save_damage(d, true, true), d / 2);
        assert_eq!(calculate_save_damage(d, true, false), 0);
    }
}

#[test]
fn test_rounded_mean_rounds_half_up() {
    assert_eq!(rounded_mean(20, 3), 7);
    assert_eq!(rounded_mean(15, 2), 8);
    assert_eq!(rounded_mean(14, 4), 4);
    assert_eq!(rounded_mean(0, 0), 0);
}
