//! Tests for area-effect resolution
//!
//! Saves that would be random are pinned either with an override or with a DC
//! no d20 can miss (DC 1) or reach (DC 100).

use rand::SeedableRng;
use rand::rngs::StdRng;
use skirmish_types::{DamageModifier, EntityKind, SaveType, SavingThrows};

use super::*;
use crate::roster::{Boss, Character, EnemyGroup};

// ═══════════════════════════════════════════════════════════════════════════
// Test Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn flagged_group(id: &str, name: &str, max_hp: i32, count: usize) -> EnemyGroup {
    let mut group = EnemyGroup::new(id, name, max_hp, count, 10);
    group.in_aoe = true;
    group
}

fn creature_hps(group: &EnemyGroup) -> Vec<i32> {
    group.creatures.iter().map(|c| c.current_hp).collect()
}

// ═══════════════════════════════════════════════════════════════════════════
// Group Passes
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_no_save_applies_full_damage_and_clears_flag() {
    let mut groups = vec![flagged_group("g1", "Rat", 10, 1)];
    let outcomes = apply_aoe_to_groups(&mut groups, &AoeParams::new(6), true, &mut rng()).unwrap();

    assert_eq!(creature_hps(&groups[0]), vec![4]);
    assert!(!groups[0].in_aoe);
    assert_eq!(outcomes[0].resolved.damage, 6);
    assert_eq!(outcomes[0].summary, "Rat: 6 damage");
}

#[test]
fn test_failed_save_takes_full_damage() {
    let mut groups = vec![flagged_group("g1", "Rat", 10, 1)];
    let params = AoeParams::new(6).with_save(SaveType::Dexterity, 100);
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    assert_eq!(creature_hps(&groups[0]), vec![4]);
    assert!(!groups[0].in_aoe);
    assert!(outcomes[0].summary.starts_with("Rat: Fail ("));
}

#[test]
fn test_successful_save_halves_for_every_creature() {
    let mut group = flagged_group("g1", "Goblins 1", 10, 3);
    let mut throws = SavingThrows::default();
    throws.set_bonus(SaveType::Dexterity, 2);
    group.saving_throws = Some(throws);
    let mut groups = vec![group];

    let params = AoeParams::new(9).with_save(SaveType::Dexterity, 1);
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    assert_eq!(creature_hps(&groups[0]), vec![6, 6, 6]);
    assert_eq!(outcomes[0].resolved.damage, 4);
    assert!(outcomes[0].summary.contains("(½ dmg), 4 damage"));
    match outcomes[0].resolved.save {
        SaveOutcome::Rolled(roll) => {
            assert_eq!(roll.bonus, 2);
            assert!(roll.succeeded);
        }
        other => panic!("expected rolled save, got {other:?}"),
    }
}

#[test]
fn test_successful_save_without_half_takes_nothing() {
    let mut groups = vec![flagged_group("g1", "Goblins", 10, 2)];
    let params = AoeParams::new(9)
        .with_save(SaveType::Wisdom, 1)
        .half_on_save(false);
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    assert_eq!(creature_hps(&groups[0]), vec![10, 10]);
    assert!(!groups[0].in_aoe);
    assert!(outcomes[0].summary.contains("(no dmg), 0 damage"));
}

#[test]
fn test_override_summary_format() {
    let mut group = flagged_group("g1", "Goblins", 20, 2);
    group.creatures[0].current_hp = 12;
    group.recompute_aggregates();
    let mut groups = vec![group];

    let params = AoeParams::new(24).with_save(SaveType::Dexterity, 14).with_override(
        EntityKind::Group,
        "g1",
        EntityDamageOverride {
            succeeded: true,
            roll: 12,
            total_roll: 15,
            modifier: DamageModifier::Half,
            ..Default::default()
        },
    );
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    assert_eq!(
        outcomes[0].summary,
        "Goblins: Save (15: 12+3) (½ dmg), 12 damage, 1 killed"
    );
    assert_eq!(creature_hps(&groups[0]), vec![0, 8]);
    assert_eq!(groups[0].count, 1);
    assert_eq!(groups[0].current_hp, 8);
}

#[test]
fn test_override_custom_damage_and_adjustment() {
    let mut groups = vec![
        flagged_group("g1", "Orcs", 15, 1),
        flagged_group("g2", "Kobolds", 15, 1),
    ];
    let params = AoeParams::new(10)
        .with_override(
            EntityKind::Group,
            "g1",
            EntityDamageOverride {
                custom_damage: Some(3),
                adjustment: 2,
                ..Default::default()
            },
        )
        .with_override(
            EntityKind::Group,
            "g2",
            EntityDamageOverride {
                succeeded: true,
                modifier: DamageModifier::Quarter,
                adjustment: -5,
                ..Default::default()
            },
        );
    apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    // 3 + 2
    assert_eq!(creature_hps(&groups[0]), vec![10]);
    // floor(10 / 4) - 5 floors at 0
    assert_eq!(creature_hps(&groups[1]), vec![15]);
}

#[test]
fn test_only_flagged_groups_are_hit() {
    let mut groups = vec![
        flagged_group("g1", "Goblins 1", 10, 2),
        EnemyGroup::new("g2", "Goblins 2", 10, 2, 10),
    ];
    let outcomes = apply_aoe_to_groups(&mut groups, &AoeParams::new(3), true, &mut rng()).unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(creature_hps(&groups[0]), vec![7, 7]);
    assert_eq!(creature_hps(&groups[1]), vec![10, 10]);
}

#[test]
fn test_apply_to_all_ignores_flags() {
    let mut groups = vec![
        EnemyGroup::new("g1", "Goblins 1", 10, 1, 10),
        EnemyGroup::new("g2", "Goblins 2", 10, 1, 10),
    ];
    let params = AoeParams::new(3).apply_to_all();
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(groups.iter().all(|g| g.current_hp == 7));
}

#[test]
fn test_no_targets_or_bad_damage_is_noop() {
    let mut groups = vec![EnemyGroup::new("g1", "Goblins", 10, 2, 10)];
    let before = groups.clone();
    assert!(apply_aoe_to_groups(&mut groups, &AoeParams::new(5), true, &mut rng()).is_none());
    assert_eq!(groups, before);

    groups[0].in_aoe = true;
    let before = groups.clone();
    assert!(apply_aoe_to_groups(&mut groups, &AoeParams::new(0), true, &mut rng()).is_none());
    assert_eq!(groups, before);
}

#[test]
fn test_dead_creatures_are_not_hit_again() {
    let mut group = flagged_group("g1", "Goblins", 10, 3);
    group.creatures[1].take_damage(10);
    group.recompute_aggregates();
    let mut groups = vec![group];

    let outcomes = apply_aoe_to_groups(&mut groups, &AoeParams::new(4), true, &mut rng()).unwrap();
    assert_eq!(outcomes[0].distribution.affected, 2);
    assert_eq!(creature_hps(&groups[0]), vec![6, 0, 6]);
    assert_eq!(groups[0].count, 2);
}

// ═══════════════════════════════════════════════════════════════════════════
// Characters / Bosses
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_vitals_take_damage_through_temp_hp() {
    let mut hero = Character::new("c1", "Aria", 20, 15);
    hero.temp_hp = 5;
    hero.in_aoe = true;
    let mut bystander = Character::new("c2", "Bram", 20, 12);
    bystander.in_aoe = false;
    let mut characters = vec![hero, bystander];

    let outcomes = apply_aoe_to_vitals(
        EntityKind::Character,
        &mut characters,
        &AoeParams::new(8),
        true,
        &mut rng(),
    );

    assert_eq!(outcomes.len(), 1);
    assert_eq!(characters[0].temp_hp, 0);
    assert_eq!(characters[0].current_hp, 17);
    assert!(!characters[0].in_aoe);
    assert_eq!(characters[1].current_hp, 20);
}

#[test]
fn test_vitals_downed_suffix() {
    let mut hero = Character::new("c1", "Aria", 5, 15);
    hero.in_aoe = true;
    let mut characters = vec![hero];

    let params = AoeParams::new(10).with_override(
        EntityKind::Character,
        "c1",
        EntityDamageOverride {
            succeeded: false,
            roll: 4,
            total_roll: 6,
            ..Default::default()
        },
    );
    let outcomes = apply_aoe_to_vitals(EntityKind::Character, &mut characters, &params, true, &mut rng());

    assert!(outcomes[0].downed);
    assert_eq!(outcomes[0].summary, "Aria: Fail (6: 4+2), 10 damage, down");
}

#[test]
fn test_pass_setting_overrides_default_for_vitals() {
    let mut boss = Boss::new("b1", "Dragon", 100, 20);
    boss.in_aoe = true;
    let mut bosses = vec![boss];

    // Default says no damage on a save, the pass asks for half
    let params = AoeParams::new(20)
        .with_save(SaveType::Constitution, 1)
        .half_on_save(true);
    let outcomes = apply_aoe_to_vitals(EntityKind::Boss, &mut bosses, &params, false, &mut rng());

    assert_eq!(outcomes[0].resolved.damage, 10);
    assert_eq!(bosses[0].current_hp, 90);

    // Unset falls back to the default
    bosses[0].in_aoe = true;
    let params = AoeParams::new(20).with_save(SaveType::Constitution, 1);
    let outcomes = apply_aoe_to_vitals(EntityKind::Boss, &mut bosses, &params, false, &mut rng());
    assert_eq!(outcomes[0].resolved.damage, 0);
    assert_eq!(bosses[0].current_hp, 90);
}

#[test]
fn test_huge_adjustment_saturates() {
    let mut groups = vec![flagged_group("g1", "Orcs", 15, 2)];
    let params = AoeParams::new(10).with_override(
        EntityKind::Group,
        "g1",
        EntityDamageOverride {
            adjustment: i32::MAX,
            ..Default::default()
        },
    );
    let outcomes = apply_aoe_to_groups(&mut groups, &params, true, &mut rng()).unwrap();

    assert_eq!(outcomes[0].resolved.damage, i32::MAX);
    assert_eq!(creature_hps(&groups[0]), vec![0, 0]);
    assert!(groups[0].is_defeated());
}
