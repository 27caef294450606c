use super::group_damage::*;
use crate::roster::EnemyGroup;

fn group_with_hp(hps: &[i32]) -> EnemyGroup {
    let mut group = EnemyGroup::new("g1", "Goblins 1", 12, hps.len(), 10);
    for (creature, &hp) in group.creatures.iter_mut().zip(hps) {
        creature.current_hp = hp;
    }
    group.recompute_aggregates();
    group
}

fn assert_aggregate_invariant(group: &EnemyGroup) {
    let alive: Vec<_> = group
        .creatures
        .iter()
        .filter(|c| !c.is_removed && c.current_hp > 0)
        .collect();
    assert_eq!(group.count, alive.len());
    let expected = if alive.is_empty() {
        0
    } else {
        let sum: i32 = alive.iter().map(|c| c.current_hp).sum();
        (sum as f64 / alive.len() as f64).round() as i32
    };
    assert_eq!(group.current_hp, expected);
}

#[test]
fn test_single_target_kill_through_temp_hp() {
    let mut group = group_with_hp(&[12, 12]);
    group.creatures[0].temp_hp = 3;
    group.creatures[1].temp_hp = 3;

    let outcome = damage_first_alive(&mut group, 15).unwrap();

    assert_eq!(group.creatures[0].current_hp, 0);
    assert_eq!(group.creatures[0].temp_hp, 0);
    assert!(group.creatures[0].is_removed);
    assert_eq!(group.creatures[1].current_hp, 12);
    assert_eq!(group.creatures[1].temp_hp, 3);
    assert_eq!(group.count, 1);
    assert_eq!(group.current_hp, 12);
    assert_eq!(outcome.killed, 1);
    assert_eq!(outcome.affected, 1);
    assert_aggregate_invariant(&group);
}

#[test]
fn test_single_target_skips_removed_creatures() {
    let mut group = group_with_hp(&[12, 9]);
    damage_first_alive(&mut group, 20).unwrap();
    damage_first_alive(&mut group, 4).unwrap();

    assert_eq!(group.creatures[0].current_hp, 0);
    assert_eq!(group.creatures[1].current_hp, 5);
    assert_aggregate_invariant(&group);
}

#[test]
fn test_single_target_on_empty_group_is_none() {
    let mut group = group_with_hp(&[3]);
    let outcome = damage_first_alive(&mut group, 10).unwrap();
    assert!(outcome.group_emptied());
    assert!(damage_first_alive(&mut group, 10).is_none());
}

#[test]
fn test_percentage_affects_ceil_of_alive() {
    let mut group = group_with_hp(&[10, 10, 10]);

    let outcome = damage_percentage(&mut group, 5, 50).unwrap();

    assert_eq!(outcome.affected, 2);
    let mut hps: Vec<i32> = group.creatures.iter().map(|c| c.current_hp).collect();
    assert_eq!(hps, vec![5, 5, 10]);
    hps.sort();
    assert_eq!(hps, vec![5, 5, 10]);
    assert_eq!(group.count, 3);
    assert_eq!(group.current_hp, 7);
    assert_aggregate_invariant(&group);
}

#[test]
fn test_percentage_uses_array_order_not_hp() {
    let mut group = group_with_hp(&[10, 2, 10, 10]);
    damage_percentage(&mut group, 3, 25).unwrap();
    let hps: Vec<i32> = group.creatures.iter().map(|c| c.current_hp).collect();
    assert_eq!(hps, vec![7, 2, 10, 10]);
}

#[test]
fn test_percentage_default_hits_everyone() {
    let mut group = group_with_hp(&[4, 10, 6]);
    let outcome = damage_percentage(&mut group, 6, 100).unwrap();
    assert_eq!(outcome.affected, 3);
    assert_eq!(outcome.killed, 2);
    assert_eq!(group.count, 1);
    assert_eq!(group.current_hp, 4);
    assert_aggregate_invariant(&group);
}

#[test]
fn test_affected_count_rounds_up_and_clamps() {
    assert_eq!(affected_count(3, 50), 2);
    assert_eq!(affected_count(10, 10), 1);
    assert_eq!(affected_count(10, 11), 2);
    assert_eq!(affected_count(5, 0), 1);
    assert_eq!(affected_count(5, 250), 5);
    assert_eq!(affected_count(0, 100), 0);
}

#[test]
fn test_non_positive_damage_leaves_group_untouched() {
    let mut group = group_with_hp(&[10, 10]);
    let before = group.clone();
    assert!(damage_first_alive(&mut group, 0).is_none());
    assert!(damage_percentage(&mut group, -4, 100).is_none());
    assert_eq!(group, before);
}

#[test]
fn test_every_alive_with_zero_damage_changes_nothing() {
    let mut group = group_with_hp(&[10, 8]);
    let before = group.clone();
    let outcome = damage_every_alive(&mut group, 0);
    assert_eq!(outcome.affected, 2);
    assert_eq!(outcome.killed, 0);
    assert_eq!(group, before);
}

#[test]
fn test_kill_suffix_wording() {
    let mut group = group_with_hp(&[1, 1]);
    let outcome = damage_percentage(&mut group, 1, 50).unwrap();
    assert_eq!(kill_suffix(&outcome), ", 1 killed");
    let outcome = damage_first_alive(&mut group, 1).unwrap();
    assert_eq!(kill_suffix(&outcome), ", 1 killed (all defeated)");
}
