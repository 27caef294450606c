use skirmish_types::EntityKind;

use super::*;

fn goblins(name: &str, count: usize) -> EnemyGroup {
    EnemyGroup::new(format!("g-{name}"), name, 7, count, 12)
}

#[test]
fn test_base_name_strips_single_trailing_number() {
    assert_eq!(base_name("Goblins 1"), "Goblins");
    assert_eq!(base_name("Goblins   12"), "Goblins");
    assert_eq!(base_name("Goblins"), "Goblins");
    assert_eq!(base_name("Goblins2"), "Goblins2");
    assert_eq!(base_name("Goblins 2 "), "Goblins 2 ");
    assert_eq!(base_name("Wave 2 3"), "Wave 2");
}

#[test]
fn test_new_group_spawns_one_creature_per_count() {
    let group = goblins("Goblins", 4);
    assert_eq!(group.creatures.len(), 4);
    assert_eq!(group.count, 4);
    assert_eq!(group.original_count, 4);
    assert_eq!(group.current_hp, 7);
    assert_eq!(group.total_max_hp(), 28);
    assert_eq!(group.creatures[0].id, "g-Goblins-1");
    assert_eq!(group.creatures[3].id, "g-Goblins-4");
}

#[test]
fn test_recompute_ignores_removed_creatures() {
    let mut group = goblins("Goblins", 3);
    group.creatures[0].current_hp = 0;
    group.creatures[0].is_removed = true;
    group.creatures[1].current_hp = 4;
    group.recompute_aggregates();

    assert_eq!(group.count, 2);
    // (4 + 7) / 2 = 5.5 -> 6
    assert_eq!(group.current_hp, 6);
    assert_eq!(group.original_count, 3);
}

#[test]
fn test_recompute_with_no_survivors() {
    let mut group = goblins("Goblins", 2);
    for creature in &mut group.creatures {
        creature.take_damage(50);
    }
    group.recompute_aggregates();
    assert_eq!(group.count, 0);
    assert_eq!(group.current_hp, 0);
    assert!(group.is_defeated());
}

#[test]
fn test_creature_damage_marks_removed_only_at_zero() {
    let mut creature = Creature::new("c", 10);
    creature.temp_hp = 3;
    assert!(!creature.take_damage(12));
    assert_eq!(creature.current_hp, 1);
    assert!(!creature.is_removed);
    assert!(creature.take_damage(1));
    assert!(creature.is_removed);
    // Dead creatures ignore further damage
    assert!(!creature.take_damage(5));
}

#[test]
fn test_restore_all_brings_back_removed() {
    let mut group = goblins("Goblins", 2);
    group.creatures[0].take_damage(100);
    group.recompute_aggregates();
    assert_eq!(group.count, 1);

    group.restore_all();
    assert_eq!(group.count, 2);
    assert!(group.creatures.iter().all(|c| c.current_hp == 7 && !c.is_removed));
}

#[test]
fn test_next_group_name_picks_free_number() {
    let mut roster = Roster::new();
    roster.groups.push(goblins("Goblins 1", 1));
    roster.groups.push(goblins("Goblins 3", 1));
    roster.groups.push(goblins("Orcs", 1));
    assert_eq!(roster.next_group_name("Goblins"), "Goblins 4");
    assert_eq!(roster.next_group_name("Orcs"), "Orcs 2");
    assert_eq!(roster.next_group_name("Kobolds"), "Kobolds 1");
}

#[test]
fn test_aoe_flags_and_removal() {
    let mut roster = Roster::new();
    roster.characters.push(Character::new("c1", "Aria", 30, 15));
    roster.groups.push(goblins("Goblins", 2));

    assert!(roster.set_in_aoe(EntityKind::Character, "c1", true));
    assert!(!roster.set_in_aoe(EntityKind::Character, "c1", true));
    assert!(!roster.set_in_aoe(EntityKind::Boss, "missing", true));
    assert!(roster.clear_aoe_flags());
    assert!(!roster.clear_aoe_flags());

    assert_eq!(roster.kind_of("g-Goblins"), Some(EntityKind::Group));
    assert!(roster.remove(EntityKind::Group, "g-Goblins"));
    assert!(!roster.remove(EntityKind::Group, "g-Goblins"));
    assert_eq!(roster.len(), 1);
}

#[test]
fn test_vitals_damage_and_heal() {
    let mut boss = Boss::new("b1", "Dragon", 100, 20);
    boss.grant_temp_hp(10, true);
    assert!(!boss.take_damage(25));
    assert_eq!(boss.temp_hp, 0);
    assert_eq!(boss.current_hp, 85);

    boss.heal(50);
    assert_eq!(boss.current_hp, 100);

    assert!(boss.take_damage(150));
    assert!(boss.is_down());
    // Already down: further damage does not count as a new knockout
    assert!(!boss.take_damage(5));
}

#[test]
fn test_duplicate_group_renumbers_and_heals() {
    let mut roster = Roster::new();
    let mut source = EnemyGroup::new("g1", "Goblins 1", 7, 3, 12);
    source.creatures[0].take_damage(7);
    source.in_aoe = true;
    source.recompute_aggregates();
    roster.groups.push(source);

    let copy = roster.duplicate_group("g1", "g2").unwrap();
    assert_eq!(copy.name, "Goblins 2");
    assert_eq!(copy.id, "g2");
    assert_eq!(copy.creatures[2].id, "g2-3");
    assert_eq!(copy.count, 3);
    assert!(!copy.in_aoe);
    assert!(copy.creatures.iter().all(|c| c.current_hp == 7 && !c.is_removed));

    // Source untouched
    assert_eq!(roster.group("g1").map(|g| g.count), Some(2));
    assert!(roster.duplicate_group("missing", "g3").is_none());
}

#[test]
fn test_reset_group_restores_every_creature() {
    let mut roster = Roster::new();
    roster.groups.push(goblins("Goblins", 2));
    assert!(!roster.reset_group("g-Goblins"));

    let group = roster.group_mut("g-Goblins").unwrap();
    group.creatures[1].take_damage(100);
    group.recompute_aggregates();
    assert!(roster.reset_group("g-Goblins"));
    assert_eq!(roster.group("g-Goblins").map(|g| g.count), Some(2));
}

#[test]
fn test_update_replaces_only_known_entities() {
    let mut roster = Roster::new();
    roster.characters.push(Character::new("c1", "Aria", 30, 15));

    let mut edited = Character::new("c1", "Aria", 35, 15);
    edited.ac = 16;
    assert!(roster.update_character(edited.clone()));
    assert!(!roster.update_character(edited));
    assert!(!roster.update_character(Character::new("c9", "Nobody", 1, 1)));
    assert_eq!(roster.character("c1").map(|c| c.ac), Some(16));
}
