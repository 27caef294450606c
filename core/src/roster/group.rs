use serde::{Deserialize, Serialize};
use skirmish_types::SavingThrows;

use super::combatant::Defenses;
use crate::combat::{apply_damage_with_temp_hp, rounded_mean};
use crate::storage::GroupRecord;

/// One individually tracked monster inside a group.
///
/// Creatures are never deleted from their group; a dead creature stays in the
/// array with `is_removed` set so displays keep a stable layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creature {
    pub id: String,
    pub current_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    #[serde(default)]
    pub is_removed: bool,
}

impl Creature {
    pub fn new(id: impl Into<String>, hp: i32) -> Self {
        Self {
            id: id.into(),
            current_hp: hp,
            temp_hp: 0,
            is_removed: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        !self.is_removed && self.current_hp > 0
    }

    /// Returns true when this hit killed the creature.
    pub fn take_damage(&mut self, damage: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        let applied = apply_damage_with_temp_hp(damage, self.current_hp, self.temp_hp);
        self.current_hp = applied.new_current_hp;
        self.temp_hp = applied.new_temp_hp;
        if self.current_hp == 0 {
            self.is_removed = true;
            return true;
        }
        false
    }
}

/// A group of identical monsters sharing a turn, tracked creature by creature.
///
/// `count`, `current_hp` and `temp_hp` are aggregates over `creatures` and must be
/// refreshed with [`EnemyGroup::recompute_aggregates`] after any change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GroupRecord")]
pub struct EnemyGroup {
    pub id: String,
    pub name: String,
    /// Per-creature maximum
    pub max_hp: i32,
    /// Mean HP of alive creatures, rounded
    pub current_hp: i32,
    pub ac: i32,
    /// Alive creatures
    pub count: usize,
    /// Creatures at creation; only used for max HP display
    pub original_count: usize,
    pub initiative: i32,
    pub in_aoe: bool,
    pub creatures: Vec<Creature>,
    #[serde(skip_serializing_if = "Defenses::is_empty")]
    pub defenses: Defenses,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
    pub temp_hp: i32,
}

impl EnemyGroup {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        max_hp: i32,
        count: usize,
        initiative: i32,
    ) -> Self {
        let id = id.into();
        let creatures = spawn_creatures(&id, count, max_hp);
        let mut group = Self {
            id,
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            ac: 10,
            count,
            original_count: count,
            initiative,
            in_aoe: false,
            creatures,
            defenses: Defenses::default(),
            saving_throws: None,
            temp_hp: 0,
        };
        group.recompute_aggregates();
        group
    }

    pub fn alive(&self) -> impl Iterator<Item = &Creature> {
        self.creatures.iter().filter(|c| c.is_alive())
    }

    /// Indices of alive creatures, in array order.
    pub fn alive_indices(&self) -> Vec<usize> {
        self.creatures
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    pub fn is_defeated(&self) -> bool {
        self.count == 0
    }

    /// Refresh `count`, `current_hp` and `temp_hp` from the creature list.
    /// The group's temp HP is the largest any living creature still holds.
    pub fn recompute_aggregates(&mut self) {
        let (total, alive) = self
            .alive()
            .fold((0i64, 0usize), |(sum, n), c| (sum + c.current_hp.max(0) as i64, n + 1));
        self.count = alive;
        self.current_hp = rounded_mean(total, alive);
        self.temp_hp = self.alive().map(|c| c.temp_hp.max(0)).max().unwrap_or(0);
    }

    /// Max HP across the group as created, for display.
    pub fn total_max_hp(&self) -> i64 {
        self.original_count as i64 * self.max_hp as i64
    }

    /// Sum of current HP across alive creatures.
    pub fn total_current_hp(&self) -> i64 {
        self.alive().map(|c| c.current_hp as i64).sum()
    }

    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Give the group a new id and renumber its creatures to match.
    pub fn assign_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        for (n, creature) in self.creatures.iter_mut().enumerate() {
            creature.id = format!("{}-{}", self.id, n + 1);
        }
    }

    /// Bring every creature back at full HP with no temp HP.
    pub fn restore_all(&mut self) {
        for creature in &mut self.creatures {
            creature.current_hp = self.max_hp;
            creature.temp_hp = 0;
            creature.is_removed = false;
        }
        self.recompute_aggregates();
    }
}

pub(crate) fn spawn_creatures(group_id: &str, count: usize, hp: i32) -> Vec<Creature> {
    (1..=count)
        .map(|n| {
            let mut creature = Creature::new(format!("{group_id}-{n}"), hp);
            creature.is_removed = hp <= 0;
            creature
        })
        .collect()
}

/// Strip one trailing ` <number>` token: `"Goblins 2"` -> `"Goblins"`.
///
/// The number must be preceded by whitespace; `"Goblins2"` and `"Goblins 2 "`
/// are returned unchanged.
pub fn base_name(name: &str) -> &str {
    let without_digits = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == name.len() {
        return name;
    }
    let prefix = without_digits.trim_end();
    if prefix.len() == without_digits.len() {
        return name;
    }
    prefix
}
