use serde::Deserialize;
use skirmish_types::SavingThrows;

use crate::roster::{Creature, Defenses, EnemyGroup, spawn_creatures};

/// A group as found on disk, before repair.
///
/// Snapshots written before creatures were tracked individually carry only
/// `count` and `currentHp`; some lack `count` or `originalCount` as well.
/// Every [`EnemyGroup`] is deserialized through this record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: String,
    pub name: String,
    pub max_hp: i32,
    #[serde(default)]
    pub current_hp: Option<i32>,
    #[serde(default = "crate::serde_defaults::default_ac")]
    pub ac: i32,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub original_count: Option<usize>,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub in_aoe: bool,
    #[serde(default)]
    pub creatures: Option<Vec<Creature>>,
    #[serde(default)]
    pub defenses: Defenses,
    #[serde(default)]
    pub saving_throws: Option<SavingThrows>,
    #[serde(default)]
    pub temp_hp: i32,
}

impl From<GroupRecord> for EnemyGroup {
    fn from(record: GroupRecord) -> Self {
        let creatures = match record.creatures {
            Some(creatures) if !creatures.is_empty() => creatures,
            _ => {
                let count = record.count.or(record.original_count).unwrap_or(1);
                let hp = record.current_hp.unwrap_or(record.max_hp);
                tracing::warn!(group = %record.id, count, hp, "Synthesizing creatures for legacy group");
                let mut spawned = spawn_creatures(&record.id, count, hp);
                for creature in spawned.iter_mut().filter(|c| c.is_alive()) {
                    creature.temp_hp = record.temp_hp.max(0);
                }
                spawned
            }
        };
        let original_count = record.original_count.unwrap_or(creatures.len());

        let mut group = EnemyGroup {
            id: record.id,
            name: record.name,
            max_hp: record.max_hp,
            current_hp: 0,
            ac: record.ac,
            count: 0,
            original_count,
            initiative: record.initiative,
            in_aoe: record.in_aoe,
            creatures,
            defenses: record.defenses,
            saving_throws: record.saving_throws,
            temp_hp: record.temp_hp,
        };
        group.recompute_aggregates();
        group
    }
}
