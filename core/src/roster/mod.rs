mod combatant;
mod group;

#[cfg(test)]
mod roster_tests;

pub use combatant::{Boss, Character, Defenses, Vitals};
pub use group::{Creature, EnemyGroup, base_name};
pub(crate) use group::spawn_creatures;

use skirmish_types::EntityKind;

/// The live roster: characters, bosses and monster groups in encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub characters: Vec<Character>,
    pub bosses: Vec<Boss>,
    pub groups: Vec<EnemyGroup>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Lookup ---

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: &str) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn boss(&self, id: &str) -> Option<&Boss> {
        self.bosses.iter().find(|b| b.id == id)
    }

    pub fn boss_mut(&mut self, id: &str) -> Option<&mut Boss> {
        self.bosses.iter_mut().find(|b| b.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&EnemyGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut EnemyGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    /// Characters and bosses share the single-HP-pool damage rules.
    pub fn vitals_mut(&mut self, kind: EntityKind, id: &str) -> Option<&mut dyn Vitals> {
        match kind {
            EntityKind::Character => self.character_mut(id).map(|c| c as &mut dyn Vitals),
            EntityKind::Boss => self.boss_mut(id).map(|b| b as &mut dyn Vitals),
            EntityKind::Group => None,
        }
    }

    pub fn contains(&self, kind: EntityKind, id: &str) -> bool {
        self.name_of(kind, id).is_some()
    }

    /// Whether any entity of any kind uses this id.
    pub fn id_in_use(&self, id: &str) -> bool {
        self.character(id).is_some() || self.boss(id).is_some() || self.group(id).is_some()
    }

    pub fn name_of(&self, kind: EntityKind, id: &str) -> Option<&str> {
        match kind {
            EntityKind::Character => self.character(id).map(|c| c.name.as_str()),
            EntityKind::Boss => self.boss(id).map(|b| b.name.as_str()),
            EntityKind::Group => self.group(id).map(|g| g.name.as_str()),
        }
    }

    /// Find which kind of entity owns an id.
    pub fn kind_of(&self, id: &str) -> Option<EntityKind> {
        [EntityKind::Character, EntityKind::Boss, EntityKind::Group]
            .into_iter()
            .find(|kind| self.contains(*kind, id))
    }

    // --- Mutation ---

    /// Replace the character with the same id. Returns false if unknown or
    /// unchanged.
    pub fn update_character(&mut self, character: Character) -> bool {
        match self.character_mut(&character.id) {
            Some(slot) if *slot != character => {
                *slot = character;
                true
            }
            _ => false,
        }
    }

    pub fn update_boss(&mut self, boss: Boss) -> bool {
        match self.boss_mut(&boss.id) {
            Some(slot) if *slot != boss => {
                *slot = boss;
                true
            }
            _ => false,
        }
    }

    /// Replace a group's editable fields, keeping its creatures and
    /// recomputing aggregates.
    pub fn update_group(&mut self, mut group: EnemyGroup) -> bool {
        match self.group_mut(&group.id) {
            Some(slot) => {
                group.recompute_aggregates();
                if *slot == group {
                    return false;
                }
                *slot = group;
                true
            }
            None => false,
        }
    }

    /// Copy a group under `new_id` with fresh creature ids, every creature at
    /// full HP, and the next free number on its base name.
    pub fn duplicate_group(&mut self, id: &str, new_id: &str) -> Option<&EnemyGroup> {
        let source = self.group(id)?;
        let name = self.next_group_name(source.base_name());
        let mut copy = source.clone();
        copy.assign_id(new_id);
        copy.name = name;
        copy.in_aoe = false;
        copy.restore_all();
        self.groups.push(copy);
        self.groups.last()
    }

    /// Restore every creature in a group to full HP.
    pub fn reset_group(&mut self, id: &str) -> bool {
        match self.group_mut(id) {
            Some(group) => {
                let before = group.clone();
                group.restore_all();
                *group != before
            }
            None => false,
        }
    }

    pub fn remove(&mut self, kind: EntityKind, id: &str) -> bool {
        let before = self.len();
        match kind {
            EntityKind::Character => self.characters.retain(|c| c.id != id),
            EntityKind::Boss => self.bosses.retain(|b| b.id != id),
            EntityKind::Group => self.groups.retain(|g| g.id != id),
        }
        self.len() != before
    }

    pub fn set_in_aoe(&mut self, kind: EntityKind, id: &str, in_aoe: bool) -> bool {
        let flag = match kind {
            EntityKind::Character => self.character_mut(id).map(|c| &mut c.in_aoe),
            EntityKind::Boss => self.boss_mut(id).map(|b| &mut b.in_aoe),
            EntityKind::Group => self.group_mut(id).map(|g| &mut g.in_aoe),
        };
        match flag {
            Some(flag) if *flag != in_aoe => {
                *flag = in_aoe;
                true
            }
            _ => false,
        }
    }

    pub fn set_initiative(&mut self, kind: EntityKind, id: &str, initiative: i32) -> bool {
        let slot = match kind {
            EntityKind::Character => self.character_mut(id).map(|c| &mut c.initiative),
            EntityKind::Boss => self.boss_mut(id).map(|b| &mut b.initiative),
            EntityKind::Group => self.group_mut(id).map(|g| &mut g.initiative),
        };
        match slot {
            Some(slot) if *slot != initiative => {
                *slot = initiative;
                true
            }
            _ => false,
        }
    }

    /// Clear every AoE flag. Returns true if any flag was set.
    pub fn clear_aoe_flags(&mut self) -> bool {
        let mut changed = false;
        for flag in self
            .characters
            .iter_mut()
            .map(|c| &mut c.in_aoe)
            .chain(self.bosses.iter_mut().map(|b| &mut b.in_aoe))
            .chain(self.groups.iter_mut().map(|g| &mut g.in_aoe))
        {
            changed |= std::mem::replace(flag, false);
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.characters.len() + self.bosses.len() + self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Next free `"<base> <n>"` name among groups sharing `base`.
    pub fn next_group_name(&self, base: &str) -> String {
        let highest = self
            .groups
            .iter()
            .filter(|g| g.base_name() == base)
            .map(|g| {
                g.name
                    .rsplit_once(char::is_whitespace)
                    .and_then(|(_, n)| n.parse::<u32>().ok())
                    .unwrap_or(1)
            })
            .max()
            .unwrap_or(0);
        format!("{base} {}", highest + 1)
    }
}
