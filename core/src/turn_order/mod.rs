//! Initiative order derived from the roster.
//!
//! The order is a pure view over the roster: it is rebuilt from scratch after
//! every change and never edited directly. Groups that share an initiative and
//! a base name ("Goblins 1", "Goblins 2") fold into a single
//! [`GroupCollection`] slot.


use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use skirmish_types::EntityKind;

use crate::roster::{EnemyGroup, Roster};

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// Per-group HP detail carried by a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionMember {
    pub id: String,
    pub name: String,
    pub count: usize,
    pub original_count: usize,
    pub current_hp: i32,
    pub max_hp: i32,
}

impl From<&EnemyGroup> for CollectionMember {
    fn from(group: &EnemyGroup) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            count: group.count,
            original_count: group.original_count,
            current_hp: group.current_hp,
            max_hp: group.max_hp,
        }
    }
}

/// Groups acting together in one turn slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupCollection {
    /// `"<initiative>-<baseName>"`
    pub id: String,
    pub name: String,
    pub base_name_pattern: String,
    pub initiative: i32,
    /// Member group ids in roster order
    pub ids: Vec<String>,
    pub total_count: usize,
    pub total_original_count: usize,
    pub groups: Vec<CollectionMember>,
}

impl GroupCollection {
    fn start(key: String, base: &str, initiative: i32) -> Self {
        Self {
            id: key,
            name: base.to_string(),
            base_name_pattern: base.to_string(),
            initiative,
            ids: Vec::new(),
            total_count: 0,
            total_original_count: 0,
            groups: Vec::new(),
        }
    }

    fn absorb(&mut self, group: &EnemyGroup) {
        self.ids.push(group.id.clone());
        self.total_count += group.count;
        self.total_original_count += group.original_count;
        self.groups.push(CollectionMember::from(group));
    }

    /// First member group, the default target when this slot comes up.
    pub fn first_id(&self) -> Option<&str> {
        self.ids.first().map(String::as_str)
    }
}

/// One slot in the initiative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TurnOrderEntry {
    Character { id: String, name: String, initiative: i32 },
    Boss { id: String, name: String, initiative: i32 },
    GroupCollection(GroupCollection),
}

impl TurnOrderEntry {
    pub fn initiative(&self) -> i32 {
        match self {
            TurnOrderEntry::Character { initiative, .. }
            | TurnOrderEntry::Boss { initiative, .. } => *initiative,
            TurnOrderEntry::GroupCollection(c) => c.initiative,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            TurnOrderEntry::Character { name, .. } | TurnOrderEntry::Boss { name, .. } => name,
            TurnOrderEntry::GroupCollection(c) => &c.name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            TurnOrderEntry::Character { .. } => EntityKind::Character,
            TurnOrderEntry::Boss { .. } => EntityKind::Boss,
            TurnOrderEntry::GroupCollection(_) => EntityKind::Group,
        }
    }

    pub fn as_collection(&self) -> Option<&GroupCollection> {
        match self {
            TurnOrderEntry::GroupCollection(c) => Some(c),
            _ => None,
        }
    }

    /// Whether this slot stands for the given entity.
    pub fn refers_to(&self, kind: EntityKind, id: &str) -> bool {
        match (self, kind) {
            (TurnOrderEntry::Character { id: own, .. }, EntityKind::Character)
            | (TurnOrderEntry::Boss { id: own, .. }, EntityKind::Boss) => own == id,
            (TurnOrderEntry::GroupCollection(c), EntityKind::Group) => {
                c.ids.iter().any(|member| member == id)
            }
            _ => false,
        }
    }

    /// Same slot across a rebuild: same id for characters and bosses, same
    /// base name and initiative for collections.
    fn same_slot(&self, other: &TurnOrderEntry) -> bool {
        match (self, other) {
            (TurnOrderEntry::Character { id: a, .. }, TurnOrderEntry::Character { id: b, .. })
            | (TurnOrderEntry::Boss { id: a, .. }, TurnOrderEntry::Boss { id: b, .. }) => a == b,
            (TurnOrderEntry::GroupCollection(a), TurnOrderEntry::GroupCollection(b)) => {
                a.base_name_pattern == b.base_name_pattern && a.initiative == b.initiative
            }
            _ => false,
        }
    }
}

/// Build the sorted initiative order. Characters come first, then bosses,
/// then group collections in order of first appearance; a stable sort by
/// initiative (highest first) keeps that order among ties.
pub fn build_turn_order(roster: &Roster) -> Vec<TurnOrderEntry> {
    let mut entries: Vec<TurnOrderEntry> = roster
        .characters
        .iter()
        .map(|c| TurnOrderEntry::Character {
            id: c.id.clone(),
            name: c.name.clone(),
            initiative: c.initiative,
        })
        .chain(roster.bosses.iter().map(|b| TurnOrderEntry::Boss {
            id: b.id.clone(),
            name: b.name.clone(),
            initiative: b.initiative,
        }))
        .collect();

    let mut collections: Vec<GroupCollection> = Vec::new();
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for group in &roster.groups {
        let base = group.base_name();
        let key = format!("{}-{}", group.initiative, base);
        let slot = *by_key.entry(key.clone()).or_insert_with(|| {
            collections.push(GroupCollection::start(key, base, group.initiative));
            collections.len() - 1
        });
        collections[slot].absorb(group);
    }
    entries.extend(collections.into_iter().map(TurnOrderEntry::GroupCollection));

    entries.sort_by(|a, b| b.initiative().cmp(&a.initiative()));
    entries
}

// ─────────────────────────────────────────────────────────────────────────────
// Turn State
// ─────────────────────────────────────────────────────────────────────────────

/// How a rebuild should treat the current-turn pointer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshRequest {
    pub reset_to_start: bool,
    pub removed: Option<(EntityKind, String)>,
}

impl RefreshRequest {
    pub fn reset() -> Self {
        Self {
            reset_to_start: true,
            removed: None,
        }
    }

    pub fn removed(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            reset_to_start: false,
            removed: Some((kind, id.into())),
        }
    }
}

/// The initiative order plus whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    pub entries: Vec<TurnOrderEntry>,
    pub current_index: usize,
    pub round: u32,
}

impl Default for TurnState {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            current_index: 0,
            round: 1,
        }
    }
}

impl TurnState {
    pub fn current(&self) -> Option<&TurnOrderEntry> {
        self.entries.get(self.current_index)
    }

    /// Rebuild the order from the roster and carry the pointer across.
    /// Returns true if anything changed.
    pub fn refresh(&mut self, roster: &Roster, request: &RefreshRequest) -> bool {
        let entries = build_turn_order(roster);
        let clamp = |index: usize| index.min(entries.len().saturating_sub(1));

        let index = match self.current() {
            _ if entries.is_empty() || request.reset_to_start => 0,
            None => clamp(self.current_index),
            Some(current) => {
                let removed_current = request
                    .removed
                    .as_ref()
                    .is_some_and(|(kind, id)| current.refers_to(*kind, id));
                if removed_current {
                    clamp(self.current_index)
                } else {
                    entries
                        .iter()
                        .position(|e| e.same_slot(current))
                        .unwrap_or_else(|| clamp(self.current_index))
                }
            }
        };

        let round = if request.reset_to_start { 1 } else { self.round };
        let changed = entries != self.entries || index != self.current_index || round != self.round;
        self.entries = entries;
        self.current_index = index;
        self.round = round;
        changed
    }

    /// Advance one slot, wrapping into the next round.
    pub fn next(&mut self) -> Option<&TurnOrderEntry> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        let next = (self.current_index + 1) % len;
        if next == 0 {
            self.round += 1;
        }
        self.current_index = next;
        self.current()
    }

    /// Step back one slot, wrapping into the previous round (never below 1).
    pub fn previous(&mut self) -> Option<&TurnOrderEntry> {
        let len = self.entries.len();
        if len == 0 {
            return None;
        }
        if self.current_index == 0 {
            self.round = self.round.saturating_sub(1).max(1);
        }
        self.current_index = (self.current_index + len - 1) % len;
        self.current()
    }
}
