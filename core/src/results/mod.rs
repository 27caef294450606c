//! Append-only log of attack, heal and AoE outcomes.


use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use skirmish_types::{EntityKind, HitStatus};

/// One line in the results log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackResult {
    pub id: u64,
    pub timestamp: NaiveDateTime,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healing: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<EntityKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_status: Option<HitStatus>,
    #[serde(default, rename = "isAoE")]
    pub is_aoe: bool,
    #[serde(default)]
    pub is_healing: bool,
}

impl AttackResult {
    /// A bare message stamped with the local time. The id is assigned when
    /// the result is pushed onto a [`ResultLog`].
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: 0,
            timestamp: Local::now().naive_local(),
            message: message.into(),
            damage: None,
            healing: None,
            target_id: None,
            target_type: None,
            hit_status: None,
            is_aoe: false,
            is_healing: false,
        }
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub fn with_healing(mut self, amount: i32) -> Self {
        self.healing = Some(amount);
        self.is_healing = true;
        self
    }

    pub fn with_target(mut self, kind: EntityKind, id: impl Into<String>) -> Self {
        self.target_type = Some(kind);
        self.target_id = Some(id.into());
        self
    }

    pub fn with_hit_status(mut self, status: HitStatus) -> Self {
        self.hit_status = Some(status);
        self
    }

    pub fn aoe(mut self) -> Self {
        self.is_aoe = true;
        self
    }
}

/// Results in insertion order, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLog {
    entries: Vec<AttackResult>,
    next_id: u64,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted entries, continuing ids after the highest.
    pub fn from_entries(entries: Vec<AttackResult>) -> Self {
        let next_id = entries.iter().map(|r| r.id + 1).max().unwrap_or(0);
        Self { entries, next_id }
    }

    /// Append a result, dropping the oldest entries beyond `cap`.
    /// A cap of 0 keeps everything. Returns the assigned id.
    pub fn push(&mut self, mut result: AttackResult, cap: usize) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        result.id = id;
        self.entries.push(result);
        if cap > 0 && self.entries.len() > cap {
            let excess = self.entries.len() - cap;
            self.entries.drain(..excess);
        }
        id
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|r| r.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) -> bool {
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    /// Replace the message of an existing result.
    pub fn update(&mut self, id: u64, message: impl Into<String>) -> bool {
        let message = message.into();
        match self.entries.iter_mut().find(|r| r.id == id) {
            Some(result) if result.message != message => {
                result.message = message;
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, id: u64) -> Option<&AttackResult> {
        self.entries.iter().find(|r| r.id == id)
    }

    pub fn latest(&self) -> Option<&AttackResult> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[AttackResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
