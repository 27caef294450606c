//! Shared combat and configuration types for Skirmish
//!
//! This crate contains serializable types that are shared between the
//! tracker engine (skirmish-core) and its front ends (skirmish-cli, a browser
//! build). Field names serialize in camelCase to match the roster snapshot.

use serde::{Deserialize, Serialize};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Attack Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a single-target attack roll, as reported by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HitStatus {
    #[default]
    Hit,
    Miss,
    Critical,
}

impl HitStatus {
    pub fn is_miss(&self) -> bool {
        matches!(self, HitStatus::Miss)
    }

    pub fn label(&self) -> &'static str {
        match self {
            HitStatus::Hit => "Hit",
            HitStatus::Miss => "Miss",
            HitStatus::Critical => "Critical hit",
        }
    }
}

impl std::str::FromStr for HitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hit" => Ok(HitStatus::Hit),
            "miss" => Ok(HitStatus::Miss),
            "critical" | "crit" => Ok(HitStatus::Critical),
            other => Err(format!("unknown hit status '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Saving Throws
// ─────────────────────────────────────────────────────────────────────────────

/// The six ability saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl SaveType {
    pub const ALL: [SaveType; 6] = [
        SaveType::Strength,
        SaveType::Dexterity,
        SaveType::Constitution,
        SaveType::Intelligence,
        SaveType::Wisdom,
        SaveType::Charisma,
    ];

    /// Three-letter abbreviation used in log lines.
    pub fn abbrev(&self) -> &'static str {
        match self {
            SaveType::Strength => "STR",
            SaveType::Dexterity => "DEX",
            SaveType::Constitution => "CON",
            SaveType::Intelligence => "INT",
            SaveType::Wisdom => "WIS",
            SaveType::Charisma => "CHA",
        }
    }
}

impl std::str::FromStr for SaveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        SaveType::ALL
            .into_iter()
            .find(|t| {
                let abbrev = t.abbrev().to_ascii_lowercase();
                lower == abbrev || format!("{t:?}").to_ascii_lowercase() == lower
            })
            .ok_or_else(|| format!("unknown save type '{s}'"))
    }
}

/// Per-ability saving throw bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingThrows {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl SavingThrows {
    pub fn bonus(&self, save: SaveType) -> i32 {
        match save {
            SaveType::Strength => self.strength,
            SaveType::Dexterity => self.dexterity,
            SaveType::Constitution => self.constitution,
            SaveType::Intelligence => self.intelligence,
            SaveType::Wisdom => self.wisdom,
            SaveType::Charisma => self.charisma,
        }
    }

    pub fn set_bonus(&mut self, save: SaveType, bonus: i32) {
        match save {
            SaveType::Strength => self.strength = bonus,
            SaveType::Dexterity => self.dexterity = bonus,
            SaveType::Constitution => self.constitution = bonus,
            SaveType::Intelligence => self.intelligence = bonus,
            SaveType::Wisdom => self.wisdom = bonus,
            SaveType::Charisma => self.charisma = bonus,
        }
    }
}

/// Damage scaling chosen for an entity whose save was resolved outside the
/// tracker (e.g. a player rolling at the table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageModifier {
    /// Full damage
    #[default]
    Full,
    /// Half damage, rounded down
    Half,
    /// Quarter damage, rounded down
    Quarter,
    /// No damage
    None,
}

impl DamageModifier {
    pub fn apply(&self, damage: i32) -> i32 {
        match self {
            DamageModifier::Full => damage,
            DamageModifier::Half => damage / 2,
            DamageModifier::Quarter => damage / 4,
            DamageModifier::None => 0,
        }
    }

    /// Short tag appended to save summaries, empty for full damage.
    pub fn tag(&self) -> &'static str {
        match self {
            DamageModifier::Full => "",
            DamageModifier::Half => " (½ dmg)",
            DamageModifier::Quarter => " (¼ dmg)",
            DamageModifier::None => " (no dmg)",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entity Kinds
// ─────────────────────────────────────────────────────────────────────────────

/// The three roster entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Character,
    Boss,
    Group,
}

impl EntityKind {
    /// Key prefix used for per-entity damage overrides (`group-<id>`).
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Boss => "boss",
            EntityKind::Group => "group",
        }
    }

    pub fn override_key(&self, id: &str) -> String {
        format!("{}-{}", self.prefix(), id)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "character" | "char" | "pc" => Ok(EntityKind::Character),
            "boss" => Ok(EntityKind::Boss),
            "group" | "monsters" => Ok(EntityKind::Group),
            other => Err(format!("unknown entity kind '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Persisted application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding roster snapshots. Empty = platform data dir.
    #[serde(default)]
    pub data_directory: String,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Write a snapshot after every committed change.
    #[serde(default = "default_true")]
    pub autosave: bool,
    /// Whether a successful save halves AoE damage when the caller does not say.
    #[serde(default = "default_true")]
    pub default_half_on_save: bool,
    /// Results log cap; oldest entries are dropped first.
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Fixed dice seed for reproducible sessions.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_true() -> bool {
    true
}

fn default_snapshot_file() -> String {
    "roster.json".to_string()
}

fn default_max_results() -> usize {
    500
}

impl AppConfig {
    /// Create a config rooted at the given data directory.
    /// Other fields use their default values.
    pub fn with_data_directory(data_directory: String) -> Self {
        Self {
            data_directory,
            ..Self::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: String::new(),
            snapshot_file: default_snapshot_file(),
            autosave: true,
            default_half_on_save: true,
            max_results: default_max_results(),
            rng_seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_type_parses_names_and_abbreviations() {
        assert_eq!("dex".parse::<SaveType>(), Ok(SaveType::Dexterity));
        assert_eq!("Wisdom".parse::<SaveType>(), Ok(SaveType::Wisdom));
        assert!("luck".parse::<SaveType>().is_err());
    }

    #[test]
    fn damage_modifier_floors() {
        assert_eq!(DamageModifier::Half.apply(7), 3);
        assert_eq!(DamageModifier::Quarter.apply(7), 1);
        assert_eq!(DamageModifier::None.apply(7), 0);
        assert_eq!(DamageModifier::Full.apply(7), 7);
    }

    #[test]
    fn config_fills_missing_fields() {
        let config: AppConfig = serde_json::from_str(r#"{"autosave":false}"#).unwrap();
        assert!(!config.autosave);
        assert_eq!(config.snapshot_file, "roster.json");
        assert_eq!(config.max_results, 500);
        assert!(config.default_half_on_save);
    }

    #[test]
    fn override_key_uses_kind_prefix() {
        assert_eq!(EntityKind::Group.override_key("g1"), "group-g1");
        assert_eq!(EntityKind::Boss.override_key("b"), "boss-b");
    }
}
