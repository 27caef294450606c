use serde::{Deserialize, Serialize};
use skirmish_types::SavingThrows;

use crate::combat::{apply_damage_with_temp_hp, apply_healing, set_temp_hp};

/// Damage-type notes shown alongside an entity. Informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defenses {
    pub resistances: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub immunities: Vec<String>,
}

impl Defenses {
    pub fn is_empty(&self) -> bool {
        self.resistances.is_empty() && self.vulnerabilities.is_empty() && self.immunities.is_empty()
    }
}

/// Entities with a single current/max/temp HP triple.
pub trait Vitals {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn current_hp(&self) -> i32;
    fn max_hp(&self) -> i32;
    fn temp_hp(&self) -> i32;
    fn saving_throws(&self) -> Option<&SavingThrows>;
    fn in_aoe(&self) -> bool;
    fn set_in_aoe(&mut self, in_aoe: bool);
    fn set_hp(&mut self, current_hp: i32, temp_hp: i32);

    /// Apply damage through temp HP. Returns true if this damage dropped the
    /// entity to 0.
    fn take_damage(&mut self, damage: i32) -> bool {
        let was_up = self.current_hp() > 0;
        let applied = apply_damage_with_temp_hp(damage, self.current_hp(), self.temp_hp());
        self.set_hp(applied.new_current_hp, applied.new_temp_hp);
        was_up && applied.new_current_hp == 0
    }

    fn heal(&mut self, amount: i32) {
        let healed = apply_healing(amount, self.current_hp(), self.max_hp());
        let temp = self.temp_hp();
        self.set_hp(healed, temp);
    }

    fn grant_temp_hp(&mut self, amount: i32, replace: bool) {
        let temp = set_temp_hp(amount, self.temp_hp(), replace).max(0);
        let current = self.current_hp();
        self.set_hp(current, temp);
    }

    fn is_down(&self) -> bool {
        self.current_hp() <= 0
    }
}

/// A player character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    #[serde(default)]
    pub ac: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub in_aoe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
    #[serde(default, skip_serializing_if = "Defenses::is_empty")]
    pub defenses: Defenses,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hp: i32, initiative: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            temp_hp: 0,
            ac: 10,
            initiative,
            in_aoe: false,
            saving_throws: None,
            defenses: Defenses::default(),
        }
    }
}

/// A single large monster tracked like a character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub id: String,
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    #[serde(default)]
    pub ac: i32,
    #[serde(default)]
    pub initiative: i32,
    #[serde(default)]
    pub in_aoe: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saving_throws: Option<SavingThrows>,
    #[serde(default, skip_serializing_if = "Defenses::is_empty")]
    pub defenses: Defenses,
}

impl Boss {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_hp: i32, initiative: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            temp_hp: 0,
            ac: 10,
            initiative,
            in_aoe: false,
            saving_throws: None,
            defenses: Defenses::default(),
        }
    }
}

macro_rules! impl_vitals {
    ($($ty:ty),*) => {
        $(
            impl Vitals for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
                fn name(&self) -> &str {
                    &self.name
                }
                fn current_hp(&self) -> i32 {
                    self.current_hp
                }
                fn max_hp(&self) -> i32 {
                    self.max_hp
                }
                fn temp_hp(&self) -> i32 {
                    self.temp_hp
                }
                fn saving_throws(&self) -> Option<&SavingThrows> {
                    self.saving_throws.as_ref()
                }
                fn in_aoe(&self) -> bool {
                    self.in_aoe
                }
                fn set_in_aoe(&mut self, in_aoe: bool) {
                    self.in_aoe = in_aoe;
                }
                fn set_hp(&mut self, current_hp: i32, temp_hp: i32) {
                    self.current_hp = current_hp;
                    self.temp_hp = temp_hp;
                }
            }
        )*
    };
}

impl_vitals!(Character, Boss);
