//! Damage distribution and area-effect resolution over the roster.

pub mod aoe;
pub mod group_damage;
pub mod healing;

#[cfg(test)]
mod aoe_tests;
#[cfg(test)]
mod group_damage_tests;

pub use aoe::{
    AoeParams, EntityDamageOverride, GroupAoeOutcome, ResolvedDamage, SaveOutcome,
    VitalsAoeOutcome, apply_aoe_to_groups, apply_aoe_to_vitals, resolve_entity_damage,
};
pub use group_damage::{
    DistributionOutcome, affected_count, damage_every_alive, damage_first_alive,
    damage_percentage,
};
pub use healing::{heal_group, heal_group_to_full, set_group_temp_hp};
