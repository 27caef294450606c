mod hp;

#[cfg(test)]
mod hp_tests;

pub use hp::{
    DamageApplied, apply_damage_with_temp_hp, apply_healing, calculate_save_damage, rounded_mean,
    set_temp_hp,
};
