//! Common serde default value functions
//!
//! Used by the snapshot and legacy group records to fill fields that older
//! files leave out.

/// Armor class for entities saved without one
pub fn default_ac() -> i32 {
    10
}

/// Combat starts on round 1
pub fn default_round() -> u32 {
    1
}
