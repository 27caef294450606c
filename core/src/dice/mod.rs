//! Dice primitives.
//!
//! Every roll takes the RNG explicitly so sessions can be seeded and tests
//! stay deterministic.

mod error;

#[cfg(test)]
mod dice_tests;

pub use error::DiceError;

use rand::Rng;
use std::fmt;
use std::str::FromStr;

/// Roll a single die with `sides` faces. Dice with fewer than one face roll 0;
/// faces past `i32::MAX` clamp to it.
pub fn roll_die(rng: &mut impl Rng, sides: u32) -> i32 {
    if sides == 0 {
        return 0;
    }
    i32::try_from(rng.gen_range(1..=sides)).unwrap_or(i32::MAX)
}

/// Individual faces plus their sum, saturating at the `i32` bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceRoll {
    pub rolls: Vec<i32>,
    pub total: i32,
}

pub fn roll_dice(rng: &mut impl Rng, count: u32, sides: u32) -> DiceRoll {
    let rolls: Vec<i32> = (0..count).map(|_| roll_die(rng, sides)).collect();
    let total = rolls.iter().fold(0i32, |sum, r| sum.saturating_add(*r));
    DiceRoll { rolls, total }
}

pub fn roll_d20(rng: &mut impl Rng) -> i32 {
    roll_die(rng, 20)
}

/// A d20 saving throw against a DC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveRoll {
    pub roll: i32,
    pub bonus: i32,
    pub total: i32,
    pub succeeded: bool,
}

/// Roll `1d20 + bonus`; meeting the DC is a success.
pub fn roll_saving_throw(rng: &mut impl Rng, bonus: i32, dc: i32) -> SaveRoll {
    let roll = roll_d20(rng);
    let total = roll.saturating_add(bonus);
    SaveRoll {
        roll,
        bonus,
        total,
        succeeded: total >= dc,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dice Notation
// ─────────────────────────────────────────────────────────────────────────────

const MAX_DICE: u32 = 1000;
const MAX_SIDES: u32 = 10_000;

/// Parsed `NdS±M` expression, e.g. `2d6+3` or `d20`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceExpr {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceExpr {
    pub fn parse(input: &str) -> Result<Self, DiceError> {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let lower = compact.to_ascii_lowercase();
        if lower.is_empty() {
            return Err(DiceError::Empty);
        }

        let Some((count_part, rest)) = lower.split_once('d') else {
            return Err(DiceError::MissingDie {
                input: input.to_string(),
            });
        };

        let count = if count_part.is_empty() {
            1
        } else {
            count_part.parse::<u32>().map_err(|_| DiceError::InvalidNumber {
                input: input.to_string(),
                part: count_part.to_string(),
            })?
        };

        let (sides_part, modifier) = match rest.find(['+', '-']) {
            Some(idx) => {
                let (sides, signed) = rest.split_at(idx);
                let modifier = signed.parse::<i32>().map_err(|_| DiceError::InvalidNumber {
                    input: input.to_string(),
                    part: signed.to_string(),
                })?;
                (sides, modifier)
            }
            None => (rest, 0),
        };

        let sides = sides_part.parse::<u32>().map_err(|_| DiceError::InvalidNumber {
            input: input.to_string(),
            part: sides_part.to_string(),
        })?;

        if sides == 0 {
            return Err(DiceError::ZeroSides {
                input: input.to_string(),
            });
        }
        if sides > MAX_SIDES {
            return Err(DiceError::Sides { sides, max: MAX_SIDES });
        }
        if count == 0 || count > MAX_DICE {
            return Err(DiceError::DiceCount { count, max: MAX_DICE });
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    pub fn roll(&self, rng: &mut impl Rng) -> DiceRoll {
        let mut roll = roll_dice(rng, self.count, self.sides);
        roll.total = roll.total.saturating_add(self.modifier);
        roll
    }
}

impl FromStr for DiceExpr {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.modifier != 0 {
            write!(f, "{:+}", self.modifier)?;
        }
        Ok(())
    }
}
