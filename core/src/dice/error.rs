//! Error types for dice notation parsing

use thiserror::Error;

/// Errors while parsing an `NdS±M` expression
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("empty dice expression")]
    Empty,

    #[error("missing 'd' in dice expression '{input}'")]
    MissingDie { input: String },

    #[error("invalid number '{part}' in dice expression '{input}'")]
    InvalidNumber { input: String, part: String },

    #[error("dice must have at least one side: '{input}'")]
    ZeroSides { input: String },

    #[error("{sides}-sided dice are not supported (max {max})")]
    Sides { sides: u32, max: u32 },

    #[error("dice count {count} out of range (1..={max})")]
    DiceCount { count: u32, max: u32 },
}
