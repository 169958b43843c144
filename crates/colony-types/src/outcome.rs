//! Outcome codes returned synchronously by every action primitive.
//!
//! The numeric values are the host's `OK` / `ERR_*` constants. Both world
//! backends speak this enumeration, so role logic never needs to know which
//! one produced a code. Anything outside the known set survives as
//! [`OutcomeCode::Unrecognized`] rather than being coerced.

use serde::{Deserialize, Serialize};

/// Result of issuing an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum OutcomeCode {
    /// `OK` (0).
    Ok,
    /// `ERR_NOT_OWNER` (-1).
    NotOwner,
    /// `ERR_NO_PATH` (-2).
    NoPath,
    /// `ERR_NAME_EXISTS` (-3).
    NameExists,
    /// `ERR_BUSY` (-4).
    Busy,
    /// `ERR_NOT_FOUND` (-5).
    NotFound,
    /// `ERR_NOT_ENOUGH_RESOURCES` / `ERR_NOT_ENOUGH_ENERGY` (-6).
    NotEnoughResources,
    /// `ERR_INVALID_TARGET` (-7).
    InvalidTarget,
    /// `ERR_FULL` (-8).
    Full,
    /// `ERR_NOT_IN_RANGE` (-9).
    NotInRange,
    /// `ERR_INVALID_ARGS` (-10).
    InvalidArgs,
    /// `ERR_TIRED` (-11).
    Tired,
    /// `ERR_NO_BODYPART` (-12).
    NoBodypart,
    /// Any other code the host returned.
    Unrecognized(i32),
}

impl OutcomeCode {
    /// Map a raw host return value onto the enumeration.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            0 => Self::Ok,
            -1 => Self::NotOwner,
            -2 => Self::NoPath,
            -3 => Self::NameExists,
            -4 => Self::Busy,
            -5 => Self::NotFound,
            -6 => Self::NotEnoughResources,
            -7 => Self::InvalidTarget,
            -8 => Self::Full,
            -9 => Self::NotInRange,
            -10 => Self::InvalidArgs,
            -11 => Self::Tired,
            -12 => Self::NoBodypart,
            other => Self::Unrecognized(other),
        }
    }

    /// The host's numeric value for this code.
    pub const fn raw(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::NotOwner => -1,
            Self::NoPath => -2,
            Self::NameExists => -3,
            Self::Busy => -4,
            Self::NotFound => -5,
            Self::NotEnoughResources => -6,
            Self::InvalidTarget => -7,
            Self::Full => -8,
            Self::NotInRange => -9,
            Self::InvalidArgs => -10,
            Self::Tired => -11,
            Self::NoBodypart => -12,
            Self::Unrecognized(raw) => raw,
        }
    }

    /// Whether the action was accepted.
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl From<i32> for OutcomeCode {
    fn from(raw: i32) -> Self {
        Self::from_raw(raw)
    }
}

impl From<OutcomeCode> for i32 {
    fn from(code: OutcomeCode) -> Self {
        code.raw()
    }
}

impl core::fmt::Display for OutcomeCode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?} ({})", self.raw())
    }
}
