//! Unit hit points.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Hard ceiling for any unit's maximum health.
pub const MAX_HEALTH_CEILING: u32 = 1000;

/// Immutable `(current, maximum)` hit points.
///
/// Invariant: `current <= maximum <= MAX_HEALTH_CEILING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawHealth", into = "RawHealth")]
pub struct Health {
    current: u32,
    maximum: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawHealth {
    current: u32,
    maximum: u32,
}

impl TryFrom<RawHealth> for Health {
    type Error = ValueError;

    fn try_from(raw: RawHealth) -> Result<Self, Self::Error> {
        Self::new(raw.current, raw.maximum)
    }
}

impl From<Health> for RawHealth {
    fn from(health: Health) -> Self {
        Self {
            current: health.current,
            maximum: health.maximum,
        }
    }
}

impl Health {
    /// Creates a health value.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHealth` if `current > maximum` or
    /// `maximum > MAX_HEALTH_CEILING`.
    pub fn new(current: u32, maximum: u32) -> Result<Self, ValueError> {
        if current > maximum || maximum > MAX_HEALTH_CEILING {
            return Err(ValueError::InvalidHealth { current, maximum });
        }
        Ok(Self { current, maximum })
    }

    /// Full health at the given maximum, capped at the ceiling.
    #[must_use]
    pub fn full(maximum: u32) -> Self {
        let maximum = maximum.min(MAX_HEALTH_CEILING);
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Current hit points.
    #[must_use]
    pub const fn current(self) -> u32 {
        self.current
    }

    /// Maximum hit points.
    #[must_use]
    pub const fn maximum(self) -> u32 {
        self.maximum
    }

    /// Returns `true` when no hit points remain.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        self.current == 0
    }

    /// Returns a new value with `amount` subtracted, floored at zero.
    #[must_use]
    pub const fn take_damage(self, amount: u32) -> Self {
        Self {
            current: self.current.saturating_sub(amount),
            maximum: self.maximum,
        }
    }

    /// Returns a new value with `amount` added, capped at the maximum.
    #[must_use]
    pub fn heal(self, amount: u32) -> Self {
        Self {
            current: self.current.saturating_add(amount).min(self.maximum),
            maximum: self.maximum,
        }
    }
}
