//! Engine configuration.
//!
//! Plain values handed in by the binary; the engine never reads the
//! environment itself.

use std::time::Duration;

use hexrealm_core::error::DomainError;
use hexrealm_game::domain::map::{MapDimensionBounds, MapGenerationPolicy};

/// Tunables of a running [`Engine`](crate::Engine).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Width of the map generated when a game is created.
    pub map_width: u32,
    /// Height of the map generated when a game is created.
    pub map_height: u32,
    /// Allowed map width and height.
    pub map_bounds: MapDimensionBounds,
    /// Attempts per command before a concurrency conflict is surfaced.
    pub max_command_attempts: u32,
    /// Attempts per reaction command before it becomes a dead letter.
    pub reaction_max_attempts: u32,
    /// Delay before the first reaction retry; doubled on each further one.
    pub reaction_backoff: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map_width: 10,
            map_height: 10,
            map_bounds: MapDimensionBounds::default(),
            max_command_attempts: 3,
            reaction_max_attempts: 3,
            reaction_backoff: Duration::from_millis(25),
        }
    }
}

impl EngineConfig {
    /// Checks that the values can work together.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for inverted bounds, a map size
    /// outside the bounds, or a zero attempt count.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.map_bounds.min > self.map_bounds.max {
            return Err(DomainError::Validation(format!(
                "map bounds [{}, {}] are inverted",
                self.map_bounds.min, self.map_bounds.max
            )));
        }
        self.map_policy()
            .validate(self.map_width, self.map_height)
            .map_err(|e| DomainError::Validation(e.to_string()))?;
        if self.max_command_attempts == 0 || self.reaction_max_attempts == 0 {
            return Err(DomainError::Validation(
                "attempt counts must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Map policy built from the configured bounds.
    #[must_use]
    pub fn map_policy(&self) -> MapGenerationPolicy {
        MapGenerationPolicy::new(self.map_bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.map_bounds, MapDimensionBounds { min: 5, max: 50 });
    }

    #[test]
    fn test_map_size_outside_bounds_is_rejected() {
        let config = EngineConfig {
            map_width: 60,
            ..EngineConfig::default()
        };

        match config.validate() {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("60x10")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        let config = EngineConfig {
            reaction_max_attempts: 0,
            ..EngineConfig::default()
        };

        assert!(matches!(config.validate(), Err(DomainError::Validation(_))));
    }
}
