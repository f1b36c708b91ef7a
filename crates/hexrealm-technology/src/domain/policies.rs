//! Research rules.

use hexrealm_core::ids::TechnologyId;

use super::catalog::{Technology, all_technologies, find_technology};
use super::errors::TechnologyRuleError;

/// Prerequisite checks against a set of discovered technologies.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnologyPrerequisitesPolicy;

impl TechnologyPrerequisitesPolicy {
    /// `true` if every prerequisite of `technology` is in `unlocked`.
    #[must_use]
    pub fn are_prerequisites_met(technology: &Technology, unlocked: &[TechnologyId]) -> bool {
        technology
            .prerequisites
            .iter()
            .all(|p| unlocked.contains(p))
    }

    /// Prerequisites of `technology` missing from `unlocked`, in catalog order.
    #[must_use]
    pub fn missing_prerequisites(
        technology: &Technology,
        unlocked: &[TechnologyId],
    ) -> Vec<TechnologyId> {
        technology
            .prerequisites
            .iter()
            .filter(|p| !unlocked.contains(p))
            .copied()
            .collect()
    }
}

/// Decides what a player may research next.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnologyManagementService;

impl TechnologyManagementService {
    #[must_use]
    pub fn can_discover_technology(
        technology: &Technology,
        unlocked: &[TechnologyId],
        science_points: u32,
    ) -> bool {
        Self::validate_discovery(technology, unlocked, science_points).is_ok()
    }

    /// # Errors
    ///
    /// Checked in order: `TechnologyAlreadyDiscovered`,
    /// `PrerequisiteNotMet`, `InsufficientResources`.
    pub fn validate_discovery(
        technology: &Technology,
        unlocked: &[TechnologyId],
        science_points: u32,
    ) -> Result<(), TechnologyRuleError> {
        if unlocked.contains(&technology.id) {
            return Err(TechnologyRuleError::TechnologyAlreadyDiscovered(
                technology.name,
            ));
        }
        let missing = TechnologyPrerequisitesPolicy::missing_prerequisites(technology, unlocked);
        if !missing.is_empty() {
            return Err(TechnologyRuleError::PrerequisiteNotMet {
                technology: technology.name,
                missing: missing
                    .into_iter()
                    .filter_map(find_technology)
                    .map(|t| t.name)
                    .collect(),
            });
        }
        if science_points < technology.cost {
            return Err(TechnologyRuleError::InsufficientResources {
                technology: technology.name,
                required: technology.cost,
                available: science_points,
            });
        }
        Ok(())
    }

    /// Catalog technologies the player could discover right now.
    #[must_use]
    pub fn available_technologies(
        unlocked: &[TechnologyId],
        science_points: u32,
    ) -> Vec<&'static Technology> {
        all_technologies()
            .iter()
            .filter(|t| Self::can_discover_technology(t, unlocked, science_points))
            .collect()
    }
}
