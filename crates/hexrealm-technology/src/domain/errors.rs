//! Rule violations for the Technology context.

use hexrealm_core::error::{DomainError, RuleViolation};
use thiserror::Error;

/// Research rules that can refuse a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TechnologyRuleError {
    /// The player already knows this technology.
    #[error("technology {0} has already been discovered")]
    TechnologyAlreadyDiscovered(&'static str),

    /// At least one prerequisite is still undiscovered.
    #[error("{technology} requires {}", .missing.join(", "))]
    PrerequisiteNotMet {
        /// The technology being researched.
        technology: &'static str,
        /// Names of the undiscovered prerequisites.
        missing: Vec<&'static str>,
    },

    /// Not enough science points to pay the cost.
    #[error("{technology} costs {required} science points, {available} available")]
    InsufficientResources {
        /// The technology being researched.
        technology: &'static str,
        /// Cost of the technology.
        required: u32,
        /// The player's balance.
        available: u32,
    },
}

impl TechnologyRuleError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::TechnologyAlreadyDiscovered(_) => "technology_already_discovered",
            Self::PrerequisiteNotMet { .. } => "prerequisite_not_met",
            Self::InsufficientResources { .. } => "insufficient_resources",
        }
    }
}

impl From<TechnologyRuleError> for DomainError {
    fn from(err: TechnologyRuleError) -> Self {
        DomainError::RuleViolation(RuleViolation::new(err.code(), err.to_string()))
    }
}
