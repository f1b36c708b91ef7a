//! Rule violations for the Diplomacy context.

use hexrealm_core::error::{DomainError, RuleViolation};
use hexrealm_core::ids::DiplomacyId;
use thiserror::Error;

use super::aggregates::DiplomacyStatus;

/// Diplomacy rules that can refuse a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiplomacyRuleError {
    /// A player proposed an agreement to themselves.
    #[error("a player cannot propose an agreement to themselves")]
    SelfProposal,

    /// The agreement id is already taken.
    #[error("diplomacy agreement {0} already exists")]
    AgreementAlreadyExists(DiplomacyId),

    #[error("only proposed agreements can be accepted, agreement is {0}")]
    CanOnlyAcceptProposed(DiplomacyStatus),

    #[error("only proposed agreements can be declined, agreement is {0}")]
    CanOnlyDeclineProposed(DiplomacyStatus),

    #[error("only accepted agreements can be ended, agreement is {0}")]
    CanOnlyEndAccepted(DiplomacyStatus),

    #[error("only the target player can accept an agreement")]
    OnlyTargetCanAccept,

    #[error("only the target player can decline an agreement")]
    OnlyTargetCanDecline,

    #[error("only a party to the agreement can end it")]
    OnlyInvolvedCanEnd,
}

impl DiplomacyRuleError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::SelfProposal => "self_proposal",
            Self::AgreementAlreadyExists(_) => "agreement_already_exists",
            Self::CanOnlyAcceptProposed(_) => "can_only_accept_proposed",
            Self::CanOnlyDeclineProposed(_) => "can_only_decline_proposed",
            Self::CanOnlyEndAccepted(_) => "can_only_end_accepted",
            Self::OnlyTargetCanAccept => "only_target_can_accept",
            Self::OnlyTargetCanDecline => "only_target_can_decline",
            Self::OnlyInvolvedCanEnd => "only_involved_can_end",
        }
    }
}

impl From<DiplomacyRuleError> for DomainError {
    fn from(err: DiplomacyRuleError) -> Self {
        DomainError::RuleViolation(RuleViolation::new(err.code(), err.to_string()))
    }
}
