//! Diplomacy state-machine rules.
//!
//! The predicates look at who is acting only. The `validate_*` twins also
//! check the agreement's status, which is reported before the actor.

use hexrealm_core::ids::PlayerId;

use super::aggregates::{AgreementType, DiplomacyStatus, Parties};
use super::errors::DiplomacyRuleError;

/// Who may propose, answer and end an agreement.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiplomacyPolicy;

impl DiplomacyPolicy {
    /// Any agreement type may be proposed to anyone but oneself.
    #[must_use]
    pub fn can_propose(
        initiator_id: PlayerId,
        target_id: PlayerId,
        _agreement_type: AgreementType,
    ) -> bool {
        initiator_id != target_id
    }

    #[must_use]
    pub fn can_accept(player_id: PlayerId, parties: Parties) -> bool {
        player_id == parties.target_id
    }

    #[must_use]
    pub fn can_decline(player_id: PlayerId, parties: Parties) -> bool {
        player_id == parties.target_id
    }

    #[must_use]
    pub fn can_end(player_id: PlayerId, parties: Parties) -> bool {
        parties.involves(player_id)
    }

    /// # Errors
    ///
    /// Returns `SelfProposal` when both sides are the same player.
    pub fn validate_propose(
        initiator_id: PlayerId,
        target_id: PlayerId,
        agreement_type: AgreementType,
    ) -> Result<(), DiplomacyRuleError> {
        if Self::can_propose(initiator_id, target_id, agreement_type) {
            Ok(())
        } else {
            Err(DiplomacyRuleError::SelfProposal)
        }
    }

    /// # Errors
    ///
    /// `CanOnlyAcceptProposed`, then `OnlyTargetCanAccept`.
    pub fn validate_accept(
        player_id: PlayerId,
        parties: Parties,
        status: DiplomacyStatus,
    ) -> Result<(), DiplomacyRuleError> {
        if status != DiplomacyStatus::Proposed {
            return Err(DiplomacyRuleError::CanOnlyAcceptProposed(status));
        }
        if !Self::can_accept(player_id, parties) {
            return Err(DiplomacyRuleError::OnlyTargetCanAccept);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `CanOnlyDeclineProposed`, then `OnlyTargetCanDecline`.
    pub fn validate_decline(
        player_id: PlayerId,
        parties: Parties,
        status: DiplomacyStatus,
    ) -> Result<(), DiplomacyRuleError> {
        if status != DiplomacyStatus::Proposed {
            return Err(DiplomacyRuleError::CanOnlyDeclineProposed(status));
        }
        if !Self::can_decline(player_id, parties) {
            return Err(DiplomacyRuleError::OnlyTargetCanDecline);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// `CanOnlyEndAccepted`, then `OnlyInvolvedCanEnd`.
    pub fn validate_end(
        player_id: PlayerId,
        parties: Parties,
        status: DiplomacyStatus,
    ) -> Result<(), DiplomacyRuleError> {
        if status != DiplomacyStatus::Accepted {
            return Err(DiplomacyRuleError::CanOnlyEndAccepted(status));
        }
        if !Self::can_end(player_id, parties) {
            return Err(DiplomacyRuleError::OnlyInvolvedCanEnd);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parties() -> Parties {
        Parties {
            initiator_id: PlayerId::generate(),
            target_id: PlayerId::generate(),
        }
    }

    #[test]
    fn test_self_proposal_is_never_allowed() {
        let player = PlayerId::generate();

        for agreement_type in AgreementType::ALL {
            assert!(!DiplomacyPolicy::can_propose(player, player, agreement_type));
        }
        assert!(DiplomacyPolicy::can_propose(
            player,
            PlayerId::generate(),
            AgreementType::War
        ));
    }

    #[test]
    fn test_only_target_answers_a_proposal() {
        let parties = parties();

        assert!(DiplomacyPolicy::can_accept(parties.target_id, parties));
        assert!(!DiplomacyPolicy::can_accept(parties.initiator_id, parties));
        assert!(DiplomacyPolicy::can_decline(parties.target_id, parties));
        assert!(!DiplomacyPolicy::can_decline(PlayerId::generate(), parties));
    }

    #[test]
    fn test_either_party_can_end() {
        let parties = parties();

        assert!(DiplomacyPolicy::can_end(parties.initiator_id, parties));
        assert!(DiplomacyPolicy::can_end(parties.target_id, parties));
        assert!(!DiplomacyPolicy::can_end(PlayerId::generate(), parties));
    }

    #[test]
    fn test_status_is_reported_before_actor() {
        let parties = parties();

        let result =
            DiplomacyPolicy::validate_accept(parties.initiator_id, parties, DiplomacyStatus::Declined);

        assert_eq!(
            result,
            Err(DiplomacyRuleError::CanOnlyAcceptProposed(
                DiplomacyStatus::Declined
            ))
        );
        assert_eq!(
            DiplomacyPolicy::validate_end(PlayerId::generate(), parties, DiplomacyStatus::Accepted),
            Err(DiplomacyRuleError::OnlyInvolvedCanEnd)
        );
        assert_eq!(
            DiplomacyPolicy::validate_end(parties.target_id, parties, DiplomacyStatus::Proposed),
            Err(DiplomacyRuleError::CanOnlyEndAccepted(DiplomacyStatus::Proposed))
        );
    }
}
