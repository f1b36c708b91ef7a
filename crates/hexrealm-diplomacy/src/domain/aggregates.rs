//! Aggregate roots for the Diplomacy context.

use std::fmt;

use hexrealm_core::aggregate::AggregateRoot;
use hexrealm_core::clock::Clock;
use hexrealm_core::error::DomainError;
use hexrealm_core::event::EventMetadata;
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DiplomacyRuleError;
use super::events::{
    DiplomacyAccepted, DiplomacyDeclined, DiplomacyEnded, DiplomacyEvent, DiplomacyEventKind,
    DiplomacyProposed,
};
use super::policies::DiplomacyPolicy;

/// Kind of agreement between two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgreementType {
    NonAggressionPact,
    Alliance,
    War,
}

impl AgreementType {
    /// Every agreement type.
    pub const ALL: [Self; 3] = [Self::NonAggressionPact, Self::Alliance, Self::War];
}

/// Where an agreement stands. `Declined` and `Ended` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiplomacyStatus {
    Proposed,
    Accepted,
    Declined,
    Ended,
}

impl fmt::Display for DiplomacyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Proposed => "PROPOSED",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Ended => "ENDED",
        })
    }
}

/// The two sides of an agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parties {
    pub initiator_id: PlayerId,
    pub target_id: PlayerId,
}

impl Parties {
    /// `true` if `player_id` is either side.
    #[must_use]
    pub fn involves(self, player_id: PlayerId) -> bool {
        self.initiator_id == player_id || self.target_id == player_id
    }
}

/// The aggregate root for one diplomacy agreement.
#[derive(Debug)]
pub struct DiplomacyAgreement {
    /// Aggregate identifier.
    pub id: DiplomacyId,
    /// Current version (event count).
    pub(crate) version: i64,
    pub(crate) game_id: Option<GameId>,
    pub(crate) parties: Option<Parties>,
    pub(crate) agreement_type: Option<AgreementType>,
    pub(crate) status: DiplomacyStatus,
    uncommitted_events: Vec<DiplomacyEvent>,
}

impl DiplomacyAgreement {
    /// Creates an empty agreement ready for replay.
    #[must_use]
    pub fn new(id: DiplomacyId) -> Self {
        Self {
            id,
            version: 0,
            game_id: None,
            parties: None,
            agreement_type: None,
            status: DiplomacyStatus::Proposed,
            uncommitted_events: Vec::new(),
        }
    }

    #[must_use]
    pub fn status(&self) -> DiplomacyStatus {
        self.status
    }

    #[must_use]
    pub fn agreement_type(&self) -> Option<AgreementType> {
        self.agreement_type
    }

    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    fn record(&mut self, kind: DiplomacyEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        let metadata = EventMetadata::new(
            kind.event_type(),
            self.id.as_uuid(),
            self.next_sequence_number(),
            correlation_id,
            clock.now(),
        );
        self.uncommitted_events.push(DiplomacyEvent { metadata, kind });
    }

    fn proposal(&self) -> Result<(GameId, Parties), DomainError> {
        match (self.game_id, self.parties) {
            (Some(game_id), Some(parties)) => Ok((game_id, parties)),
            _ => Err(DomainError::AggregateNotFound(self.id.as_uuid())),
        }
    }

    /// Opens the agreement in `Proposed`.
    ///
    /// # Errors
    ///
    /// Returns `AgreementAlreadyExists` or `SelfProposal`.
    pub fn propose(
        &mut self,
        game_id: GameId,
        parties: Parties,
        agreement_type: AgreementType,
        proposed_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if self.exists() {
            return Err(DiplomacyRuleError::AgreementAlreadyExists(self.id).into());
        }
        DiplomacyPolicy::validate_propose(parties.initiator_id, parties.target_id, agreement_type)?;
        let kind = DiplomacyEventKind::DiplomacyProposed(DiplomacyProposed {
            diplomacy_id: self.id,
            game_id,
            initiator_id: parties.initiator_id,
            target_id: parties.target_id,
            agreement_type,
            proposed_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` for an unknown agreement, or the first
    /// rule `DiplomacyPolicy::validate_accept` reports.
    pub fn accept(
        &mut self,
        actor_id: PlayerId,
        accepted_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let (game_id, parties) = self.proposal()?;
        DiplomacyPolicy::validate_accept(actor_id, parties, self.status)?;
        let kind = DiplomacyEventKind::DiplomacyAccepted(DiplomacyAccepted {
            diplomacy_id: self.id,
            game_id,
            accepted_by: actor_id,
            accepted_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` for an unknown agreement, or the first
    /// rule `DiplomacyPolicy::validate_decline` reports.
    pub fn decline(
        &mut self,
        actor_id: PlayerId,
        declined_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let (game_id, parties) = self.proposal()?;
        DiplomacyPolicy::validate_decline(actor_id, parties, self.status)?;
        let kind = DiplomacyEventKind::DiplomacyDeclined(DiplomacyDeclined {
            diplomacy_id: self.id,
            game_id,
            declined_by: actor_id,
            declined_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AggregateNotFound` for an unknown agreement, or the first
    /// rule `DiplomacyPolicy::validate_end` reports.
    pub fn end(
        &mut self,
        actor_id: PlayerId,
        ended_at: Timestamp,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let (game_id, parties) = self.proposal()?;
        DiplomacyPolicy::validate_end(actor_id, parties, self.status)?;
        let kind = DiplomacyEventKind::DiplomacyEnded(DiplomacyEnded {
            diplomacy_id: self.id,
            game_id,
            ended_by: actor_id,
            ended_at,
        });
        self.record(kind, correlation_id, clock);
        Ok(())
    }
}

impl AggregateRoot for DiplomacyAgreement {
    type Event = DiplomacyEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id.as_uuid()
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match &event.kind {
            DiplomacyEventKind::DiplomacyProposed(payload) => {
                self.game_id = Some(payload.game_id);
                self.parties = Some(Parties {
                    initiator_id: payload.initiator_id,
                    target_id: payload.target_id,
                });
                self.agreement_type = Some(payload.agreement_type);
                self.status = DiplomacyStatus::Proposed;
            }
            DiplomacyEventKind::DiplomacyAccepted(_) => self.status = DiplomacyStatus::Accepted,
            DiplomacyEventKind::DiplomacyDeclined(_) => self.status = DiplomacyStatus::Declined,
            DiplomacyEventKind::DiplomacyEnded(_) => self.status = DiplomacyStatus::Ended,
        }
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexrealm_test_support::{FixedClock, fixed_now};

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn commit(agreement: &mut DiplomacyAgreement) {
        let events = agreement.uncommitted_events().to_vec();
        agreement.clear_uncommitted_events();
        for event in &events {
            agreement.apply(event);
        }
    }

    fn proposed(parties: Parties) -> DiplomacyAgreement {
        let mut agreement = DiplomacyAgreement::new(DiplomacyId::generate());
        agreement
            .propose(
                GameId::generate(),
                parties,
                AgreementType::Alliance,
                at(),
                Uuid::new_v4(),
                &FixedClock::default(),
            )
            .unwrap();
        commit(&mut agreement);
        agreement
    }

    fn parties() -> Parties {
        Parties {
            initiator_id: PlayerId::generate(),
            target_id: PlayerId::generate(),
        }
    }

    #[test]
    fn test_accept_then_end_by_initiator() {
        // Arrange
        let parties = parties();
        let mut agreement = proposed(parties);
        let clock = FixedClock::default();

        // Act
        agreement.accept(parties.target_id, at(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut agreement);
        agreement.end(parties.initiator_id, at(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut agreement);

        // Assert
        assert_eq!(agreement.status(), DiplomacyStatus::Ended);
        assert_eq!(agreement.version(), 3);
    }

    #[test]
    fn test_declined_agreement_is_terminal() {
        // Arrange
        let parties = parties();
        let mut agreement = proposed(parties);
        let clock = FixedClock::default();
        agreement.decline(parties.target_id, at(), Uuid::new_v4(), &clock).unwrap();
        commit(&mut agreement);

        // Act
        let accept = agreement.accept(parties.target_id, at(), Uuid::new_v4(), &clock);
        let end = agreement.end(parties.target_id, at(), Uuid::new_v4(), &clock);

        // Assert
        match accept.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "can_only_accept_proposed"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
        match end.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "can_only_end_accepted"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_initiator_cannot_accept_own_proposal() {
        let parties = parties();
        let mut agreement = proposed(parties);

        let result = agreement.accept(
            parties.initiator_id,
            at(),
            Uuid::new_v4(),
            &FixedClock::default(),
        );

        match result.unwrap_err() {
            DomainError::RuleViolation(v) => assert_eq!(v.code, "only_target_can_accept"),
            other => panic!("expected RuleViolation, got {other:?}"),
        }
    }

    #[test]
    fn test_self_proposal_emits_nothing() {
        let player = PlayerId::generate();
        let mut agreement = DiplomacyAgreement::new(DiplomacyId::generate());

        let result = agreement.propose(
            GameId::generate(),
            Parties {
                initiator_id: player,
                target_id: player,
            },
            AgreementType::War,
            at(),
            Uuid::new_v4(),
            &FixedClock::default(),
        );

        assert!(matches!(result, Err(DomainError::RuleViolation(_))));
        assert!(agreement.uncommitted_events().is_empty());
    }
}
