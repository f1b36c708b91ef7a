//! Commands for the Diplomacy context.

use hexrealm_core::command::Command;
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};
use hexrealm_core::timestamp::Timestamp;
use uuid::Uuid;

use super::aggregates::AgreementType;

/// Command to offer an agreement.
#[derive(Debug, Clone)]
pub struct ProposeDiplomacy {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Identifier of the new agreement.
    pub diplomacy_id: DiplomacyId,
    pub game_id: GameId,
    pub initiator_id: PlayerId,
    pub target_id: PlayerId,
    pub agreement_type: AgreementType,
    pub proposed_at: Timestamp,
}

/// Command for the target to accept a proposal.
#[derive(Debug, Clone)]
pub struct AcceptDiplomacy {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub diplomacy_id: DiplomacyId,
    /// Player answering.
    pub actor_id: PlayerId,
    pub accepted_at: Timestamp,
}

/// Command for the target to decline a proposal.
#[derive(Debug, Clone)]
pub struct DeclineDiplomacy {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub diplomacy_id: DiplomacyId,
    /// Player answering.
    pub actor_id: PlayerId,
    pub declined_at: Timestamp,
}

/// Command for either party to end an accepted agreement.
#[derive(Debug, Clone)]
pub struct EndDiplomacy {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    pub diplomacy_id: DiplomacyId,
    /// Player ending the agreement.
    pub actor_id: PlayerId,
    pub ended_at: Timestamp,
}

macro_rules! diplomacy_command {
    ($command:ty, $name:literal) => {
        impl Command for $command {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> Uuid {
                self.correlation_id
            }

            fn target_stream(&self) -> Uuid {
                self.diplomacy_id.as_uuid()
            }
        }
    };
}

diplomacy_command!(ProposeDiplomacy, "diplomacy.propose");
diplomacy_command!(AcceptDiplomacy, "diplomacy.accept");
diplomacy_command!(DeclineDiplomacy, "diplomacy.decline");
diplomacy_command!(EndDiplomacy, "diplomacy.end");
