//! Query handlers for the Diplomacy context.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{DiplomacyId, GameId, PlayerId};

use crate::application::projections::{DiplomacyProjection, DiplomacyView};

/// Retrieves an agreement by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the agreement is not projected.
pub fn get_diplomacy_view(
    agreements: &DiplomacyProjection,
    diplomacy_id: DiplomacyId,
) -> Result<DiplomacyView, DomainError> {
    agreements
        .get(diplomacy_id)
        .ok_or(DomainError::AggregateNotFound(diplomacy_id.as_uuid()))
}

/// Agreements of a game in proposal order.
#[must_use]
pub fn get_diplomacy_by_game(agreements: &DiplomacyProjection, game_id: GameId) -> Vec<DiplomacyView> {
    agreements.by_game(game_id)
}

/// Current standing between two players: their most recent agreement.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` with the game id if the two
/// players have never negotiated.
pub fn get_diplomacy_status(
    agreements: &DiplomacyProjection,
    game_id: GameId,
    player_a: PlayerId,
    player_b: PlayerId,
) -> Result<DiplomacyView, DomainError> {
    agreements
        .latest_between(game_id, player_a, player_b)
        .ok_or(DomainError::AggregateNotFound(game_id.as_uuid()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_between_strangers_is_not_found() {
        let agreements = DiplomacyProjection::new();
        let game_id = GameId::generate();

        let result = get_diplomacy_status(
            &agreements,
            game_id,
            PlayerId::generate(),
            PlayerId::generate(),
        );

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, game_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
        assert!(get_diplomacy_by_game(&agreements, game_id).is_empty());
    }
}
