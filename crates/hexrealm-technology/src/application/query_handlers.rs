//! Query handlers for the Technology context.

use hexrealm_core::error::DomainError;
use hexrealm_core::ids::{PlayerId, TechnologyId};

use crate::application::projections::{TechnologyProjection, TechnologyTreeView};
use crate::domain::catalog::{Technology, all_technologies, find_technology};
use crate::domain::policies::TechnologyManagementService;

/// Retrieves a player's research tree.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the tree is not projected.
pub fn get_technology_tree(
    trees: &TechnologyProjection,
    player_id: PlayerId,
) -> Result<TechnologyTreeView, DomainError> {
    trees
        .get(player_id)
        .ok_or(DomainError::AggregateNotFound(player_id.as_uuid()))
}

/// Technologies the player can afford and has the prerequisites for.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the tree is not projected.
pub fn get_available_technologies(
    trees: &TechnologyProjection,
    player_id: PlayerId,
) -> Result<Vec<Technology>, DomainError> {
    let tree = get_technology_tree(trees, player_id)?;
    Ok(TechnologyManagementService::available_technologies(
        &tree.unlocked_technologies,
        tree.science_points,
    )
    .into_iter()
    .cloned()
    .collect())
}

/// Catalog entry for a technology.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an id outside the catalog.
pub fn get_technology_details(technology_id: TechnologyId) -> Result<Technology, DomainError> {
    find_technology(technology_id)
        .cloned()
        .ok_or(DomainError::AggregateNotFound(technology_id.as_uuid()))
}

/// The whole catalog.
#[must_use]
pub fn get_all_technologies() -> Vec<Technology> {
    all_technologies().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::technology_id;

    #[test]
    fn test_get_technology_details_by_slug_id() {
        let details = get_technology_details(technology_id("navigation")).unwrap();

        assert_eq!(details.name, "Navigation");
        assert_eq!(details.cost, 30);
        assert_eq!(get_all_technologies().len(), 10);
    }

    #[test]
    fn test_available_technologies_need_a_tree() {
        let trees = TechnologyProjection::new();
        let player_id = PlayerId::generate();

        let result = get_available_technologies(&trees, player_id);

        match result.unwrap_err() {
            DomainError::AggregateNotFound(id) => assert_eq!(id, player_id.as_uuid()),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }
}
