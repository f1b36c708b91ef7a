//! Unit roster read model.

use std::collections::HashMap;
use std::sync::RwLock;

use hexrealm_core::error::DomainError;
use hexrealm_core::health::Health;
use hexrealm_core::ids::{GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::projection::{Checkpoints, Projection, read_view, write_view};
use hexrealm_core::repository::StoredEvent;
use hexrealm_core::timestamp::Timestamp;
use hexrealm_core::unit_type::UnitType;
use serde::Serialize;

use crate::domain::events::{
    UNIT_ATTACKED_EVENT_TYPE, UNIT_CREATED_EVENT_TYPE, UNIT_DESTROYED_EVENT_TYPE,
    UNIT_MOVED_EVENT_TYPE, UnitEventKind,
};

/// Read-only view of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitView {
    pub unit_id: UnitId,
    pub owner_id: PlayerId,
    pub game_id: GameId,
    pub unit_type: UnitType,
    pub position: Position,
    pub health: Health,
    pub is_dead: bool,
    pub created_at: Timestamp,
}

#[derive(Debug, Default)]
struct UnitTable {
    units: HashMap<UnitId, UnitView>,
    checkpoints: Checkpoints,
}

/// Projection of every unit, living or dead.
#[derive(Debug, Default)]
pub struct UnitProjection {
    table: RwLock<UnitTable>,
}

impl UnitProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, unit_id: UnitId) -> Option<UnitView> {
        read_view(&self.table).units.get(&unit_id).cloned()
    }

    #[must_use]
    pub fn by_game(&self, game_id: GameId) -> Vec<UnitView> {
        self.select(|u| u.game_id == game_id)
    }

    #[must_use]
    pub fn by_player(&self, owner_id: PlayerId) -> Vec<UnitView> {
        self.select(|u| u.owner_id == owner_id)
    }

    /// Cells held by living units of a game, optionally leaving one unit out.
    #[must_use]
    pub fn occupied_positions(&self, game_id: GameId, except: Option<UnitId>) -> Vec<Position> {
        self.select(|u| u.game_id == game_id && !u.is_dead && Some(u.unit_id) != except)
            .into_iter()
            .map(|u| u.position)
            .collect()
    }

    fn select(&self, filter: impl Fn(&UnitView) -> bool) -> Vec<UnitView> {
        let mut units: Vec<UnitView> = read_view(&self.table)
            .units
            .values()
            .filter(|u| filter(u))
            .cloned()
            .collect();
        units.sort_by_key(|u| (u.created_at, u.unit_id));
        units
    }
}

impl Projection for UnitProjection {
    fn name(&self) -> &'static str {
        "units"
    }

    fn event_types(&self) -> &'static [&'static str] {
        &[
            UNIT_CREATED_EVENT_TYPE,
            UNIT_MOVED_EVENT_TYPE,
            UNIT_ATTACKED_EVENT_TYPE,
            UNIT_DESTROYED_EVENT_TYPE,
        ]
    }

    fn apply(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind = event.decode::<UnitEventKind>()?;
        let mut table = write_view(&self.table);
        if !table.checkpoints.is_new(event) {
            return Ok(());
        }
        match kind {
            UnitEventKind::UnitWasCreated(created) => {
                table.units.insert(
                    created.unit_id,
                    UnitView {
                        unit_id: created.unit_id,
                        owner_id: created.owner_id,
                        game_id: created.game_id,
                        unit_type: created.unit_type,
                        position: created.position,
                        health: created.health,
                        is_dead: false,
                        created_at: created.created_at,
                    },
                );
            }
            UnitEventKind::UnitWasMoved(moved) => {
                if let Some(view) = table.units.get_mut(&moved.unit_id) {
                    view.position = moved.to;
                }
            }
            UnitEventKind::UnitWasAttacked(attacked) => {
                if let Some(view) = table.units.get_mut(&attacked.unit_id) {
                    let lost = view.health.current().saturating_sub(attacked.remaining_health);
                    view.health = view.health.take_damage(lost);
                    view.is_dead |= attacked.was_destroyed;
                }
            }
            UnitEventKind::UnitWasDestroyed(destroyed) => {
                if let Some(view) = table.units.get_mut(&destroyed.unit_id) {
                    view.is_dead = true;
                }
            }
        }
        table.checkpoints.record(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events::{UnitWasAttacked, UnitWasCreated, UnitWasDestroyed, UnitWasMoved};
    use hexrealm_test_support::{fixed_now, position, stored_event};

    fn at() -> Timestamp {
        Timestamp::from(fixed_now())
    }

    fn created(unit_id: UnitId, owner_id: PlayerId, game_id: GameId, pos: Position) -> StoredEvent {
        let kind = UnitEventKind::UnitWasCreated(UnitWasCreated {
            unit_id,
            owner_id,
            game_id,
            unit_type: UnitType::Warrior,
            position: pos,
            health: Health::full(100),
            created_at: at(),
        });
        stored_event(unit_id.as_uuid(), 1, UNIT_CREATED_EVENT_TYPE, &kind)
    }

    #[test]
    fn test_move_and_attack_update_the_view() {
        // Arrange
        let projection = UnitProjection::new();
        let (unit_id, owner, game) = (UnitId::generate(), PlayerId::generate(), GameId::generate());
        projection.apply(&created(unit_id, owner, game, position(1, 1))).unwrap();
        let moved = UnitEventKind::UnitWasMoved(UnitWasMoved {
            unit_id,
            owner_id: owner,
            game_id: game,
            from: position(1, 1),
            to: position(2, 2),
            moved_at: at(),
        });
        let attacked = UnitEventKind::UnitWasAttacked(UnitWasAttacked {
            unit_id,
            attacker_id: UnitId::generate(),
            damage: 9,
            remaining_health: 91,
            was_destroyed: false,
            attacked_at: at(),
        });

        // Act
        projection
            .apply(&stored_event(unit_id.as_uuid(), 2, UNIT_MOVED_EVENT_TYPE, &moved))
            .unwrap();
        projection
            .apply(&stored_event(unit_id.as_uuid(), 3, UNIT_ATTACKED_EVENT_TYPE, &attacked))
            .unwrap();

        // Assert
        let view = projection.get(unit_id).unwrap();
        assert_eq!(view.position, position(2, 2));
        assert_eq!(view.health.current(), 91);
        assert!(!view.is_dead);
    }

    #[test]
    fn test_dead_units_do_not_occupy_cells() {
        // Arrange
        let projection = UnitProjection::new();
        let game = GameId::generate();
        let (alive, fallen) = (UnitId::generate(), UnitId::generate());
        projection
            .apply(&created(alive, PlayerId::generate(), game, position(3, 3)))
            .unwrap();
        projection
            .apply(&created(fallen, PlayerId::generate(), game, position(4, 4)))
            .unwrap();
        let destroyed = UnitEventKind::UnitWasDestroyed(UnitWasDestroyed {
            unit_id: fallen,
            owner_id: PlayerId::generate(),
            game_id: game,
            destroyed_at: at(),
        });

        // Act
        projection
            .apply(&stored_event(fallen.as_uuid(), 2, UNIT_DESTROYED_EVENT_TYPE, &destroyed))
            .unwrap();

        // Assert
        assert_eq!(projection.occupied_positions(game, None), vec![position(3, 3)]);
        assert!(projection.occupied_positions(game, Some(alive)).is_empty());
        assert_eq!(projection.by_game(game).len(), 2);
    }

    #[test]
    fn test_redelivered_attack_is_not_applied_twice() {
        let projection = UnitProjection::new();
        let (unit_id, game) = (UnitId::generate(), GameId::generate());
        projection
            .apply(&created(unit_id, PlayerId::generate(), game, position(0, 0)))
            .unwrap();
        let attacked = stored_event(
            unit_id.as_uuid(),
            2,
            UNIT_ATTACKED_EVENT_TYPE,
            &UnitEventKind::UnitWasAttacked(UnitWasAttacked {
                unit_id,
                attacker_id: UnitId::generate(),
                damage: 30,
                remaining_health: 70,
                was_destroyed: false,
                attacked_at: at(),
            }),
        );

        projection.apply(&attacked).unwrap();
        projection.apply(&attacked).unwrap();

        assert_eq!(projection.get(unit_id).unwrap().health.current(), 70);
    }
}
