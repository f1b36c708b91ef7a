//! Domain events for the City context.

use hexrealm_core::event::{DomainEvent, EventMetadata};
use hexrealm_core::ids::{CityId, GameId, PlayerId, UnitId};
use hexrealm_core::position::Position;
use hexrealm_core::timestamp::Timestamp;
use serde::{Deserialize, Serialize};

/// Event type tag for [`CityWasFounded`].
pub const CITY_FOUNDED_EVENT_TYPE: &str = "city.city_founded";

/// Emitted when a unit founds a city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityWasFounded {
    /// The city identifier.
    pub city_id: CityId,
    /// Owning player.
    pub owner_id: PlayerId,
    /// Game the city belongs to.
    pub game_id: GameId,
    /// Unit consumed by the founding.
    pub unit_id: UnitId,
    /// City name.
    pub name: String,
    /// City location.
    pub position: Position,
    /// City level, 1 at founding.
    pub level: u32,
    /// Caller-set founding time.
    pub founded_at: Timestamp,
}

/// Event payload variants for the City context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CityEventKind {
    /// A city has been founded.
    CityWasFounded(CityWasFounded),
}

/// Domain event envelope for the City context.
#[derive(Debug, Clone)]
pub struct CityEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: CityEventKind,
}

impl DomainEvent for CityEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            CityEventKind::CityWasFounded(_) => CITY_FOUNDED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("CityEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
