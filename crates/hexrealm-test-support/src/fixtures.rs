//! Builders for values that tests construct over and over.

use hexrealm_core::position::Position;
use hexrealm_core::repository::StoredEvent;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::fixed_now;

/// Builds a position, panicking on negative coordinates.
///
/// # Panics
///
/// Panics if `x` or `y` is negative.
#[must_use]
pub fn position(x: i32, y: i32) -> Position {
    Position::new(x, y).expect("test positions must be non-negative")
}

/// Builds a stored event wrapping `kind` as its payload.
///
/// # Panics
///
/// Panics if `kind` cannot be serialized.
pub fn stored_event(
    aggregate_id: Uuid,
    sequence_number: i64,
    event_type: &str,
    kind: &impl Serialize,
) -> StoredEvent {
    StoredEvent {
        event_id: Uuid::new_v4(),
        aggregate_id,
        event_type: event_type.to_owned(),
        payload: serde_json::to_value(kind).expect("test payload must serialize"),
        sequence_number,
        correlation_id: Uuid::new_v4(),
        causation_id: Uuid::new_v4(),
        occurred_at: fixed_now(),
    }
}
