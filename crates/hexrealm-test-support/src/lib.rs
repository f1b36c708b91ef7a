//! Shared test fakes and fixtures for the Hexrealm strategy engine.

mod clock;
mod fixtures;
mod repository;
mod rng;

pub use clock::{FixedClock, fixed_now};
pub use fixtures::{position, stored_event};
pub use repository::{
    ConflictingEventRepository, EmptyEventRepository, FailingEventRepository,
    RecordingEventRepository,
};
pub use rng::{MockRng, SequenceRng};
