//! Domain layer for the City context.

pub mod aggregates;
pub mod commands;
pub mod errors;
pub mod events;
pub mod policies;
