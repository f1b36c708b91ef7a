//! Domain layer for the Game context.

pub mod aggregates;
pub mod commands;
pub mod errors;
pub mod events;
pub mod map;
pub mod policies;
