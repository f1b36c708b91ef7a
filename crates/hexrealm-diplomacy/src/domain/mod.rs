//! Domain layer for the Diplomacy context.

pub mod aggregates;
pub mod commands;
pub mod errors;
pub mod events;
pub mod policies;
