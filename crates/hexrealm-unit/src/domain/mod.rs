//! Domain layer for the Unit context.

pub mod aggregates;
pub mod combat;
pub mod commands;
pub mod errors;
pub mod events;
