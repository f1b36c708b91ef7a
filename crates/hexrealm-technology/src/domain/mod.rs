//! Domain layer for the Technology context.

pub mod aggregates;
pub mod catalog;
pub mod commands;
pub mod errors;
pub mod events;
pub mod policies;
