//! Domain layer for the Visibility context.

pub mod aggregates;
pub mod calculator;
pub mod commands;
pub mod events;
