//! Application layer for the Diplomacy context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
