//! Application layer for the Game context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
