//! Application layer for the Unit context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
