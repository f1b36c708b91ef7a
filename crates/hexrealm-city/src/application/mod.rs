//! Application layer for the City context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
