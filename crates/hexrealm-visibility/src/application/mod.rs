//! Application layer for the Visibility context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
