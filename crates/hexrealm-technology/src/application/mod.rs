//! Application layer for the Technology context.

pub mod command_handlers;
pub mod projections;
pub mod query_handlers;
