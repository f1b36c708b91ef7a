//! Hexrealm: Unit bounded context.
//!
//! Responsible for unit creation, range-limited movement, combat
//! resolution and destruction.

pub mod application;
pub mod domain;
