//! Hexrealm: Diplomacy bounded context.
//!
//! Agreements between two players of a game: proposed by one side,
//! accepted or declined by the other, and ended by either once in force.

pub mod application;
pub mod domain;
