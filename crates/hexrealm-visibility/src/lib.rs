//! Hexrealm: Visibility bounded context.
//!
//! Tracks, per player and game, which map cells are currently in sight
//! and which have been seen before.

pub mod application;
pub mod domain;
