//! Hexrealm: City bounded context.
//!
//! Responsible for founding cities on suitable terrain and keeping the
//! per-game city registry used by other contexts.

pub mod application;
pub mod domain;
