//! Hexrealm: Game lifecycle bounded context.
//!
//! Responsible for games (creation, joining, starting, turn order),
//! players, and the generated world map each game is played on.

pub mod application;
pub mod domain;
