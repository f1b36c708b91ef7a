//! Hexrealm core: shared domain abstractions.
//!
//! This crate defines the traits every bounded context builds on
//! (aggregates, events, commands, repositories, projections) and the
//! shared kernel of value objects: identifiers, positions, health,
//! timestamps, terrain and unit types. It contains no infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod health;
pub mod ids;
pub mod position;
pub mod projection;
pub mod repository;
pub mod rng;
pub mod terrain;
pub mod timestamp;
pub mod unit_type;
