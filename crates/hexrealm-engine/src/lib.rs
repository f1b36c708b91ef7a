//! Hexrealm engine: the runtime that ties the bounded contexts together.
//!
//! Commands enter through [`Engine::execute`], are serialized per target
//! stream by the [`dispatcher`] and appended to the event store. Stored
//! events are then published on an in-process channel to the read models
//! and to the [`reactions`], which turn them into follow-up commands for
//! a background worker. Reads go through the [`query_service`].

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod query_service;
pub mod reactions;
pub mod read_models;

pub use command::GameCommand;
pub use config::EngineConfig;
pub use engine::{DeadLetter, Engine};
pub use query_service::QueryService;
