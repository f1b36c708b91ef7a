//! Event store implementations for the Hexrealm engine.
//!
//! Both stores enforce the same contract: events are appended per
//! aggregate stream with an optimistic version check, and a global append
//! order is kept so read models can be rebuilt from scratch.

pub mod in_memory_event_repository;
pub mod pg_event_repository;
pub mod schema;

pub use in_memory_event_repository::InMemoryEventRepository;
pub use pg_event_repository::PgEventRepository;
