//! Hexrealm: Technology bounded context.
//!
//! Holds the fixed technology catalog and each player's research tree:
//! science points earned and technologies discovered in prerequisite
//! order.

pub mod application;
pub mod domain;
