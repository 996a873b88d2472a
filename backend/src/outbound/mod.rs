//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: volatile repositories guarded by mutexes
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **notify**: log and HTTP webhook notifiers
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod notify;
pub mod persistence;
