//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Durable implementations of the repository ports, backed by PostgreSQL via
//! `diesel-async` with `bb8` pooling.
//!
//! - **Thin adapters**: repositories translate between row structs and
//!   domain types; the reconciliation rules stay in the domain.
//! - **Internal models**: `models.rs` and `schema.rs` are private to this
//!   module.
//! - **Guarded writes**: stock adjustments and status transitions are single
//!   conditional statements.
//!
//! # Example
//!
//! ```ignore
//! use bloodbridge::outbound::persistence::{DbPool, DieselInventoryRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/bloodbridge")).await?;
//! let inventory = DieselInventoryRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_error_mapping;
mod diesel_inventory_repository;
mod diesel_request_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_inventory_repository::DieselInventoryRepository;
pub use diesel_request_repository::DieselRequestRepository;
pub use migrations::{MigrationError, migrate_schema};
pub use pool::{DbPool, PoolConfig, PoolError};
