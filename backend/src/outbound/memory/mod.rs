//! In-memory repositories for the volatile backing.
//!
//! State lives in `std::sync::Mutex`-guarded collections and is lost on restart.
//! Each mutation holds the lock for its whole read-modify-write, so stock
//! adjustments and status transitions are atomic. A poisoned lock surfaces
//! as a `Connection` error.

mod accounts;
mod demo;
mod inventory;
mod requests;

pub use accounts::MemoryAccountRepository;
pub use demo::{DEMO_STOCK, demo_inventory, seed_demo_accounts};
pub use inventory::MemoryInventoryRepository;
pub use requests::MemoryRequestRepository;

fn poisoned(store: &str) -> String {
    format!("{store} store lock poisoned")
}
