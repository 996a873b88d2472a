//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`IdentityCommand`, `BloodBankCommand`, `BloodBankQuery`)
//! are called by inbound adapters. Driven ports (repositories and the
//! notifier) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod blood_bank;
mod identity_command;
mod inventory_repository;
mod notifier;
mod request_repository;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use blood_bank::{MockBloodBankCommand, MockBloodBankQuery};
pub use blood_bank::{
    AdminDashboard, BloodBankCommand, BloodBankQuery, DispatchReceipt, DonationReceipt,
    InventoryUpdateOutcome, NewBloodRequest, UserDashboard,
};
pub use identity_command::IdentityCommand;
#[cfg(test)]
pub use identity_command::MockIdentityCommand;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
pub use inventory_repository::{InventoryRepository, InventoryRepositoryError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NoOpNotifier, Notifier, NotifierError};
#[cfg(test)]
pub use request_repository::MockRequestRepository;
pub use request_repository::{RequestRepository, RequestRepositoryError};
