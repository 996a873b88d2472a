//! Demo data for local runs against the in-memory stores.

use crate::domain::ports::{AccountRepository, AccountRepositoryError};
use crate::domain::{AdminAccount, BloodType, Credentials, UserAccount};

use super::{MemoryAccountRepository, MemoryInventoryRepository};

/// Starting stock for a demo blood bank.
pub const DEMO_STOCK: [(BloodType, u32); 8] = [
    (BloodType::OPositive, 10),
    (BloodType::ONegative, 5),
    (BloodType::APositive, 8),
    (BloodType::ANegative, 4),
    (BloodType::BPositive, 6),
    (BloodType::BNegative, 3),
    (BloodType::AbPositive, 2),
    (BloodType::AbNegative, 1),
];

/// Inventory pre-filled with [`DEMO_STOCK`].
pub fn demo_inventory() -> MemoryInventoryRepository {
    MemoryInventoryRepository::with_levels(DEMO_STOCK)
}

/// Insert the `user`/`user` and `admin`/`admin` accounts.
pub async fn seed_demo_accounts(
    accounts: &MemoryAccountRepository,
) -> Result<(), AccountRepositoryError> {
    let user = Credentials::try_from_parts("user", "user")
        .map_err(|err| AccountRepositoryError::query(err.to_string()))?;
    let admin = Credentials::try_from_parts("admin", "admin")
        .map_err(|err| AccountRepositoryError::query(err.to_string()))?;
    accounts.insert_user(&UserAccount::new(&user)).await?;
    accounts.insert_admin(&AdminAccount::new(&admin)).await
}
