//! Dashboard read models.

use super::{ReconciliationEngine, ReconciliationError, require_admin, require_user};
use crate::domain::Actor;
use crate::domain::ports::{
    AccountRepository, AdminDashboard, InventoryRepository, RequestRepository, UserDashboard,
};

impl<I, R, A> ReconciliationEngine<I, R, A>
where
    I: InventoryRepository,
    R: RequestRepository,
    A: AccountRepository,
{
    pub async fn user_view(&self, actor: &Actor) -> Result<UserDashboard, ReconciliationError> {
        let username = require_user(actor)?;
        let inventory = self.inventory().await?;
        let requests = self.list_requests().await?;
        let eligibility = self.is_eligible(username).await?;
        Ok(UserDashboard {
            username: username.clone(),
            inventory,
            requests,
            eligibility,
        })
    }

    pub async fn admin_view(&self, actor: &Actor) -> Result<AdminDashboard, ReconciliationError> {
        let username = require_admin(actor)?;
        let inventory = self.inventory().await?;
        let requests = self.list_requests().await?;
        let low_stock = inventory.low_stock();
        Ok(AdminDashboard {
            username: username.clone(),
            inventory,
            requests,
            low_stock,
        })
    }
}
