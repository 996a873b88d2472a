//! Builders choosing the store backing and notifier for the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use bloodbridge::domain::ports::{AccountRepository, InventoryRepository, Notifier, RequestRepository};
use bloodbridge::domain::{IdentityService, ReconciliationEngine};
use bloodbridge::inbound::http::state::HttpState;
use bloodbridge::outbound::memory::{
    MemoryAccountRepository, MemoryInventoryRepository, MemoryRequestRepository, demo_inventory,
    seed_demo_accounts,
};
use bloodbridge::outbound::notify::{LogNotifier, WebhookNotifier};
use bloodbridge::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselInventoryRepository, DieselRequestRepository,
    PoolConfig, migrate_schema,
};
use bloodbridge::settings::AppSettings;

fn wire<I, R, A>(
    inventory: I,
    requests: R,
    accounts: A,
    notifier: Arc<dyn Notifier>,
) -> HttpState
where
    I: InventoryRepository + 'static,
    R: RequestRepository + 'static,
    A: AccountRepository + 'static,
{
    let accounts = Arc::new(accounts);
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let engine = Arc::new(ReconciliationEngine::new(
        Arc::new(inventory),
        Arc::new(requests),
        Arc::clone(&accounts),
        Arc::clone(&notifier),
        clock,
    ));
    let identity = Arc::new(IdentityService::new(accounts, notifier));
    HttpState::new(identity, engine.clone(), engine)
}

fn build_notifier(settings: &AppSettings) -> io::Result<Arc<dyn Notifier>> {
    let endpoint = settings.notify_webhook_url().map_err(io::Error::other)?;
    Ok(match endpoint {
        Some(endpoint) => {
            info!(endpoint = %endpoint, "delivering notifications to webhook");
            Arc::new(
                WebhookNotifier::new(endpoint, settings.notify_timeout())
                    .map_err(io::Error::other)?,
            )
        }
        None => {
            info!("logging notifications");
            Arc::new(LogNotifier)
        }
    })
}

async fn durable_state(database_url: &str, notifier: Arc<dyn Notifier>) -> io::Result<HttpState> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || migrate_schema(&url))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(io::Error::other)?;
    Ok(wire(
        DieselInventoryRepository::new(pool.clone()),
        DieselRequestRepository::new(pool.clone()),
        DieselAccountRepository::new(pool),
        notifier,
    ))
}

async fn volatile_state(seed_demo_data: bool, notifier: Arc<dyn Notifier>) -> io::Result<HttpState> {
    let accounts = MemoryAccountRepository::new();
    let inventory = if seed_demo_data {
        seed_demo_accounts(&accounts)
            .await
            .map_err(io::Error::other)?;
        info!("seeded demo stock and accounts");
        demo_inventory()
    } else {
        MemoryInventoryRepository::new()
    };
    Ok(wire(
        inventory,
        MemoryRequestRepository::new(),
        accounts,
        notifier,
    ))
}

/// Build the HTTP state from settings.
///
/// A configured database URL selects the Diesel stores after running
/// migrations; otherwise state is kept in memory.
pub(crate) async fn build_http_state(settings: &AppSettings) -> io::Result<HttpState> {
    let notifier = build_notifier(settings)?;
    match settings.database_url.as_deref() {
        Some(url) => {
            if settings.seed_demo_data {
                tracing::warn!("demo data is only seeded into in-memory stores");
            }
            durable_state(url, notifier).await
        }
        None => {
            info!("using in-memory stores; data is lost on restart");
            volatile_state(settings.seed_demo_data, notifier).await
        }
    }
}
