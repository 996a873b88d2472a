//! Integration tests for `DieselAccountRepository` against embedded
//! PostgreSQL.

use bloodbridge::domain::ports::{AccountRepository, AccountRepositoryError};
use bloodbridge::domain::{AdminAccount, Credentials, UserAccount, Username};
use bloodbridge::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
use chrono::NaiveDate;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;

mod support;

use support::{handle_cluster_setup_failure, provision_database, shared_cluster};

struct TestContext {
    runtime: Runtime,
    repository: DieselAccountRepository,
    _database: TemporaryDatabase,
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_database(cluster)?;

    let config = PoolConfig::new(database.url())
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        repository: DieselAccountRepository::new(pool),
        _database: database,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn credentials(username: &str) -> Credentials {
    Credentials::try_from_parts(username, "pw").expect("credentials")
}

fn name(raw: &str) -> Username {
    Username::new(raw).expect("username")
}

#[rstest]
fn duplicate_user_is_rejected(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: duplicate_user_is_rejected skipped");
        return;
    };
    let account = UserAccount::new(&credentials("ann"));
    ctx.runtime
        .block_on(ctx.repository.insert_user(&account))
        .expect("first signup");

    let again = ctx.runtime.block_on(ctx.repository.insert_user(&account));

    assert_eq!(again, Err(AccountRepositoryError::duplicate("ann")));
}

#[rstest]
fn user_and_admin_tables_are_independent(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: user_and_admin_tables_are_independent skipped");
        return;
    };
    ctx.runtime
        .block_on(ctx.repository.insert_user(&UserAccount::new(&credentials("sam"))))
        .expect("user signup");
    ctx.runtime
        .block_on(ctx.repository.insert_admin(&AdminAccount::new(&credentials("sam"))))
        .expect("admin signup with the same name");

    let admin = ctx
        .runtime
        .block_on(ctx.repository.find_admin(&name("sam")))
        .expect("find admin");
    assert!(admin.is_some_and(|account| account.password_matches("pw")));
}

#[rstest]
fn record_donation_sets_the_date(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: record_donation_sets_the_date skipped");
        return;
    };
    let donated_on = NaiveDate::from_ymd_opt(2024, 5, 1).expect("valid date");
    ctx.runtime
        .block_on(ctx.repository.insert_user(&UserAccount::new(&credentials("bob"))))
        .expect("signup");

    ctx.runtime
        .block_on(ctx.repository.record_donation(&name("bob"), donated_on))
        .expect("record donation");
    let missing = ctx
        .runtime
        .block_on(ctx.repository.record_donation(&name("ghost"), donated_on));

    let stored = ctx
        .runtime
        .block_on(ctx.repository.find_user(&name("bob")))
        .expect("find user")
        .expect("user exists");
    assert_eq!(stored.last_donation, Some(donated_on));
    assert_eq!(missing, Err(AccountRepositoryError::unknown_account("ghost")));
}
