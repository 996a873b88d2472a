//! End-to-end flows through the reconciliation engine over in-memory stores.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bloodbridge::domain::ports::{
    AccountRepository, NewBloodRequest, NoOpNotifier, Notifier, NotifierError, RequestRepository,
    RequestRepositoryError,
};
use bloodbridge::domain::{
    Actor, BloodRequest, BloodType, Credentials, InventoryUpdate, ReconciliationEngine,
    ReconciliationError, RequestId, RequestStatus, Urgency, UserAccount, Username,
};
use bloodbridge::outbound::memory::{
    MemoryAccountRepository, MemoryInventoryRepository, MemoryRequestRepository,
};
use bloodbridge::test_support::MutableClock;
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

type Engine =
    ReconciliationEngine<MemoryInventoryRepository, MemoryRequestRepository, MemoryAccountRepository>;

#[derive(Default)]
struct RecordingNotifier(Mutex<Vec<String>>);

impl RecordingNotifier {
    fn subjects(&self) -> Vec<String> {
        self.0.lock().expect("notifier lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, subject: &str, _message: &str) -> Result<(), NotifierError> {
        self.0.lock().expect("notifier lock").push(subject.to_owned());
        Ok(())
    }
}

struct World {
    engine: Engine,
    clock: Arc<MutableClock>,
    notifier: Arc<RecordingNotifier>,
}

fn name(raw: &str) -> Username {
    Username::new(raw).expect("username")
}

fn user(raw: &str) -> Actor {
    Actor::User(name(raw))
}

fn admin() -> Actor {
    Actor::Admin(name("root"))
}

fn o_positive(quantity: i64) -> NewBloodRequest {
    NewBloodRequest {
        blood_type: BloodType::OPositive,
        quantity,
        urgency: Urgency::High,
    }
}

#[fixture]
async fn world() -> World {
    let accounts = MemoryAccountRepository::new();
    for username in ["ann", "bob", "cy"] {
        let credentials = Credentials::try_from_parts(username, "pw").expect("credentials");
        accounts
            .insert_user(&UserAccount::new(&credentials))
            .await
            .expect("seed user");
    }
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid instant");
    let clock = Arc::new(MutableClock::new(start));
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = ReconciliationEngine::new(
        Arc::new(MemoryInventoryRepository::with_levels([(BloodType::OPositive, 10)])),
        Arc::new(MemoryRequestRepository::new()),
        Arc::new(accounts),
        notifier.clone(),
        clock.clone(),
    );
    World {
        engine,
        clock,
        notifier,
    }
}

#[rstest]
#[tokio::test]
async fn dispatch_moves_stock_once(#[future] world: World) {
    let World { engine, .. } = world.await;

    let request = engine
        .create_request(&user("ann"), o_positive(5))
        .await
        .expect("request opened");
    assert_eq!(request.status, RequestStatus::Open);
    assert_eq!(request.quantity, 5);

    let receipt = engine.dispatch(&admin(), &request.id).await.expect("dispatch");
    assert_eq!(receipt.remaining, 5);
    assert_eq!(receipt.request.status, RequestStatus::Dispatched);

    let again = engine.dispatch(&admin(), &request.id).await;
    assert_eq!(again, Err(ReconciliationError::NotFound { id: request.id }));
    let levels = engine.inventory().await.expect("levels");
    assert_eq!(levels.quantity(BloodType::OPositive), 5);
}

#[rstest]
#[tokio::test]
async fn dispatch_without_stock_changes_nothing(#[future] world: World) {
    let World { engine, .. } = world.await;
    let request = engine
        .create_request(&user("ann"), o_positive(11))
        .await
        .expect("request opened");

    let result = engine.dispatch(&admin(), &request.id).await;
    assert!(matches!(
        result,
        Err(ReconciliationError::InsufficientStock { .. })
    ));

    let levels = engine.inventory().await.expect("levels");
    assert_eq!(levels.quantity(BloodType::OPositive), 10);
    let listed = engine.list_requests().await.expect("list");
    assert_eq!(listed.first().map(|r| r.status), Some(RequestStatus::Open));
}

#[rstest]
#[tokio::test]
async fn donation_stocks_units_and_starts_cooldown(#[future] world: World) {
    let World { engine, .. } = world.await;
    let request = engine
        .create_request(&user("ann"), o_positive(5))
        .await
        .expect("request opened");

    let receipt = engine
        .donate_to(&user("bob"), &request.id)
        .await
        .expect("donation");
    assert_eq!(receipt.stocked, 15);
    assert_eq!(receipt.request.status, RequestStatus::DonatedStocked);

    let eligibility = engine.is_eligible(&name("bob")).await.expect("eligibility");
    assert!(!eligibility.eligible);
    assert_eq!(eligibility.days_remaining, 56);
}

#[rstest]
#[tokio::test]
async fn second_donor_doubles_the_increment(#[future] world: World) {
    let World { engine, .. } = world.await;
    let request = engine
        .create_request(&user("ann"), o_positive(5))
        .await
        .expect("request opened");

    engine
        .donate_to(&user("bob"), &request.id)
        .await
        .expect("first donation");
    let second = engine
        .donate_to(&user("cy"), &request.id)
        .await
        .expect("second donation");

    assert_eq!(second.stocked, 20);
}

#[rstest]
#[tokio::test]
async fn eligibility_window_reopens_after_cooldown(#[future] world: World) {
    let World { engine, clock, .. } = world.await;
    let first = engine
        .create_request(&user("ann"), o_positive(1))
        .await
        .expect("request opened");
    let second = engine
        .create_request(&user("ann"), o_positive(1))
        .await
        .expect("request opened");
    engine
        .donate_to(&user("bob"), &first.id)
        .await
        .expect("donation");

    clock.advance_days(55);
    let blocked = engine.donate_to(&user("bob"), &second.id).await;
    assert_eq!(
        blocked.map(|receipt| receipt.stocked),
        Err(ReconciliationError::NotEligible { days_remaining: 1 })
    );

    clock.advance_days(1);
    engine
        .donate_to(&user("bob"), &second.id)
        .await
        .expect("eligible again");
}

#[rstest]
#[tokio::test]
async fn cancel_only_removes_own_open_requests(#[future] world: World) {
    let World { engine, .. } = world.await;
    let request = engine
        .create_request(&user("ann"), o_positive(2))
        .await
        .expect("request opened");

    assert!(matches!(
        engine.cancel(&user("bob"), &request.id).await,
        Err(ReconciliationError::Forbidden { .. })
    ));
    engine.dispatch(&admin(), &request.id).await.expect("dispatch");
    assert!(matches!(
        engine.cancel(&user("ann"), &request.id).await,
        Err(ReconciliationError::InvalidState { .. })
    ));
    assert_eq!(engine.list_requests().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn bulk_update_clamps_and_alerts(#[future] world: World) {
    let World {
        engine, notifier, ..
    } = world.await;
    let update: InventoryUpdate = [(BloodType::OPositive, 12), (BloodType::ONegative, -4)]
        .into_iter()
        .collect();

    let outcome = engine
        .set_inventory(&admin(), &update)
        .await
        .expect("update");

    assert_eq!(outcome.inventory.quantity(BloodType::OPositive), 12);
    assert_eq!(outcome.inventory.quantity(BloodType::ONegative), 0);
    assert!(outcome.low_stock.contains(&BloodType::ONegative));
    assert!(!outcome.low_stock.contains(&BloodType::OPositive));
    assert_eq!(notifier.subjects(), vec!["Low Blood Stock Alert".to_owned()]);
}

/// Request ledger where the requester cancels just before any status write.
#[derive(Default)]
struct CancelledBeforeWrite(MemoryRequestRepository);

#[async_trait]
impl RequestRepository for CancelledBeforeWrite {
    async fn insert(&self, request: &BloodRequest) -> Result<(), RequestRepositoryError> {
        self.0.insert(request).await
    }

    async fn find(&self, id: &RequestId) -> Result<Option<BloodRequest>, RequestRepositoryError> {
        self.0.find(id).await
    }

    async fn list(&self) -> Result<Vec<BloodRequest>, RequestRepositoryError> {
        self.0.list().await
    }

    async fn update_status(
        &self,
        id: &RequestId,
        status: RequestStatus,
        expected: Option<RequestStatus>,
    ) -> Result<(), RequestRepositoryError> {
        self.0.delete(id, RequestStatus::Open).await?;
        self.0.update_status(id, status, expected).await
    }

    async fn delete(
        &self,
        id: &RequestId,
        expected: RequestStatus,
    ) -> Result<(), RequestRepositoryError> {
        self.0.delete(id, expected).await
    }
}

#[rstest]
#[tokio::test]
async fn donation_racing_a_cancel_leaves_stock_unchanged() {
    let accounts = MemoryAccountRepository::new();
    for username in ["ann", "bob"] {
        let credentials = Credentials::try_from_parts(username, "pw").expect("credentials");
        accounts
            .insert_user(&UserAccount::new(&credentials))
            .await
            .expect("seed user");
    }
    let start = Utc
        .with_ymd_and_hms(2024, 5, 1, 9, 0, 0)
        .single()
        .expect("valid instant");
    let engine = ReconciliationEngine::new(
        Arc::new(MemoryInventoryRepository::with_levels([(BloodType::OPositive, 10)])),
        Arc::new(CancelledBeforeWrite::default()),
        Arc::new(accounts),
        Arc::new(NoOpNotifier),
        Arc::new(MutableClock::new(start)),
    );
    let request = engine
        .create_request(&user("ann"), o_positive(5))
        .await
        .expect("request opened");

    let result = engine.donate_to(&user("bob"), &request.id).await;

    assert_eq!(
        result.map(|receipt| receipt.stocked),
        Err(ReconciliationError::NotFound { id: request.id })
    );
    let levels = engine.inventory().await.expect("levels");
    assert_eq!(levels.quantity(BloodType::OPositive), 10);
    let bob = engine.is_eligible(&name("bob")).await.expect("eligibility");
    assert!(bob.eligible);
}
