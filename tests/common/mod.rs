use rust_decimal_macros::dec;
use streakvault::application::engine::{
    CommitmentEngine, CreateCommitment, EngineConfig, RepeatCheckInPolicy,
};
use streakvault::domain::account::{AccountId, Balance};
use streakvault::domain::commitment::SECONDS_PER_DAY;
use streakvault::domain::ports::{Capabilities, Clock, Ledger, LossAccountRegistry};
use streakvault::infrastructure::clock::ManualClock;
use streakvault::infrastructure::guards::{OwnerGuard, PauseSwitch};
use streakvault::infrastructure::in_memory::{
    InMemoryCommitmentStore, InMemoryLedger, InMemoryLossAccountRegistry, NotificationLog,
};

pub const OWNER: AccountId = 0;
pub const TREASURY: AccountId = 1;
pub const VAULT: AccountId = 2;
pub const LOSS_1: AccountId = 10;
pub const LOSS_2: AccountId = 11;
pub const USER_1: AccountId = 20;
pub const USER_2: AccountId = 21;

/// Mid-day instant, deliberately not a day boundary.
pub const GENESIS: i64 = 1_000_000;

pub const RAKE_BASIS_POINTS: u32 = 250;

pub struct TestBed {
    pub engine: CommitmentEngine,
    pub ledger: InMemoryLedger,
    pub clock: ManualClock,
    pub pause: PauseSwitch,
    pub notifications: NotificationLog,
}

/// Engine with loss accounts registered, a 2.5% rake and both users funded
/// with 10 units.
pub async fn testbed() -> TestBed {
    let ledger = InMemoryLedger::new();
    ledger.credit(USER_1, Balance::new(dec!(10))).await.unwrap();
    ledger.credit(USER_2, Balance::new(dec!(10))).await.unwrap();

    let registry = InMemoryLossAccountRegistry::new();
    for account in [OWNER, LOSS_1, LOSS_2] {
        registry.add(account).await.unwrap();
    }

    let clock = ManualClock::new(GENESIS);
    let pause = PauseSwitch::new();
    let notifications = NotificationLog::new();
    let engine = CommitmentEngine::new(
        Box::new(InMemoryCommitmentStore::new()),
        Box::new(ledger.clone()),
        Box::new(registry),
        Box::new(notifications.clone()),
        Capabilities {
            clock: Box::new(clock.clone()),
            pause: Box::new(pause.clone()),
            access: Box::new(OwnerGuard::new(OWNER)),
        },
        VAULT,
        EngineConfig {
            rake_basis_points: RAKE_BASIS_POINTS,
            treasury: TREASURY,
            repeat_check_in: RepeatCheckInPolicy::default(),
        },
    );

    TestBed {
        engine,
        ledger,
        clock,
        pause,
        notifications,
    }
}

/// The next midnight boundary at or after `now`.
pub fn next_midnight(now: i64) -> i64 {
    (now / SECONDS_PER_DAY + 1) * SECONDS_PER_DAY
}

pub fn request(target_days: u32, start_date: i64) -> CreateCommitment {
    CreateCommitment {
        target_days,
        loss_account: LOSS_1,
        start_date,
        title: "Test Commitment".to_string(),
        deposit: dec!(1),
    }
}

/// A 7-day, 1-unit commitment starting at the next midnight, owned by
/// `USER_1` with `LOSS_1` as the forfeiture destination.
pub async fn create_week_commitment(bed: &TestBed) -> u64 {
    bed.engine
        .create_commitment(USER_1, request(7, next_midnight(bed.clock.now())))
        .await
        .unwrap()
}
