use super::account::{AccountId, Balance};
use super::commitment::Commitment;
use super::notification::Notification;
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage of commitments plus the per-user and per-loss-account
/// indices. Identifiers are assigned by the store, zero-based and
/// monotonically increasing; records are never deleted.
#[async_trait]
pub trait CommitmentStore: Send + Sync {
    /// Persists a new commitment and returns its identifier. The stored
    /// record carries the assigned id regardless of what `commitment.id`
    /// held on the way in.
    async fn append(&self, commitment: Commitment) -> Result<u64>;
    async fn get(&self, id: u64) -> Result<Option<Commitment>>;
    /// Overwrites an existing record. The id must have been assigned by a
    /// prior `append`.
    async fn update(&self, commitment: Commitment) -> Result<()>;
    /// Commitment ids owned by `user`, in insertion order.
    async fn ids_for_user(&self, user: AccountId) -> Result<Vec<u64>>;
    /// Commitment ids designating `loss_account`, in insertion order.
    async fn ids_for_loss_account(&self, loss_account: AccountId) -> Result<Vec<u64>>;
    async fn all(&self) -> Result<Vec<Commitment>>;
}

/// Moves value between ledger accounts. A transfer either fully succeeds or
/// fails with no effect; the engine relies on this to keep operations atomic.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn transfer(&self, from: AccountId, to: AccountId, amount: Balance) -> Result<()>;
    async fn balance(&self, account: AccountId) -> Result<Balance>;
    /// Credits value entering the ledger from outside (a caller's deposit
    /// funding, in on-chain terms the attached message value).
    async fn credit(&self, account: AccountId, amount: Balance) -> Result<()>;
}

/// Set of authorized payout destinations for forfeited deposits. Membership
/// is checked at commitment-creation time only.
#[async_trait]
pub trait LossAccountRegistry: Send + Sync {
    async fn add(&self, account: AccountId) -> Result<()>;
    async fn remove(&self, account: AccountId) -> Result<()>;
    async fn contains(&self, account: AccountId) -> Result<bool>;
    async fn all(&self) -> Result<Vec<AccountId>>;
}

/// Receives engine notifications for observability / external indexing.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn emit(&self, notification: Notification) -> Result<()>;
}

/// Monotonic time source (block time). All deadline math runs off this.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Circuit breaker consulted before any state read on every externally
/// callable operation.
pub trait PauseGuard: Send + Sync {
    fn is_paused(&self) -> bool;
}

/// Gates administrative configuration (rake rate, treasury, registry
/// membership).
pub trait AccessGuard: Send + Sync {
    fn is_owner(&self, caller: AccountId) -> bool;
}

pub type CommitmentStoreBox = Box<dyn CommitmentStore>;
pub type LedgerBox = Box<dyn Ledger>;
pub type LossAccountRegistryBox = Box<dyn LossAccountRegistry>;
pub type NotificationSinkBox = Box<dyn NotificationSink>;
pub type ClockBox = Box<dyn Clock>;
pub type PauseGuardBox = Box<dyn PauseGuard>;
pub type AccessGuardBox = Box<dyn AccessGuard>;

/// The ambient capabilities an engine runs under, passed explicitly into its
/// constructor so there is no hidden global pause flag or clock.
pub struct Capabilities {
    pub clock: ClockBox,
    pub pause: PauseGuardBox,
    pub access: AccessGuardBox,
}
