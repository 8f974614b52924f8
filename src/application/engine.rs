use crate::domain::account::{AccountId, Amount, Balance};
use crate::domain::commitment::{rake_fee, CheckInDay, Commitment, CommitmentState};
use crate::domain::notification::Notification;
use crate::domain::ports::{
    Capabilities, CommitmentStoreBox, LedgerBox, LossAccountRegistryBox, NotificationSinkBox,
};
use crate::error::{EscrowError, Result};
use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Whether a second check-in within an already-checked-in day is rejected or
/// silently accepted. Reference implementations of the original contract
/// disagree on this, so it is a policy knob; `Reject` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatCheckInPolicy {
    /// Fail the call with `AlreadyCheckedIn`, mutating nothing.
    #[default]
    Reject,
    /// Accept the call as a no-op, mutating nothing.
    Ignore,
}

/// Runtime configuration of the engine. The rake rate and treasury are
/// owner-adjustable; a commitment always keeps the fee computed at its own
/// creation time.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub rake_basis_points: u32,
    pub treasury: AccountId,
    pub repeat_check_in: RepeatCheckInPolicy,
}

/// Parameters of a new commitment.
#[derive(Debug, Clone)]
pub struct CreateCommitment {
    pub target_days: u32,
    pub loss_account: AccountId,
    pub start_date: i64,
    pub title: String,
    pub deposit: Decimal,
}

/// What a successful `check_in` call did. A check-in that discovers a missed
/// day resolves the commitment to `Failed` and still returns `Ok`: the call
/// is the mechanism that crystallizes the failure.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CheckInOutcome {
    /// The streak advanced by one day.
    Advanced,
    /// The streak reached `target_days`; the deposit was refunded.
    Completed,
    /// A missed day was detected; the deposit went to the loss account.
    Failed,
    /// A same-day repeat accepted under `RepeatCheckInPolicy::Ignore`.
    Duplicate,
}

/// The commitment lifecycle and settlement engine.
///
/// Owns the custodial ledger access and serializes each operation to
/// completion: every entry point checks the pause guard first, validates
/// before acting, and performs fund transfers before persisting state so a
/// failed transfer rolls the whole operation back.
pub struct CommitmentEngine {
    store: CommitmentStoreBox,
    ledger: LedgerBox,
    registry: LossAccountRegistryBox,
    notifications: NotificationSinkBox,
    caps: Capabilities,
    /// Ledger account holding all escrowed deposits.
    vault: AccountId,
    config: RwLock<EngineConfig>,
}

impl CommitmentEngine {
    pub fn new(
        store: CommitmentStoreBox,
        ledger: LedgerBox,
        registry: LossAccountRegistryBox,
        notifications: NotificationSinkBox,
        caps: Capabilities,
        vault: AccountId,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            registry,
            notifications,
            caps,
            vault,
            config: RwLock::new(config),
        }
    }

    fn ensure_not_paused(&self) -> Result<()> {
        if self.caps.pause.is_paused() {
            Err(EscrowError::Paused)
        } else {
            Ok(())
        }
    }

    fn ensure_owner(&self, caller: AccountId) -> Result<()> {
        if self.caps.access.is_owner(caller) {
            Ok(())
        } else {
            Err(EscrowError::Authorization(
                "caller is not the owner".to_string(),
            ))
        }
    }

    async fn load(&self, id: u64) -> Result<Commitment> {
        self.store
            .get(id)
            .await?
            .ok_or(EscrowError::UnknownCommitment(id))
    }

    /// Opens a commitment: validates inputs, escrows the deposit, routes the
    /// fee to the treasury and appends the record. Returns the new id.
    pub async fn create_commitment(
        &self,
        caller: AccountId,
        request: CreateCommitment,
    ) -> Result<u64> {
        self.ensure_not_paused()?;

        let deposit = Amount::new(request.deposit)?;
        if request.target_days == 0 {
            return Err(EscrowError::validation(
                "target_days",
                "target days must be greater than 0",
            ));
        }
        if request.title.trim().is_empty() {
            return Err(EscrowError::validation("title", "title cannot be empty"));
        }
        if !self.registry.contains(request.loss_account).await? {
            return Err(EscrowError::validation(
                "loss_account",
                format!("account {} is not a registered loss account", request.loss_account),
            ));
        }

        let (rake_basis_points, treasury) = {
            let config = self.config.read().await;
            (config.rake_basis_points, config.treasury)
        };
        let fee = rake_fee(deposit.value(), rake_basis_points);
        let escrowed = Balance::from(deposit) - fee;

        // Escrow the full value first, then peel the fee off the vault. The
        // second transfer cannot fail once the first has succeeded.
        self.ledger.transfer(caller, self.vault, deposit.into()).await?;
        self.ledger.transfer(self.vault, treasury, fee).await?;

        let commitment = Commitment {
            id: 0, // assigned by the store
            user: caller,
            deposit: escrowed,
            fee,
            target_days: request.target_days,
            checked_in_days: 0,
            start_date: request.start_date,
            last_check_in_day: None,
            loss_account: request.loss_account,
            state: CommitmentState::Active,
            title: request.title,
            settled: false,
        };
        let id = self.store.append(commitment).await?;

        info!(user = caller, commitment = id, "commitment created");
        self.notifications
            .emit(Notification::CommitmentCreated {
                user: caller,
                commitment_id: id,
            })
            .await?;
        Ok(id)
    }

    /// Records the caller's daily check-in, completing the commitment on the
    /// final day or resolving it to `Failed` if a day was missed.
    pub async fn check_in(&self, caller: AccountId, id: u64) -> Result<CheckInOutcome> {
        self.ensure_not_paused()?;

        let mut commitment = self.load(id).await?;
        if commitment.user != caller {
            return Err(EscrowError::Authorization(
                "only the user can check in".to_string(),
            ));
        }
        match commitment.state {
            CommitmentState::Completed => return Err(EscrowError::AlreadyCompleted),
            CommitmentState::Failed => return Err(EscrowError::AlreadyFailed),
            CommitmentState::Active => {}
        }

        let now = self.caps.clock.now();
        match commitment.assess_check_in(now) {
            CheckInDay::BeforeStart => Err(EscrowError::TooEarly),
            CheckInDay::Repeat => match self.config.read().await.repeat_check_in {
                RepeatCheckInPolicy::Reject => Err(EscrowError::AlreadyCheckedIn),
                RepeatCheckInPolicy::Ignore => Ok(CheckInOutcome::Duplicate),
            },
            CheckInDay::Missed => {
                self.settle_failure(&mut commitment).await?;
                Ok(CheckInOutcome::Failed)
            }
            CheckInDay::OnTime(day) => {
                if commitment.record_check_in(day) {
                    self.ledger
                        .transfer(self.vault, commitment.user, commitment.deposit)
                        .await?;
                    commitment.complete();
                    self.store.update(commitment.clone()).await?;
                    info!(user = caller, commitment = id, "commitment completed");
                    self.notifications
                        .emit(Notification::CommitmentCompleted {
                            user: caller,
                            commitment_id: id,
                        })
                        .await?;
                    Ok(CheckInOutcome::Completed)
                } else {
                    self.store.update(commitment).await?;
                    debug!(user = caller, commitment = id, day, "check-in recorded");
                    self.notifications
                        .emit(Notification::CheckIn {
                            user: caller,
                            commitment_id: id,
                        })
                        .await?;
                    Ok(CheckInOutcome::Advanced)
                }
            }
        }
    }

    /// Permissionless resolution of an abandoned commitment. Succeeds only
    /// strictly after the deadline (`start_date + target_days` days); the
    /// deadline instant itself still counts as active.
    pub async fn finalize(&self, id: u64) -> Result<()> {
        self.ensure_not_paused()?;

        let mut commitment = self.load(id).await?;
        match commitment.state {
            CommitmentState::Completed => return Err(EscrowError::AlreadyCompleted),
            CommitmentState::Failed => return Err(EscrowError::AlreadyFailed),
            CommitmentState::Active => {}
        }
        if !commitment.is_past_deadline(self.caps.clock.now()) {
            return Err(EscrowError::StillActive);
        }
        self.settle_failure(&mut commitment).await
    }

    /// Settles everything owed to the calling loss account in one transfer:
    /// failed-but-unsettled commitments plus abandoned ones past their
    /// deadline that nobody bothered to finalize, resolved lazily here.
    pub async fn claim_all(&self, caller: AccountId) -> Result<Balance> {
        self.ensure_not_paused()?;

        if !self.registry.contains(caller).await? {
            return Err(EscrowError::Authorization(
                "only a loss account can claim".to_string(),
            ));
        }

        let now = self.caps.clock.now();
        let mut eligible = Vec::new();
        let mut total = Balance::ZERO;
        for id in self.store.ids_for_loss_account(caller).await? {
            let commitment = self.load(id).await?;
            let claimable = match commitment.state {
                CommitmentState::Active => commitment.is_past_deadline(now),
                CommitmentState::Failed => !commitment.settled,
                CommitmentState::Completed => false,
            };
            if claimable {
                total += commitment.deposit;
                eligible.push(commitment);
            }
        }
        if eligible.is_empty() {
            return Err(EscrowError::NothingToClaim);
        }

        // One aggregate transfer; individual records are only marked settled
        // once the funds have actually moved.
        self.ledger.transfer(self.vault, caller, total).await?;
        for mut commitment in eligible {
            let newly_failed = commitment.state == CommitmentState::Active;
            commitment.fail();
            self.store.update(commitment.clone()).await?;
            if newly_failed {
                info!(
                    user = commitment.user,
                    commitment = commitment.id,
                    "commitment failed (claimed while abandoned)"
                );
                self.notifications
                    .emit(Notification::CommitmentFailed {
                        user: commitment.user,
                        commitment_id: commitment.id,
                    })
                    .await?;
            }
        }
        info!(loss_account = caller, total = %total.0, "claim settled");
        self.notifications
            .emit(Notification::Claimed {
                loss_account: caller,
                total,
            })
            .await?;
        Ok(total)
    }

    /// Moves a commitment's deposit to its loss account and marks it failed.
    async fn settle_failure(&self, commitment: &mut Commitment) -> Result<()> {
        self.ledger
            .transfer(self.vault, commitment.loss_account, commitment.deposit)
            .await?;
        commitment.fail();
        self.store.update(commitment.clone()).await?;
        info!(
            user = commitment.user,
            commitment = commitment.id,
            loss_account = commitment.loss_account,
            "commitment failed"
        );
        self.notifications
            .emit(Notification::CommitmentFailed {
                user: commitment.user,
                commitment_id: commitment.id,
            })
            .await?;
        Ok(())
    }

    // --- administrative configuration (owner-gated) ---

    pub async fn set_rake_basis_points(&self, caller: AccountId, basis_points: u32) -> Result<()> {
        self.ensure_owner(caller)?;
        if basis_points > crate::domain::commitment::BASIS_POINTS_DIVISOR {
            return Err(EscrowError::validation(
                "rake_basis_points",
                "rake cannot exceed 10000 basis points",
            ));
        }
        self.config.write().await.rake_basis_points = basis_points;
        Ok(())
    }

    pub async fn set_treasury(&self, caller: AccountId, treasury: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.write().await.treasury = treasury;
        Ok(())
    }

    pub async fn add_loss_account(&self, caller: AccountId, account: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.registry.add(account).await
    }

    pub async fn remove_loss_account(&self, caller: AccountId, account: AccountId) -> Result<()> {
        self.ensure_owner(caller)?;
        self.registry.remove(account).await
    }

    // --- read surface ---

    pub async fn commitment(&self, id: u64) -> Result<Commitment> {
        self.load(id).await
    }

    pub async fn commitments_for_user(&self, user: AccountId) -> Result<Vec<Commitment>> {
        let mut commitments = Vec::new();
        for id in self.store.ids_for_user(user).await? {
            commitments.push(self.load(id).await?);
        }
        Ok(commitments)
    }

    pub async fn loss_accounts(&self) -> Result<Vec<AccountId>> {
        self.registry.all().await
    }

    pub async fn rake_basis_points(&self) -> u32 {
        self.config.read().await.rake_basis_points
    }

    pub async fn treasury(&self) -> AccountId {
        self.config.read().await.treasury
    }

    /// Consumes the engine and returns the full commitment history.
    pub async fn into_results(self) -> Result<Vec<Commitment>> {
        self.store.all().await
    }
}
