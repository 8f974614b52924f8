use crate::domain::account::{AccountId, Balance};
use crate::domain::commitment::Commitment;
use crate::domain::notification::Notification;
use crate::domain::ports::{
    CommitmentStore, Ledger, LossAccountRegistry, NotificationSink,
};
use crate::error::{EscrowError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct CommitmentTable {
    commitments: Vec<Commitment>,
    by_user: HashMap<AccountId, Vec<u64>>,
    by_loss_account: HashMap<AccountId, Vec<u64>>,
}

/// A thread-safe in-memory commitment store with append-only per-user and
/// per-loss-account indices. Identifiers are the zero-based insertion order.
#[derive(Default, Clone)]
pub struct InMemoryCommitmentStore {
    table: Arc<RwLock<CommitmentTable>>,
}

impl InMemoryCommitmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommitmentStore for InMemoryCommitmentStore {
    async fn append(&self, mut commitment: Commitment) -> Result<u64> {
        let mut table = self.table.write().await;
        let id = table.commitments.len() as u64;
        commitment.id = id;
        table.by_user.entry(commitment.user).or_default().push(id);
        table
            .by_loss_account
            .entry(commitment.loss_account)
            .or_default()
            .push(id);
        table.commitments.push(commitment);
        Ok(id)
    }

    async fn get(&self, id: u64) -> Result<Option<Commitment>> {
        let table = self.table.read().await;
        Ok(table.commitments.get(id as usize).cloned())
    }

    async fn update(&self, commitment: Commitment) -> Result<()> {
        let mut table = self.table.write().await;
        let slot = table
            .commitments
            .get_mut(commitment.id as usize)
            .ok_or(EscrowError::UnknownCommitment(commitment.id))?;
        *slot = commitment;
        Ok(())
    }

    async fn ids_for_user(&self, user: AccountId) -> Result<Vec<u64>> {
        let table = self.table.read().await;
        Ok(table.by_user.get(&user).cloned().unwrap_or_default())
    }

    async fn ids_for_loss_account(&self, loss_account: AccountId) -> Result<Vec<u64>> {
        let table = self.table.read().await;
        Ok(table
            .by_loss_account
            .get(&loss_account)
            .cloned()
            .unwrap_or_default())
    }

    async fn all(&self) -> Result<Vec<Commitment>> {
        let table = self.table.read().await;
        Ok(table.commitments.clone())
    }
}

/// A thread-safe in-memory value ledger. Transfers are atomic: the balance
/// check and both account mutations happen under one write lock, so a
/// rejected transfer leaves every balance untouched.
#[derive(Default, Clone)]
pub struct InMemoryLedger {
    balances: Arc<RwLock<HashMap<AccountId, Balance>>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all balances; conservation checks in tests rely on this.
    pub async fn total_supply(&self) -> Balance {
        let balances = self.balances.read().await;
        balances
            .values()
            .fold(Balance::ZERO, |acc, balance| acc + *balance)
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn transfer(&self, from: AccountId, to: AccountId, amount: Balance) -> Result<()> {
        if amount == Balance::ZERO {
            return Ok(());
        }
        let mut balances = self.balances.write().await;
        let from_balance = balances.get(&from).copied().unwrap_or(Balance::ZERO);
        if from_balance < amount {
            return Err(EscrowError::InsufficientFunds(from));
        }
        balances.insert(from, from_balance - amount);
        *balances.entry(to).or_insert(Balance::ZERO) += amount;
        Ok(())
    }

    async fn balance(&self, account: AccountId) -> Result<Balance> {
        let balances = self.balances.read().await;
        Ok(balances.get(&account).copied().unwrap_or(Balance::ZERO))
    }

    async fn credit(&self, account: AccountId, amount: Balance) -> Result<()> {
        let mut balances = self.balances.write().await;
        *balances.entry(account).or_insert(Balance::ZERO) += amount;
        Ok(())
    }
}

/// In-memory set of authorized payout destinations, insertion-ordered.
#[derive(Default, Clone)]
pub struct InMemoryLossAccountRegistry {
    accounts: Arc<RwLock<Vec<AccountId>>>,
}

impl InMemoryLossAccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LossAccountRegistry for InMemoryLossAccountRegistry {
    async fn add(&self, account: AccountId) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        if !accounts.contains(&account) {
            accounts.push(account);
        }
        Ok(())
    }

    async fn remove(&self, account: AccountId) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.retain(|existing| *existing != account);
        Ok(())
    }

    async fn contains(&self, account: AccountId) -> Result<bool> {
        let accounts = self.accounts.read().await;
        Ok(accounts.contains(&account))
    }

    async fn all(&self) -> Result<Vec<AccountId>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.clone())
    }
}

/// Records every emitted notification in order; tests and external indexers
/// read them back with `all`.
#[derive(Default, Clone)]
pub struct NotificationLog {
    entries: Arc<RwLock<Vec<Notification>>>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Notification> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl NotificationSink for NotificationLog {
    async fn emit(&self, notification: Notification) -> Result<()> {
        self.entries.write().await.push(notification);
        Ok(())
    }
}
