use crate::domain::account::AccountId;
use crate::domain::ports::{AccessGuard, PauseGuard};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared circuit breaker. Cloning shares the flag, so whoever holds a
/// handle can pause every engine entry point at once.
#[derive(Default, Clone)]
pub struct PauseSwitch {
    paused: Arc<AtomicBool>,
}

impl PauseSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }
}

impl PauseGuard for PauseSwitch {
    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

/// Single fixed owner account, set at construction.
#[derive(Clone, Copy)]
pub struct OwnerGuard {
    owner: AccountId,
}

impl OwnerGuard {
    pub fn new(owner: AccountId) -> Self {
        Self { owner }
    }
}

impl AccessGuard for OwnerGuard {
    fn is_owner(&self, caller: AccountId) -> bool {
        caller == self.owner
    }
}
