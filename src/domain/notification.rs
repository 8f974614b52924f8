use super::account::{AccountId, Balance};

/// Events emitted by the engine for observability and external indexing.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    CommitmentCreated {
        user: AccountId,
        commitment_id: u64,
    },
    CheckIn {
        user: AccountId,
        commitment_id: u64,
    },
    CommitmentCompleted {
        user: AccountId,
        commitment_id: u64,
    },
    CommitmentFailed {
        user: AccountId,
        commitment_id: u64,
    },
    Claimed {
        loss_account: AccountId,
        total: Balance,
    },
}
