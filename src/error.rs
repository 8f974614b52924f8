use crate::domain::account::AccountId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EscrowError>;

/// Failure modes of the commitment escrow.
///
/// Every variant is a synchronous, recoverable-by-caller failure: an
/// operation that returns an error has made no store mutation and moved no
/// funds.
#[derive(Error, Debug)]
pub enum EscrowError {
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("unauthorized: {0}")]
    Authorization(String),
    #[error("cannot check in before the start date")]
    TooEarly,
    #[error("commitment is still active")]
    StillActive,
    #[error("commitment already completed")]
    AlreadyCompleted,
    #[error("commitment already failed")]
    AlreadyFailed,
    #[error("already checked in today")]
    AlreadyCheckedIn,
    #[error("no commitments to claim")]
    NothingToClaim,
    #[error("escrow is paused")]
    Paused,
    #[error("unknown commitment {0}")]
    UnknownCommitment(u64),
    #[error("insufficient funds in account {0}")]
    InsufficientFunds(AccountId),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EscrowError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}
