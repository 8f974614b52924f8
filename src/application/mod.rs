//! Application layer containing the core business logic orchestration.
//!
//! This module defines the `CommitmentEngine`, the single entry point for
//! the commitment lifecycle (create, check-in, finalize) and batched claim
//! settlement. It owns boxed ports and awaits each storage and ledger
//! operation to keep every call sequentially consistent.

pub mod engine;
