//! Transaction-related types for the ledger engine
//!
//! This module defines the transaction request submitted to the scheduler
//! and the lifecycle state the scheduler tracks for each request.

use super::account::AccountId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Scheduler request identifier
///
/// Assigned monotonically at submission time; the submission order of two
/// requests can be recovered by comparing their IDs.
pub type RequestId = u64;

/// Transaction kinds accepted by the scheduler
///
/// Each variant maps to exactly one ledger operation. Dispatch is a pure
/// match on this tag; there is no reflective or pointer-based dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account
    ///
    /// Requires sufficient balance to succeed; a failed withdrawal leaves
    /// the balance unchanged.
    Withdraw,
}

impl TransactionKind {
    /// Lowercase name used in log lines and event descriptions
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

/// A deferred transaction submitted to the scheduler
///
/// Immutable once submitted; owned by the scheduler queue until executed,
/// then retained only in the execution history.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRequest {
    /// The operation to perform
    pub kind: TransactionKind,

    /// The account this transaction applies to
    pub account: AccountId,

    /// Transaction amount; must be strictly positive to succeed
    pub amount: Decimal,
}

impl TransactionRequest {
    /// Build a deposit request
    pub fn deposit(account: AccountId, amount: Decimal) -> Self {
        TransactionRequest {
            kind: TransactionKind::Deposit,
            account,
            amount,
        }
    }

    /// Build a withdrawal request
    pub fn withdraw(account: AccountId, amount: Decimal) -> Self {
        TransactionRequest {
            kind: TransactionKind::Withdraw,
            account,
            amount,
        }
    }
}

/// Lifecycle state of a submitted request
///
/// Requests move `Queued -> Running -> Completed`, or to `Failed` when the
/// ledger rejects the operation. `Failed` is terminal; the scheduler never
/// retries a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Waiting in the scheduler queue
    Queued,

    /// Currently executing against the ledger
    Running,

    /// Executed successfully
    Completed,

    /// Rejected by the ledger; the error is recorded in the history
    Failed,
}
