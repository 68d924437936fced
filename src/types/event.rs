//! Completion events delivered to observers
//!
//! Every executed transaction produces exactly one [`TransactionEvent`],
//! published on the notification channel after the ledger operation
//! finishes. Failed operations produce an event too, carrying the error;
//! a `Success` outcome is never produced for a rejected operation.

use crate::types::{AccountId, LedgerError, TransactionKind};
use rust_decimal::Decimal;

/// Result of an executed transaction as seen by observers
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// The ledger applied the operation
    Success,

    /// The ledger rejected the operation; the balance is unchanged
    Failed(LedgerError),
}

impl EventOutcome {
    /// True for [`EventOutcome::Success`]
    pub fn is_success(&self) -> bool {
        matches!(self, EventOutcome::Success)
    }
}

/// Event published when a transaction has been executed
///
/// Produced exactly once per executed operation and transferred into the
/// notification channel. Delivery is point-to-point: each event is
/// consumed by exactly one `await_next` call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEvent {
    /// Account the transaction applied to
    pub account: AccountId,

    /// The operation that was executed
    pub kind: TransactionKind,

    /// The requested amount
    pub amount: Decimal,

    /// Whether the ledger applied or rejected the operation
    pub outcome: EventOutcome,
}

impl TransactionEvent {
    /// Short human-readable description, used by the simulation report
    pub fn describe(&self) -> String {
        match &self.outcome {
            EventOutcome::Success => format!(
                "Account {}: {} of {}",
                self.account,
                self.kind.as_str(),
                self.amount
            ),
            EventOutcome::Failed(error) => format!(
                "Account {}: {} of {} rejected ({})",
                self.account,
                self.kind.as_str(),
                self.amount,
                error
            ),
        }
    }
}
