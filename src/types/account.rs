//! Account-related types for the ledger engine
//!
//! This module defines the Account structure and the account identifier
//! used throughout the system.

use rust_decimal::Decimal;

/// Account identifier
///
/// Supports account IDs from 0 to 4,294,967,295. IDs are allocated
/// monotonically by the ledger, though callers may also choose explicit
/// IDs for reproducible simulations.
pub type AccountId = u32;

/// Ledger account state
///
/// Represents the current state of a single account. The balance is the
/// single source of truth for the account; cached copies held by the page
/// cache are advisory snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// The account ID
    pub id: AccountId,

    /// Current balance
    ///
    /// Never negative after a successful operation: withdrawals that would
    /// overdraw the account are rejected before any mutation happens.
    pub balance: Decimal,
}

impl Account {
    /// Create a new account with the given opening balance
    pub fn new(id: AccountId, balance: Decimal) -> Self {
        Account { id, balance }
    }
}
