//! Error types for the ledger engine
//!
//! This module defines all error types that can occur during ledger
//! operations. Every error is recoverable, local to a single operation,
//! and returned to the caller; nothing here terminates the process.
//!
//! # Error Categories
//!
//! - **Lookup Errors**: Unknown account, duplicate account ID
//! - **Validation Errors**: Non-positive amounts, negative opening balance
//! - **Balance Errors**: Insufficient funds for a withdrawal

use crate::types::AccountId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for ledger operations
///
/// Each variant includes the context a caller needs to diagnose the
/// failure without holding any additional state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The referenced account does not exist
    ///
    /// Returned by deposit, withdraw, and balance for unknown IDs. The
    /// caller-facing dispatch layer checks existence too, but the ledger
    /// re-validates and reports the same error regardless of caller
    /// diligence.
    #[error("Account {account} not found")]
    AccountNotFound {
        /// The unknown account ID
        account: AccountId,
    },

    /// An explicitly requested account ID is already taken
    ///
    /// Only explicit-ID creation can collide; automatically allocated IDs
    /// are always fresh.
    #[error("Account {account} already exists")]
    DuplicateAccount {
        /// The colliding account ID
        account: AccountId,
    },

    /// The amount is not valid for the requested operation
    ///
    /// Deposits and withdrawals require a strictly positive amount;
    /// account creation requires a non-negative opening balance.
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
        /// Operation that rejected it
        operation: String,
    },

    /// The account balance cannot cover the requested withdrawal
    ///
    /// The balance is left unchanged.
    #[error("Insufficient funds for account {account}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        /// The account ID
        account: AccountId,
        /// Balance at the time the withdrawal was applied
        balance: Decimal,
        /// Requested withdrawal amount
        requested: Decimal,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId) -> Self {
        LedgerError::AccountNotFound { account }
    }

    /// Create a DuplicateAccount error
    pub fn duplicate_account(account: AccountId) -> Self {
        LedgerError::DuplicateAccount { account }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal, operation: &str) -> Self {
        LedgerError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            balance,
            requested,
        }
    }
}
