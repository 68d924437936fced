//! Ledger operation orchestration
//!
//! This module provides the `LedgerEngine` struct, the seam through which
//! every ledger operation flows. The engine coordinates the side effects
//! the core guarantees around each mutation:
//!
//! 1. the ledger applies (or rejects) the operation,
//! 2. the page cache is touched with the fresh balance on success,
//! 3. the transaction log records the outcome,
//! 4. exactly one [`TransactionEvent`] is published for observers.
//!
//! # Architecture
//!
//! ```text
//! LedgerEngine
//!     ├── Arc<Ledger>               (account state, per-account locking)
//!     ├── Arc<PageCache>            (advisory balance snapshots)
//!     ├── Arc<NotificationChannel>  (completion events)
//!     └── Arc<dyn TransactionLog>   (injected logging collaborator)
//! ```
//!
//! # Thread Safety
//!
//! The engine is cloneable and safe to share across threads; all state
//! lives behind `Arc` and each component synchronizes internally. The
//! cache and log are advisory: neither can fail or block a mutation.

use std::sync::Arc;

use crate::core::{Ledger, NotificationChannel, PageCache};
use crate::logging::{LogEntry, TransactionLog};
use crate::types::{
    AccountId, EventOutcome, LedgerError, TransactionEvent, TransactionKind, TransactionRequest,
};
use rust_decimal::Decimal;
use tracing::debug;

/// Orchestrates ledger mutations and their observable side effects
///
/// Cloning is cheap; clones share the same underlying components and can
/// be handed to any number of threads (simulated customers, scheduler
/// workers, observers).
#[derive(Clone)]
pub struct LedgerEngine {
    ledger: Arc<Ledger>,
    cache: Arc<PageCache>,
    notifier: Arc<NotificationChannel>,
    log: Arc<dyn TransactionLog>,
}

impl LedgerEngine {
    /// Assemble an engine from its components
    pub fn new(
        ledger: Arc<Ledger>,
        cache: Arc<PageCache>,
        notifier: Arc<NotificationChannel>,
        log: Arc<dyn TransactionLog>,
    ) -> Self {
        LedgerEngine {
            ledger,
            cache,
            notifier,
            log,
        }
    }

    /// Create an account with an automatically allocated ID
    ///
    /// The fresh account is touched into the page cache. No event is
    /// published; only deposits and withdrawals announce completions.
    pub fn create_account(&self, initial_balance: Decimal) -> Result<AccountId, LedgerError> {
        let account = self.ledger.create_account(initial_balance)?;
        self.cache.touch(account, initial_balance);
        debug!(account, %initial_balance, "account created");
        Ok(account)
    }

    /// Create an account with a caller-chosen ID
    ///
    /// See [`Ledger::create_account_with_id`] for the collision rules.
    pub fn create_account_with_id(
        &self,
        account: AccountId,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        let account = self.ledger.create_account_with_id(account, initial_balance)?;
        self.cache.touch(account, initial_balance);
        debug!(account, %initial_balance, "account created");
        Ok(account)
    }

    /// Deposit funds into an account
    ///
    /// Publishes exactly one event and records one log entry whether the
    /// ledger applies or rejects the operation.
    pub fn deposit(&self, account: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        self.apply(TransactionKind::Deposit, account, amount)
    }

    /// Withdraw funds from an account
    ///
    /// A rejected withdrawal leaves the balance unchanged and publishes an
    /// event with a `Failed` outcome; no `Success` event is ever produced
    /// for it.
    pub fn withdraw(&self, account: AccountId, amount: Decimal) -> Result<(), LedgerError> {
        self.apply(TransactionKind::Withdraw, account, amount)
    }

    /// Read an account balance
    ///
    /// Linearizable with respect to concurrent mutations of the same
    /// account. The read refreshes the account's page cache entry.
    pub fn balance(&self, account: AccountId) -> Result<Decimal, LedgerError> {
        let balance = self.ledger.balance(account)?;
        self.cache.touch(account, balance);
        Ok(balance)
    }

    /// Execute a scheduler request
    ///
    /// Pure tag dispatch: each [`TransactionKind`] maps to exactly one
    /// ledger operation.
    pub fn execute(&self, request: &TransactionRequest) -> Result<(), LedgerError> {
        self.apply(request.kind, request.account, request.amount)
    }

    fn apply(
        &self,
        kind: TransactionKind,
        account: AccountId,
        amount: Decimal,
    ) -> Result<(), LedgerError> {
        let result = match kind {
            TransactionKind::Deposit => self.ledger.deposit(account, amount),
            TransactionKind::Withdraw => self.ledger.withdraw(account, amount),
        };

        let outcome = match &result {
            Ok(balance) => {
                self.cache.touch(account, *balance);
                debug!(account, op = kind.as_str(), %amount, %balance, "applied");
                EventOutcome::Success
            }
            Err(error) => {
                debug!(account, op = kind.as_str(), %amount, %error, "rejected");
                EventOutcome::Failed(error.clone())
            }
        };

        // The log sink swallows its own failures; a logging problem must
        // never roll back a committed mutation.
        self.log
            .record(&LogEntry::now(account, kind, amount, outcome.clone()));

        self.notifier.publish(TransactionEvent {
            account,
            kind,
            amount,
            outcome,
        });

        result.map(|_| ())
    }

    /// The underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The page cache, for the display collaborator
    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// The notification channel observers listen on
    pub fn notifier(&self) -> &NotificationChannel {
        &self.notifier
    }

    /// Shared handle to the notification channel
    pub fn notifier_handle(&self) -> Arc<NotificationChannel> {
        Arc::clone(&self.notifier)
    }
}
