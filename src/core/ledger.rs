//! Concurrency-safe account ledger
//!
//! This module provides the `Ledger` struct, the single source of truth
//! for account balances. Accounts are stored in a concurrent map so that
//! operations on different accounts proceed in parallel while operations
//! on the same account are serialized by the map's per-entry locking.
//!
//! # Thread Safety
//!
//! All methods take `&self` and are safe to call from multiple threads.
//! Mutations run while holding the entry's shard lock, so no thread can
//! observe a torn balance: a read started after a mutation commits sees
//! the new value.

use crate::types::{Account, AccountId, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};

/// Concurrency-safe account ledger
///
/// Owns all account state and exposes atomic create/deposit/withdraw/read
/// operations. Account IDs are allocated monotonically; explicit IDs are
/// accepted for reproducible simulations and keep the allocator ahead of
/// them so automatic allocation never collides.
#[derive(Debug)]
pub struct Ledger {
    /// Concurrent map of account ID to account state
    ///
    /// DashMap shards the key space internally, giving per-account mutual
    /// exclusion without a global lock across unrelated accounts.
    accounts: DashMap<AccountId, Account>,

    /// Next automatically allocated account ID
    next_id: AtomicU32,
}

impl Ledger {
    /// Create an empty ledger
    ///
    /// Automatic ID allocation starts at 1.
    pub fn new() -> Self {
        Ledger {
            accounts: DashMap::new(),
            next_id: AtomicU32::new(1),
        }
    }

    /// Create a new account with an automatically allocated ID
    ///
    /// # Arguments
    ///
    /// * `initial_balance` - Opening balance; must be non-negative
    ///
    /// # Returns
    ///
    /// The allocated account ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidAmount`] if `initial_balance` is
    /// negative. A zero opening balance is allowed.
    pub fn create_account(&self, initial_balance: Decimal) -> Result<AccountId, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(initial_balance, "create_account"));
        }

        // Explicitly created accounts may have consumed IDs ahead of the
        // allocator; skip over them until a free slot is found.
        loop {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            if let Entry::Vacant(slot) = self.accounts.entry(id) {
                slot.insert(Account::new(id, initial_balance));
                return Ok(id);
            }
        }
    }

    /// Create a new account with a caller-chosen ID
    ///
    /// Explicit IDs make simulations reproducible. The automatic allocator
    /// is advanced past the explicit ID so later automatic creations stay
    /// monotonic and collision-free.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::DuplicateAccount`] if the ID is already taken
    /// * [`LedgerError::InvalidAmount`] if `initial_balance` is negative
    pub fn create_account_with_id(
        &self,
        account: AccountId,
        initial_balance: Decimal,
    ) -> Result<AccountId, LedgerError> {
        if initial_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(initial_balance, "create_account"));
        }

        match self.accounts.entry(account) {
            Entry::Occupied(_) => Err(LedgerError::duplicate_account(account)),
            Entry::Vacant(slot) => {
                slot.insert(Account::new(account, initial_balance));
                self.next_id
                    .fetch_max(account.saturating_add(1), Ordering::Relaxed);
                Ok(account)
            }
        }
    }

    /// Deposit funds into an account
    ///
    /// # Arguments
    ///
    /// * `account` - The account to credit
    /// * `amount` - Amount to deposit; must be strictly positive
    ///
    /// # Returns
    ///
    /// The balance after the deposit, read inside the critical section so
    /// the caller gets a consistent snapshot.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::InvalidAmount`] if `amount <= 0`
    /// * [`LedgerError::AccountNotFound`] if the account does not exist
    pub fn deposit(&self, account: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount, "deposit"));
        }

        let mut entry = self
            .accounts
            .get_mut(&account)
            .ok_or_else(|| LedgerError::account_not_found(account))?;

        entry.balance = entry
            .balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::invalid_amount(amount, "deposit"))?;

        Ok(entry.balance)
    }

    /// Withdraw funds from an account
    ///
    /// The funds check and the debit happen under the same entry lock, so
    /// concurrent withdrawals can never overdraw the account.
    ///
    /// # Returns
    ///
    /// The balance after the withdrawal.
    ///
    /// # Errors
    ///
    /// * [`LedgerError::InvalidAmount`] if `amount <= 0`
    /// * [`LedgerError::AccountNotFound`] if the account does not exist
    /// * [`LedgerError::InsufficientFunds`] if the balance cannot cover
    ///   the amount; the balance is left unchanged
    pub fn withdraw(&self, account: AccountId, amount: Decimal) -> Result<Decimal, LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::invalid_amount(amount, "withdraw"));
        }

        let mut entry = self
            .accounts
            .get_mut(&account)
            .ok_or_else(|| LedgerError::account_not_found(account))?;

        if entry.balance < amount {
            return Err(LedgerError::insufficient_funds(
                account,
                entry.balance,
                amount,
            ));
        }

        entry.balance = entry
            .balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::invalid_amount(amount, "withdraw"))?;

        Ok(entry.balance)
    }

    /// Read the current balance of an account
    ///
    /// The read acquires the entry's shard lock, so it reflects every
    /// mutation that committed before it began, regardless of which
    /// thread performed the write.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AccountNotFound`] for unknown IDs.
    pub fn balance(&self, account: AccountId) -> Result<Decimal, LedgerError> {
        self.accounts
            .get(&account)
            .map(|entry| entry.balance)
            .ok_or_else(|| LedgerError::account_not_found(account))
    }

    /// Whether the account exists
    pub fn contains_account(&self, account: AccountId) -> bool {
        self.accounts.contains_key(&account)
    }

    /// Number of accounts in the ledger
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// True when no accounts exist
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Snapshot of all accounts sorted by ID
    ///
    /// Used by the display collaborator; deterministic ordering makes the
    /// report stable across runs.
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        accounts
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
