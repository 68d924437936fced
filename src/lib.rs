//! Ledger Engine Library
//! # Overview
//!
//! This library simulates a transactional ledger service under concurrent
//! load, paired with a fixed-capacity LRU page cache, a cooperative FIFO
//! transaction scheduler, and a notification channel for observers.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, TransactionRequest, events, errors)
//! - [`cli`] - CLI argument parsing for the simulation binary
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - Account state with per-account mutual exclusion
//!   - [`core::page_cache`] - Bounded recency-evicting balance cache
//!   - [`core::notifier`] - Point-to-point completion event queue
//!   - [`core::engine`] - Orchestration of mutations and side effects
//!   - [`core::scheduler`] - FIFO time-sliced transaction scheduler
//! - [`logging`] - Injected transaction log collaborator
//!
//! # Data Flow
//!
//! ```text
//! caller -> TransactionScheduler::submit
//!        -> LedgerEngine::execute
//!        -> Ledger mutation
//!        -> PageCache::touch
//!        -> TransactionLog::record
//!        -> NotificationChannel::publish -> observers
//! ```
//!
//! # Guarantees
//!
//! - Balances are never negative after a successful withdrawal, and
//!   concurrent operations never observe a torn balance.
//! - The page cache never exceeds its capacity and evicts strictly by
//!   recency of last touch; it is advisory and never blocks the ledger.
//! - Every executed operation publishes exactly one event, delivered
//!   FIFO to exactly one `await_next` call.
//! - The scheduler executes requests in submission order and keeps
//!   running past individual failures.

// Module declarations
pub mod cli;
pub mod core;
pub mod logging;
pub mod types;

pub use crate::core::{
    CacheEntry, ExecutionRecord, Ledger, LedgerEngine, NotificationChannel, PageCache,
    SchedulerConfig, TransactionScheduler,
};
pub use logging::{
    FileTransactionLog, LogEntry, MemoryTransactionLog, NullTransactionLog, TransactionLog,
};
pub use types::{
    Account, AccountId, EventOutcome, LedgerError, RequestId, RequestState, TransactionEvent,
    TransactionKind, TransactionRequest,
};
