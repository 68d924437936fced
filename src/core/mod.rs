//! Core business logic module
//!
//! This module contains the core components of the ledger simulation:
//! - `ledger` - Concurrency-safe account state and balance operations
//! - `page_cache` - Bounded LRU cache of balance snapshots
//! - `notifier` - Point-to-point completion event channel
//! - `engine` - Orchestration of mutations and their side effects
//! - `scheduler` - Cooperative FIFO transaction scheduler

pub mod engine;
pub mod ledger;
pub mod notifier;
pub mod page_cache;
pub mod scheduler;

pub use engine::LedgerEngine;
pub use ledger::Ledger;
pub use notifier::NotificationChannel;
pub use page_cache::{CacheEntry, PageCache, DEFAULT_CAPACITY, PAGE_SIZE, TOTAL_MEMORY};
pub use scheduler::{ExecutionRecord, SchedulerConfig, TransactionScheduler, DEFAULT_QUANTUM_MS};
