//! Types module
//!
//! Contains core data structures used throughout the ledger engine.
//! This module organizes types into logical submodules:
//! - `account`: Account state and identifiers
//! - `transaction`: Transaction requests and scheduler state
//! - `event`: Completion events delivered to observers
//! - `error`: Error types for ledger operations

pub mod account;
pub mod error;
pub mod event;
pub mod transaction;

pub use account::{Account, AccountId};
pub use error::LedgerError;
pub use event::{EventOutcome, TransactionEvent};
pub use transaction::{RequestId, RequestState, TransactionKind, TransactionRequest};
