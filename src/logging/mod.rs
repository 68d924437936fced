//! Transaction logging collaborator
//!
//! This module defines the [`TransactionLog`] capability the engine uses
//! to record every successful and failed ledger operation. The log is an
//! injected collaborator with an explicit lifecycle: constructed once at
//! startup, passed by reference to the components that need it, and
//! flushed when dropped. There is no ambient global log handle.
//!
//! # Failure Isolation
//!
//! `record` is called synchronously after a mutation commits, but a
//! failing log sink must never roll back or block the mutation. File
//! write errors are therefore swallowed at the sink (with a `tracing`
//! warning) rather than propagated.

use crate::types::{AccountId, EventOutcome, TransactionKind};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::warn;

/// One recorded ledger operation
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Wall-clock time the operation committed (or was rejected)
    pub timestamp: DateTime<Utc>,

    /// Account the operation applied to
    pub account: AccountId,

    /// The operation kind
    pub kind: TransactionKind,

    /// The requested amount
    pub amount: Decimal,

    /// How the operation ended
    pub outcome: EventOutcome,
}

impl LogEntry {
    /// Build an entry stamped with the current time
    pub fn now(
        account: AccountId,
        kind: TransactionKind,
        amount: Decimal,
        outcome: EventOutcome,
    ) -> Self {
        LogEntry {
            timestamp: Utc::now(),
            account,
            kind,
            amount,
            outcome,
        }
    }

    /// Free-form text line for file sinks
    ///
    /// The line format is presentation, not a contract; consumers must
    /// not parse it.
    pub fn line(&self) -> String {
        match &self.outcome {
            EventOutcome::Success => format!(
                "{} {} of {} for account {}",
                self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                self.kind.as_str(),
                self.amount,
                self.account
            ),
            EventOutcome::Failed(error) => format!(
                "{} {} of {} for account {} failed: {}",
                self.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
                self.kind.as_str(),
                self.amount,
                self.account,
                error
            ),
        }
    }
}

/// Capability for recording ledger operations
///
/// Implementations must be safe to call from multiple threads and must
/// never fail outward; recording is fire-and-forget from the engine's
/// point of view.
pub trait TransactionLog: Send + Sync {
    /// Record one operation
    fn record(&self, entry: &LogEntry);

    /// Push buffered records to the sink
    ///
    /// Default is a no-op for sinks without a buffer.
    fn flush(&self) {}
}

/// Append-only file sink
///
/// Opened once at startup; buffered writes are flushed on [`flush`] and
/// on drop. Write errors are logged and dropped.
///
/// [`flush`]: TransactionLog::flush
#[derive(Debug)]
pub struct FileTransactionLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileTransactionLog {
    /// Open (or create) the log file in append mode
    ///
    /// Construction is the one place file errors surface; after startup
    /// the sink never fails outward.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(FileTransactionLog {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Path the sink writes to
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_writer(&self) -> MutexGuard<'_, BufWriter<File>> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TransactionLog for FileTransactionLog {
    fn record(&self, entry: &LogEntry) {
        let mut writer = self.lock_writer();
        if let Err(error) = writeln!(writer, "{}", entry.line()) {
            warn!(path = %self.path.display(), %error, "transaction log write failed");
        }
    }

    fn flush(&self) {
        if let Err(error) = self.lock_writer().flush() {
            warn!(path = %self.path.display(), %error, "transaction log flush failed");
        }
    }
}

impl Drop for FileTransactionLog {
    fn drop(&mut self) {
        TransactionLog::flush(self);
    }
}

/// Discarding sink for simulations that do not keep a log
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransactionLog;

impl TransactionLog for NullTransactionLog {
    fn record(&self, _entry: &LogEntry) {}
}

/// In-memory sink capturing entries for inspection
///
/// Used by tests and by callers that want to assert on what was logged
/// without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryTransactionLog {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryTransactionLog {
    /// Create an empty capturing sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far, in record order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TransactionLog for MemoryTransactionLog {
    fn record(&self, entry: &LogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry.clone());
    }
}
