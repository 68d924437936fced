//! Cooperative transaction scheduler
//!
//! This module provides the `TransactionScheduler` struct, which accepts
//! transaction requests as deferred work items and executes them in strict
//! FIFO submission order against the [`LedgerEngine`].
//!
//! # Scheduling Model
//!
//! This is cooperative round-robin over transaction work, not preemption:
//! each request runs to completion, then the loop sleeps for the
//! configured quantum before dequeuing the next item. The quantum is a
//! throughput-shaping knob that makes interleaving observable; it never
//! interrupts a running request.
//!
//! A single consumer loop drains the queue by default. A pool of worker
//! loops may be spawned instead; the ledger's per-account locking keeps
//! that safe, at the cost of strict cross-worker FIFO execution.
//!
//! # Lifecycle
//!
//! Requests move `Queued -> Running -> Completed`, or to the terminal
//! `Failed` state when the ledger rejects the operation. A failing
//! request never halts the queue. Every transition is retained in the
//! execution history for the reporting collaborator.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::core::LedgerEngine;
use crate::types::{LedgerError, RequestId, RequestState, TransactionRequest};
use tracing::{debug, warn};

/// Default quantum applied after each executed request, in milliseconds
pub const DEFAULT_QUANTUM_MS: u64 = 100;

/// Scheduler configuration
///
/// A zero worker count falls back to the single-consumer default with a
/// warning; a zero quantum is valid and disables the delay entirely.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay applied after each executed request
    pub quantum: Duration,

    /// Number of consumer loops to spawn in worker-pool mode
    pub workers: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            quantum: Duration::from_millis(DEFAULT_QUANTUM_MS),
            workers: 1,
        }
    }
}

impl SchedulerConfig {
    /// Create a config with custom values
    pub fn new(quantum: Duration, workers: usize) -> Self {
        let default = Self::default();

        let workers = if workers == 0 {
            warn!(
                fallback = default.workers,
                "invalid worker count (0), using default"
            );
            default.workers
        } else {
            workers
        };

        Self { quantum, workers }
    }
}

/// Record of one submitted request and where it got to
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    /// Scheduler-assigned request ID, monotonic in submission order
    pub id: RequestId,

    /// The submitted request
    pub request: TransactionRequest,

    /// Current lifecycle state
    pub state: RequestState,

    /// The ledger error, present exactly when `state` is `Failed`
    pub error: Option<LedgerError>,
}

/// Queue and history, guarded together so submission order and history
/// order can never diverge
#[derive(Debug, Default)]
struct QueueState {
    queue: VecDeque<(RequestId, TransactionRequest)>,
    history: Vec<ExecutionRecord>,
    next_id: RequestId,
}

/// FIFO scheduler serializing transaction work against the ledger
///
/// Shareable across threads behind an `Arc`: any thread may submit, one
/// or more threads run consumer loops, and `stop` may be called from
/// anywhere, any number of times.
pub struct TransactionScheduler {
    engine: LedgerEngine,
    config: SchedulerConfig,
    state: Mutex<QueueState>,
    work_available: Condvar,
    stopped: AtomicBool,
}

impl TransactionScheduler {
    /// Create a scheduler draining into the given engine
    pub fn new(engine: LedgerEngine, config: SchedulerConfig) -> Self {
        TransactionScheduler {
            engine,
            config,
            state: Mutex::new(QueueState {
                queue: VecDeque::new(),
                history: Vec::new(),
                next_id: 1,
            }),
            work_available: Condvar::new(),
            stopped: AtomicBool::new(false),
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a request; never blocks
    ///
    /// Returns the assigned request ID. The request is recorded in the
    /// execution history as `Queued` immediately.
    pub fn submit(&self, request: TransactionRequest) -> RequestId {
        let id = {
            let mut state = self.lock_state();
            let id = state.next_id;
            state.next_id += 1;
            state.queue.push_back((id, request.clone()));
            state.history.push(ExecutionRecord {
                id,
                request,
                state: RequestState::Queued,
                error: None,
            });
            id
        };
        self.work_available.notify_one();
        debug!(request = id, "queued");
        id
    }

    /// Drain the queue until it is empty, then return
    ///
    /// Does not wait for new submissions. Returns early if the scheduler
    /// is stopped.
    pub fn run_until_idle(&self) {
        while !self.stopped.load(Ordering::Acquire) {
            let item = self.lock_state().queue.pop_front();
            match item {
                Some(item) => self.execute_one(item),
                None => return,
            }
        }
    }

    /// Run until stopped, blocking on queue emptiness
    ///
    /// The loop condition-waits when the queue is empty and wakes on
    /// `submit` or `stop`; it never busy-polls. After `stop`, the item
    /// currently executing finishes but nothing further is dequeued.
    pub fn run_forever(&self) {
        loop {
            let item = {
                let mut state = self.lock_state();
                loop {
                    if self.stopped.load(Ordering::Acquire) {
                        return;
                    }
                    if let Some(item) = state.queue.pop_front() {
                        break item;
                    }
                    state = self
                        .work_available
                        .wait(state)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };
            self.execute_one(item);
        }
    }

    /// Spawn the configured number of consumer loops
    ///
    /// Join the returned handles after calling [`stop`](Self::stop) to
    /// wait for in-flight work to finish.
    pub fn spawn_workers(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        (0..self.config.workers)
            .map(|_| {
                let scheduler = Arc::clone(self);
                thread::spawn(move || scheduler.run_forever())
            })
            .collect()
    }

    /// Signal consumer loops to exit after their current item
    ///
    /// Idempotent and safe to call from any thread. Queued-but-unexecuted
    /// requests stay in the history as `Queued`.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
        // Taking the queue lock orders this store against any consumer
        // that observed `stopped == false` and is about to wait, so the
        // notification below cannot be lost.
        drop(self.lock_state());
        self.work_available.notify_all();
        debug!("scheduler stop requested");
    }

    /// True once `stop` has been called
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Number of requests waiting in the queue
    pub fn pending(&self) -> usize {
        self.lock_state().queue.len()
    }

    /// Snapshot of the execution history in submission order
    pub fn history(&self) -> Vec<ExecutionRecord> {
        self.lock_state().history.clone()
    }

    /// The configured quantum
    pub fn quantum(&self) -> Duration {
        self.config.quantum
    }

    fn execute_one(&self, (id, request): (RequestId, TransactionRequest)) {
        self.transition(id, RequestState::Running, None);

        let result = self.engine.execute(&request);
        match result {
            Ok(()) => {
                debug!(request = id, "completed");
                self.transition(id, RequestState::Completed, None);
            }
            Err(error) => {
                // Terminal: failed requests are recorded, never retried,
                // and never halt the loop.
                warn!(request = id, %error, "failed");
                self.transition(id, RequestState::Failed, Some(error));
            }
        }

        if !self.config.quantum.is_zero() {
            thread::sleep(self.config.quantum);
        }
    }

    fn transition(&self, id: RequestId, to: RequestState, error: Option<LedgerError>) {
        let mut state = self.lock_state();
        // IDs start at 1 and the history is append-only in ID order.
        if let Some(record) = state.history.get_mut((id - 1) as usize) {
            record.state = to;
            record.error = error;
        }
    }
}
