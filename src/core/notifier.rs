//! Notification channel for completed transactions
//!
//! This module provides the `NotificationChannel` struct, a point-to-point
//! FIFO queue of [`TransactionEvent`]s. Producers call [`publish`]; each
//! published event is delivered to exactly one [`await_next`] call, in
//! publish order.
//!
//! # Delivery Contract
//!
//! - `publish` wakes exactly one waiting listener, if any; otherwise the
//!   event stays queued for the next listener.
//! - Events published before any listener arrives are observed by the
//!   first subsequent `await_next` call; no wakeup is ever lost.
//! - Draining is FIFO across all listeners.
//!
//! [`publish`]: NotificationChannel::publish
//! [`await_next`]: NotificationChannel::await_next

use crate::types::TransactionEvent;
use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Point-to-point queue announcing completed ledger operations
///
/// Safe to share between any number of producer and consumer threads.
/// Consumers block in [`await_next`](Self::await_next); producers never
/// block beyond the short internal critical section.
#[derive(Debug, Default)]
pub struct NotificationChannel {
    queue: Mutex<VecDeque<TransactionEvent>>,
    available: Condvar,
}

impl NotificationChannel {
    /// Create an empty channel
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<TransactionEvent>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an event and wake one waiting listener
    ///
    /// If no listener is waiting, the event remains queued and the next
    /// [`await_next`](Self::await_next) call returns it immediately.
    pub fn publish(&self, event: TransactionEvent) {
        let mut queue = self.lock_queue();
        queue.push_back(event);
        drop(queue);
        self.available.notify_one();
    }

    /// Block until an event is available or the timeout elapses
    ///
    /// Returns `None` on timeout. Each returned event is removed from the
    /// queue, so every published event is delivered to exactly one caller.
    pub fn await_next(&self, timeout: Duration) -> Option<TransactionEvent> {
        let queue = self.lock_queue();
        let (mut queue, _timed_out) = self
            .available
            .wait_timeout_while(queue, timeout, |queue| queue.is_empty())
            .unwrap_or_else(PoisonError::into_inner);
        queue.pop_front()
    }

    /// Dequeue an event without blocking
    pub fn try_next(&self) -> Option<TransactionEvent> {
        self.lock_queue().pop_front()
    }

    /// Number of undelivered events
    pub fn len(&self) -> usize {
        self.lock_queue().len()
    }

    /// True when no events are queued
    pub fn is_empty(&self) -> bool {
        self.lock_queue().is_empty()
    }
}
