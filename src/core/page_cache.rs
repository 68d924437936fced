//! Bounded LRU page cache mirroring account state
//!
//! This module provides the `PageCache` struct, a fixed-capacity cache of
//! balance snapshots keyed by account ID with strict least-recently-used
//! eviction. The cache models a paged memory region: capacity is derived
//! from a simulated memory size divided by the page size.
//!
//! # Design
//!
//! Recency is tracked by an index-addressed node arena forming a doubly
//! linked list, with a map from account ID to arena slot. Touch and evict
//! are O(1) and there is no pointer aliasing: nodes refer to each other by
//! `usize` slot index only.
//!
//! The cache is advisory. A miss means a stale display, never data loss;
//! the ledger remains the source of truth, and no cache condition can
//! block or fail a ledger operation.
//!
//! # Concurrency
//!
//! All state sits behind a single mutex. Critical sections are pure
//! metadata updates and never re-enter ledger code.

use crate::types::AccountId;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Size of a simulated memory page in bytes
pub const PAGE_SIZE: usize = 4096;

/// Total simulated memory size in bytes
pub const TOTAL_MEMORY: usize = 10 * PAGE_SIZE;

/// Default cache capacity in entries (pages of simulated memory)
pub const DEFAULT_CAPACITY: usize = TOTAL_MEMORY / PAGE_SIZE;

/// A cached balance snapshot
///
/// At most one entry exists per account. The snapshot reflects the balance
/// at the time of the last touch and may lag behind the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// Account this entry mirrors
    pub account: AccountId,

    /// Balance at the time of the last touch
    pub cached_balance: Decimal,
}

/// Arena node in the recency list
#[derive(Debug)]
struct Node {
    entry: CacheEntry,
    /// Slot index of the next-more-recently-used node
    prev: Option<usize>,
    /// Slot index of the next-less-recently-used node
    next: Option<usize>,
}

/// Mutable cache state, all guarded by one mutex
#[derive(Debug, Default)]
struct CacheState {
    /// Node arena; slots are reused via the free list
    nodes: Vec<Node>,
    /// Recycled arena slots
    free: Vec<usize>,
    /// Account ID to arena slot
    index: HashMap<AccountId, usize>,
    /// Most-recently-used slot
    head: Option<usize>,
    /// Least-recently-used slot
    tail: Option<usize>,
}

impl CacheState {
    /// Detach a node from the recency list without freeing its slot
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = (self.nodes[slot].prev, self.nodes[slot].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[slot].prev = None;
        self.nodes[slot].next = None;
    }

    /// Attach a node at the most-recently-used end
    fn push_front(&mut self, slot: usize) {
        self.nodes[slot].prev = None;
        self.nodes[slot].next = self.head;
        if let Some(old_head) = self.head {
            self.nodes[old_head].prev = Some(slot);
        }
        self.head = Some(slot);
        if self.tail.is_none() {
            self.tail = Some(slot);
        }
    }

    /// Remove the least-recently-used entry and recycle its slot
    fn evict_tail(&mut self) -> Option<CacheEntry> {
        let slot = self.tail?;
        self.unlink(slot);
        self.free.push(slot);
        let evicted = self.nodes[slot].entry.clone();
        self.index.remove(&evicted.account);
        Some(evicted)
    }

    /// Allocate an arena slot for a fresh entry
    fn allocate(&mut self, entry: CacheEntry) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Node {
                    entry,
                    prev: None,
                    next: None,
                };
                slot
            }
            None => {
                self.nodes.push(Node {
                    entry,
                    prev: None,
                    next: None,
                });
                self.nodes.len() - 1
            }
        }
    }
}

/// Fixed-capacity recency-ordered cache of account balance snapshots
///
/// Eviction strictly follows recency of the last touch: the
/// least-recently-touched entry goes first, and entries that were inserted
/// but never re-touched are ordered by insertion (earliest inserted is
/// evicted first).
#[derive(Debug)]
pub struct PageCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl PageCache {
    /// Create a cache holding at most `capacity` entries
    ///
    /// A zero capacity is replaced with [`DEFAULT_CAPACITY`], mirroring
    /// how other configuration fallbacks behave in this crate.
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            debug!(
                fallback = DEFAULT_CAPACITY,
                "zero cache capacity requested, using default"
            );
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        PageCache {
            capacity,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Create a cache with the default capacity
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }

    fn lock_state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or refresh an entry and mark it most-recently-used
    ///
    /// Called on every read or write access to the underlying account.
    /// When the cache is full and the account is new, the current
    /// least-recently-used entry is evicted first.
    pub fn touch(&self, account: AccountId, balance_snapshot: Decimal) {
        let mut guard = self.lock_state();
        let state = &mut *guard;

        if let Some(slot) = state.index.get(&account).copied() {
            state.nodes[slot].entry.cached_balance = balance_snapshot;
            state.unlink(slot);
            state.push_front(slot);
            return;
        }

        if state.index.len() >= self.capacity {
            if let Some(evicted) = state.evict_tail() {
                debug!(account = evicted.account, "evicted least-recently-used cache entry");
            }
        }

        let slot = state.allocate(CacheEntry {
            account,
            cached_balance: balance_snapshot,
        });
        state.index.insert(account, slot);
        state.push_front(slot);
    }

    /// Entries ordered most- to least-recently-used
    ///
    /// Inspection only; nothing in the engine makes correctness decisions
    /// from this snapshot.
    pub fn snapshot(&self) -> Vec<CacheEntry> {
        let state = self.lock_state();
        let mut entries = Vec::with_capacity(state.index.len());
        let mut cursor = state.head;
        while let Some(slot) = cursor {
            entries.push(state.nodes[slot].entry.clone());
            cursor = state.nodes[slot].next;
        }
        entries
    }

    /// Cached balance for an account, if present
    pub fn get(&self, account: AccountId) -> Option<Decimal> {
        let state = self.lock_state();
        state
            .index
            .get(&account)
            .map(|&slot| state.nodes[slot].entry.cached_balance)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.lock_state().index.len()
    }

    /// True when nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for PageCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touched(cache: &PageCache) -> Vec<AccountId> {
        cache.snapshot().iter().map(|e| e.account).collect()
    }

    #[test]
    fn test_default_capacity_derived_from_memory_size() {
        assert_eq!(DEFAULT_CAPACITY, 10);
        assert_eq!(PageCache::with_default_capacity().capacity(), 10);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        assert_eq!(PageCache::new(0).capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_touch_inserts_entry() {
        let cache = PageCache::new(3);

        cache.touch(1, Decimal::new(1000, 0));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), Some(Decimal::new(1000, 0)));
    }

    #[test]
    fn test_touch_refreshes_balance() {
        let cache = PageCache::new(3);

        cache.touch(1, Decimal::new(1000, 0));
        cache.touch(1, Decimal::new(1500, 0));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), Some(Decimal::new(1500, 0)));
    }

    #[test]
    fn test_snapshot_orders_most_recent_first() {
        let cache = PageCache::new(3);

        cache.touch(1, Decimal::ZERO);
        cache.touch(2, Decimal::ZERO);
        cache.touch(3, Decimal::ZERO);

        assert_eq!(touched(&cache), vec![3, 2, 1]);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let cache = PageCache::new(3);

        for account in 0u32..20 {
            cache.touch(account, Decimal::ZERO);
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_eviction_removes_least_recently_touched() {
        let cache = PageCache::new(3);

        cache.touch(1, Decimal::ZERO);
        cache.touch(2, Decimal::ZERO);
        cache.touch(3, Decimal::ZERO);
        // Re-touch 1 so 2 becomes least recently used.
        cache.touch(1, Decimal::ZERO);
        cache.touch(4, Decimal::ZERO);

        assert_eq!(cache.get(2), None);
        assert_eq!(touched(&cache), vec![4, 1, 3]);
    }

    #[test]
    fn test_eviction_tie_break_is_insertion_order() {
        let cache = PageCache::new(3);

        // None of these are ever re-touched, so insertion order decides.
        cache.touch(1, Decimal::ZERO);
        cache.touch(2, Decimal::ZERO);
        cache.touch(3, Decimal::ZERO);
        cache.touch(4, Decimal::ZERO);

        assert_eq!(cache.get(1), None);
        assert_eq!(touched(&cache), vec![4, 3, 2]);
    }

    #[test]
    fn test_first_touched_absent_after_capacity_plus_one_accounts() {
        let cache = PageCache::with_default_capacity();
        let capacity = cache.capacity() as u32;

        for account in 1..=capacity + 1 {
            cache.touch(account, Decimal::ZERO);
        }

        assert_eq!(cache.get(1), None);
        assert_eq!(cache.len(), cache.capacity());
    }

    #[test]
    fn test_refresh_does_not_evict() {
        let cache = PageCache::new(2);

        cache.touch(1, Decimal::ZERO);
        cache.touch(2, Decimal::ZERO);
        cache.touch(2, Decimal::ONE);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(1), Some(Decimal::ZERO));
    }

    #[test]
    fn test_slots_are_recycled_after_eviction() {
        let cache = PageCache::new(2);

        for round in 0u32..100 {
            cache.touch(round, Decimal::ZERO);
        }

        // Only capacity-many arena slots should ever exist.
        assert_eq!(cache.len(), 2);
        let state = cache.lock_state();
        assert!(state.nodes.len() <= 3);
    }

    #[test]
    fn test_capacity_one_cache_always_holds_last_touch() {
        let cache = PageCache::new(1);

        cache.touch(1, Decimal::ZERO);
        cache.touch(2, Decimal::ZERO);
        cache.touch(3, Decimal::ZERO);

        assert_eq!(touched(&cache), vec![3]);
    }
}
