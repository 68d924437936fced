//! Benchmarks for page cache touch and snapshot throughput
//!
//! Run with: cargo bench

use divan::Bencher;
use ledger_engine::PageCache;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

/// Touch the same entries repeatedly: every touch is a hit that moves the
/// entry to the front of the recency list.
#[divan::bench]
fn touch_hit(bencher: Bencher) {
    let cache = PageCache::new(64);
    for account in 0u32..64 {
        cache.touch(account, Decimal::ZERO);
    }

    let mut account = 0u32;
    bencher.bench_local(move || {
        account = (account + 1) % 64;
        cache.touch(account, Decimal::ONE);
    });
}

/// Touch a rolling window wider than the cache: every touch of a new
/// account evicts the least-recently-used entry.
#[divan::bench]
fn touch_evict(bencher: Bencher) {
    let cache = PageCache::new(64);

    let mut account = 0u32;
    bencher.bench_local(move || {
        account = account.wrapping_add(1);
        cache.touch(account, Decimal::ZERO);
    });
}

/// Full snapshot of a populated cache, most- to least-recently-used.
#[divan::bench]
fn snapshot(bencher: Bencher) {
    let cache = PageCache::new(64);
    for account in 0u32..64 {
        cache.touch(account, Decimal::ZERO);
    }

    bencher.bench_local(|| divan::black_box(cache.snapshot()));
}
