//! End-to-end scenario tests
//!
//! These tests drive the whole pipeline through the public API: requests
//! are submitted to the scheduler, executed against the ledger, mirrored
//! into the page cache, recorded by the transaction log, and announced on
//! the notification channel. Each test asserts on the externally
//! observable outcome of one scenario.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rust_decimal::Decimal;

use ledger_engine::{
    EventOutcome, Ledger, LedgerEngine, LedgerError, MemoryTransactionLog, NotificationChannel,
    NullTransactionLog, PageCache, RequestState, SchedulerConfig, TransactionKind,
    TransactionRequest, TransactionScheduler,
};

fn build_engine(log: Arc<dyn ledger_engine::TransactionLog>) -> LedgerEngine {
    LedgerEngine::new(
        Arc::new(Ledger::new()),
        Arc::new(PageCache::with_default_capacity()),
        Arc::new(NotificationChannel::new()),
        log,
    )
}

fn build_scheduler(engine: &LedgerEngine) -> TransactionScheduler {
    TransactionScheduler::new(engine.clone(), SchedulerConfig::new(Duration::ZERO, 1))
}

#[test]
fn deposit_then_withdraw_through_scheduler() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();
    let scheduler = build_scheduler(&engine);

    scheduler.submit(TransactionRequest::deposit(1, Decimal::from(500)));
    scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(200)));
    scheduler.run_until_idle();

    assert_eq!(engine.balance(1).unwrap(), Decimal::from(1300));

    // Two events, in execution order, both successful.
    let first = engine.notifier().try_next().unwrap();
    let second = engine.notifier().try_next().unwrap();
    assert_eq!(first.kind, TransactionKind::Deposit);
    assert!(first.outcome.is_success());
    assert_eq!(second.kind, TransactionKind::Withdraw);
    assert!(second.outcome.is_success());
    assert!(engine.notifier().is_empty());
}

#[test]
fn overdraft_fails_without_success_event_and_is_recorded() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();
    let scheduler = build_scheduler(&engine);

    scheduler.submit(TransactionRequest::deposit(1, Decimal::from(500)));
    scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(200)));
    scheduler.run_until_idle();
    assert_eq!(engine.balance(1).unwrap(), Decimal::from(1300));

    scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(5000)));
    scheduler.run_until_idle();

    // Balance unchanged, no Success event for the overdraft, and the
    // scheduler history holds a Failed record with the error.
    assert_eq!(engine.balance(1).unwrap(), Decimal::from(1300));

    let events: Vec<_> = std::iter::from_fn(|| engine.notifier().try_next()).collect();
    assert_eq!(events.len(), 3);
    let overdraft = &events[2];
    assert_eq!(overdraft.amount, Decimal::from(5000));
    assert!(matches!(
        overdraft.outcome,
        EventOutcome::Failed(LedgerError::InsufficientFunds { .. })
    ));

    let history = scheduler.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[2].state, RequestState::Failed);
    assert!(matches!(
        history[2].error,
        Some(LedgerError::InsufficientFunds { .. })
    ));
}

#[test]
fn racing_submitters_conserve_funds() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();
    let scheduler = Arc::new(build_scheduler(&engine));

    // Two simulated customers race deposit/withdraw pairs, then the
    // scheduler drains everything.
    let mut submitters = vec![];
    for _ in 0..2 {
        let scheduler = Arc::clone(&scheduler);
        submitters.push(thread::spawn(move || {
            scheduler.submit(TransactionRequest::deposit(1, Decimal::from(500)));
            scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(200)));
        }));
    }
    for submitter in submitters {
        submitter.join().unwrap();
    }
    scheduler.run_until_idle();

    // 1000 + 2*500 - 2*200, whatever the submission interleaving was.
    assert_eq!(engine.balance(1).unwrap(), Decimal::from(1600));
    assert!(scheduler
        .history()
        .iter()
        .all(|record| record.state == RequestState::Completed));
}

#[test]
fn scheduler_worker_drains_while_observer_listens() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();
    let scheduler = Arc::new(build_scheduler(&engine));
    let notifier = engine.notifier_handle();

    let worker = {
        let scheduler = Arc::clone(&scheduler);
        thread::spawn(move || scheduler.run_forever())
    };

    let observer = thread::spawn(move || {
        let mut kinds = vec![];
        while let Some(event) = notifier.await_next(Duration::from_millis(500)) {
            kinds.push(event.kind);
            if kinds.len() == 4 {
                break;
            }
        }
        kinds
    });

    for _ in 0..2 {
        scheduler.submit(TransactionRequest::deposit(1, Decimal::from(500)));
        scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(200)));
    }

    let kinds = observer.join().unwrap();
    scheduler.stop();
    worker.join().unwrap();

    assert_eq!(
        kinds,
        vec![
            TransactionKind::Deposit,
            TransactionKind::Withdraw,
            TransactionKind::Deposit,
            TransactionKind::Withdraw,
        ]
    );
    assert_eq!(engine.balance(1).unwrap(), Decimal::from(1600));
}

#[test]
fn cache_reflects_recency_across_many_accounts() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    let capacity = engine.cache().capacity() as u32;

    // One more account than the cache holds; account 1 is never
    // re-touched after creation.
    for id in 1..=capacity + 1 {
        engine
            .create_account_with_id(id, Decimal::from(1000))
            .unwrap();
    }

    let snapshot = engine.cache().snapshot();
    assert_eq!(snapshot.len(), capacity as usize);
    assert!(snapshot.iter().all(|entry| entry.account != 1));

    // Most recently created account leads the memory map.
    assert_eq!(snapshot[0].account, capacity + 1);
}

#[test]
fn transaction_log_sees_every_operation() {
    let log = Arc::new(MemoryTransactionLog::new());
    let engine = build_engine(Arc::clone(&log) as Arc<dyn ledger_engine::TransactionLog>);
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();
    let scheduler = build_scheduler(&engine);

    scheduler.submit(TransactionRequest::deposit(1, Decimal::from(500)));
    scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(200)));
    scheduler.submit(TransactionRequest::withdraw(1, Decimal::from(99999)));
    scheduler.run_until_idle();

    let entries = log.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].outcome.is_success());
    assert!(entries[1].outcome.is_success());
    assert!(!entries[2].outcome.is_success());
}

#[test]
fn events_published_before_any_listener_are_delivered() {
    let engine = build_engine(Arc::new(NullTransactionLog));
    engine
        .create_account_with_id(1, Decimal::from(1000))
        .unwrap();

    engine.deposit(1, Decimal::from(10)).unwrap();
    engine.deposit(1, Decimal::from(20)).unwrap();

    // The first listener to arrive drains in publish order.
    let notifier = engine.notifier_handle();
    let first = notifier.await_next(Duration::from_millis(50)).unwrap();
    let second = notifier.await_next(Duration::from_millis(50)).unwrap();
    assert_eq!(first.amount, Decimal::from(10));
    assert_eq!(second.amount, Decimal::from(20));
    assert_eq!(notifier.await_next(Duration::from_millis(10)), None);
}
