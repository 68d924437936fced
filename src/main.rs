//! Ledger Engine CLI
//!
//! Command-line simulation of a transactional ledger under concurrent
//! load.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --accounts 2 --submitters 4
//! cargo run -- --quantum-ms 10 --workers 2 --log-file transactions.log
//! ```
//!
//! The program creates the requested accounts, races submitter threads
//! that enqueue deposit/withdraw pairs through the scheduler, drains the
//! scheduler, and prints a report: final balances, the page cache memory
//! map, the execution history, and the drained notification queue.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (log file not writable, account setup failed, etc.)

use std::error::Error;
use std::process;
use std::sync::Arc;
use std::thread;

use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use ledger_engine::cli;
use ledger_engine::core::page_cache::DEFAULT_CAPACITY;
use ledger_engine::{
    FileTransactionLog, Ledger, LedgerEngine, NotificationChannel, NullTransactionLog, PageCache,
    TransactionLog, TransactionRequest, TransactionScheduler,
};

fn main() {
    // Diagnostics go to stderr, controlled by RUST_LOG; the report below
    // is the program's actual output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: cli::CliArgs) -> Result<(), Box<dyn Error>> {
    let log: Arc<dyn TransactionLog> = match &args.log_file {
        Some(path) => Arc::new(FileTransactionLog::open(path)?),
        None => Arc::new(NullTransactionLog),
    };

    let cache = Arc::new(PageCache::new(
        args.cache_capacity.unwrap_or(DEFAULT_CAPACITY),
    ));
    let notifier = Arc::new(NotificationChannel::new());
    let engine = LedgerEngine::new(
        Arc::new(Ledger::new()),
        Arc::clone(&cache),
        Arc::clone(&notifier),
        log,
    );

    let initial_balance = Decimal::from(args.initial_balance);
    for id in 1..=args.accounts {
        engine.create_account_with_id(id, initial_balance)?;
    }

    let scheduler = Arc::new(TransactionScheduler::new(
        engine.clone(),
        args.to_scheduler_config(),
    ));

    // Each submitter races a deposit/withdraw pair onto every account,
    // modeling concurrent customer activity.
    let mut submitters = vec![];
    for _ in 0..args.submitters {
        let scheduler = Arc::clone(&scheduler);
        let accounts = args.accounts;
        submitters.push(thread::spawn(move || {
            for account in 1..=accounts {
                scheduler.submit(TransactionRequest::deposit(account, Decimal::from(500)));
                scheduler.submit(TransactionRequest::withdraw(account, Decimal::from(200)));
            }
        }));
    }
    for submitter in submitters {
        submitter
            .join()
            .map_err(|_| "submitter thread panicked")?;
    }

    let workers = scheduler.spawn_workers();
    // All work is queued before the workers start; once the queue drains,
    // the run is over.
    while scheduler.pending() > 0 {
        thread::sleep(scheduler.quantum().max(std::time::Duration::from_millis(1)));
    }
    scheduler.stop();
    for worker in workers {
        worker.join().map_err(|_| "scheduler worker panicked")?;
    }

    println!("Balances:");
    for account in engine.ledger().accounts() {
        println!("  Account {}: {}", account.id, account.balance);
    }

    println!("Memory Map:");
    for (page, entry) in cache.snapshot().iter().enumerate() {
        println!(
            "  Page {}: Account {} ({})",
            page, entry.account, entry.cached_balance
        );
    }

    println!("Execution history:");
    for record in scheduler.history() {
        match &record.error {
            Some(error) => println!(
                "  #{} {} {} {} -> {:?}: {}",
                record.id,
                record.request.kind.as_str(),
                record.request.amount,
                record.request.account,
                record.state,
                error
            ),
            None => println!(
                "  #{} {} {} {} -> {:?}",
                record.id,
                record.request.kind.as_str(),
                record.request.amount,
                record.request.account,
                record.state
            ),
        }
    }

    while let Some(event) = notifier.try_next() {
        println!("Transaction complete: {}", event.describe());
    }

    Ok(())
}
