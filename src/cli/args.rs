use crate::core::scheduler::{SchedulerConfig, DEFAULT_QUANTUM_MS};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Simulate a concurrent transactional ledger with an LRU page cache and
/// a cooperative transaction scheduler
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Simulate concurrent ledger transactions", long_about = None)]
pub struct CliArgs {
    /// Delay applied by the scheduler after each executed transaction
    #[arg(
        long = "quantum-ms",
        value_name = "MILLIS",
        default_value_t = DEFAULT_QUANTUM_MS,
        help = "Scheduler time quantum in milliseconds"
    )]
    pub quantum_ms: u64,

    /// Page cache capacity in entries
    #[arg(
        long = "cache-capacity",
        value_name = "ENTRIES",
        help = "Page cache capacity (default: simulated memory size / page size)"
    )]
    pub cache_capacity: Option<usize>,

    /// Number of scheduler consumer loops
    #[arg(
        long = "workers",
        value_name = "COUNT",
        default_value_t = 1,
        help = "Scheduler worker loops (default: 1, capped at CPU cores)"
    )]
    pub workers: usize,

    /// Number of accounts to create before the simulation starts
    #[arg(
        long = "accounts",
        value_name = "COUNT",
        default_value_t = 1,
        help = "Accounts created with sequential IDs starting at 1"
    )]
    pub accounts: u32,

    /// Number of submitter threads racing transactions per account
    #[arg(
        long = "submitters",
        value_name = "COUNT",
        default_value_t = 2,
        help = "Concurrent submitter threads"
    )]
    pub submitters: usize,

    /// Opening balance for every created account
    #[arg(
        long = "initial-balance",
        value_name = "AMOUNT",
        default_value_t = 1000,
        help = "Opening balance per account"
    )]
    pub initial_balance: i64,

    /// Transaction log file; omit to discard the log
    #[arg(long = "log-file", value_name = "PATH", help = "Append transaction log lines to this file")]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Build a SchedulerConfig from the CLI arguments
    ///
    /// Worker counts above the number of CPU cores are clamped with a
    /// warning; a value of zero falls back to the default inside
    /// [`SchedulerConfig::new`].
    pub fn to_scheduler_config(&self) -> SchedulerConfig {
        let cores = num_cpus::get();
        let workers = if self.workers > cores {
            eprintln!(
                "Warning: --workers {} exceeds available cores, using {}",
                self.workers, cores
            );
            cores
        } else {
            self.workers
        };

        SchedulerConfig::new(Duration::from_millis(self.quantum_ms), workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::all_defaults(&["program"], DEFAULT_QUANTUM_MS, 1, 1)]
    #[case::custom_quantum(&["program", "--quantum-ms", "10"], 10, 1, 1)]
    #[case::custom_workers(&["program", "--workers", "1"], DEFAULT_QUANTUM_MS, 1, 1)]
    #[case::custom_accounts(&["program", "--accounts", "5"], DEFAULT_QUANTUM_MS, 1, 5)]
    fn test_arg_parsing(
        #[case] args: &[&str],
        #[case] quantum_ms: u64,
        #[case] workers: usize,
        #[case] accounts: u32,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.quantum_ms, quantum_ms);
        assert_eq!(parsed.workers, workers);
        assert_eq!(parsed.accounts, accounts);
    }

    #[test]
    fn test_cache_capacity_defaults_to_none() {
        let parsed = CliArgs::try_parse_from(["program"]).unwrap();
        assert_eq!(parsed.cache_capacity, None);
    }

    #[test]
    fn test_log_file_parsing() {
        let parsed =
            CliArgs::try_parse_from(["program", "--log-file", "transactions.log"]).unwrap();
        assert_eq!(parsed.log_file, Some(PathBuf::from("transactions.log")));
    }

    #[test]
    fn test_scheduler_config_from_args() {
        let parsed = CliArgs::try_parse_from(["program", "--quantum-ms", "25"]).unwrap();
        let config = parsed.to_scheduler_config();
        assert_eq!(config.quantum, Duration::from_millis(25));
        assert_eq!(config.workers, 1);
    }

    #[test]
    fn test_worker_count_is_clamped_to_cores() {
        let oversized = (num_cpus::get() + 100).to_string();
        let parsed =
            CliArgs::try_parse_from(["program", "--workers", oversized.as_str()]).unwrap();
        let config = parsed.to_scheduler_config();
        assert_eq!(config.workers, num_cpus::get());
    }
}
