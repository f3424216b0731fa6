//! MPS7 Ledger CLI
//!
//! Decodes an MPS7 transaction log and prints aggregate totals as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- txnlog.dat --user 2456938384156277127 > report.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use clap::Parser;
use mps7_ledger::{process_log, Aggregator, CountPolicy, DecoderConfig, Result};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;

/// User whose balance is reported when `--user` is not given.
const DEFAULT_USER: u64 = 2_456_938_384_156_277_127;

/// Summarise an MPS7 binary transaction log.
#[derive(Parser, Debug)]
#[command(name = "mps7-ledger")]
#[command(version, about)]
struct Args {
    /// Path to the MPS7 log file.
    log: PathBuf,

    /// User whose balance to report.
    #[arg(short, long, default_value_t = DEFAULT_USER)]
    user: u64,

    /// How to treat the header's declared record count: advisory, strict or declared.
    #[arg(long, default_value_t = CountPolicy::Advisory)]
    count_policy: CountPolicy,
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    let mut aggregator = Aggregator::new();
    if let Err(e) = run(&args, &mut aggregator) {
        eprintln!("Error: {}", e);
        eprintln!(
            "Processed {} records before failure",
            aggregator.snapshot().records
        );
        process::exit(1);
    }
}

fn run(args: &Args, aggregator: &mut Aggregator) -> Result<()> {
    let file = File::open(&args.log)?;
    let reader = BufReader::new(file);

    let config = DecoderConfig::with_count_policy(args.count_policy);
    process_log(reader, config, aggregator)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    aggregator.snapshot().write_report(handle, args.user)?;

    Ok(())
}
