//! # MPS7 Ledger
//!
//! A streaming decoder for the MPS7 binary transaction log and an aggregator
//! that derives debit/credit totals, autopay event counts and per-user
//! balances from it.
//!
//! ## Design Principles
//!
//! - **Big-endian everywhere**: every multi-byte field goes through one
//!   bounded read on [`ByteCursor`]
//! - **Streaming processing**: records are decoded, aggregated and dropped
//! - **Clean end vs. truncation**: a stream ending on a record boundary is
//!   success; ending inside one is [`LedgerError::TruncatedRecord`]
//! - **Exact sums**: amounts are accumulated as decimals via `rust_decimal`
//!
//! ## Example
//!
//! ```no_run
//! use mps7_ledger::{process_log, Aggregator, DecoderConfig};
//! use std::fs::File;
//!
//! let mut aggregator = Aggregator::new();
//! process_log(File::open("txnlog.dat").unwrap(), DecoderConfig::default(), &mut aggregator).unwrap();
//! aggregator.snapshot().write_report(std::io::stdout(), 2456938384156277127).unwrap();
//! ```

pub mod aggregator;
pub mod amount;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod header;
pub mod record;

pub use aggregator::{AggregateResult, Aggregator};
pub use amount::Amount;
pub use config::{CountPolicy, DecoderConfig};
pub use cursor::ByteCursor;
pub use engine::{process_log, LogReader};
pub use error::{LedgerError, Result};
pub use header::{Header, HEADER_LEN, MAGIC};
pub use record::{Record, RecordKind};
