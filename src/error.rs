//! Error types for the MPS7 decoder and aggregator.

use crate::record::RecordKind;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur while decoding or aggregating an MPS7 log.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Failed to read from the underlying byte source
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to write the CSV report
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The first four bytes are not `MPS7` (or the stream is shorter than that)
    #[error("Bad magic: expected \"MPS7\", found {found:?}")]
    BadMagic { found: Vec<u8> },

    /// The stream ended inside a primitive read outside of any record
    #[error("Truncated stream at offset {offset}: needed {needed} bytes, {available} available")]
    TruncatedStream {
        offset: u64,
        needed: usize,
        available: usize,
    },

    /// A record started but the stream ended before it was complete
    #[error("Truncated {kind:?} record starting at offset {record_offset}: stream ended at offset {offset}")]
    TruncatedRecord {
        record_offset: u64,
        offset: u64,
        kind: RecordKind,
    },

    /// Kind byte outside the four documented values
    #[error("Unknown record kind {kind:#04x} at offset {offset}")]
    UnknownRecordKind { kind: u8, offset: u64 },

    /// Actual record count differs from the header under the strict policy
    #[error("Header declares {declared} records but the stream contains {actual}")]
    RecordCountMismatch { declared: u32, actual: u64 },

    /// A debit or credit without an amount
    #[error("{kind:?} record for user {user_id} has no amount")]
    MissingAmount { kind: RecordKind, user_id: u64 },

    /// An autopay record carrying an amount
    #[error("{kind:?} record for user {user_id} cannot carry an amount")]
    UnexpectedAmount { kind: RecordKind, user_id: u64 },

    /// Adding an amount would push a total or balance outside the decimal range
    #[error("Amount for user {user_id} overflows the running totals")]
    AmountOverflow { user_id: u64 },

    /// Amount is NaN, infinite, or outside the decimal range
    #[error("Amount {value} for user {user_id} is not a representable decimal")]
    InvalidAmount { value: f64, user_id: u64 },
}
