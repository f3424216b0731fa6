//! MPS7 records and the per-record decoder.

use crate::cursor::ByteCursor;
use crate::error::{LedgerError, Result};
use log::trace;
use std::io::Read;

/// Record type, encoded as a single byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Money leaving the user's account. Carries an amount.
    Debit,

    /// Money arriving in the user's account. Carries an amount.
    Credit,

    /// The user enabled autopay.
    StartAutopay,

    /// The user disabled autopay.
    EndAutopay,
}

impl RecordKind {
    /// Wire value of this kind.
    pub fn as_byte(self) -> u8 {
        match self {
            RecordKind::Debit => 0,
            RecordKind::Credit => 1,
            RecordKind::StartAutopay => 2,
            RecordKind::EndAutopay => 3,
        }
    }

    /// Whether records of this kind carry an 8-byte amount.
    pub fn has_amount(self) -> bool {
        matches!(self, RecordKind::Debit | RecordKind::Credit)
    }
}

impl TryFrom<u8> for RecordKind {
    type Error = u8;

    fn try_from(byte: u8) -> std::result::Result<Self, Self::Error> {
        match byte {
            0 => Ok(RecordKind::Debit),
            1 => Ok(RecordKind::Credit),
            2 => Ok(RecordKind::StartAutopay),
            3 => Ok(RecordKind::EndAutopay),
            other => Err(other),
        }
    }
}

/// A single decoded log entry.
///
/// `amount` is `Some` exactly when `kind.has_amount()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub kind: RecordKind,

    /// Unix epoch seconds.
    pub timestamp: u32,

    pub user_id: u64,

    pub amount: Option<f64>,
}

impl Record {
    /// Size of kind, timestamp and user id.
    pub const BASE_LEN: usize = 13;

    /// Size of a record carrying an amount.
    pub const AMOUNT_LEN: usize = 21;

    pub fn debit(timestamp: u32, user_id: u64, amount: f64) -> Self {
        Record {
            kind: RecordKind::Debit,
            timestamp,
            user_id,
            amount: Some(amount),
        }
    }

    pub fn credit(timestamp: u32, user_id: u64, amount: f64) -> Self {
        Record {
            kind: RecordKind::Credit,
            timestamp,
            user_id,
            amount: Some(amount),
        }
    }

    pub fn start_autopay(timestamp: u32, user_id: u64) -> Self {
        Record {
            kind: RecordKind::StartAutopay,
            timestamp,
            user_id,
            amount: None,
        }
    }

    pub fn end_autopay(timestamp: u32, user_id: u64) -> Self {
        Record {
            kind: RecordKind::EndAutopay,
            timestamp,
            user_id,
            amount: None,
        }
    }

    /// Decodes the next record, or returns `None` at a clean end of stream.
    ///
    /// A stream that ends exactly on a record boundary is the only successful
    /// termination. Once the kind byte has been read, any shortfall is
    /// [`LedgerError::TruncatedRecord`].
    pub fn decode_next<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Option<Self>> {
        if cursor.at_end()? {
            return Ok(None);
        }

        let record_offset = cursor.position();
        let kind_byte = cursor.read_u8()?;
        let kind = RecordKind::try_from(kind_byte).map_err(|kind| {
            LedgerError::UnknownRecordKind {
                kind,
                offset: record_offset,
            }
        })?;

        let truncated = |err: LedgerError| match err {
            LedgerError::TruncatedStream {
                offset, available, ..
            } => LedgerError::TruncatedRecord {
                record_offset,
                offset: offset + available as u64,
                kind,
            },
            other => other,
        };

        let timestamp = cursor.read_u32_be().map_err(truncated)?;
        let user_id = cursor.read_u64_be().map_err(truncated)?;
        let amount = if kind.has_amount() {
            Some(cursor.read_f64_be().map_err(truncated)?)
        } else {
            None
        };

        let record = Record {
            kind,
            timestamp,
            user_id,
            amount,
        };
        trace!("Offset {}: decoded {:?}", record_offset, record);

        Ok(Some(record))
    }

    /// Number of bytes this record occupies on the wire.
    pub fn encoded_len(&self) -> usize {
        if self.kind.has_amount() {
            Self::AMOUNT_LEN
        } else {
            Self::BASE_LEN
        }
    }

    /// Appends the wire encoding of this record to `out`.
    ///
    /// Fails without writing anything if the amount's presence does not
    /// match the kind.
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<()> {
        let amount = match (self.kind.has_amount(), self.amount) {
            (true, Some(amount)) => Some(amount),
            (false, None) => None,
            (true, None) => {
                return Err(LedgerError::MissingAmount {
                    kind: self.kind,
                    user_id: self.user_id,
                })
            }
            (false, Some(_)) => {
                return Err(LedgerError::UnexpectedAmount {
                    kind: self.kind,
                    user_id: self.user_id,
                })
            }
        };

        out.push(self.kind.as_byte());
        out.extend_from_slice(&self.timestamp.to_be_bytes());
        out.extend_from_slice(&self.user_id.to_be_bytes());
        if let Some(amount) = amount {
            out.extend_from_slice(&amount.to_be_bytes());
        }
        Ok(())
    }
}
