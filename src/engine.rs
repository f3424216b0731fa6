//! Log-level decoding: header once, then records until the stream ends.
//!
//! [`LogReader`] yields records one at a time without buffering them;
//! [`process_log`] feeds them into a caller-owned [`Aggregator`] so partial
//! totals survive a decode failure.

use crate::aggregator::Aggregator;
use crate::config::{CountPolicy, DecoderConfig};
use crate::cursor::ByteCursor;
use crate::error::{LedgerError, Result};
use crate::header::Header;
use crate::record::Record;
use log::{debug, info, warn};
use std::io::Read;

/// Streaming reader over a complete MPS7 log.
///
/// The header is decoded by [`LogReader::open`]; records are then produced
/// through [`Iterator`]. The iterator is fused: after the first error or the
/// end of the log it keeps returning `None`.
///
/// # Example
///
/// ```
/// use mps7_ledger::{DecoderConfig, Header, LogReader, Record};
/// use std::io::Cursor;
///
/// let mut bytes = Header::new(1, 1).to_bytes().to_vec();
/// Record::credit(1_393_108_945, 7, 12.5).encode(&mut bytes).unwrap();
///
/// let reader = LogReader::open(Cursor::new(bytes), DecoderConfig::default()).unwrap();
/// let records: Vec<Record> = reader.collect::<Result<_, _>>().unwrap();
/// assert_eq!(records.len(), 1);
/// ```
pub struct LogReader<R> {
    cursor: ByteCursor<R>,
    header: Header,
    config: DecoderConfig,
    records_read: u64,
    finished: bool,
}

impl<R: Read> LogReader<R> {
    /// Takes ownership of `reader` and decodes the header.
    pub fn open(reader: R, config: DecoderConfig) -> Result<Self> {
        let mut cursor = ByteCursor::new(reader);
        let header = Header::decode(&mut cursor)?;

        Ok(LogReader {
            cursor,
            header,
            config,
            records_read: 0,
            finished: false,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Number of records decoded so far.
    pub fn records_read(&self) -> u64 {
        self.records_read
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    /// Decodes the next record, or returns `None` once the log is complete.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        if self.finished {
            return Ok(None);
        }

        let declared = u64::from(self.header.declared_record_count);
        if self.config.count_policy == CountPolicy::Declared && self.records_read >= declared {
            self.finished = true;
            if !self.cursor.at_end()? {
                warn!(
                    "Stopping after {} declared records; trailing data at offset {} ignored",
                    declared,
                    self.cursor.position()
                );
            }
            return Ok(None);
        }

        match Record::decode_next(&mut self.cursor) {
            Ok(Some(record)) => {
                self.records_read += 1;
                Ok(Some(record))
            }
            Ok(None) => {
                self.finished = true;
                debug!(
                    "End of stream at offset {} after {} records",
                    self.cursor.position(),
                    self.records_read
                );
                self.check_count()?;
                Ok(None)
            }
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    /// Compares the decoded count with the header once the stream is exhausted.
    fn check_count(&self) -> Result<()> {
        let declared = self.header.declared_record_count;
        if u64::from(declared) == self.records_read {
            return Ok(());
        }

        match self.config.count_policy {
            CountPolicy::Strict => Err(LedgerError::RecordCountMismatch {
                declared,
                actual: self.records_read,
            }),
            CountPolicy::Advisory | CountPolicy::Declared => {
                warn!(
                    "Header declares {} records but the stream contains {}",
                    declared, self.records_read
                );
                Ok(())
            }
        }
    }
}

impl<R: Read> Iterator for LogReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Decodes a full log into `aggregator`, returning the header.
///
/// Any decode or aggregation failure is returned immediately; records
/// accepted before it remain visible through `aggregator.snapshot()`.
pub fn process_log<R: Read>(
    reader: R,
    config: DecoderConfig,
    aggregator: &mut Aggregator,
) -> Result<Header> {
    let mut log = LogReader::open(reader, config)?;

    for record in &mut log {
        aggregator.accept(&record?)?;
    }

    info!(
        "Processed {} records ({} declared, version {}, policy {})",
        log.records_read(),
        log.header().declared_record_count,
        log.header().version,
        config.count_policy
    );

    Ok(*log.header())
}
