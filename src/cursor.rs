//! Forward-only byte cursor over an arbitrary reader.
//!
//! All multi-byte values in MPS7 are big-endian. Every numeric read goes
//! through one bounded primitive so that short reads are always reported
//! with the offset at which they started.

use crate::error::{LedgerError, Result};
use std::io::{ErrorKind, Read};

/// Sequential reader that owns its byte source and tracks the absolute offset.
///
/// A single byte of lookahead is kept so that [`ByteCursor::at_end`] can tell
/// a clean end of stream apart from a read that would come up short.
pub struct ByteCursor<R> {
    inner: R,
    /// Offset of the next byte handed out to the caller.
    position: u64,
    /// Byte already pulled from `inner` by `at_end` but not yet consumed.
    peeked: Option<u8>,
}

impl<R: Read> ByteCursor<R> {
    /// Creates a cursor positioned at offset 0.
    pub fn new(inner: R) -> Self {
        ByteCursor {
            inner,
            position: 0,
            peeked: None,
        }
    }

    /// Absolute offset of the next unread byte.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns `true` if no further byte can be read because the source is exhausted.
    ///
    /// I/O failures other than exhaustion are returned as errors.
    pub fn at_end(&mut self) -> Result<bool> {
        if self.peeked.is_some() {
            return Ok(false);
        }

        let mut byte = [0u8; 1];
        if self.fill(&mut byte)? == 0 {
            return Ok(true);
        }
        self.peeked = Some(byte[0]);
        Ok(false)
    }

    /// Reads at most `n` bytes, returning fewer only when the stream ends.
    pub fn read_up_to(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; n];
        let mut filled = 0;

        if n > 0 {
            if let Some(byte) = self.peeked.take() {
                buf[0] = byte;
                filled = 1;
            }
        }
        filled += self.fill(&mut buf[filled..])?;

        buf.truncate(filled);
        self.position += filled as u64;
        Ok(buf)
    }

    /// Reads exactly `n` bytes.
    ///
    /// Fails with [`LedgerError::TruncatedStream`] carrying the offset at which
    /// the read started if fewer than `n` bytes remain.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>> {
        let offset = self.position;
        let bytes = self.read_up_to(n)?;
        if bytes.len() < n {
            return Err(LedgerError::TruncatedStream {
                offset,
                needed: n,
                available: bytes.len(),
            });
        }
        Ok(bytes)
    }

    /// Reads a fixed-size array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_exact(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64_be(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    /// Fills `buf` from the inner reader until it is full or the source is exhausted.
    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Reader that hands out one byte per call, like a slow pipe.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let data = self.0;
            match data.split_first() {
                Some((first, rest)) if !buf.is_empty() => {
                    buf[0] = *first;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(ErrorKind::Other, "disk on fire"))
        }
    }

    #[test]
    fn test_big_endian_decoding() {
        let bytes = [
            0x7f, // u8
            0x00, 0x00, 0x01, 0x02, // u32
            0x22, 0x18, 0x7f, 0x0b, 0x1b, 0x2a, 0x4c, 0x87, // u64
            0x40, 0x59, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // f64 100.0
        ];
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        assert_eq!(cursor.read_u8().unwrap(), 0x7f);
        assert_eq!(cursor.read_u32_be().unwrap(), 258);
        assert_eq!(cursor.read_u64_be().unwrap(), 0x2218_7f0b_1b2a_4c87);
        assert_eq!(cursor.read_f64_be().unwrap(), 100.0);
        assert_eq!(cursor.position(), 21);
        assert!(cursor.at_end().unwrap());
    }

    #[test]
    fn test_read_exact_reports_truncation_offset() {
        let mut cursor = ByteCursor::new(Cursor::new([1u8, 2, 3, 4, 5]));
        cursor.read_exact(2).unwrap();

        match cursor.read_exact(8) {
            Err(LedgerError::TruncatedStream {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 2);
                assert_eq!(needed, 8);
                assert_eq!(available, 3);
            }
            other => panic!("Expected TruncatedStream, got {:?}", other),
        }
    }

    #[test]
    fn test_at_end_does_not_consume() {
        let mut cursor = ByteCursor::new(Cursor::new([9u8, 8]));

        assert!(!cursor.at_end().unwrap());
        assert!(!cursor.at_end().unwrap());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_exact(2).unwrap(), vec![9, 8]);
        assert!(cursor.at_end().unwrap());
    }

    #[test]
    fn test_empty_source_is_at_end() {
        let mut cursor = ByteCursor::new(Cursor::new(Vec::<u8>::new()));
        assert!(cursor.at_end().unwrap());
        assert_eq!(cursor.read_up_to(4).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_short_reads_are_assembled() {
        let data = [0x00, 0x00, 0x00, 0x2a, 0xff];
        let mut cursor = ByteCursor::new(Trickle(&data));

        assert_eq!(cursor.read_u32_be().unwrap(), 42);
        assert_eq!(cursor.read_up_to(10).unwrap(), vec![0xff]);
    }

    #[test]
    fn test_io_error_is_not_end_of_stream() {
        let mut cursor = ByteCursor::new(Broken);
        assert!(matches!(cursor.at_end(), Err(LedgerError::Io(_))));
    }
}
