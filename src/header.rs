//! MPS7 file header.

use crate::cursor::ByteCursor;
use crate::error::{LedgerError, Result};
use log::debug;
use std::io::Read;

/// Magic bytes that open every MPS7 log.
pub const MAGIC: [u8; 4] = *b"MPS7";

/// Encoded size of the header in bytes.
pub const HEADER_LEN: usize = 9;

/// Decoded log header.
///
/// The version is surfaced as data and never rejected. The declared record
/// count is advisory unless a stricter [`CountPolicy`](crate::CountPolicy)
/// is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u8,
    pub declared_record_count: u32,
}

impl Header {
    /// Creates a header with the standard magic.
    pub fn new(version: u8, declared_record_count: u32) -> Self {
        Header {
            magic: MAGIC,
            version,
            declared_record_count,
        }
    }

    /// Decodes the 9-byte header from the start of the stream.
    ///
    /// A stream shorter than the magic itself is reported as
    /// [`LedgerError::BadMagic`]; truncation after a valid magic is
    /// [`LedgerError::TruncatedStream`].
    pub fn decode<R: Read>(cursor: &mut ByteCursor<R>) -> Result<Self> {
        let found = cursor.read_up_to(MAGIC.len())?;
        if found[..] != MAGIC[..] {
            return Err(LedgerError::BadMagic { found });
        }

        let version = cursor.read_u8()?;
        let declared_record_count = cursor.read_u32_be()?;

        debug!(
            "Decoded header: version {}, {} records declared",
            version, declared_record_count
        );

        Ok(Header {
            magic: MAGIC,
            version,
            declared_record_count,
        })
    }

    /// Encodes the header in wire order.
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[..4].copy_from_slice(&self.magic);
        out[4] = self.version;
        out[5..].copy_from_slice(&self.declared_record_count.to_be_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode(bytes: &[u8]) -> Result<Header> {
        Header::decode(&mut ByteCursor::new(Cursor::new(bytes)))
    }

    #[test]
    fn test_decode_valid_header() {
        let header = decode(b"MPS7\x01\x00\x00\x00\x47").unwrap();
        assert_eq!(header.magic, MAGIC);
        assert_eq!(header.version, 1);
        assert_eq!(header.declared_record_count, 71);
    }

    #[test]
    fn test_any_version_is_accepted() {
        for version in [0u8, 1, 2, 0x7f, 0xff] {
            let bytes = Header::new(version, 0x0102_0304).to_bytes();
            let header = decode(&bytes).unwrap();
            assert_eq!(header.version, version);
            assert_eq!(header.declared_record_count, 0x0102_0304);
        }
    }

    #[test]
    fn test_header_consumes_exactly_nine_bytes() {
        let mut bytes = Header::new(1, 3).to_bytes().to_vec();
        bytes.push(0x02);
        let mut cursor = ByteCursor::new(Cursor::new(bytes));

        Header::decode(&mut cursor).unwrap();
        assert_eq!(cursor.position(), HEADER_LEN as u64);
        assert_eq!(cursor.read_u8().unwrap(), 0x02);
    }

    #[test]
    fn test_bad_magic_permutations() {
        for magic in [b"7SPM", b"SPM7", b"MPS8", b"mps7", b"\0\0\0\0"] {
            let mut bytes = magic.to_vec();
            bytes.extend_from_slice(&[1, 0, 0, 0, 1]);
            match decode(&bytes) {
                Err(LedgerError::BadMagic { found }) => assert_eq!(found, magic.to_vec()),
                other => panic!("Expected BadMagic, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_truncated_magic_is_bad_magic() {
        for bytes in [&b""[..], b"M", b"MPS"] {
            assert!(matches!(decode(bytes), Err(LedgerError::BadMagic { .. })));
        }
    }

    #[test]
    fn test_truncated_after_magic() {
        match decode(b"MPS7\x01\x00\x00") {
            Err(LedgerError::TruncatedStream {
                offset, available, ..
            }) => {
                assert_eq!(offset, 5);
                assert_eq!(available, 2);
            }
            other => panic!("Expected TruncatedStream, got {:?}", other),
        }
    }
}
