//! OSP binary input
//!
//! Reads back the records produced by [`crate::OspWriter`]: a big-endian
//! 16-bit length followed by that many payload bytes.

use crate::types::{DecoderError, Result};
use byteorder::{BigEndian, ByteOrder};
use std::io::{self, Read};

/// One OSP record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OspRecord {
    pub payload: Vec<u8>,
}

impl OspRecord {
    /// Message identifier (first payload byte)
    pub fn mid(&self) -> Option<u8> {
        self.payload.first().copied()
    }

    /// Size of the record on disk
    pub fn encoded_len(&self) -> usize {
        2 + self.payload.len()
    }
}

/// Iterator over the records of an OSP stream
pub struct OspReader<R: Read> {
    inner: R,
}

impl<R: Read> OspReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read the next record, `Ok(None)` at a clean end of stream
    pub fn read_record(&mut self) -> Result<Option<OspRecord>> {
        let mut len_bytes = [0u8; 2];
        let got = read_full(&mut self.inner, &mut len_bytes)?;
        match got {
            0 => return Ok(None),
            2 => {}
            _ => {
                return Err(DecoderError::TruncatedRecord {
                    expected: 2,
                    actual: got,
                })
            }
        }
        let len = usize::from(BigEndian::read_u16(&len_bytes));

        let mut payload = vec![0u8; len];
        let got = read_full(&mut self.inner, &mut payload)?;
        if got != len {
            return Err(DecoderError::TruncatedRecord {
                expected: len,
                actual: got,
            });
        }
        Ok(Some(OspRecord { payload }))
    }
}

impl<R: Read> Iterator for OspReader<R> {
    type Item = Result<OspRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}

/// Fill `buf` as far as the reader allows, returning the bytes read
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
