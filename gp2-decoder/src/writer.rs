//! OSP binary output
//!
//! Each accepted frame becomes one record: the two length bytes followed by
//! the payload. Head, checksum and tail are dropped and records are written
//! back to back with no separator.

use crate::frame::Frame;
use byteorder::{BigEndian, WriteBytesExt};
use std::io::{self, Write};

/// Writes OSP records to a byte sink
pub struct OspWriter<W: Write> {
    inner: W,
    records: usize,
    bytes: u64,
}

impl<W: Write> OspWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            records: 0,
            bytes: 0,
        }
    }

    /// Write one frame as an OSP record (`length + 2` bytes)
    ///
    /// The record is flushed through to the sink before it is counted, so a
    /// buffered sink cannot hide a short write. A sink that accepts fewer
    /// bytes than requested is reported as an error; the record is not
    /// counted.
    pub fn write_frame(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        self.write_record(frame.payload())
    }

    /// Write a raw payload with its big-endian length prefix
    pub fn write_record(&mut self, payload: &[u8]) -> io::Result<()> {
        let len = u16::try_from(payload.len()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("payload of {} bytes does not fit an OSP record", payload.len()),
            )
        })?;
        self.inner.write_u16::<BigEndian>(len)?;
        self.inner.write_all(payload)?;
        // a record only counts once it has left any buffer in `inner`
        self.inner.flush()?;
        self.records += 1;
        self.bytes += 2 + payload.len() as u64;
        Ok(())
    }

    /// Records written so far
    pub fn records(&self) -> usize {
        self.records
    }

    /// Bytes written so far
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
