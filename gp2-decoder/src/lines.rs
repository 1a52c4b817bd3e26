//! Line reader for GP2 debug logs
//!
//! GP2 files are mostly ASCII but may carry stray non-UTF-8 bytes in the
//! free text of a line; those are replaced rather than failing the run.

use crate::types::{DecoderError, Result};
use std::borrow::Cow;
use std::io::BufRead;

/// Streams lines from a GP2 source into a reusable buffer
pub struct LineReader<R: BufRead> {
    inner: R,
    buf: Vec<u8>,
    line_number: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(256),
            line_number: 0,
        }
    }

    /// Read the next line without its terminator, `Ok(None)` at end of input
    pub fn next_line(&mut self) -> Result<Option<Cow<'_, str>>> {
        self.buf.clear();
        let read = self
            .inner
            .read_until(b'\n', &mut self.buf)
            .map_err(|source| DecoderError::ReadFailed {
                line: self.line_number + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        while matches!(self.buf.last(), Some(b'\n') | Some(b'\r')) {
            self.buf.pop();
        }
        Ok(Some(String::from_utf8_lossy(&self.buf)))
    }

    /// Number of lines read so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_without_terminators() {
        let mut reader = LineReader::new(Cursor::new("first\r\nsecond\nlast"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("first"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("second"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some("last"));
        assert!(reader.next_line().unwrap().is_none());
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn test_invalid_utf8_replaced() {
        let mut reader = LineReader::new(Cursor::new(b"A0 \xFF A2\n".to_vec()));
        let line = reader.next_line().unwrap().unwrap();
        assert!(line.starts_with("A0 "));
        assert!(line.ends_with(" A2"));
    }

    #[test]
    fn test_empty_line() {
        let mut reader = LineReader::new(Cursor::new("\n"));
        assert_eq!(reader.next_line().unwrap().as_deref(), Some(""));
    }
}
