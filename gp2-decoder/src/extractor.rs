//! GP2 to OSP extraction pipeline
//!
//! Lines are processed one at a time, in order:
//! 1. time tag inside the configured window
//! 2. head/tail markers found and hex bytes decoded
//! 3. length field and checksum consistent
//! 4. MID wanted
//! 5. record written
//!
//! A line failing any step is skipped with a logged [`Rejection`]. Only an
//! input read error or an output write error stops the run.

use crate::config::ExtractConfig;
use crate::frame::{Frame, FrameBuffer};
use crate::lines::LineReader;
use crate::time_tag::time_tag;
use crate::types::{DecoderError, Rejection, RejectionCounts, Result};
use crate::writer::OspWriter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};

/// Statistics of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    /// Lines read from the input
    pub lines_read: usize,
    /// OSP records written
    pub written: usize,
    /// Bytes written (sum of `2 + length` over written records)
    pub bytes_written: u64,
    /// Skipped lines per reason
    pub rejected: RejectionCounts,
    /// Written records per MID
    pub written_per_mid: BTreeMap<u8, usize>,
}

/// Runs the GP2 to OSP pipeline with a fixed configuration
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    /// Extract every wanted OSP message from `input` into `output`
    ///
    /// # Returns
    /// * `Ok(ExtractStats)` - input exhausted, all accepted records written
    /// * `Err(DecoderError::WriteFailed { written, .. })` - output failed
    ///   after `written` complete records
    /// * `Err(DecoderError::ReadFailed { .. })` - input could not be read
    ///
    /// # Example
    /// ```
    /// use gp2_decoder::{ExtractConfig, Extractor, WantedMids};
    /// use std::io::Cursor;
    ///
    /// let config = ExtractConfig::with_defaults().unwrap().with_wanted(WantedMids::All);
    /// let input = "29/10/2014 20:31:08.942 (0) A0 A2 00 01 02 00 02 B0 B3\n";
    /// let mut output = Vec::new();
    ///
    /// let stats = Extractor::new(config).run(Cursor::new(input), &mut output).unwrap();
    /// assert_eq!(stats.written, 1);
    /// assert_eq!(output, vec![0x00, 0x01, 0x02]);
    /// ```
    pub fn run<R: BufRead, W: Write>(&self, input: R, output: W) -> Result<ExtractStats> {
        let mut lines = LineReader::new(input);
        let mut frame_buf = FrameBuffer::new();
        let mut writer = OspWriter::new(output);
        let mut stats = ExtractStats::default();

        while let Some(line) = lines.next_line()? {
            stats.lines_read += 1;
            let tag = time_tag(&line);

            match self.process_line(&line, &mut frame_buf) {
                Ok(frame) => {
                    if let Err(source) = writer.write_frame(&frame) {
                        return Err(DecoderError::WriteFailed {
                            written: writer.records(),
                            source,
                        });
                    }
                    *stats.written_per_mid.entry(frame.mid()).or_insert(0) += 1;
                    log::debug!("{} written MID {}", tag, frame.mid());
                }
                Err(rejection) => {
                    log::log!(rejection.level(), "{} {}", tag, rejection);
                    stats.rejected.record(&rejection);
                }
            }
        }

        writer
            .flush()
            .map_err(|source| DecoderError::WriteFailed {
                written: writer.records(),
                source,
            })?;
        stats.written = writer.records();
        stats.bytes_written = writer.bytes();
        Ok(stats)
    }

    /// Run one line through every filter, returning the frame to write
    pub fn process_line<'b>(
        &self,
        line: &str,
        frame_buf: &'b mut FrameBuffer,
    ) -> std::result::Result<Frame<'b>, Rejection> {
        self.config.interval.check(line)?;

        let body = &line[time_tag(line).len()..];
        frame_buf.extract(body)?;
        let frame_buf: &'b FrameBuffer = frame_buf;
        let frame = frame_buf.validate()?;

        if !self.config.should_extract_mid(frame.mid()) {
            return Err(Rejection::UnwantedMid(frame.mid()));
        }
        Ok(frame)
    }
}
