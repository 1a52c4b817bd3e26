//! Core types for the GP2 decoder library
//!
//! This module defines the error type returned by fallible library calls and
//! the per-line [`Rejection`] reasons. Rejections are not errors: a rejected
//! line is logged, counted and skipped, and processing continues.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::io;

/// Timestamp type used throughout the decoder
pub type Timestamp = DateTime<Local>;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Errors that abort a run or a configuration step
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Invalid date/time boundary: {0:?}")]
    InvalidBoundary(String),

    #[error("Time interval start {start} is after end {end}")]
    ReversedInterval { start: Timestamp, end: Timestamp },

    #[error("Wanted MID list is full ({capacity} entries), cannot add MID {mid}")]
    WantedListFull { capacity: usize, mid: u8 },

    #[error("Invalid MID in wanted list: {0:?}")]
    InvalidMid(String),

    #[error("Cannot read input line {line}: {source}")]
    ReadFailed {
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Cannot write to binary output file after {written} messages: {source}")]
    WriteFailed {
        /// Records completely written before the failure
        written: usize,
        #[source]
        source: io::Error,
    },

    #[error("Truncated OSP record: expected {expected} payload bytes, got {actual}")]
    TruncatedRecord { expected: usize, actual: usize },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Reason a single input line was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("Invalid time tag")]
    InvalidTimeTag,

    #[error("Time tag outside interval")]
    OutsideInterval,

    #[error("No message header or tail")]
    MissingMarkers,

    #[error("No message data ({bytes} bytes)")]
    NoMessageData { bytes: usize },

    #[error("PayloadLen={declared}<>{actual}=BytesRead")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("Wrong checksum (computed {computed:#06X}, message {declared:#06X})")]
    WrongChecksum { computed: u16, declared: u16 },

    #[error("skipped MID {0}")]
    UnwantedMid(u8),
}

impl Rejection {
    /// Log level used when tracing this rejection
    pub fn level(&self) -> log::Level {
        match self {
            Rejection::InvalidTimeTag | Rejection::OutsideInterval | Rejection::UnwantedMid(_) => {
                log::Level::Trace
            }
            Rejection::MissingMarkers
            | Rejection::NoMessageData { .. }
            | Rejection::LengthMismatch { .. }
            | Rejection::WrongChecksum { .. } => log::Level::Warn,
        }
    }
}

/// Per-reason rejection counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub invalid_time_tag: usize,
    pub outside_interval: usize,
    pub missing_markers: usize,
    pub no_message_data: usize,
    pub length_mismatch: usize,
    pub wrong_checksum: usize,
    pub unwanted_mid: usize,
}

impl RejectionCounts {
    /// Count one rejection
    pub fn record(&mut self, rejection: &Rejection) {
        let counter = match rejection {
            Rejection::InvalidTimeTag => &mut self.invalid_time_tag,
            Rejection::OutsideInterval => &mut self.outside_interval,
            Rejection::MissingMarkers => &mut self.missing_markers,
            Rejection::NoMessageData { .. } => &mut self.no_message_data,
            Rejection::LengthMismatch { .. } => &mut self.length_mismatch,
            Rejection::WrongChecksum { .. } => &mut self.wrong_checksum,
            Rejection::UnwantedMid(_) => &mut self.unwanted_mid,
        };
        *counter += 1;
    }

    /// Total number of rejected lines
    pub fn total(&self) -> usize {
        self.invalid_time_tag
            + self.outside_interval
            + self.missing_markers
            + self.no_message_data
            + self.length_mismatch
            + self.wrong_checksum
            + self.unwanted_mid
    }
}
