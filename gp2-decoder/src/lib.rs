//! GP2 Decoder Library
//!
//! Converts GP2 debug logs, as written by Android devices with a SiRF IV GPS
//! receiver, into OSP binary files.
//!
//! # Architecture
//!
//! One GP2 line holds one OSP message as hexadecimal text behind a time tag.
//! The [`Extractor`] reads the log line by line and for each line:
//! - checks the time tag against a [`TimeInterval`]
//! - decodes the bytes between the `A0 A2` head and `B0 B3` tail
//! - validates the length field and the 15-bit checksum
//! - keeps the message only if its MID is in the [`WantedMids`] list
//! - writes it as an OSP record (length + payload)
//!
//! Malformed or unwanted lines are logged and skipped. The library does NOT
//! interpret OSP payloads or produce RINEX files.
//!
//! # Example Usage
//!
//! ```no_run
//! use gp2_decoder::{ExtractConfig, Extractor, TimeInterval, WantedMids};
//! use std::fs::File;
//! use std::io::{BufReader, BufWriter};
//!
//! let interval = TimeInterval::from_date_time(
//!     "01/01/2014", "00:00:00", "31/12/2020", "23:59:59",
//! ).unwrap();
//! let config = ExtractConfig::new(interval).with_wanted(WantedMids::parse("RINEX,41"));
//!
//! let input = BufReader::new(File::open("SLCLog.GP2").unwrap());
//! let output = BufWriter::new(File::create("DATA.OSP").unwrap());
//!
//! let stats = Extractor::new(config).run(input, output).unwrap();
//! println!("Messages extracted: {}", stats.written);
//! ```

// Public modules
pub mod config;
pub mod extractor;
pub mod frame;
pub mod reader;
pub mod time_tag;
pub mod types;
pub mod wanted;
pub mod writer;

// Re-export main types for convenience
pub use config::ExtractConfig;
pub use extractor::{ExtractStats, Extractor};
pub use frame::{checksum, Frame, FrameBuffer};
pub use reader::{OspReader, OspRecord};
pub use time_tag::{parse_date_time, TimeInterval};
pub use types::{DecoderError, Rejection, RejectionCounts, Result, Timestamp};
pub use wanted::{WantedMids, RINEX_MIDS};
pub use writer::OspWriter;

// Internal modules (not exposed in public API)
mod lines;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
