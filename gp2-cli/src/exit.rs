//! Process exit codes and the CLI error type

use gp2_decoder::DecoderError;
use std::fmt;

pub const SUCCESS: u8 = 0;
/// Bad option, config file or time window
pub const ARGUMENT_ERROR: u8 = 1;
/// Input file cannot be opened or read
pub const INPUT_ERROR: u8 = 2;
/// Output file cannot be created
pub const OUTPUT_ERROR: u8 = 3;
/// Output failed while writing records
pub const WRITE_ERROR: u8 = 4;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
}

impl CliError {
    pub fn new(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Argument error carrying the full context chain of `err`
    pub fn argument(err: anyhow::Error) -> Self {
        Self::new(ARGUMENT_ERROR, format!("{:#}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Map a failed extraction run to its exit code
pub fn extraction_error(err: DecoderError) -> CliError {
    let code = match err {
        DecoderError::WriteFailed { .. } => WRITE_ERROR,
        DecoderError::ReadFailed { .. } => INPUT_ERROR,
        _ => ARGUMENT_ERROR,
    };
    CliError::new(code, err.to_string())
}
