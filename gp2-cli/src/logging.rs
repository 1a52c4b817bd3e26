//! Logger setup
//!
//! `--llevel` takes the GP2toOSP severity names (SEVERE, WARNING, INFO,
//! CONFIG, FINE, FINER, FINEST) as well as the `log` crate names.

use anyhow::{bail, Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

/// Maximum level to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLevel(pub LevelFilter);

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel(LevelFilter::Info)
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let filter = match s.trim().to_ascii_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "SEVERE" | "ERROR" => LevelFilter::Error,
            "WARNING" | "WARN" => LevelFilter::Warn,
            "INFO" | "CONFIG" => LevelFilter::Info,
            "FINE" | "FINER" | "DEBUG" => LevelFilter::Debug,
            "FINEST" | "TRACE" | "ALL" => LevelFilter::Trace,
            other => bail!(
                "Unknown log level {:?} (expected SEVERE, WARNING, INFO, CONFIG, FINE, FINER or FINEST)",
                other
            ),
        };
        Ok(LogLevel(filter))
    }
}

/// Initialize logging to stderr, or to `log_file` when given
pub fn init_logging(level: LogLevel, log_file: Option<&Path>) -> Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(level.0).format(|buf, record| {
        writeln!(
            buf,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Cannot create log file: {:?}", path))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("Logger already initialized")?;
    Ok(())
}

/// Log to stderr at the default level when the configured logger cannot be
/// set up, so the error that prevented it still gets reported
pub fn init_fallback() {
    if let Err(e) = init_logging(LogLevel::default(), None) {
        eprintln!("gp2toosp: {:#}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gp2toosp_level_names() {
        assert_eq!("SEVERE".parse::<LogLevel>().unwrap().0, LevelFilter::Error);
        assert_eq!("WARNING".parse::<LogLevel>().unwrap().0, LevelFilter::Warn);
        assert_eq!("CONFIG".parse::<LogLevel>().unwrap().0, LevelFilter::Info);
        assert_eq!("FINER".parse::<LogLevel>().unwrap().0, LevelFilter::Debug);
        assert_eq!("FINEST".parse::<LogLevel>().unwrap().0, LevelFilter::Trace);
    }

    #[test]
    fn test_log_crate_names() {
        assert_eq!("debug".parse::<LogLevel>().unwrap().0, LevelFilter::Debug);
        assert_eq!(" Warn ".parse::<LogLevel>().unwrap().0, LevelFilter::Warn);
    }

    #[test]
    fn test_unknown_level() {
        assert!("LOUD".parse::<LogLevel>().is_err());
    }
}
