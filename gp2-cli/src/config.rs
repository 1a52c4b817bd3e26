//! Configuration loading and option resolution
//!
//! Every option can come from the command line, from a TOML config file
//! (`--config`) or from the built-in default, in that order of precedence.

use crate::logging::LogLevel;
use crate::Args;
use anyhow::{Context, Result};
use gp2_decoder::time_tag::{DEFAULT_FROM_DATE, DEFAULT_FROM_TIME, DEFAULT_TO_DATE, DEFAULT_TO_TIME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INFILE: &str = "SLCLog.GP2";
pub const DEFAULT_OUTFILE: &str = "DATA.OSP";
pub const DEFAULT_WANTED: &str = "RINEX";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Application configuration file (config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub interval: IntervalConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub file: Option<PathBuf>,
    /// JSON run summary
    pub summary: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IntervalConfig {
    pub from_date: Option<String>,
    pub from_time: Option<String>,
    pub to_date: Option<String>,
    pub to_time: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Wanted MIDs: `ALL`, `RINEX`, `RINEX,<list>` or `<list>`
    pub wanted: Option<String>,
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<PathBuf>,
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}

/// Fully resolved options for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub from_date: String,
    pub from_time: String,
    pub to_date: String,
    pub to_time: String,
    pub wanted: String,
    pub strict_mids: bool,
    pub log_level: LogLevel,
    pub log_file: Option<PathBuf>,
    pub summary: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INFILE),
            output: PathBuf::from(DEFAULT_OUTFILE),
            from_date: DEFAULT_FROM_DATE.to_string(),
            from_time: DEFAULT_FROM_TIME.to_string(),
            to_date: DEFAULT_TO_DATE.to_string(),
            to_time: DEFAULT_TO_TIME.to_string(),
            wanted: DEFAULT_WANTED.to_string(),
            strict_mids: false,
            log_level: LogLevel::default(),
            log_file: None,
            summary: None,
        }
    }
}

impl Settings {
    /// Merge command line, config file and defaults
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => load_config(path)?,
            None => AppConfig::default(),
        };
        Self::merge(args, file)
    }

    fn merge(args: &Args, file: AppConfig) -> Result<Self> {
        fn pick<T>(cli: &Option<T>, file: Option<T>, default: &str) -> T
        where
            T: Clone + From<String>,
        {
            cli.clone()
                .or(file)
                .unwrap_or_else(|| T::from(default.to_string()))
        }

        let level = pick(&args.llevel, file.logging.level, DEFAULT_LOG_LEVEL);
        let log_level = level
            .parse::<LogLevel>()
            .with_context(|| format!("Invalid --llevel value {:?}", level))?;

        Ok(Self {
            input: pick(&args.infile, file.input.file, DEFAULT_INFILE),
            output: pick(&args.outfile, file.output.file, DEFAULT_OUTFILE),
            from_date: pick(&args.fromdate, file.interval.from_date, DEFAULT_FROM_DATE),
            from_time: pick(&args.fromtime, file.interval.from_time, DEFAULT_FROM_TIME),
            to_date: pick(&args.todate, file.interval.to_date, DEFAULT_TO_DATE),
            to_time: pick(&args.totime, file.interval.to_time, DEFAULT_TO_TIME),
            wanted: pick(&args.wmsg, file.filter.wanted, DEFAULT_WANTED),
            strict_mids: args.strict_mids || file.filter.strict,
            log_level,
            log_file: args.logfile.clone().or(file.logging.file),
            summary: args.summary.clone().or(file.output.summary),
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "INFILE={} OUTFILE={} FROMDATE={} FROMTIME={} TODATE={} TOTIME={} WMSG={} LOGLEVEL={}",
            self.input.display(),
            self.output.display(),
            self.from_date,
            self.from_time,
            self.to_date,
            self.to_time,
            self.wanted,
            self.log_level.0,
        )?;
        if self.strict_mids {
            write!(f, " STRICT")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use log::LevelFilter;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "trace.gp2"

            [interval]
            from_date = "01/01/2015"
            to_date = "31/12/2015"

            [filter]
            wanted = "RINEX,41"
            strict = true

            [logging]
            level = "FINE"
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, Some(PathBuf::from("trace.gp2")));
        assert_eq!(config.interval.from_date.as_deref(), Some("01/01/2015"));
        assert!(config.interval.from_time.is_none());
        assert!(config.filter.strict);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let toml_content = r#"
            [filter]
            wanted_mids = "ALL"
        "#;
        assert!(toml::from_str::<AppConfig>(toml_content).is_err());
    }

    #[test]
    fn test_defaults_without_options() {
        let args = Args::parse_from(["gp2toosp"]);
        let settings = Settings::merge(&args, AppConfig::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_command_line_overrides_file() {
        let file: AppConfig = toml::from_str(
            r#"
            [input]
            file = "from_file.gp2"
            [output]
            file = "from_file.osp"
            [filter]
            wanted = "ALL"
            [logging]
            level = "FINEST"
        "#,
        )
        .unwrap();
        let args = Args::parse_from(["gp2toosp", "-i", "cli.gp2", "-w", "2,6", "-T", "12:00:00"]);
        let settings = Settings::merge(&args, file).unwrap();

        assert_eq!(settings.input, PathBuf::from("cli.gp2"));
        assert_eq!(settings.output, PathBuf::from("from_file.osp"));
        assert_eq!(settings.wanted, "2,6");
        assert_eq!(settings.to_time, "12:00:00");
        assert_eq!(settings.to_date, DEFAULT_TO_DATE);
        assert_eq!(settings.log_level.0, LevelFilter::Trace);
    }

    #[test]
    fn test_bad_level_is_error() {
        let args = Args::parse_from(["gp2toosp", "-l", "LOUD"]);
        assert!(Settings::merge(&args, AppConfig::default()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config(Path::new("/nonexistent/gp2toosp.toml")).is_err());
    }

    #[test]
    fn test_settings_display() {
        let text = Settings::default().to_string();
        assert!(text.starts_with("INFILE=SLCLog.GP2 OUTFILE=DATA.OSP"));
        assert!(text.contains("WMSG=RINEX"));
    }
}
