//! GP2toOSP command line application
//!
//! Generates an OSP binary file from a GP2 debug log containing SiRF IV
//! receiver messages. It uses the gp2-decoder library and adds:
//! - Option parsing with the GP2toOSP defaults
//! - TOML configuration file
//! - Logger setup
//! - Input/output file handling and exit codes
//! - JSON run summary

use clap::Parser;
use gp2_decoder::{ExtractConfig, Extractor, TimeInterval, WantedMids};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod exit;
mod logging;
mod report;

use config::Settings;
use exit::{CliError, CliResult};

/// GP2toOSP - Generate an OSP file from a GP2 debug log
#[derive(Parser, Debug)]
#[command(name = "gp2toosp")]
#[command(
    about = "Generates an OSP file from a GP2 data file containing SiRF IV receiver messages",
    long_about = None
)]
#[command(version)]
struct Args {
    /// GP2 input file [default: SLCLog.GP2]
    #[arg(short = 'i', long, value_name = "INFILE")]
    infile: Option<PathBuf>,

    /// OSP binary output file [default: DATA.OSP]
    #[arg(short = 'o', long, value_name = "OUTFILE")]
    outfile: Option<PathBuf>,

    /// From date (dd/mm/yyyy) [default: 01/01/2014]
    #[arg(short = 'd', long, value_name = "FROMDATE")]
    fromdate: Option<String>,

    /// To date (dd/mm/yyyy) [default: 31/12/2020]
    #[arg(short = 'D', long, value_name = "TODATE")]
    todate: Option<String>,

    /// From time (hh:mm:ss) [default: 00:00:00]
    #[arg(short = 't', long, value_name = "FROMTIME")]
    fromtime: Option<String>,

    /// To time (hh:mm:ss) [default: 23:59:59]
    #[arg(short = 'T', long, value_name = "TOTIME")]
    totime: Option<String>,

    /// Wanted message MIDs: a comma separated list, ALL, RINEX, or RINEX,list [default: RINEX]
    #[arg(short = 'w', long, value_name = "WMSG")]
    wmsg: Option<String>,

    /// Maximum level to log (SEVERE, WARNING, INFO, CONFIG, FINE, FINER, FINEST) [default: INFO]
    #[arg(short = 'l', long, value_name = "LOGLEVEL")]
    llevel: Option<String>,

    /// Path to configuration file (config.toml)
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write log messages to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    logfile: Option<PathBuf>,

    /// Write a JSON summary of the run to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Reject wanted MID lists with non-numeric or out of range entries
    #[arg(long)]
    strict_mids: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version also land here
            let code = if e.use_stderr() {
                exit::ARGUMENT_ERROR
            } else {
                exit::SUCCESS
            };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // run() leaves a logger installed on every path, so this is the only
    // place a fatal error is reported
    match run(&args) {
        Ok(()) => ExitCode::from(exit::SUCCESS),
        Err(err) => {
            log::error!("{}", err);
            ExitCode::from(err.code)
        }
    }
}

fn run(args: &Args) -> CliResult<()> {
    let settings = Settings::resolve(args).map_err(|e| {
        logging::init_fallback();
        CliError::argument(e)
    })?;
    if let Err(e) = logging::init_logging(settings.log_level, settings.log_file.as_deref()) {
        logging::init_fallback();
        return Err(CliError::argument(e));
    }

    log::info!("GP2toOSP v{} START", env!("CARGO_PKG_VERSION"));
    log::info!("Using decoder library v{}", gp2_decoder::VERSION);
    log::info!("{}", settings);

    let wanted = if settings.strict_mids {
        WantedMids::parse_strict(&settings.wanted)
            .map_err(|e| CliError::new(exit::ARGUMENT_ERROR, e.to_string()))?
    } else {
        WantedMids::parse(&settings.wanted)
    };
    log::info!("MID messages to OSP: {}", wanted);

    let interval = TimeInterval::from_date_time(
        &settings.from_date,
        &settings.from_time,
        &settings.to_date,
        &settings.to_time,
    )
    .map_err(|e| {
        CliError::new(
            exit::ARGUMENT_ERROR,
            format!("Incorrect From or To date or time option: {}", e),
        )
    })?;

    let input = File::open(&settings.input).map_err(|e| {
        CliError::new(
            exit::INPUT_ERROR,
            format!("Cannot open input file {:?}: {}", settings.input, e),
        )
    })?;
    let output = File::create(&settings.output).map_err(|e| {
        CliError::new(
            exit::OUTPUT_ERROR,
            format!("Cannot create output file {:?}: {}", settings.output, e),
        )
    })?;

    let wanted_label = wanted.to_string();
    let extractor = Extractor::new(ExtractConfig::new(interval).with_wanted(wanted));
    let stats = extractor
        .run(BufReader::new(input), BufWriter::new(output))
        .map_err(exit::extraction_error)?;

    log::info!(
        "End of data extraction. Messages extracted: {}",
        stats.written
    );
    log::debug!(
        "Lines read: {}, skipped: {}, bytes written: {}",
        stats.lines_read,
        stats.rejected.total(),
        stats.bytes_written
    );

    if let Some(path) = &settings.summary {
        let summary = report::RunSummary::new(&settings, wanted_label, &stats);
        report::write_summary(path, &summary)
            .map_err(|e| CliError::new(exit::OUTPUT_ERROR, format!("{:#}", e)))?;
    }

    Ok(())
}
