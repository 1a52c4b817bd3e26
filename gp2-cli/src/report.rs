//! JSON run summary

use crate::config::Settings;
use anyhow::{Context, Result};
use gp2_decoder::ExtractStats;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// What was run and what came out of it
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub version: &'static str,
    pub input: &'a Path,
    pub output: &'a Path,
    pub from: String,
    pub to: String,
    pub wanted: String,
    pub stats: &'a ExtractStats,
}

impl<'a> RunSummary<'a> {
    pub fn new(settings: &'a Settings, wanted: String, stats: &'a ExtractStats) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            input: &settings.input,
            output: &settings.output,
            from: format!("{} {}", settings.from_date, settings.from_time),
            to: format!("{} {}", settings.to_date, settings.to_time),
            wanted,
            stats,
        }
    }
}

/// Write the summary as pretty-printed JSON
pub fn write_summary(path: &Path, summary: &RunSummary<'_>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Cannot create summary file: {:?}", path))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .with_context(|| format!("Cannot write summary file: {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_summary_json() {
        let settings = Settings::default();
        let mut stats = ExtractStats::default();
        stats.written = 4;
        stats.written_per_mid.insert(28, 4);

        let summary = RunSummary::new(&settings, "RINEX".to_string(), &stats);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary(&path, &summary).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["input"], "SLCLog.GP2");
        assert_eq!(json["from"], "01/01/2014 00:00:00");
        assert_eq!(json["stats"]["written"], 4);
        assert_eq!(json["stats"]["written_per_mid"]["28"], 4);
    }
}
