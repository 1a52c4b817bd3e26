//! Extraction configuration
//!
//! The resolved settings the pipeline needs: the time window and the wanted
//! MID list. Option parsing, config files and defaults for paths live in the
//! application layer (gp2-cli).

use crate::time_tag::TimeInterval;
use crate::types::Result;
use crate::wanted::WantedMids;

/// Configuration for one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Lines with a time tag outside this window are skipped
    pub interval: TimeInterval,

    /// Frames whose MID is not in this list are skipped
    pub wanted: WantedMids,
}

impl ExtractConfig {
    /// Create a configuration for the given window, wanting the RINEX MIDs
    pub fn new(interval: TimeInterval) -> Self {
        Self {
            interval,
            wanted: WantedMids::rinex(),
        }
    }

    /// Default window and RINEX MIDs, as the GP2toOSP tool ships
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(TimeInterval::default_window()?))
    }

    /// Builder method: set the time window
    pub fn with_interval(mut self, interval: TimeInterval) -> Self {
        self.interval = interval;
        self
    }

    /// Builder method: set the wanted MID list
    pub fn with_wanted(mut self, wanted: WantedMids) -> Self {
        self.wanted = wanted;
        self
    }

    /// Builder method: parse and set the wanted MID list
    pub fn with_wanted_list(self, list: &str) -> Self {
        self.with_wanted(WantedMids::parse(list))
    }

    /// Check if a frame with this MID should be written
    pub fn should_extract_mid(&self, mid: u8) -> bool {
        self.wanted.contains(mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let interval =
            TimeInterval::from_date_time("01/01/2015", "00:00:00", "02/01/2015", "00:00:00")
                .unwrap();
        let config = ExtractConfig::with_defaults()
            .unwrap()
            .with_interval(interval)
            .with_wanted_list("41,51");

        assert_eq!(config.interval, interval);
        assert_eq!(config.wanted, WantedMids::List(vec![41, 51]));
        assert!(config.should_extract_mid(51));
        assert!(!config.should_extract_mid(2));
    }

    #[test]
    fn test_defaults() {
        let config = ExtractConfig::with_defaults().unwrap();
        assert_eq!(config.wanted, WantedMids::rinex());
        assert!(config.should_extract_mid(28));
        assert!(!config.should_extract_mid(51));
    }

    #[test]
    fn test_all_filter() {
        let config = ExtractConfig::with_defaults()
            .unwrap()
            .with_wanted(WantedMids::All);
        assert!((0..=255u8).all(|mid| config.should_extract_mid(mid)));
    }
}
