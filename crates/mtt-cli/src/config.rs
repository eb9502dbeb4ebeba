//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use mtt_core::{DEFAULT_LANGUAGE, DurationFormat, ReportSettings, TimestampZone};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Language id of the fenced blocks that hold trackers.
    pub block_language: String,
    /// Render durations as fractional minutes or as units.
    pub duration_format: DurationFormat,
    /// Split unit durations into years, months, and days.
    pub fine_grained_durations: bool,
    /// Moment-style timestamp pattern.
    pub timestamp_format: String,
    /// Render timestamps in local time or UTC.
    pub timestamp_zone: TimestampZone,
    /// Field separator for CSV export.
    pub csv_delimiter: String,
}

impl Default for Config {
    fn default() -> Self {
        let report = ReportSettings::default();
        Self {
            block_language: DEFAULT_LANGUAGE.to_string(),
            duration_format: report.duration_format,
            fine_grained_durations: report.fine_grained_durations,
            timestamp_format: report.timestamp_format,
            timestamp_zone: report.timestamp_zone,
            csv_delimiter: report.csv_delimiter,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (MTT_*)
        figment = figment.merge(Env::prefixed("MTT_"));

        figment.extract()
    }

    /// Formatter settings derived from this configuration.
    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            duration_format: self.duration_format,
            fine_grained_durations: self.fine_grained_durations,
            timestamp_format: self.timestamp_format.clone(),
            timestamp_zone: self.timestamp_zone,
            csv_delimiter: self.csv_delimiter.clone(),
        }
    }
}

/// Returns the platform-specific config directory for mtt.
///
/// On Linux: `~/.config/mtt`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mtt"))
}
