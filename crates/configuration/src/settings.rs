use crate::error::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration record for a report run.
///
/// Every section has defaults matching the layout the report has always used,
/// so an empty (or absent) config file is valid.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataPaths,
    pub output: OutputConfig,
    pub parsing: ParsingConfig,
    pub charts: ChartConfig,
    pub logging: LoggingConfig,
}

/// Locations of the two input tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    /// The trade log CSV.
    pub trades_path: PathBuf,
    /// The daily fear & greed index CSV.
    pub sentiment_path: PathBuf,
}

/// Where the report is written. All file names are relative to `dir`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub plots_dir: PathBuf,
    pub summary_file: String,
    pub pnl_stats_file: String,
    pub side_distribution_file: String,
}

/// Column names and formats of the input tables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    pub timestamp_column: String,
    /// A chrono format string; the default matches "01-03-2023 14:05".
    pub timestamp_format: String,
    pub pnl_column: String,
    pub size_column: String,
    pub side_column: String,
    /// Looked up by name; the first column is used when absent.
    pub sentiment_date_column: String,
    pub classification_column: String,
}

/// Pixel dimensions of the rendered charts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// The stacked side chart is wider to fit its legend.
    pub side_width: u32,
    pub side_height: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Optional log file, written in addition to stdout.
    pub file: Option<PathBuf>,
}

// --- Default Implementations ---

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            trades_path: PathBuf::from("data/historical_data.csv"),
            sentiment_path: PathBuf::from("data/fear_greed_index.csv"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("outputs"),
            plots_dir: PathBuf::from("plots"),
            summary_file: "sentiment_summary.csv".to_string(),
            pnl_stats_file: "pnl_by_sentiment_summary.csv".to_string(),
            side_distribution_file: "trade_side_distribution.csv".to_string(),
        }
    }
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            timestamp_column: "Timestamp IST".to_string(),
            timestamp_format: "%d-%m-%Y %H:%M".to_string(),
            pnl_column: "Closed PnL".to_string(),
            size_column: "Size USD".to_string(),
            side_column: "Side".to_string(),
            sentiment_date_column: "date".to_string(),
            classification_column: "classification".to_string(),
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            side_width: 1200,
            side_height: 700,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl OutputConfig {
    /// The absolute-or-relative directory the charts are rendered into.
    pub fn plots_path(&self) -> PathBuf {
        self.dir.join(&self.plots_dir)
    }
}

/// Command-line overrides for the most commonly changed paths.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct PathOverrides {
    /// Trade log CSV (overrides `data.trades_path`).
    #[cfg_attr(feature = "clap", arg(long))]
    pub trades: Option<PathBuf>,

    /// Fear & greed index CSV (overrides `data.sentiment_path`).
    #[cfg_attr(feature = "clap", arg(long))]
    pub sentiment: Option<PathBuf>,

    /// Output directory (overrides `output.dir`).
    #[cfg_attr(feature = "clap", arg(long))]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn apply_overrides(&mut self, overrides: &PathOverrides) {
        if let Some(path) = &overrides.trades {
            self.data.trades_path = path.clone();
        }
        if let Some(path) = &overrides.sentiment {
            self.data.sentiment_path = path.clone();
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.dir = dir.clone();
        }
    }

    /// Rejects settings that would only fail later, half-way through a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.parsing;
        let columns = [
            ("parsing.timestamp_column", &p.timestamp_column),
            ("parsing.pnl_column", &p.pnl_column),
            ("parsing.size_column", &p.size_column),
            ("parsing.side_column", &p.side_column),
            ("parsing.sentiment_date_column", &p.sentiment_date_column),
            ("parsing.classification_column", &p.classification_column),
        ];
        for (key, value) in columns {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
            }
        }

        if p.timestamp_format.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "parsing.timestamp_format must not be empty".to_string(),
            ));
        }

        let c = &self.charts;
        if c.width == 0 || c.height == 0 || c.side_width == 0 || c.side_height == 0 {
            return Err(ConfigError::ValidationError(
                "chart dimensions must be positive".to_string(),
            ));
        }

        let o = &self.output;
        for (key, value) in [
            ("output.summary_file", &o.summary_file),
            ("output.pnl_stats_file", &o.pnl_stats_file),
            ("output.side_distribution_file", &o.side_distribution_file),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!("{key} must not be empty")));
            }
        }

        Ok(())
    }
}
