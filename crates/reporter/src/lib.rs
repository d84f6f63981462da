//! # Report Writer
//!
//! Writes a `SentimentAnalysis` to the output directory: three CSV tables and
//! three SVG bar charts. Every side effect of a run is confined to the
//! configured output directory, which is created when absent. Existing files
//! with the same names are overwritten.

use analytics::SentimentAnalysis;
use configuration::{ChartConfig, OutputConfig};
use std::fs;
use std::path::{Path, PathBuf};

pub mod charts;
pub mod error;
pub mod tables;

pub use error::ReportError;

pub const PROFIT_RATE_CHART: &str = "profit_rate_by_sentiment.svg";
pub const AVERAGE_SIZE_CHART: &str = "average_trade_size_by_sentiment.svg";
pub const SIDE_DISTRIBUTION_CHART: &str = "trade_side_distribution.svg";

/// Paths of everything a report run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArtifacts {
    pub summary_csv: PathBuf,
    pub pnl_stats_csv: PathBuf,
    pub side_distribution_csv: PathBuf,
    pub profit_rate_chart: PathBuf,
    pub average_size_chart: PathBuf,
    pub side_distribution_chart: PathBuf,
}

impl ReportArtifacts {
    pub fn paths(&self) -> [&Path; 6] {
        [
            self.summary_csv.as_path(),
            self.pnl_stats_csv.as_path(),
            self.side_distribution_csv.as_path(),
            self.profit_rate_chart.as_path(),
            self.average_size_chart.as_path(),
            self.side_distribution_chart.as_path(),
        ]
    }
}

pub struct Reporter {
    output: OutputConfig,
    charts: ChartConfig,
}

impl Reporter {
    pub fn new(output: OutputConfig, charts: ChartConfig) -> Self {
        Self { output, charts }
    }

    /// Where each artifact will be written.
    pub fn artifacts(&self) -> ReportArtifacts {
        let dir = &self.output.dir;
        let plots = self.output.plots_path();
        ReportArtifacts {
            summary_csv: dir.join(&self.output.summary_file),
            pnl_stats_csv: dir.join(&self.output.pnl_stats_file),
            side_distribution_csv: dir.join(&self.output.side_distribution_file),
            profit_rate_chart: plots.join(PROFIT_RATE_CHART),
            average_size_chart: plots.join(AVERAGE_SIZE_CHART),
            side_distribution_chart: plots.join(SIDE_DISTRIBUTION_CHART),
        }
    }

    /// Writes all tables and charts.
    pub fn write_all(&self, analysis: &SentimentAnalysis) -> Result<ReportArtifacts, ReportError> {
        create_dir(&self.output.dir)?;
        create_dir(&self.output.plots_path())?;
        let artifacts = self.artifacts();

        tables::write_summary(&artifacts.summary_csv, analysis)?;
        tables::write_pnl_stats(&artifacts.pnl_stats_csv, analysis)?;
        tables::write_side_distribution(&artifacts.side_distribution_csv, analysis)?;
        tracing::info!(path = %artifacts.summary_csv.display(), "Wrote summary tables");

        let bar_size = (self.charts.width, self.charts.height);
        charts::profit_rate_chart(bar_size)
            .render(&artifacts.profit_rate_chart, &analysis.profit_rate_pct)?;
        charts::average_size_chart(bar_size)
            .render(&artifacts.average_size_chart, &analysis.average_size)?;
        charts::render_side_distribution(
            &artifacts.side_distribution_chart,
            (self.charts.side_width, self.charts.side_height),
            analysis,
        )?;
        tracing::info!(dir = %self.output.plots_path().display(), "Rendered charts");

        Ok(artifacts)
    }
}

fn create_dir(path: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(path).map_err(|source| ReportError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::AnalyticsEngine;
    use chrono::NaiveDate;
    use core_types::{Classification, Derived, DerivedFields, MergedRecord, MergedTable, Side, TradeRecord};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn analysis() -> SentimentAnalysis {
        let timestamp = NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let record = |classification, side, pnl: Decimal| MergedRecord {
            trade: TradeRecord {
                timestamp_raw: "01-03-2023 09:00".to_string(),
                timestamp,
                trade_date: timestamp.date(),
                side,
                closed_pnl: Some(pnl),
                size_usd: Some(dec!(100)),
            },
            classification,
            derived: Some(Derived::compute(pnl, dec!(100))),
        };
        let table = MergedTable {
            records: vec![
                record(Classification::Greed, Side::Buy, dec!(50)),
                record(Classification::Greed, Side::Sell, dec!(-25)),
                record(Classification::Fear, Side::Sell, dec!(10)),
            ],
            fields: DerivedFields::Computed,
            trades_total: 3,
            trades_unmatched: 0,
        };
        AnalyticsEngine::new().analyze(&table).unwrap()
    }

    fn reporter(dir: &Path) -> Reporter {
        let output = OutputConfig {
            dir: dir.join("outputs"),
            ..OutputConfig::default()
        };
        Reporter::new(output, ChartConfig::default())
    }

    #[test]
    fn writes_every_artifact_into_a_fresh_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = reporter(tmp.path()).write_all(&analysis()).unwrap();

        for path in artifacts.paths() {
            assert!(path.exists(), "{} was not written", path.display());
            assert!(path.starts_with(tmp.path().join("outputs")));
        }

        let svg = fs::read_to_string(&artifacts.side_distribution_chart).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn summary_csv_has_one_row_per_classification() {
        let tmp = tempfile::tempdir().unwrap();
        let artifacts = reporter(tmp.path()).write_all(&analysis()).unwrap();

        let summary = fs::read_to_string(&artifacts.summary_csv).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines,
            vec![
                "classification,trade_count,average_pnl,profit_rate_pct,average_size_usd",
                "Fear,1,10,100,100",
                "Greed,2,12.5,50,100",
            ]
        );

        let sides = fs::read_to_string(&artifacts.side_distribution_csv).unwrap();
        assert_eq!(sides.lines().collect::<Vec<_>>(), vec!["classification,Buy,Sell", "Fear,0,1", "Greed,1,1"]);
    }

    #[test]
    fn existing_files_are_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        let reporter = reporter(tmp.path());
        let artifacts = reporter.artifacts();
        fs::create_dir_all(artifacts.summary_csv.parent().unwrap()).unwrap();
        fs::write(&artifacts.summary_csv, "stale").unwrap();

        reporter.write_all(&analysis()).unwrap();
        let summary = fs::read_to_string(&artifacts.summary_csv).unwrap();
        assert!(summary.starts_with("classification,"));
    }
}
