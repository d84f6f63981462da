//! # Report Pipeline
//!
//! Runs the report end to end: load both tables, join them on the calendar
//! date, aggregate per classification, then write the tables and charts.
//! The run is linear and single-threaded; the first failure ends it and is
//! returned as a `PipelineError` whose `kind()` the caller maps to an exit
//! behavior.

use analytics::{AnalyticsEngine, SentimentAnalysis};
use configuration::settings::Config;
use preprocessor::Preprocessor;
use reporter::{ReportArtifacts, Reporter};
use uuid::Uuid;

pub mod error;

pub use error::{ErrorKind, PipelineError};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub run_id: Uuid,
    pub trades_total: usize,
    pub trades_unmatched: usize,
    pub merged_records: usize,
    pub analysis: SentimentAnalysis,
    pub artifacts: ReportArtifacts,
}

/// The orchestrator for one report run.
pub struct ReportPipeline {
    config: Config,
    analytics_engine: AnalyticsEngine,
}

impl ReportPipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            analytics_engine: AnalyticsEngine::new(),
        }
    }

    pub fn run(&self) -> Result<RunOutcome, PipelineError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("report_run", %run_id);
        let _entered = span.enter();

        // 1. Load
        let (trades, sentiment) = loader::load_inputs(&self.config.data)?;

        // 2. Join
        let merged = Preprocessor::new(self.config.parsing.clone())
            .run(&trades, &sentiment)
            .inspect_err(|e| {
                tracing::error!(error = %e, "Preprocessing failed, skipping the report");
            })?;
        if merged.is_empty() {
            tracing::warn!(
                trades = merged.trades_total,
                "No trades matched a sentiment date, no report will be written"
            );
            return Err(PipelineError::EmptyResult {
                trades_total: merged.trades_total,
            });
        }

        // 3. Aggregate
        let analysis = self.analytics_engine.analyze(&merged).inspect_err(|e| {
            tracing::error!(error = %e, "Aggregation failed, skipping the report");
        })?;

        // 4. Report
        let reporter = Reporter::new(self.config.output.clone(), self.config.charts.clone());
        let artifacts = reporter.write_all(&analysis).inspect_err(|e| {
            tracing::error!(error = %e, "Writing the report failed");
        })?;

        tracing::info!(
            classifications = analysis.pnl_stats.len(),
            output = %self.config.output.dir.display(),
            "Report complete"
        );

        Ok(RunOutcome {
            run_id,
            trades_total: merged.trades_total,
            trades_unmatched: merged.trades_unmatched,
            merged_records: merged.len(),
            analysis,
            artifacts,
        })
    }
}

/// Runs one report with the given configuration.
pub fn run(config: &Config) -> Result<RunOutcome, PipelineError> {
    ReportPipeline::new(config.clone()).run()
}
