use core_types::{Classification, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Count, mean, spread and quartiles of one sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: Decimal,
    /// Sample standard deviation (n - 1). `None` for a single observation.
    pub std: Option<Decimal>,
    pub min: Decimal,
    pub q25: Decimal,
    pub median: Decimal,
    pub q75: Decimal,
    pub max: Decimal,
}

/// Trade counts per classification and side.
///
/// `sides` holds every side seen anywhere in the data; combinations that never
/// occurred are zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideDistribution {
    pub sides: Vec<Side>,
    pub counts: BTreeMap<Classification, BTreeMap<Side, usize>>,
}

impl SideDistribution {
    pub fn count(&self, classification: Classification, side: Side) -> usize {
        self.counts
            .get(&classification)
            .and_then(|row| row.get(&side))
            .copied()
            .unwrap_or(0)
    }

    /// One row of the matrix, ordered like `sides`.
    pub fn row(&self, classification: Classification) -> Vec<usize> {
        self.sides
            .iter()
            .map(|&side| self.count(classification, side))
            .collect()
    }

    pub fn row_total(&self, classification: Classification) -> usize {
        self.row(classification).iter().sum()
    }
}

/// The consolidated per-classification line of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub classification: Classification,
    pub trade_count: usize,
    pub average_pnl: Decimal,
    pub profit_rate_pct: Decimal,
    pub average_size: Decimal,
}

/// Everything computed from one merged table, grouped by classification.
///
/// All maps are keyed by the same set of classifications, in ordinal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentAnalysis {
    pub pnl_stats: BTreeMap<Classification, DescriptiveStats>,
    pub profit_rate_pct: BTreeMap<Classification, Decimal>,
    pub average_size: BTreeMap<Classification, Decimal>,
    pub side_distribution: SideDistribution,
}

impl SentimentAnalysis {
    pub fn classifications(&self) -> impl Iterator<Item = Classification> + '_ {
        self.pnl_stats.keys().copied()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.pnl_stats
            .iter()
            .map(|(&classification, stats)| SummaryRow {
                classification,
                trade_count: stats.count,
                average_pnl: stats.mean,
                profit_rate_pct: self
                    .profit_rate_pct
                    .get(&classification)
                    .copied()
                    .unwrap_or_default(),
                average_size: self
                    .average_size
                    .get(&classification)
                    .copied()
                    .unwrap_or_default(),
            })
            .collect()
    }
}
