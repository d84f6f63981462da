//! # Mock Data
//!
//! Writes a synthetic trade log and a matching daily fear & greed file so the
//! report can be run without real exports. The values are random; no
//! relationship between sentiment and performance is planted.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use core_types::{Classification, Side};
use rand::SeedableRng;
use rand::distributions::{Uniform, WeightedIndex};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use rust_decimal::Decimal;
use std::fs;
use std::path::{Path, PathBuf};

/// Probability of each classification, in `Classification::ALL` order.
const CLASSIFICATION_WEIGHTS: [f64; 5] = [0.1, 0.2, 0.4, 0.2, 0.1];

const PNL_MEAN: f64 = 10.0;
const PNL_STD: f64 = 100.0;
const SIZE_MIN: f64 = 100.0;
const SIZE_MAX: f64 = 5000.0;

/// Timestamps are written the way the exchange export writes them.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M";

#[derive(Debug, Clone)]
pub struct MockDataConfig {
    pub trades_path: PathBuf,
    pub sentiment_path: PathBuf,
    /// First sentiment day, inclusive.
    pub start: NaiveDate,
    /// Last sentiment day, inclusive.
    pub end: NaiveDate,
    pub num_trades: usize,
    /// Same seed, same files.
    pub seed: Option<u64>,
}

impl Default for MockDataConfig {
    fn default() -> Self {
        Self {
            trades_path: PathBuf::from("data/historical_data.csv"),
            sentiment_path: PathBuf::from("data/fear_greed_index.csv"),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default(),
            num_trades: 500,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFiles {
    pub trades_path: PathBuf,
    pub sentiment_path: PathBuf,
    pub sentiment_days: usize,
    pub trades: usize,
}

/// Generates both input files, creating their parent directories.
pub fn generate(cfg: &MockDataConfig) -> Result<GeneratedFiles> {
    if cfg.end < cfg.start {
        bail!("end date {} is before start date {}", cfg.end, cfg.start);
    }

    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let days: Vec<NaiveDate> = cfg.start.iter_days().take_while(|d| *d <= cfg.end).collect();
    let sentiment = sentiment_rows(&mut rng, &days)?;
    write_sentiment(&cfg.sentiment_path, &sentiment)?;
    tracing::info!(path = %cfg.sentiment_path.display(), days = sentiment.len(), "Wrote mock sentiment");

    let trades = trade_rows(&mut rng, cfg.start, days.len(), cfg.num_trades)?;
    write_trades(&cfg.trades_path, &trades)?;
    tracing::info!(path = %cfg.trades_path.display(), trades = trades.len(), "Wrote mock trades");

    Ok(GeneratedFiles {
        trades_path: cfg.trades_path.clone(),
        sentiment_path: cfg.sentiment_path.clone(),
        sentiment_days: sentiment.len(),
        trades: trades.len(),
    })
}

struct MockTrade {
    timestamp: NaiveDateTime,
    pnl: Decimal,
    size: Decimal,
    side: Side,
}

fn sentiment_rows(rng: &mut StdRng, days: &[NaiveDate]) -> Result<Vec<(NaiveDate, Classification)>> {
    let weights = WeightedIndex::new(CLASSIFICATION_WEIGHTS)
        .map_err(|e| anyhow!("invalid classification weights: {e}"))?;
    Ok(days
        .iter()
        .map(|day| (*day, Classification::ALL[weights.sample(rng)]))
        .collect())
}

fn trade_rows(rng: &mut StdRng, start: NaiveDate, span_days: usize, count: usize) -> Result<Vec<MockTrade>> {
    let pnl_dist = Normal::new(PNL_MEAN, PNL_STD).map_err(|e| anyhow!("invalid PnL distribution: {e}"))?;
    let size_dist = Uniform::new(SIZE_MIN, SIZE_MAX);
    let midnight = start.and_hms_opt(0, 0, 0).context("start date has no midnight")?;
    let span = i64::try_from(span_days.max(1)).context("date range too long")?;

    let mut trades: Vec<MockTrade> = (0..count)
        .map(|_| {
            let offset = Duration::days(rng.gen_range(0..span))
                + Duration::hours(rng.gen_range(0..24))
                + Duration::minutes(rng.gen_range(0..60));
            MockTrade {
                timestamp: midnight + offset,
                pnl: cents(pnl_dist.sample(rng)),
                size: cents(size_dist.sample(rng)),
                side: if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell },
            }
        })
        .collect();
    trades.sort_by_key(|t| t.timestamp);
    Ok(trades)
}

fn cents(value: f64) -> Decimal {
    Decimal::from_f64_retain(value)
        .unwrap_or_default()
        .round_dp(2)
}

fn writer(path: &Path) -> Result<csv::Writer<fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    csv::Writer::from_path(path).with_context(|| format!("opening {}", path.display()))
}

fn write_sentiment(path: &Path, rows: &[(NaiveDate, Classification)]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["date", "classification"])?;
    for (day, classification) in rows {
        wtr.write_record([day.format("%Y-%m-%d").to_string(), classification.label().to_string()])?;
    }
    wtr.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn write_trades(path: &Path, trades: &[MockTrade]) -> Result<()> {
    let mut wtr = writer(path)?;
    wtr.write_record(["Timestamp IST", "Closed PnL", "Size USD", "Side"])?;
    for t in trades {
        wtr.write_record([
            t.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            t.pnl.to_string(),
            t.size.to_string(),
            t.side.as_str().to_string(),
        ])?;
    }
    wtr.flush().with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
