use crate::enums::{Classification, Side};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single closed trade from the trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// The timestamp exactly as it appeared in the log.
    pub timestamp_raw: String,
    pub timestamp: NaiveDateTime,
    /// The calendar-date join key.
    pub trade_date: NaiveDate,
    pub side: Side,
    /// `None` only when the trade log has no PnL column.
    pub closed_pnl: Option<Decimal>,
    /// `None` only when the trade log has no size column.
    pub size_usd: Option<Decimal>,
}

/// One day of the sentiment index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub date: NaiveDate,
    pub classification: Classification,
}

/// Per-trade values computed from PnL and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    /// PnL divided by position size. `None` when the size is zero.
    pub pnl_per_usd: Option<Decimal>,
    /// `true` when the closed PnL is strictly positive.
    pub profit: bool,
}

impl Derived {
    pub fn compute(closed_pnl: Decimal, size_usd: Decimal) -> Self {
        Self {
            pnl_per_usd: closed_pnl.checked_div(size_usd),
            profit: closed_pnl > Decimal::ZERO,
        }
    }
}

/// Whether the derived columns exist for a merged table.
///
/// Decided once from the trade log's header row. Downstream stages match on
/// this instead of probing individual records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedFields {
    /// Both PnL and size were present, every record carries a `Derived`.
    Computed,
    /// The trade log lacked the named source columns; no record carries a `Derived`.
    MissingDerivedFields { absent: Vec<String> },
}

/// A trade joined with the sentiment of its trade date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub trade: TradeRecord,
    pub classification: Classification,
    pub derived: Option<Derived>,
}

impl MergedRecord {
    /// Returns `(closed_pnl, size_usd, derived)` when all three are present.
    pub fn performance(&self) -> Option<(Decimal, Decimal, Derived)> {
        Some((self.trade.closed_pnl?, self.trade.size_usd?, self.derived?))
    }
}

/// The result of joining the trade log with the sentiment index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTable {
    pub records: Vec<MergedRecord>,
    pub fields: DerivedFields,
    /// Number of trades read before the join.
    pub trades_total: usize,
    /// Number of trades dropped because no sentiment matched their date.
    pub trades_unmatched: usize,
}

impl MergedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
