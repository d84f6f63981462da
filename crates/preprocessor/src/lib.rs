//! # Preprocessor
//!
//! Turns the two raw tables into a `MergedTable`: timestamps are parsed, both
//! sides get a calendar-date key, trades are joined to the sentiment of their
//! date, and the derived fields are computed when the trade log allows it.

use configuration::ParsingConfig;
use core_types::{Classification, SentimentRecord, Side, TradeRecord};
use core_types::MergedTable;
use loader::RawTable;
use rust_decimal::Decimal;
use std::str::FromStr;

pub mod error;
pub mod join;
pub mod schema;
pub mod timestamps;

pub use error::PreprocessError;
pub use join::SentimentIndex;
pub use schema::{PerformanceColumns, SentimentColumns, TradeColumns};
pub use timestamps::ParseMode;

/// Parses, keys and joins the input tables.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    parsing: ParsingConfig,
}

impl Preprocessor {
    pub fn new(parsing: ParsingConfig) -> Self {
        Self { parsing }
    }

    /// Runs the whole preprocessing step.
    pub fn run(&self, trades: &RawTable, sentiment: &RawTable) -> Result<MergedTable, PreprocessError> {
        let trade_columns = TradeColumns::resolve(trades, &self.parsing)?;
        let fields = trade_columns.performance.derived_fields();
        if let core_types::DerivedFields::MissingDerivedFields { absent } = &fields {
            tracing::warn!(?absent, "Trade log lacks PnL/size columns, derived fields will be omitted");
        }

        let (trade_records, skipped) = self.parse_trades(trades, &trade_columns)?;
        let index = self.parse_sentiment(sentiment)?;

        let merged = join::join(trade_records, &index, fields, skipped);
        tracing::info!(
            matched = merged.len(),
            trades = merged.trades_total,
            "Merged trades with sentiment"
        );
        tracing::debug!(unmatched = merged.trades_unmatched, "Trades without a sentiment date were dropped");

        Ok(merged)
    }

    /// Returns the typed trades and the number of rows skipped for a missing timestamp.
    pub fn parse_trades(
        &self,
        table: &RawTable,
        columns: &TradeColumns,
    ) -> Result<(Vec<TradeRecord>, usize), PreprocessError> {
        let (timestamps, mode) = timestamps::parse_timestamp_column(
            &self.parsing.timestamp_column,
            table.values(columns.timestamp),
            &self.parsing.timestamp_format,
        )?;
        tracing::debug!(?mode, "Parsed trade timestamps");

        let mut records = Vec::with_capacity(table.len());
        let mut skipped = 0usize;

        for (i, (row, timestamp)) in table.rows.iter().zip(timestamps).enumerate() {
            let row_number = i + 1;
            let Some(timestamp) = timestamp else {
                skipped += 1;
                continue;
            };
            let cell = |index: usize| row.get(index).map(String::as_str).unwrap_or("");

            let side_raw = cell(columns.side);
            let side = Side::from_str(side_raw).map_err(|e| PreprocessError::Parse {
                column: self.parsing.side_column.clone(),
                row: row_number,
                value: side_raw.to_string(),
                reason: e.to_string(),
            })?;

            let closed_pnl = columns
                .performance
                .pnl()
                .map(|index| parse_decimal(&self.parsing.pnl_column, row_number, cell(index)))
                .transpose()?;
            let size_usd = columns
                .performance
                .size()
                .map(|index| parse_decimal(&self.parsing.size_column, row_number, cell(index)))
                .transpose()?;

            records.push(TradeRecord {
                timestamp_raw: cell(columns.timestamp).to_string(),
                timestamp,
                trade_date: timestamp.date(),
                side,
                closed_pnl,
                size_usd,
            });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Trades with an empty timestamp cannot be dated and were skipped");
        }

        Ok((records, skipped))
    }

    /// Builds the date-keyed sentiment index.
    ///
    /// Rows with an empty date or classification are missing values and
    /// simply never match a trade.
    pub fn parse_sentiment(&self, table: &RawTable) -> Result<SentimentIndex, PreprocessError> {
        let columns = SentimentColumns::resolve(table, &self.parsing)?;
        let dates = timestamps::parse_date_column(&columns.date_name, table.values(columns.date))?;

        let mut records = Vec::with_capacity(table.len());
        for (i, (row, date)) in table.rows.iter().zip(dates).enumerate() {
            let raw = row.get(columns.classification).map(String::as_str).unwrap_or("");
            let Some(date) = date else { continue };
            if raw.trim().is_empty() {
                continue;
            }

            let classification = Classification::from_str(raw).map_err(|e| PreprocessError::Parse {
                column: self.parsing.classification_column.clone(),
                row: i + 1,
                value: raw.to_string(),
                reason: e.to_string(),
            })?;
            records.push(SentimentRecord {
                date: date.date(),
                classification,
            });
        }

        let index = SentimentIndex::from_records(records);
        if index.duplicate_dates() > 0 {
            tracing::warn!(
                duplicates = index.duplicate_dates(),
                "Sentiment index lists some dates more than once, trades on those dates are counted once per listing"
            );
        }
        tracing::debug!(days = index.days(), date_column = %columns.date_name, "Indexed sentiment");

        Ok(index)
    }
}

fn parse_decimal(column: &str, row: usize, value: &str) -> Result<Decimal, PreprocessError> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| PreprocessError::Parse {
            column: column.to_string(),
            row,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::DerivedFields;
    use rust_decimal_macros::dec;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            "mem.csv",
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn trades() -> RawTable {
        raw(
            &["Timestamp IST", "Closed PnL", "Size USD", "Side"],
            &[
                &["01-03-2023 10:15", "50", "100", "Buy"],
                &["02-03-2023 11:00", "-20.5", "400", "Sell"],
                &["05-03-2023 09:00", "1e1", "50", "buy"],
            ],
        )
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new(ParsingConfig::default())
    }

    #[test]
    fn greed_day_trade_is_merged_with_derived_fields() {
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", "Greed"]]);
        let merged = preprocessor().run(&trades(), &sentiment).unwrap();

        assert_eq!(merged.len(), 1);
        assert_eq!(merged.trades_total, 3);
        assert_eq!(merged.trades_unmatched, 2);
        assert_eq!(merged.fields, DerivedFields::Computed);

        let record = &merged.records[0];
        assert_eq!(record.classification, Classification::Greed);
        assert_eq!(record.trade.trade_date, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap());
        assert_eq!(record.trade.side, Side::Buy);
        let derived = record.derived.unwrap();
        assert_eq!(derived.pnl_per_usd, Some(dec!(0.5)));
        assert!(derived.profit);
    }

    #[test]
    fn first_column_is_the_date_key_when_not_named_date() {
        let sentiment = raw(
            &["Day", "classification"],
            &[&["2023-03-02", "Fear"], &["2023-03-05", "Extreme Greed"]],
        );
        let merged = preprocessor().run(&trades(), &sentiment).unwrap();
        let classes: Vec<_> = merged.records.iter().map(|r| r.classification).collect();
        assert_eq!(classes, vec![Classification::Fear, Classification::ExtremeGreed]);
        assert_eq!(merged.records[1].trade.closed_pnl, Some(dec!(10)));
    }

    #[test]
    fn empty_classification_never_matches() {
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", ""], &["", "Fear"]]);
        let merged = preprocessor().run(&trades(), &sentiment).unwrap();
        assert!(merged.is_empty());
        assert_eq!(merged.trades_unmatched, 3);
    }

    #[test]
    fn missing_size_column_omits_derived_fields() {
        let trades = raw(
            &["Timestamp IST", "Closed PnL", "Side"],
            &[&["01-03-2023 10:15", "50", "Buy"]],
        );
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", "Greed"]]);
        let merged = preprocessor().run(&trades, &sentiment).unwrap();

        assert!(matches!(merged.fields, DerivedFields::MissingDerivedFields { .. }));
        assert_eq!(merged.records[0].trade.closed_pnl, Some(dec!(50)));
        assert!(merged.records[0].derived.is_none());
    }

    #[test]
    fn unknown_side_is_a_parse_error() {
        let trades = raw(
            &["Timestamp IST", "Closed PnL", "Size USD", "Side"],
            &[&["01-03-2023 10:15", "50", "100", "Hold"]],
        );
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", "Greed"]]);
        let err = preprocessor().run(&trades, &sentiment).unwrap_err();
        assert!(matches!(err, PreprocessError::Parse { row: 1, .. }));
    }

    #[test]
    fn non_numeric_pnl_is_a_parse_error() {
        let trades = raw(
            &["Timestamp IST", "Closed PnL", "Size USD", "Side"],
            &[&["01-03-2023 10:15", "lots", "100", "Buy"]],
        );
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", "Greed"]]);
        match preprocessor().run(&trades, &sentiment).unwrap_err() {
            PreprocessError::Parse { column, .. } => assert_eq!(column, "Closed PnL"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn iso_trade_timestamps_fall_back_to_inference() {
        let trades = raw(
            &["Timestamp IST", "Closed PnL", "Size USD", "Side"],
            &[&["2023-03-01 10:15:00", "5", "100", "Sell"]],
        );
        let sentiment = raw(&["date", "classification"], &[&["2023-03-01", "Neutral"]]);
        let merged = preprocessor().run(&trades, &sentiment).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.records[0].classification, Classification::Neutral);
    }
}
