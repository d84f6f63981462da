use crate::error::AnalyticsError;
use crate::report::{SentimentAnalysis, SideDistribution};
use crate::stats;
use core_types::{Classification, DerivedFields, MergedTable, Side};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};

/// A stateless calculator for per-sentiment trading statistics.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

/// Running totals for one classification.
#[derive(Debug, Default)]
struct Bucket {
    pnls: Vec<Decimal>,
    winners: usize,
    size_sum: Decimal,
    sides: BTreeMap<Side, usize>,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the grouped statistics.
    ///
    /// # Arguments
    ///
    /// * `table` - The trades joined with their day's sentiment.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `SentimentAnalysis`, or an `AnalyticsError`
    /// when the table is empty or lacks the derived fields.
    pub fn analyze(&self, table: &MergedTable) -> Result<SentimentAnalysis, AnalyticsError> {
        if let DerivedFields::MissingDerivedFields { absent } = &table.fields {
            return Err(AnalyticsError::MissingColumn(format!(
                "profit flag cannot be derived without {}",
                absent.join(", ")
            )));
        }
        if table.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "no trades matched a sentiment date".to_string(),
            ));
        }

        let buckets = self.bucket(table)?;
        let seen_sides: BTreeSet<Side> = buckets
            .values()
            .flat_map(|b| b.sides.keys().copied())
            .collect();
        let sides: Vec<Side> = seen_sides.into_iter().collect();

        let mut analysis = SentimentAnalysis {
            pnl_stats: BTreeMap::new(),
            profit_rate_pct: BTreeMap::new(),
            average_size: BTreeMap::new(),
            side_distribution: SideDistribution {
                sides: sides.clone(),
                counts: BTreeMap::new(),
            },
        };

        for (classification, bucket) in buckets {
            let count = Decimal::from(bucket.pnls.len());
            let stats = stats::describe(&bucket.pnls)?;

            analysis
                .profit_rate_pct
                .insert(classification, Decimal::from(bucket.winners) * Decimal::ONE_HUNDRED / count);
            analysis
                .average_size
                .insert(classification, bucket.size_sum / count);

            let row = sides
                .iter()
                .map(|side| (*side, bucket.sides.get(side).copied().unwrap_or(0)))
                .collect();
            analysis.side_distribution.counts.insert(classification, row);

            tracing::debug!(
                %classification,
                trades = stats.count,
                mean_pnl = %stats.mean,
                "Aggregated sentiment bucket"
            );
            analysis.pnl_stats.insert(classification, stats);
        }

        Ok(analysis)
    }

    /// Splits the merged records by classification.
    fn bucket(&self, table: &MergedTable) -> Result<BTreeMap<Classification, Bucket>, AnalyticsError> {
        let mut buckets: BTreeMap<Classification, Bucket> = BTreeMap::new();

        for record in &table.records {
            let (pnl, size, derived) = record.performance().ok_or_else(|| {
                AnalyticsError::Calculation(format!(
                    "trade at {} has no PnL/size although the table has derived fields",
                    record.trade.timestamp_raw
                ))
            })?;

            let bucket = buckets.entry(record.classification).or_default();
            bucket.pnls.push(pnl);
            bucket.size_sum += size;
            if derived.profit {
                bucket.winners += 1;
            }
            *bucket.sides.entry(record.trade.side).or_insert(0) += 1;
        }

        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Derived, MergedRecord, TradeRecord};
    use rust_decimal_macros::dec;

    fn record(classification: Classification, side: Side, pnl: Decimal, size: Decimal) -> MergedRecord {
        let timestamp = NaiveDate::from_ymd_opt(2023, 3, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        MergedRecord {
            trade: TradeRecord {
                timestamp_raw: "01-03-2023 10:00".to_string(),
                timestamp,
                trade_date: timestamp.date(),
                side,
                closed_pnl: Some(pnl),
                size_usd: Some(size),
            },
            classification,
            derived: Some(Derived::compute(pnl, size)),
        }
    }

    fn table(records: Vec<MergedRecord>) -> MergedTable {
        MergedTable {
            trades_total: records.len(),
            trades_unmatched: 0,
            records,
            fields: DerivedFields::Computed,
        }
    }

    fn sample() -> MergedTable {
        use Classification::*;
        table(vec![
            record(Greed, Side::Buy, dec!(50), dec!(100)),
            record(Greed, Side::Sell, dec!(-10), dec!(300)),
            record(Greed, Side::Buy, dec!(20), dec!(200)),
            record(Fear, Side::Sell, dec!(-5), dec!(1000)),
            record(ExtremeFear, Side::Sell, dec!(0), dec!(50)),
        ])
    }

    #[test]
    fn profit_rate_is_share_of_positive_pnl() {
        let table = sample();
        let analysis = AnalyticsEngine::new().analyze(&table).unwrap();

        for classification in analysis.classifications() {
            let rows: Vec<_> = table
                .records
                .iter()
                .filter(|r| r.classification == classification)
                .collect();
            let positives = rows.iter().filter(|r| r.trade.closed_pnl.unwrap() > Decimal::ZERO).count();
            let expected = Decimal::from(positives) * Decimal::ONE_HUNDRED / Decimal::from(rows.len());
            assert_eq!(analysis.profit_rate_pct[&classification], expected);
        }
        assert_eq!(analysis.profit_rate_pct[&Classification::ExtremeFear], Decimal::ZERO);
    }

    #[test]
    fn side_rows_sum_to_trade_counts() {
        let analysis = AnalyticsEngine::new().analyze(&sample()).unwrap();
        let sides = &analysis.side_distribution;

        assert_eq!(sides.sides, vec![Side::Buy, Side::Sell]);
        for row in analysis.summary_rows() {
            assert_eq!(sides.row_total(row.classification), row.trade_count);
        }
        // Fear never bought: zero-filled, not absent.
        assert_eq!(sides.row(Classification::Fear), vec![0, 1]);
    }

    #[test]
    fn summary_rows_follow_ordinal_order() {
        let rows = AnalyticsEngine::new().analyze(&sample()).unwrap().summary_rows();
        let order: Vec<_> = rows.iter().map(|r| r.classification).collect();
        assert_eq!(
            order,
            vec![Classification::ExtremeFear, Classification::Fear, Classification::Greed]
        );

        let greed = &rows[2];
        assert_eq!(greed.trade_count, 3);
        assert_eq!(greed.average_pnl, dec!(20));
        assert_eq!(greed.average_size, dec!(200));
    }

    #[test]
    fn missing_derived_fields_is_a_missing_column() {
        let mut t = sample();
        t.fields = DerivedFields::MissingDerivedFields {
            absent: vec!["Size USD".to_string()],
        };
        assert!(matches!(
            AnalyticsEngine::new().analyze(&t),
            Err(AnalyticsError::MissingColumn(_))
        ));
    }

    #[test]
    fn empty_table_is_not_enough_data() {
        assert!(matches!(
            AnalyticsEngine::new().analyze(&table(vec![])),
            Err(AnalyticsError::NotEnoughData(_))
        ));
    }
}
