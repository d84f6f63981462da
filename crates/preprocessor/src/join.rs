use chrono::NaiveDate;
use core_types::{Classification, Derived, DerivedFields, MergedRecord, MergedTable, SentimentRecord, TradeRecord};
use std::collections::BTreeMap;

/// The sentiment index keyed by calendar date.
#[derive(Debug, Clone, Default)]
pub struct SentimentIndex {
    by_date: BTreeMap<NaiveDate, Vec<Classification>>,
    duplicate_dates: usize,
}

impl SentimentIndex {
    pub fn from_records(records: impl IntoIterator<Item = SentimentRecord>) -> Self {
        let mut index = Self::default();
        for record in records {
            let entry = index.by_date.entry(record.date).or_default();
            if !entry.is_empty() {
                index.duplicate_dates += 1;
            }
            entry.push(record.classification);
        }
        index
    }

    /// Every classification published for `date`, in file order.
    pub fn lookup(&self, date: NaiveDate) -> &[Classification] {
        self.by_date.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn days(&self) -> usize {
        self.by_date.len()
    }

    /// Rows that repeated a date already present in the index.
    pub fn duplicate_dates(&self) -> usize {
        self.duplicate_dates
    }
}

/// Joins trades to the sentiment of their trade date.
///
/// This is a left join followed by dropping rows with no classification, so
/// trades whose date is absent from the index do not appear in the result. A
/// date listed more than once yields one merged record per listing.
///
/// `skipped` counts trades that never reached the join (missing timestamp)
/// and is added to the unmatched total.
pub fn join(
    trades: Vec<TradeRecord>,
    index: &SentimentIndex,
    fields: DerivedFields,
    skipped: usize,
) -> MergedTable {
    let trades_total = trades.len() + skipped;
    let mut unmatched = skipped;
    let mut records = Vec::with_capacity(trades.len());

    for trade in trades {
        let matches = index.lookup(trade.trade_date);
        if matches.is_empty() {
            unmatched += 1;
            continue;
        }

        let derived = match (&fields, trade.closed_pnl, trade.size_usd) {
            (DerivedFields::Computed, Some(pnl), Some(size)) => Some(Derived::compute(pnl, size)),
            _ => None,
        };

        for &classification in matches {
            records.push(MergedRecord {
                trade: trade.clone(),
                classification,
                derived,
            });
        }
    }

    MergedTable {
        records,
        fields,
        trades_total,
        trades_unmatched: unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Side;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 3, d).unwrap()
    }

    fn trade(d: u32, pnl: rust_decimal::Decimal) -> TradeRecord {
        let timestamp = date(d).and_hms_opt(12, 0, 0).unwrap();
        TradeRecord {
            timestamp_raw: timestamp.format("%d-%m-%Y %H:%M").to_string(),
            timestamp,
            trade_date: date(d),
            side: Side::Buy,
            closed_pnl: Some(pnl),
            size_usd: Some(dec!(100)),
        }
    }

    fn index(entries: &[(u32, Classification)]) -> SentimentIndex {
        SentimentIndex::from_records(entries.iter().map(|&(d, classification)| SentimentRecord {
            date: date(d),
            classification,
        }))
    }

    #[test]
    fn unmatched_trades_are_dropped() {
        let idx = index(&[(1, Classification::Greed)]);
        let table = join(
            vec![trade(1, dec!(50)), trade(2, dec!(-5)), trade(1, dec!(1))],
            &idx,
            DerivedFields::Computed,
            0,
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.trades_total, 3);
        assert_eq!(table.trades_unmatched, 1);
        assert!(table.records.iter().all(|r| r.trade.trade_date == date(1)));
    }

    #[test]
    fn matched_trade_gets_classification_and_derived_fields() {
        let idx = index(&[(1, Classification::Greed)]);
        let table = join(vec![trade(1, dec!(50))], &idx, DerivedFields::Computed, 0);
        let record = &table.records[0];
        assert_eq!(record.classification, Classification::Greed);
        let derived = record.derived.unwrap();
        assert_eq!(derived.pnl_per_usd, Some(dec!(0.5)));
        assert!(derived.profit);
    }

    #[test]
    fn duplicate_dates_fan_out() {
        let idx = index(&[(1, Classification::Fear), (1, Classification::Neutral)]);
        assert_eq!(idx.duplicate_dates(), 1);
        assert_eq!(idx.days(), 1);

        let table = join(vec![trade(1, dec!(3))], &idx, DerivedFields::Computed, 0);
        let classes: Vec<_> = table.records.iter().map(|r| r.classification).collect();
        assert_eq!(classes, vec![Classification::Fear, Classification::Neutral]);
    }

    #[test]
    fn missing_derived_fields_leave_records_without_derived() {
        let idx = index(&[(1, Classification::Greed)]);
        let fields = DerivedFields::MissingDerivedFields {
            absent: vec!["Size USD".to_string()],
        };
        let table = join(vec![trade(1, dec!(50))], &idx, fields, 2);
        assert!(table.records[0].derived.is_none());
        assert_eq!(table.trades_total, 3);
        assert_eq!(table.trades_unmatched, 2);
    }
}
