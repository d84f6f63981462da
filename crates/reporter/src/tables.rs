use crate::error::ReportError;
use analytics::SentimentAnalysis;
use csv::Writer;
use rust_decimal::Decimal;
use std::fs::File;
use std::path::Path;

/// Decimal places kept in written tables.
pub const REPORT_PRECISION: u32 = 6;

/// Formats a value for a report cell: rounded, without trailing zeros.
pub fn format_decimal(value: Decimal) -> String {
    value.round_dp(REPORT_PRECISION).normalize().to_string()
}

fn open(path: &Path) -> Result<Writer<File>, ReportError> {
    Writer::from_path(path).map_err(|source| ReportError::Table {
        path: path.to_path_buf(),
        source,
    })
}

fn write_rows(path: &Path, header: &[String], rows: Vec<Vec<String>>) -> Result<(), ReportError> {
    let table_error = |source| ReportError::Table {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = open(path)?;
    writer.write_record(header).map_err(table_error)?;
    for row in rows {
        writer.write_record(&row).map_err(table_error)?;
    }
    writer
        .flush()
        .map_err(|e| table_error(csv::Error::from(e)))?;
    Ok(())
}

/// Writes the consolidated table: count, average PnL, profit rate and average size.
pub fn write_summary(path: &Path, analysis: &SentimentAnalysis) -> Result<(), ReportError> {
    let header = [
        "classification",
        "trade_count",
        "average_pnl",
        "profit_rate_pct",
        "average_size_usd",
    ]
    .map(String::from);

    let rows = analysis
        .summary_rows()
        .into_iter()
        .map(|row| {
            vec![
                row.classification.to_string(),
                row.trade_count.to_string(),
                format_decimal(row.average_pnl),
                format_decimal(row.profit_rate_pct),
                format_decimal(row.average_size),
            ]
        })
        .collect();

    write_rows(path, &header, rows)
}

/// Writes the full descriptive statistics of closed PnL per classification.
pub fn write_pnl_stats(path: &Path, analysis: &SentimentAnalysis) -> Result<(), ReportError> {
    let header = ["classification", "count", "mean", "std", "min", "25%", "50%", "75%", "max"]
        .map(String::from);

    let rows = analysis
        .pnl_stats
        .iter()
        .map(|(classification, s)| {
            vec![
                classification.to_string(),
                s.count.to_string(),
                format_decimal(s.mean),
                s.std.map(format_decimal).unwrap_or_default(),
                format_decimal(s.min),
                format_decimal(s.q25),
                format_decimal(s.median),
                format_decimal(s.q75),
                format_decimal(s.max),
            ]
        })
        .collect();

    write_rows(path, &header, rows)
}

/// Writes the classification-by-side count matrix.
pub fn write_side_distribution(path: &Path, analysis: &SentimentAnalysis) -> Result<(), ReportError> {
    let sides = &analysis.side_distribution;
    let header: Vec<String> = std::iter::once("classification".to_string())
        .chain(sides.sides.iter().map(|s| s.to_string()))
        .collect();

    let rows = analysis
        .classifications()
        .map(|classification| {
            std::iter::once(classification.to_string())
                .chain(sides.row(classification).into_iter().map(|n| n.to_string()))
                .collect()
        })
        .collect();

    write_rows(path, &header, rows)
}
