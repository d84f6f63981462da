use crate::error::PreprocessError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-time layouts tried, in order, when inferring a format.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts, read as midnight.
///
/// Slashed dates are month-first when ambiguous; dashed ones are day-first,
/// like the exchange's own timestamps.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%Y%m%d"];

/// How a timestamp column ended up being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    /// Every value matched the configured format.
    Fixed,
    /// At least one value did not, so the column was re-read with inference.
    Inferred,
}

/// Parses one value with an explicit chrono format.
///
/// Formats without a time component are accepted and read as midnight.
pub fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, format)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parses one value by trying RFC 3339 and a list of common layouts.
///
/// Offsets in RFC 3339 values are kept as local wall-clock time, so the
/// calendar date is the one written in the file.
pub fn infer_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Parses a whole timestamp column.
///
/// The configured format is tried first for every value. If any non-empty
/// value fails, a warning is logged and the entire column is parsed again with
/// `infer_datetime`. Empty cells are missing values and come back as `None`.
pub fn parse_timestamp_column<'a, I>(
    column: &str,
    values: I,
    format: &str,
) -> Result<(Vec<Option<NaiveDateTime>>, ParseMode), PreprocessError>
where
    I: IntoIterator<Item = &'a str>,
{
    let values: Vec<&str> = values.into_iter().collect();

    let fixed: Option<Vec<Option<NaiveDateTime>>> = values
        .iter()
        .map(|v| {
            if v.trim().is_empty() {
                Some(None)
            } else {
                parse_with_format(v, format).map(Some)
            }
        })
        .collect();
    if let Some(parsed) = fixed {
        return Ok((parsed, ParseMode::Fixed));
    }

    tracing::warn!(
        column,
        format,
        "Timestamps do not all match the configured format, falling back to format inference"
    );
    let inferred = parse_date_column(column, values)?;
    Ok((inferred, ParseMode::Inferred))
}

/// Parses a column with format inference only.
pub fn parse_date_column<'a, I>(
    column: &str,
    values: I,
) -> Result<Vec<Option<NaiveDateTime>>, PreprocessError>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            if v.trim().is_empty() {
                return Ok(None);
            }
            infer_datetime(v).map(Some).ok_or_else(|| PreprocessError::Parse {
                column: column.to_string(),
                row: i + 1,
                value: v.to_string(),
                reason: "unrecognized date/time format".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn fixed_format_reads_day_first() {
        assert_eq!(
            parse_with_format("01-03-2023 14:05", "%d-%m-%Y %H:%M"),
            Some(dt(2023, 3, 1, 14, 5))
        );
    }

    #[test]
    fn date_only_format_is_midnight() {
        assert_eq!(parse_with_format("2023-03-01", "%Y-%m-%d"), Some(dt(2023, 3, 1, 0, 0)));
    }

    #[test]
    fn inference_handles_common_layouts() {
        assert_eq!(infer_datetime("2023-03-01"), Some(dt(2023, 3, 1, 0, 0)));
        assert_eq!(infer_datetime("2023-03-01 09:30:00"), Some(dt(2023, 3, 1, 9, 30)));
        assert_eq!(infer_datetime("2023-03-01T23:30:00+05:30"), Some(dt(2023, 3, 1, 23, 30)));
        assert_eq!(infer_datetime("20230301"), Some(dt(2023, 3, 1, 0, 0)));
        assert_eq!(infer_datetime("yesterday"), None);
    }

    #[test]
    fn ambiguous_slashed_dates_are_month_first() {
        assert_eq!(infer_datetime("01/03/2023"), Some(dt(2023, 1, 3, 0, 0)));
        assert_eq!(infer_datetime("01/03/2023 09:30"), Some(dt(2023, 1, 3, 9, 30)));
        // Only a day-first reading is valid.
        assert_eq!(infer_datetime("25/03/2023"), Some(dt(2023, 3, 25, 0, 0)));
        assert_eq!(infer_datetime("01-03-2023"), Some(dt(2023, 3, 1, 0, 0)));
    }

    #[test]
    fn column_uses_fixed_format_when_all_match() {
        let (parsed, mode) =
            parse_timestamp_column("ts", ["01-03-2023 10:00", "", "02-03-2023 11:15"], "%d-%m-%Y %H:%M")
                .unwrap();
        assert_eq!(mode, ParseMode::Fixed);
        assert_eq!(parsed, vec![Some(dt(2023, 3, 1, 10, 0)), None, Some(dt(2023, 3, 2, 11, 15))]);
    }

    #[test]
    fn column_falls_back_to_inference() {
        let (parsed, mode) =
            parse_timestamp_column("ts", ["2023-03-01 10:00", "2023-03-02"], "%d-%m-%Y %H:%M").unwrap();
        assert_eq!(mode, ParseMode::Inferred);
        assert_eq!(parsed, vec![Some(dt(2023, 3, 1, 10, 0)), Some(dt(2023, 3, 2, 0, 0))]);
    }

    #[test]
    fn failed_inference_reports_the_row() {
        let err = parse_timestamp_column("ts", ["2023-03-01", "not a date"], "%d-%m-%Y %H:%M")
            .unwrap_err();
        match err {
            PreprocessError::Parse { row, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(value, "not a date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
