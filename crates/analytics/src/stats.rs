use crate::error::AnalyticsError;
use crate::report::DescriptiveStats;
use rust_decimal::Decimal;
use rust_decimal::prelude::*;

pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

/// Linear-interpolation quantile of an ascending slice, `p` in [0, 1].
pub fn quantile(sorted: &[Decimal], p: Decimal) -> Option<Decimal> {
    let last = sorted.len().checked_sub(1)?;
    let position = p * Decimal::from(last);
    let lower = position.floor();
    let index = lower.to_usize()?.min(last);
    let fraction = position - lower;

    let low = sorted[index];
    let high = sorted[(index + 1).min(last)];
    Some(low + (high - low) * fraction)
}

/// Describes a sample the way a summary table expects.
pub fn describe(values: &[Decimal]) -> Result<DescriptiveStats, AnalyticsError> {
    let mean = mean(values)
        .ok_or_else(|| AnalyticsError::NotEnoughData("cannot describe an empty sample".to_string()))?;

    let mut sorted = values.to_vec();
    sorted.sort();

    let std = if values.len() > 1 {
        let squares: Decimal = values.iter().map(|v| (*v - mean) * (*v - mean)).sum();
        let variance = squares / Decimal::from(values.len() - 1);
        Some(variance.sqrt().ok_or_else(|| {
            AnalyticsError::InternalError("Failed to calculate square root for variance".to_string())
        })?)
    } else {
        None
    };

    let q = |p: Decimal| {
        quantile(&sorted, p)
            .ok_or_else(|| AnalyticsError::InternalError(format!("quantile {p} out of range")))
    };

    Ok(DescriptiveStats {
        count: values.len(),
        mean,
        std,
        min: sorted[0],
        q25: q(Decimal::new(25, 2))?,
        median: q(Decimal::new(5, 1))?,
        q75: q(Decimal::new(75, 2))?,
        max: sorted[sorted.len() - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn quantiles_interpolate_linearly() {
        let sorted = [dec!(1), dec!(2), dec!(3), dec!(4)];
        assert_eq!(quantile(&sorted, dec!(0.25)), Some(dec!(1.75)));
        assert_eq!(quantile(&sorted, dec!(0.5)), Some(dec!(2.5)));
        assert_eq!(quantile(&sorted, dec!(0.75)), Some(dec!(3.25)));
        assert_eq!(quantile(&sorted, Decimal::ONE), Some(dec!(4)));
        assert_eq!(quantile(&[], dec!(0.5)), None);
    }

    #[test]
    fn describe_matches_hand_computed_values() {
        let stats = describe(&[dec!(4), dec!(-2), dec!(10), dec!(0)]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, dec!(3));
        assert_eq!(stats.min, dec!(-2));
        assert_eq!(stats.max, dec!(10));
        assert_eq!(stats.median, dec!(2));
        assert_eq!(stats.q25, dec!(-0.5));
        assert_eq!(stats.q75, dec!(5.5));
        // squares: 1 + 25 + 49 + 9 = 84, variance 28
        let std = stats.std.unwrap();
        assert!((std - dec!(5.2915026221)).abs() < dec!(0.000001));
    }

    #[test]
    fn single_value_has_no_std() {
        let stats = describe(&[dec!(7)]).unwrap();
        assert_eq!(stats.std, None);
        assert_eq!(stats.q25, dec!(7));
        assert_eq!(stats.q75, dec!(7));
    }

    #[test]
    fn empty_sample_is_not_enough_data() {
        assert!(matches!(describe(&[]), Err(AnalyticsError::NotEnoughData(_))));
    }
}
