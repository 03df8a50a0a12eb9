//! Guarded ratios and month-aligned series
//!
//! Two building blocks shared by every metric:
//!
//! - [`Ratio`] stores a numerator/denominator pair and refuses to divide
//!   by zero: accessing the value of an undefined rate yields an explicit
//!   [`EmptyDenominator`] instead of `NaN`, `Inf`, or a silent `0.0`.
//! - [`MonthlySeries`] buckets values over the full January-December
//!   domain, so a month with no records reports zero and two series always
//!   align month by month.

use serde::{Deserialize, Serialize};

/// Number of months in the fixed 1-12 bucketing domain.
pub const MONTHS_PER_YEAR: usize = 12;

/// Explicit failure for a rate, average, or ratio computed over zero
/// eligible records.
///
/// Distinct from a zero value: the metric is undefined for this dataset
/// and callers must report "no data" rather than a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no data for denominator of {metric}")]
pub struct EmptyDenominator {
    /// Name of the metric whose denominator was empty.
    pub metric: &'static str,
}

/// A count-over-count ratio with a guarded quotient.
///
/// # Examples
///
/// ```
/// use cudyr_metrics::metric::Ratio;
///
/// let rate = Ratio::new(3, 4);
/// assert_eq!(rate.value("sample rate").unwrap(), 0.75);
///
/// let undefined = Ratio::new(0, 0);
/// assert!(undefined.value("sample rate").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratio {
    pub numerator: u64,
    pub denominator: u64,
}

impl Ratio {
    #[must_use]
    pub const fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The quotient, or [`EmptyDenominator`] naming `metric` when the
    /// denominator is zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn value(self, metric: &'static str) -> Result<f64, EmptyDenominator> {
        if self.denominator == 0 {
            return Err(EmptyDenominator { metric });
        }
        Ok(self.numerator as f64 / self.denominator as f64)
    }

    /// The quotient as a percentage, guarded the same way as [`value`].
    ///
    /// [`value`]: Self::value
    pub fn percent(self, metric: &'static str) -> Result<f64, EmptyDenominator> {
        Ok(self.value(metric)? * 100.0)
    }
}

/// Per-month values over the full January-December domain.
///
/// Months without records hold zero rather than being absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySeries(pub [u64; MONTHS_PER_YEAR]);

impl MonthlySeries {
    #[must_use]
    pub const fn zero() -> Self {
        Self([0; MONTHS_PER_YEAR])
    }

    /// Builds a count series from an iterator of month numbers (1-12).
    ///
    /// # Panics
    ///
    /// Panics if any month is outside 1-12.
    #[must_use]
    pub fn from_months<I>(months: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut series = Self::zero();
        for month in months {
            series.add(month, 1);
        }
        series
    }

    /// Accumulates `amount` into the bucket for `month` (1-12).
    ///
    /// # Panics
    ///
    /// Panics if `month` is outside 1-12.
    pub fn add(&mut self, month: u32, amount: u64) {
        self.0[month_index(month)] += amount;
    }

    /// The value for `month` (1-12).
    ///
    /// # Panics
    ///
    /// Panics if `month` is outside 1-12.
    #[must_use]
    pub fn get(&self, month: u32) -> u64 {
        self.0[month_index(month)]
    }

    /// Iterates `(month, value)` pairs for every month 1-12, zeros
    /// included.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        (1u32..).zip(self.0.iter().copied())
    }

    /// Sum over all twelve months.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Month-aligned signed difference `self − other`.
    ///
    /// Both series cover the full 1-12 domain, so the difference is always
    /// defined for every month.
    #[expect(clippy::cast_possible_wrap)]
    #[must_use]
    pub fn diff(&self, other: &Self) -> [i64; MONTHS_PER_YEAR] {
        std::array::from_fn(|i| self.0[i] as i64 - other.0[i] as i64)
    }
}

fn month_index(month: u32) -> usize {
    assert!((1..=12).contains(&month), "month must be in 1-12: {month}");
    (month - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_denominator_is_explicit() {
        let error = Ratio::new(5, 0).value("high-risk rate").unwrap_err();
        assert_eq!(error.metric, "high-risk rate");
        assert!(error.to_string().contains("high-risk rate"));
    }

    #[test]
    fn test_percent_scales_value() {
        assert_eq!(Ratio::new(1, 4).percent("quarter").unwrap(), 25.0);
    }

    #[test]
    fn test_zero_numerator_is_a_value_not_an_error() {
        assert_eq!(Ratio::new(0, 10).value("rate").unwrap(), 0.0);
    }

    #[test]
    fn test_missing_months_report_zero() {
        let series = MonthlySeries::from_months([1, 1, 3]);
        assert_eq!(series.get(1), 2);
        assert_eq!(series.get(2), 0);
        assert_eq!(series.get(3), 1);
        assert_eq!(series.get(5), 0);
        assert_eq!(series.iter().count(), 12);
        assert_eq!(series.total(), 3);
    }

    #[test]
    fn test_diff_aligns_on_full_domain() {
        let a = MonthlySeries::from_months([1, 2, 2]);
        let b = MonthlySeries::from_months([2, 12]);
        let diff = a.diff(&b);
        assert_eq!(diff[0], 1);
        assert_eq!(diff[1], 1);
        assert_eq!(diff[11], -1);
        assert_eq!(diff[4], 0);
    }

    #[test]
    #[should_panic(expected = "month must be in 1-12")]
    fn test_month_out_of_range_panics() {
        MonthlySeries::zero().get(13);
    }
}
