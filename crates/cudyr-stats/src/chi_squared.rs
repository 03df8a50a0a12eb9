//! Chi-squared independence test for contingency tables.
//!
//! Tests whether two categorical samples are drawn from the same
//! distribution. The statistic is computed from observed and expected cell
//! counts; the p-value comes from the [`statrs`] chi-squared CDF. Tables
//! with a single degree of freedom receive the Yates continuity
//! correction, matching the common library default.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Result of a chi-squared independence test.
///
/// # Examples
///
/// ```
/// use cudyr_stats::chi_squared::ChiSquaredTest;
///
/// // Two groups with clearly different outcome distributions
/// let table = vec![vec![10, 20, 30], vec![30, 20, 10]];
/// let test = ChiSquaredTest::from_table(&table).unwrap();
///
/// assert_eq!(test.degrees_of_freedom, 2);
/// assert!(test.is_significant(0.05));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquaredTest {
    /// The chi-squared statistic.
    pub statistic: f64,
    /// Degrees of freedom: (rows − 1) × (columns − 1) after dropping
    /// all-zero rows and columns.
    pub degrees_of_freedom: usize,
    /// Upper-tail p-value.
    pub p_value: f64,
}

impl ChiSquaredTest {
    /// Runs the test on a contingency table of observed counts.
    ///
    /// Rows are groups, columns are outcome classes. All-zero rows and
    /// columns carry no information and are dropped before computing the
    /// statistic.
    ///
    /// # Returns
    ///
    /// * `Some(ChiSquaredTest)` - when the reduced table is at least 2×2
    /// * `None` - when fewer than two non-empty rows or columns remain
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_table(observed: &[Vec<u64>]) -> Option<Self> {
        fn cell(row: &[u64], c: usize) -> u64 {
            row.get(c).copied().unwrap_or(0)
        }

        let num_cols = observed.iter().map(Vec::len).max()?;
        let rows: Vec<&Vec<u64>> = observed
            .iter()
            .filter(|row| row.iter().any(|&v| v > 0))
            .collect();
        let cols: Vec<usize> = (0..num_cols)
            .filter(|&c| rows.iter().any(|row| cell(row, c) > 0))
            .collect();
        if rows.len() < 2 || cols.len() < 2 {
            return None;
        }

        let row_sums: Vec<f64> = rows
            .iter()
            .map(|row| cols.iter().map(|&c| cell(row, c)).sum::<u64>() as f64)
            .collect();
        let col_sums: Vec<f64> = cols
            .iter()
            .map(|&c| rows.iter().map(|row| cell(row, c)).sum::<u64>() as f64)
            .collect();
        let total: f64 = row_sums.iter().sum();

        let degrees_of_freedom = (rows.len() - 1) * (cols.len() - 1);
        let yates = degrees_of_freedom == 1;

        let mut statistic = 0.0;
        for (row, &row_sum) in rows.iter().zip(&row_sums) {
            for (&c, &col_sum) in cols.iter().zip(&col_sums) {
                let expected = row_sum * col_sum / total;
                let mut diff = (cell(row, c) as f64 - expected).abs();
                if yates {
                    diff = (diff - 0.5).max(0.0);
                }
                statistic += diff * diff / expected;
            }
        }

        let distribution = ChiSquared::new(degrees_of_freedom as f64).ok()?;
        let p_value = (1.0 - distribution.cdf(statistic)).clamp(0.0, 1.0);

        Some(Self {
            statistic,
            degrees_of_freedom,
            p_value,
        })
    }

    /// Runs the test on two aligned count vectors (a 2×k table).
    ///
    /// Both slices must assign counts to the same outcome classes in the
    /// same order. Returns `None` when the lengths differ or the table is
    /// degenerate.
    #[must_use]
    pub fn from_two_samples(counts_a: &[u64], counts_b: &[u64]) -> Option<Self> {
        if counts_a.len() != counts_b.len() {
            return None;
        }
        Self::from_table(&[counts_a.to_vec(), counts_b.to_vec()])
    }

    /// True when the p-value is below `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
