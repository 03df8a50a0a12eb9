//! Rank-based two-sample comparison (Mann–Whitney U test).
//!
//! Compares two independent numeric samples without assuming normality.
//! The U statistic is computed from pooled ranks (ties receive their
//! average rank); the two-sided p-value comes from the tie-corrected
//! normal approximation with continuity correction, with the distribution
//! tail delegated to [`statrs`].

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Result of a two-sided Mann–Whitney U test.
///
/// # Examples
///
/// ```
/// use cudyr_stats::rank_sum::RankSumTest;
///
/// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
/// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
/// let test = RankSumTest::new(&a, &b).unwrap();
///
/// assert_eq!(test.u_statistic, 0.0);
/// assert!(test.is_significant(0.05));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSumTest {
    /// Size of the first sample.
    pub n_a: usize,
    /// Size of the second sample.
    pub n_b: usize,
    /// U statistic for the first sample.
    pub u_statistic: f64,
    /// Standardized test statistic under the normal approximation.
    pub z_score: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl RankSumTest {
    /// Runs the test on two independent samples.
    ///
    /// # Returns
    ///
    /// * `Some(RankSumTest)` - when both samples are non-empty and the
    ///   pooled values are not all identical
    /// * `None` - when either sample is empty or the rank variance is zero
    ///   (every pooled value tied), in which case no comparison is possible
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(sample_a: &[f64], sample_b: &[f64]) -> Option<Self> {
        let n_a = sample_a.len();
        let n_b = sample_b.len();
        if n_a == 0 || n_b == 0 {
            return None;
        }

        let mut pooled: Vec<(f64, bool)> = sample_a
            .iter()
            .map(|&v| (v, true))
            .chain(sample_b.iter().map(|&v| (v, false)))
            .collect();
        pooled.sort_by(|x, y| x.0.total_cmp(&y.0));

        // Walk tie groups: members share the average of their ranks, and
        // each group of size t contributes t^3 - t to the tie correction.
        let n = n_a + n_b;
        let mut rank_sum_a = 0.0;
        let mut tie_correction = 0.0;
        let mut i = 0;
        while i < n {
            let mut j = i;
            while j < n && pooled[j].0.total_cmp(&pooled[i].0) == Ordering::Equal {
                j += 1;
            }
            let avg_rank = (i + j + 1) as f64 / 2.0;
            for item in &pooled[i..j] {
                if item.1 {
                    rank_sum_a += avg_rank;
                }
            }
            let t = (j - i) as f64;
            tie_correction += t * t * t - t;
            i = j;
        }

        let n_a_f = n_a as f64;
        let n_b_f = n_b as f64;
        let n_f = n as f64;
        let u_statistic = rank_sum_a - n_a_f * (n_a_f + 1.0) / 2.0;
        let mean_u = n_a_f * n_b_f / 2.0;
        let variance =
            n_a_f * n_b_f / 12.0 * ((n_f + 1.0) - tie_correction / (n_f * (n_f - 1.0)));
        if variance <= 0.0 {
            return None;
        }

        // Continuity correction pulls the statistic half a rank toward the mean.
        let diff = u_statistic - mean_u;
        let correction = match diff.total_cmp(&0.0) {
            Ordering::Greater => -0.5,
            Ordering::Less => 0.5,
            Ordering::Equal => 0.0,
        };
        let z_score = (diff + correction) / variance.sqrt();

        let normal = Normal::new(0.0, 1.0).ok()?;
        let p_value = (2.0 * normal.cdf(-z_score.abs())).min(1.0);

        Some(Self {
            n_a,
            n_b,
            u_statistic,
            z_score,
            p_value,
        })
    }

    /// True when the two-sided p-value is below `alpha`.
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
