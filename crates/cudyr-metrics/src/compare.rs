//! Cross-dataset comparison
//!
//! Compares two record sets (baseline vs current — two years of one unit,
//! or two units over the same period): growth percentages, month-aligned
//! count differences, and two-sample hypothesis tests over complexity
//! scores (rank-sum) and category distributions (chi-squared).

use std::collections::BTreeSet;

use cudyr_stats::{chi_squared::ChiSquaredTest, rank_sum::RankSumTest};
use serde::{Deserialize, Serialize};

use crate::{
    category::Category,
    ingest::RecordSet,
    metric::{EmptyDenominator, MONTHS_PER_YEAR},
    snapshot::MetricsSnapshot,
};

/// Comparison of two datasets.
///
/// Embeds both snapshots so one output file carries everything a report
/// consumer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetComparison {
    pub baseline: MetricsSnapshot,
    pub current: MetricsSnapshot,
    /// Month-aligned record count difference (current − baseline), always
    /// over the full 1-12 domain.
    pub monthly_count_diff: [i64; MONTHS_PER_YEAR],
    /// Rank-sum test over the two complexity score samples; `None` when
    /// either sample is empty or every pooled score is tied.
    pub complexity_test: Option<RankSumTest>,
    /// Chi-squared independence test over the two category distributions;
    /// `None` when the reduced contingency table is degenerate.
    pub category_test: Option<ChiSquaredTest>,
}

impl DatasetComparison {
    /// Computes both snapshots and every cross-dataset metric.
    #[must_use]
    pub fn new(baseline: &RecordSet, current: &RecordSet) -> Self {
        let baseline_snapshot = MetricsSnapshot::from_record_set(baseline);
        let current_snapshot = MetricsSnapshot::from_record_set(current);

        let monthly_count_diff = current_snapshot
            .monthly_counts
            .diff(&baseline_snapshot.monthly_counts);

        let complexity_test = RankSumTest::new(
            &baseline.complexity_scores(),
            &current.complexity_scores(),
        );
        let (baseline_counts, current_counts) =
            aligned_category_counts(&baseline_snapshot, &current_snapshot);
        let category_test = ChiSquaredTest::from_two_samples(&baseline_counts, &current_counts);

        Self {
            baseline: baseline_snapshot,
            current: current_snapshot,
            monthly_count_diff,
            complexity_test,
            category_test,
        }
    }

    /// Percentage growth in total records, current over baseline.
    pub fn record_growth_pct(&self) -> Result<f64, EmptyDenominator> {
        growth_pct(
            self.baseline.total_records,
            self.current.total_records,
            "record growth",
        )
    }

    /// Percentage growth in unique patients, current over baseline.
    pub fn patient_growth_pct(&self) -> Result<f64, EmptyDenominator> {
        growth_pct(
            self.baseline.unique_patients,
            self.current.unique_patients,
            "patient growth",
        )
    }

    /// Percentage growth in aggregate complexity load.
    pub fn complexity_load_growth_pct(&self) -> Result<f64, EmptyDenominator> {
        growth_pct(
            self.baseline.complexity_load,
            self.current.complexity_load,
            "complexity load growth",
        )
    }

    /// Difference in high-risk rate, in percentage points (current −
    /// baseline). Fails when either dataset has no well-formed records.
    pub fn high_risk_rate_delta(&self) -> Result<f64, EmptyDenominator> {
        Ok(self.current.high_risk_rate()? - self.baseline.high_risk_rate()?)
    }
}

/// Relative growth in percent, guarded against an empty baseline.
#[expect(clippy::cast_precision_loss)]
fn growth_pct(baseline: u64, current: u64, metric: &'static str) -> Result<f64, EmptyDenominator> {
    if baseline == 0 {
        return Err(EmptyDenominator { metric });
    }
    Ok((current as f64 - baseline as f64) / baseline as f64 * 100.0)
}

/// Category counts from both distributions, aligned over the union of
/// observed categories in severity order.
fn aligned_category_counts(
    baseline: &MetricsSnapshot,
    current: &MetricsSnapshot,
) -> (Vec<u64>, Vec<u64>) {
    let categories: BTreeSet<Category> = baseline
        .category_distribution
        .keys()
        .chain(current.category_distribution.keys())
        .copied()
        .collect();
    categories
        .iter()
        .map(|category| {
            (
                baseline
                    .category_distribution
                    .get(category)
                    .copied()
                    .unwrap_or(0),
                current
                    .category_distribution
                    .get(category)
                    .copied()
                    .unwrap_or(0),
            )
        })
        .unzip()
}
