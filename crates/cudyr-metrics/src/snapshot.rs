//! The immutable metrics snapshot
//!
//! [`MetricsSnapshot`] holds every metric computed over one record set.
//! Rates are stored as numerator/denominator pairs ([`Ratio`]) so the
//! snapshot itself can always be computed — a metric with no eligible
//! records fails only when its value is accessed, and fails explicitly
//! with [`EmptyDenominator`]. One empty slice never prevents reporting the
//! rest of the dataset.
//!
//! Snapshots are recomputed fully on each run. The computation is a
//! deterministic fold: identical inputs produce identical snapshots.

use std::collections::BTreeMap;

use cudyr_stats::{descriptive::DescriptiveStats, percentiles::Percentiles};
use serde::{Deserialize, Serialize};

use crate::{
    category::Category,
    ingest::RecordSet,
    metric::{EmptyDenominator, MONTHS_PER_YEAR, MonthlySeries, Ratio},
    record::CategorizationRecord,
    trajectory::PatientTrajectory,
};

/// Summary of the per-record complexity score distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexitySummary {
    pub stats: DescriptiveStats,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

impl ComplexitySummary {
    /// Summarizes a set of complexity scores; `None` when empty.
    #[must_use]
    pub fn from_scores(scores: &[f64]) -> Option<Self> {
        let mut sorted = scores.to_vec();
        sorted.sort_by(f64::total_cmp);
        let stats = DescriptiveStats::from_sorted(&sorted)?;
        let percentiles = Percentiles::from_sorted(&sorted, &[25.0, 50.0, 75.0, 90.0, 95.0]);
        Some(Self {
            stats,
            p25: percentiles.get(25.0).unwrap(),
            p50: percentiles.get(50.0).unwrap(),
            p75: percentiles.get(75.0).unwrap(),
            p90: percentiles.get(90.0).unwrap(),
            p95: percentiles.get(95.0).unwrap(),
        })
    }
}

/// Scalar or per-month series value in the flat metric view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Count(u64),
    Value(f64),
    Series([u64; MONTHS_PER_YEAR]),
}

/// Immutable snapshot of every metric for one dataset.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use cudyr_metrics::{record::CategorizationRecord, snapshot::MetricsSnapshot};
///
/// let date = |d| NaiveDate::from_ymd_opt(2025, 1, d).unwrap();
/// let records = vec![
///     CategorizationRecord::new("P1", date(1), Some("B1".parse().unwrap())),
///     CategorizationRecord::new("P1", date(2), Some("A1".parse().unwrap())),
///     CategorizationRecord::new("P2", date(1), Some("C2".parse().unwrap())),
/// ];
///
/// let snapshot = MetricsSnapshot::from_records("UTINQX 2025", &records);
/// assert_eq!(snapshot.total_records, 3);
/// assert_eq!(snapshot.unique_patients, 2);
/// assert_eq!(snapshot.high_risk.numerator, 2);
/// assert_eq!(snapshot.worsened.numerator, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Dataset label, carried through from the record set.
    pub label: String,
    /// All accepted records, missing/malformed categories included.
    pub total_records: u64,
    /// Count of distinct patient identifiers.
    pub unique_patients: u64,
    /// Records whose category is well-formed.
    pub well_formed_records: u64,
    /// Record count per calendar month (zero months present).
    pub monthly_counts: MonthlySeries,
    /// High-risk records over well-formed records.
    pub high_risk: Ratio,
    /// Per-month high-risk ratios over per-month well-formed records.
    pub monthly_high_risk: [Ratio; MONTHS_PER_YEAR],
    /// Records per well-formed category, iterating in severity order
    /// (A1 first, D3 last).
    pub category_distribution: BTreeMap<Category, u64>,
    /// Records at maximum severity (A1).
    pub max_risk_records: u64,
    /// Sum of complexity scores over well-formed records.
    pub complexity_load: u64,
    /// Per-month complexity load.
    pub monthly_complexity_load: MonthlySeries,
    /// Distribution summary of per-record complexity scores, when any
    /// record is well-formed.
    pub complexity: Option<ComplexitySummary>,
    /// Patients observed in more than one distinct category, over all
    /// unique patients.
    pub changed_category: Ratio,
    /// Worsened patients over scoreable multi-record patients.
    pub worsened: Ratio,
    /// Total records over unique patients (length-of-stay proxy under one
    /// assessment per patient per day).
    pub records_per_patient: Ratio,
}

impl MetricsSnapshot {
    /// Computes the snapshot for a labeled record set.
    #[must_use]
    pub fn from_record_set(set: &RecordSet) -> Self {
        Self::from_records(set.label.clone(), &set.records)
    }

    /// Computes the snapshot for a slice of records.
    #[must_use]
    pub fn from_records(label: impl Into<String>, records: &[CategorizationRecord]) -> Self {
        let total_records = records.len() as u64;
        let monthly_counts =
            MonthlySeries::from_months(records.iter().map(CategorizationRecord::month));

        let mut well_formed_records = 0;
        let mut high_risk_count = 0;
        let mut monthly_well_formed = MonthlySeries::zero();
        let mut monthly_high_risk_counts = MonthlySeries::zero();
        let mut category_distribution: BTreeMap<Category, u64> = BTreeMap::new();
        let mut complexity_load = 0;
        let mut monthly_complexity_load = MonthlySeries::zero();
        let mut scores = Vec::new();

        for record in records {
            let Some(category) = record.category else {
                continue;
            };
            well_formed_records += 1;
            monthly_well_formed.add(record.month(), 1);
            *category_distribution.entry(category).or_insert(0) += 1;

            let score = category.complexity_score();
            complexity_load += u64::from(score);
            monthly_complexity_load.add(record.month(), u64::from(score));
            scores.push(f64::from(score));

            if category.is_high_risk() {
                high_risk_count += 1;
                monthly_high_risk_counts.add(record.month(), 1);
            }
        }

        let max_risk_records = category_distribution
            .get(&Category::MAX_RISK)
            .copied()
            .unwrap_or(0);

        let trajectories = PatientTrajectory::collect(records);
        let unique_patients = trajectories.len() as u64;
        let changed_count = trajectories
            .iter()
            .filter(|trajectory| trajectory.changes_category())
            .count() as u64;
        let mut scoreable_patients = 0;
        let mut worsened_count = 0;
        for trajectory in &trajectories {
            if let Some(worsens) = trajectory.worsens() {
                scoreable_patients += 1;
                if worsens {
                    worsened_count += 1;
                }
            }
        }

        let monthly_high_risk = std::array::from_fn(|index| {
            let month = u32::try_from(index + 1).unwrap_or(1);
            Ratio::new(
                monthly_high_risk_counts.get(month),
                monthly_well_formed.get(month),
            )
        });

        Self {
            label: label.into(),
            total_records,
            unique_patients,
            well_formed_records,
            monthly_counts,
            high_risk: Ratio::new(high_risk_count, well_formed_records),
            monthly_high_risk,
            category_distribution,
            max_risk_records,
            complexity_load,
            monthly_complexity_load,
            complexity: ComplexitySummary::from_scores(&scores),
            changed_category: Ratio::new(changed_count, unique_patients),
            worsened: Ratio::new(worsened_count, scoreable_patients),
            records_per_patient: Ratio::new(total_records, unique_patients),
        }
    }

    /// High-risk share of well-formed records, as a percentage.
    pub fn high_risk_rate(&self) -> Result<f64, EmptyDenominator> {
        self.high_risk.percent("high-risk rate")
    }

    /// Share of patients observed in more than one category.
    pub fn changed_category_rate(&self) -> Result<f64, EmptyDenominator> {
        self.changed_category.percent("category-change rate")
    }

    /// Share of scoreable patients whose severity strictly increased.
    pub fn worsened_rate(&self) -> Result<f64, EmptyDenominator> {
        self.worsened.percent("worsening rate")
    }

    /// Average number of records per patient.
    pub fn average_records_per_patient(&self) -> Result<f64, EmptyDenominator> {
        self.records_per_patient.value("records per patient")
    }

    /// Flat name → value view for external report consumers.
    ///
    /// Rates with an empty denominator are omitted rather than reported as
    /// zero; consumers must treat absence as "no data". Per-category
    /// counts appear as `category_A1`, `category_A2`, ....
    #[must_use]
    pub fn to_named_metrics(&self) -> BTreeMap<String, MetricValue> {
        let mut metrics = BTreeMap::new();
        let mut count = |name: &str, value: u64| {
            metrics.insert(name.to_owned(), MetricValue::Count(value));
        };
        count("total_records", self.total_records);
        count("unique_patients", self.unique_patients);
        count("well_formed_records", self.well_formed_records);
        count("high_risk_records", self.high_risk.numerator);
        count("max_risk_records", self.max_risk_records);
        count("complexity_load", self.complexity_load);
        count("changed_category_patients", self.changed_category.numerator);
        count("worsened_patients", self.worsened.numerator);

        metrics.insert(
            "monthly_counts".to_owned(),
            MetricValue::Series(self.monthly_counts.0),
        );
        metrics.insert(
            "monthly_complexity_load".to_owned(),
            MetricValue::Series(self.monthly_complexity_load.0),
        );
        for (category, count) in &self.category_distribution {
            metrics.insert(format!("category_{category}"), MetricValue::Count(*count));
        }

        let mut rate = |name: &str, value: Result<f64, EmptyDenominator>| {
            if let Ok(value) = value {
                metrics.insert(name.to_owned(), MetricValue::Value(value));
            }
        };
        rate("high_risk_rate_pct", self.high_risk_rate());
        rate("changed_category_rate_pct", self.changed_category_rate());
        rate("worsened_rate_pct", self.worsened_rate());
        rate(
            "average_records_per_patient",
            self.average_records_per_patient(),
        );
        if let Some(complexity) = &self.complexity {
            rate("mean_complexity", Ok(complexity.stats.mean));
            rate("median_complexity", Ok(complexity.p50));
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(patient: &str, month: u32, day: u32, code: Option<&str>) -> CategorizationRecord {
        CategorizationRecord::new(
            patient,
            NaiveDate::from_ymd_opt(2025, month, day).unwrap(),
            code.map(|c| c.parse::<Category>().unwrap()),
        )
    }

    // P1 worsens from B1 (6) to A1 (7); P2 has a single record.
    #[test]
    fn test_three_record_example() {
        let records = vec![
            record("P1", 1, 1, Some("B1")),
            record("P1", 1, 2, Some("A1")),
            record("P2", 1, 1, Some("C2")),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);

        assert_eq!(snapshot.total_records, 3);
        assert_eq!(snapshot.unique_patients, 2);
        assert_eq!(snapshot.high_risk.numerator, 2);
        assert_eq!(snapshot.changed_category, Ratio::new(1, 2));
        assert_eq!(snapshot.worsened, Ratio::new(1, 1));
    }

    #[test]
    fn test_monthly_counts_sum_to_total_and_include_zero_months() {
        let records = vec![
            record("P1", 1, 1, Some("B1")),
            record("P2", 3, 1, Some("C1")),
            record("P3", 3, 2, None),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);

        assert_eq!(snapshot.monthly_counts.total(), snapshot.total_records);
        assert_eq!(snapshot.monthly_counts.get(5), 0);
        assert_eq!(snapshot.monthly_counts.get(3), 2);
    }

    #[test]
    fn test_unique_patients_bounded_by_total() {
        let one_each = vec![record("P1", 1, 1, None), record("P2", 1, 2, None)];
        let snapshot = MetricsSnapshot::from_records("example", &one_each);
        assert_eq!(snapshot.unique_patients, snapshot.total_records);

        let repeat = vec![record("P1", 1, 1, None), record("P1", 1, 2, None)];
        let snapshot = MetricsSnapshot::from_records("example", &repeat);
        assert!(snapshot.unique_patients < snapshot.total_records);
    }

    #[test]
    fn test_risk_partition_over_well_formed_records() {
        let records = vec![
            record("P1", 1, 1, Some("A1")),
            record("P2", 1, 1, Some("B3")),
            record("P3", 1, 1, Some("C1")),
            record("P4", 1, 1, None),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);

        assert_eq!(snapshot.well_formed_records, 3);
        assert_eq!(snapshot.high_risk, Ratio::new(2, 3));
        let non_high_risk = snapshot.well_formed_records - snapshot.high_risk.numerator;
        assert_eq!(snapshot.high_risk.numerator + non_high_risk, 3);
        // Missing category stays in the raw total
        assert_eq!(snapshot.total_records, 4);
    }

    #[test]
    fn test_malformed_excluded_from_distribution_and_complexity() {
        let records = vec![
            record("P1", 1, 1, Some("A1")),
            record("P2", 1, 1, None),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);

        assert_eq!(snapshot.category_distribution.len(), 1);
        assert_eq!(snapshot.complexity_load, 7);
        assert_eq!(snapshot.max_risk_records, 1);
        let complexity = snapshot.complexity.unwrap();
        assert_eq!(complexity.stats.count, 1);
        assert_eq!(complexity.stats.mean, 7.0);
    }

    #[test]
    fn test_distribution_iterates_in_severity_order() {
        let records = vec![
            record("P1", 1, 1, Some("D3")),
            record("P2", 1, 1, Some("A1")),
            record("P3", 1, 1, Some("B2")),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);
        let order: Vec<String> = snapshot
            .category_distribution
            .keys()
            .map(Category::to_string)
            .collect();
        assert_eq!(order, vec!["A1", "B2", "D3"]);
    }

    #[test]
    fn test_empty_dataset_rates_fail_explicitly() {
        let snapshot = MetricsSnapshot::from_records("empty", &[]);

        assert_eq!(snapshot.total_records, 0);
        let error = snapshot.high_risk_rate().unwrap_err();
        assert_eq!(error.metric, "high-risk rate");
        assert!(snapshot.average_records_per_patient().is_err());
        assert!(snapshot.worsened_rate().is_err());
        assert!(snapshot.complexity.is_none());
    }

    #[test]
    fn test_monthly_high_risk_denominators_are_per_month() {
        let records = vec![
            record("P1", 2, 1, Some("A1")),
            record("P2", 2, 2, Some("C1")),
            record("P3", 6, 1, Some("D2")),
        ];
        let snapshot = MetricsSnapshot::from_records("example", &records);

        assert_eq!(snapshot.monthly_high_risk[1], Ratio::new(1, 2));
        assert_eq!(snapshot.monthly_high_risk[5], Ratio::new(0, 1));
        // An empty month is undefined, not zero
        assert!(snapshot.monthly_high_risk[0].value("rate").is_err());
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let records = vec![
            record("P1", 1, 1, Some("B1")),
            record("P1", 2, 1, Some("A2")),
            record("P2", 3, 1, None),
            record("P3", 3, 2, Some("D1")),
        ];
        let first = MetricsSnapshot::from_records("example", &records);
        let second = MetricsSnapshot::from_records("example", &records);
        assert_eq!(first, second);

        let json_first = serde_json::to_string(&first).unwrap();
        let json_second = serde_json::to_string(&second).unwrap();
        assert_eq!(json_first, json_second);
    }

    #[test]
    fn test_named_metrics_omit_undefined_rates() {
        let empty = MetricsSnapshot::from_records("empty", &[]);
        let metrics = empty.to_named_metrics();
        assert!(metrics.contains_key("total_records"));
        assert!(!metrics.contains_key("high_risk_rate_pct"));
        assert!(!metrics.contains_key("average_records_per_patient"));

        let records = vec![record("P1", 1, 1, Some("A1"))];
        let metrics = MetricsSnapshot::from_records("one", &records).to_named_metrics();
        assert_eq!(
            metrics.get("high_risk_rate_pct"),
            Some(&MetricValue::Value(100.0))
        );
        assert_eq!(metrics.get("category_A1"), Some(&MetricValue::Count(1)));
    }
}
