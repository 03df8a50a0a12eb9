//! Staffing-adjusted workload metrics
//!
//! Headcounts are configuration supplied by the caller — nothing here
//! bakes a staffing constant into the computation. Per-nurse loads reuse
//! the guarded [`Ratio`] so a zero headcount fails explicitly.

use serde::{Deserialize, Serialize};

use crate::{
    metric::{EmptyDenominator, Ratio},
    snapshot::MetricsSnapshot,
};

/// Nurse staffing for one unit/dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingConfig {
    /// Nurses assigned to the unit.
    pub nurses: u32,
}

/// Per-nurse workload for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadMetrics {
    /// Label of the underlying dataset.
    pub label: String,
    pub staffing: StaffingConfig,
    /// High-risk categorizations over nurses.
    pub high_risk_per_nurse: Ratio,
    /// Maximum-severity (A1) categorizations over nurses.
    pub max_risk_per_nurse: Ratio,
    /// Aggregate complexity load over nurses.
    pub load_per_nurse: Ratio,
}

impl WorkloadMetrics {
    /// Derives per-nurse loads from a snapshot and explicit staffing.
    #[must_use]
    pub fn from_snapshot(snapshot: &MetricsSnapshot, staffing: StaffingConfig) -> Self {
        let nurses = u64::from(staffing.nurses);
        Self {
            label: snapshot.label.clone(),
            staffing,
            high_risk_per_nurse: Ratio::new(snapshot.high_risk.numerator, nurses),
            max_risk_per_nurse: Ratio::new(snapshot.max_risk_records, nurses),
            load_per_nurse: Ratio::new(snapshot.complexity_load, nurses),
        }
    }
}

/// Between-unit workload comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadComparison {
    pub baseline: WorkloadMetrics,
    pub current: WorkloadMetrics,
}

impl WorkloadComparison {
    #[must_use]
    pub fn new(baseline: WorkloadMetrics, current: WorkloadMetrics) -> Self {
        Self { baseline, current }
    }

    /// How many times the current unit's per-nurse high-risk load exceeds
    /// the baseline unit's.
    ///
    /// Fails when either headcount is zero or the baseline unit saw no
    /// high-risk records (the ratio is undefined, not infinite).
    pub fn high_risk_load_ratio(&self) -> Result<f64, EmptyDenominator> {
        let current = self
            .current
            .high_risk_per_nurse
            .value("current high-risk load per nurse")?;
        let baseline = self
            .baseline
            .high_risk_per_nurse
            .value("baseline high-risk load per nurse")?;
        if baseline == 0.0 {
            return Err(EmptyDenominator {
                metric: "baseline high-risk load per nurse",
            });
        }
        Ok(current / baseline)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::record::CategorizationRecord;

    fn snapshot_with_high_risk(label: &str, high_risk_records: usize) -> MetricsSnapshot {
        let records: Vec<CategorizationRecord> = (0..high_risk_records)
            .map(|i| {
                CategorizationRecord::new(
                    format!("P{i}"),
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                    Some("A1".parse().unwrap()),
                )
            })
            .collect();
        MetricsSnapshot::from_records(label, &records)
    }

    #[test]
    fn test_per_nurse_loads() {
        let snapshot = snapshot_with_high_risk("UTINQX", 6);
        let workload = WorkloadMetrics::from_snapshot(&snapshot, StaffingConfig { nurses: 2 });

        assert_eq!(workload.high_risk_per_nurse, Ratio::new(6, 2));
        assert_eq!(
            workload.high_risk_per_nurse.value("per nurse").unwrap(),
            3.0
        );
        assert_eq!(workload.max_risk_per_nurse.numerator, 6);
        // Six A1 records score 7 each
        assert_eq!(workload.load_per_nurse, Ratio::new(42, 2));
    }

    #[test]
    fn test_zero_nurses_fails_explicitly() {
        let snapshot = snapshot_with_high_risk("UTINQX", 3);
        let workload = WorkloadMetrics::from_snapshot(&snapshot, StaffingConfig { nurses: 0 });
        assert!(workload.high_risk_per_nurse.value("per nurse").is_err());
    }

    #[test]
    fn test_load_ratio_between_units() {
        let busy = WorkloadMetrics::from_snapshot(
            &snapshot_with_high_risk("UTINQX", 12),
            StaffingConfig { nurses: 1 },
        );
        let staffed = WorkloadMetrics::from_snapshot(
            &snapshot_with_high_risk("UTIQX", 12),
            StaffingConfig { nurses: 3 },
        );
        let comparison = WorkloadComparison::new(staffed, busy);

        // 12 per nurse vs 4 per nurse
        assert_eq!(comparison.high_risk_load_ratio().unwrap(), 3.0);
    }

    #[test]
    fn test_quiet_baseline_ratio_is_undefined() {
        let quiet = WorkloadMetrics::from_snapshot(
            &snapshot_with_high_risk("UTIQX", 0),
            StaffingConfig { nurses: 3 },
        );
        let busy = WorkloadMetrics::from_snapshot(
            &snapshot_with_high_risk("UTINQX", 5),
            StaffingConfig { nurses: 1 },
        );
        let comparison = WorkloadComparison::new(quiet, busy);
        assert!(comparison.high_risk_load_ratio().is_err());
    }
}
