//! Per-patient trajectories
//!
//! A trajectory is the time-ordered sequence of one patient's
//! categorization records. Trajectories drive two patient-level metrics:
//!
//! - **Category change**: more than one distinct well-formed category
//!   observed across the stay.
//! - **Worsening**: the complexity score of the last record strictly
//!   exceeds that of the first. Only patients with at least two records
//!   whose first and last both carry a well-formed category are scoreable;
//!   everyone else is excluded from both numerator and denominator.

use std::collections::{BTreeMap, BTreeSet};

use crate::record::CategorizationRecord;

/// Time-ordered sequence of one patient's categorization records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientTrajectory {
    pub patient_id: String,
    /// Records ordered by date ascending; same-date records keep source
    /// order.
    pub records: Vec<CategorizationRecord>,
}

impl PatientTrajectory {
    /// Groups records by patient and orders each trajectory by date.
    ///
    /// Trajectories are returned in patient-id order, so the grouping is
    /// deterministic for identical inputs.
    #[must_use]
    pub fn collect(records: &[CategorizationRecord]) -> Vec<PatientTrajectory> {
        let mut by_patient: BTreeMap<&str, Vec<CategorizationRecord>> = BTreeMap::new();
        for record in records {
            by_patient
                .entry(record.patient_id.as_str())
                .or_default()
                .push(record.clone());
        }
        by_patient
            .into_iter()
            .map(|(patient_id, mut records)| {
                records.sort_by_key(|record| record.date);
                PatientTrajectory {
                    patient_id: patient_id.to_owned(),
                    records,
                }
            })
            .collect()
    }

    /// Distinct well-formed categories observed across the stay.
    #[must_use]
    pub fn distinct_categories(&self) -> usize {
        self.records
            .iter()
            .filter_map(|record| record.category)
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Whether the patient was observed in more than one category.
    ///
    /// A single-record patient can never change category.
    #[must_use]
    pub fn changes_category(&self) -> bool {
        self.distinct_categories() > 1
    }

    /// First and last complexity scores, when the trajectory is scoreable.
    ///
    /// `None` for single-record patients and for trajectories whose first
    /// or last record lacks a well-formed category.
    #[must_use]
    pub fn endpoint_scores(&self) -> Option<(u8, u8)> {
        if self.records.len() < 2 {
            return None;
        }
        let first = self.records.first()?.complexity_score()?;
        let last = self.records.last()?.complexity_score()?;
        Some((first, last))
    }

    /// Whether the composite severity strictly increased from the first to
    /// the last record. `None` when the trajectory is not scoreable.
    #[must_use]
    pub fn worsens(&self) -> Option<bool> {
        self.endpoint_scores().map(|(first, last)| last > first)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::category::Category;

    fn record(patient: &str, day: u32, code: Option<&str>) -> CategorizationRecord {
        CategorizationRecord::new(
            patient,
            NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            code.map(|c| c.parse::<Category>().unwrap()),
        )
    }

    #[test]
    fn test_collect_groups_and_orders_by_date() {
        let records = vec![
            record("P2", 5, Some("C1")),
            record("P1", 3, Some("A1")),
            record("P1", 1, Some("B1")),
        ];
        let trajectories = PatientTrajectory::collect(&records);
        assert_eq!(trajectories.len(), 2);
        assert_eq!(trajectories[0].patient_id, "P1");
        assert_eq!(
            trajectories[0].records[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(
            trajectories[0].records[1].date,
            NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()
        );
        assert_eq!(trajectories[1].patient_id, "P2");
    }

    #[test]
    fn test_single_record_patient_never_changes_or_worsens() {
        let trajectories = PatientTrajectory::collect(&[record("P1", 1, Some("A1"))]);
        let trajectory = &trajectories[0];
        assert!(!trajectory.changes_category());
        assert_eq!(trajectory.endpoint_scores(), None);
        assert_eq!(trajectory.worsens(), None);
    }

    #[test]
    fn test_worsening_is_strict_increase() {
        // B1 scores 6, A1 scores 7
        let worsening = PatientTrajectory::collect(&[
            record("P1", 1, Some("B1")),
            record("P1", 2, Some("A1")),
        ]);
        assert_eq!(worsening[0].worsens(), Some(true));

        let stable = PatientTrajectory::collect(&[
            record("P1", 1, Some("B1")),
            record("P1", 2, Some("B1")),
        ]);
        assert_eq!(stable[0].worsens(), Some(false));

        let improving = PatientTrajectory::collect(&[
            record("P1", 1, Some("A1")),
            record("P1", 2, Some("B1")),
        ]);
        assert_eq!(improving[0].worsens(), Some(false));
    }

    #[test]
    fn test_unscoreable_endpoint_excludes_patient() {
        let trajectories = PatientTrajectory::collect(&[
            record("P1", 1, None),
            record("P1", 2, Some("A1")),
        ]);
        assert_eq!(trajectories[0].endpoint_scores(), None);
    }

    #[test]
    fn test_distinct_categories_ignore_missing() {
        let trajectories = PatientTrajectory::collect(&[
            record("P1", 1, Some("B1")),
            record("P1", 2, None),
            record("P1", 3, Some("B1")),
        ]);
        assert_eq!(trajectories[0].distinct_categories(), 1);
        assert!(!trajectories[0].changes_category());
    }

    #[test]
    fn test_middle_records_do_not_affect_worsening() {
        // D3 (2) -> A1 (7) -> C2 (4): endpoints 2 vs 4, still worsening
        let trajectories = PatientTrajectory::collect(&[
            record("P1", 1, Some("D3")),
            record("P1", 2, Some("A1")),
            record("P1", 3, Some("C2")),
        ]);
        assert_eq!(trajectories[0].endpoint_scores(), Some((2, 4)));
        assert_eq!(trajectories[0].worsens(), Some(true));
    }
}
