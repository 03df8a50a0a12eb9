//! The patient-day assessment record

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::category::Category;

/// One patient-day assessment row.
///
/// `category` is `None` when the source field was missing or malformed;
/// such records stay in raw totals but are excluded from risk and
/// complexity computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizationRecord {
    /// Opaque stable patient identifier (unique per patient, not per record).
    pub patient_id: String,
    /// Calendar date of the assessment.
    pub date: NaiveDate,
    /// Validated category code, if well-formed in the source.
    pub category: Option<Category>,
}

impl CategorizationRecord {
    #[must_use]
    pub fn new(patient_id: impl Into<String>, date: NaiveDate, category: Option<Category>) -> Self {
        Self {
            patient_id: patient_id.into(),
            date,
            category,
        }
    }

    /// Calendar month of the assessment (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Complexity score, when the category is well-formed.
    #[must_use]
    pub fn complexity_score(&self) -> Option<u8> {
        self.category.map(Category::complexity_score)
    }

    /// Missing or malformed categories are never high risk.
    #[must_use]
    pub fn is_high_risk(&self) -> bool {
        self.category.is_some_and(Category::is_high_risk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_record_without_category_is_not_high_risk() {
        let record = CategorizationRecord::new("P1", date(2025, 3, 14), None);
        assert!(!record.is_high_risk());
        assert_eq!(record.complexity_score(), None);
        assert_eq!(record.month(), 3);
    }

    #[test]
    fn test_record_with_category_scores() {
        let record =
            CategorizationRecord::new("P1", date(2025, 7, 1), Some("A2".parse().unwrap()));
        assert!(record.is_high_risk());
        assert_eq!(record.complexity_score(), Some(6));
    }
}
