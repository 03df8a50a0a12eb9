//! Metrics engine for intensive-care categorization data (CUDYR scale)
//!
//! This crate turns tabular patient-categorization records into an
//! immutable [`snapshot::MetricsSnapshot`]: counts, rates, monthly series,
//! per-patient trajectory statistics, and cross-dataset comparisons.
//!
//! # Overview
//!
//! The pipeline is a linear batch:
//!
//! 1. **Ingest** ([`ingest::RecordSet`]): Load a CSV export, validating
//!    each row individually (bad rows are flagged or rejected, never
//!    silently miscounted)
//! 2. **Trajectories** ([`trajectory::PatientTrajectory`]): Group records
//!    per patient, ordered by date
//! 3. **Snapshot** ([`snapshot::MetricsSnapshot`]): Compute every metric in
//!    one pass; rates carry their denominators and refuse to divide by zero
//! 4. **Compare** ([`compare::DatasetComparison`]): Growth, month-aligned
//!    differences, and two-sample hypothesis tests between datasets
//! 5. **Workload** ([`workload::WorkloadMetrics`]): Staffing-adjusted
//!    per-nurse loads from caller-supplied headcounts
//!
//! Every computation is a deterministic, stateless fold over the input
//! collection; re-running with the same input yields the same snapshot.
//!
//! # The CUDYR code
//!
//! A category is a two-character code: risk tier `A`-`D` (A highest) plus
//! dependency tier `1`-`3` (1 highest), e.g. `"A1"` for maximum risk and
//! maximum dependency. Anything else is malformed and excluded from
//! risk/complexity computations (but kept in raw totals).
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use cudyr_metrics::{record::CategorizationRecord, snapshot::MetricsSnapshot};
//!
//! let records = vec![
//!     CategorizationRecord::new(
//!         "P1",
//!         NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
//!         Some("B1".parse().unwrap()),
//!     ),
//!     CategorizationRecord::new(
//!         "P1",
//!         NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
//!         Some("A1".parse().unwrap()),
//!     ),
//! ];
//!
//! let snapshot = MetricsSnapshot::from_records("UTINQX 2025", &records);
//! assert_eq!(snapshot.total_records, 2);
//! assert_eq!(snapshot.unique_patients, 1);
//! assert_eq!(snapshot.high_risk.numerator, 2);
//! ```

pub mod category;
pub mod compare;
pub mod ingest;
pub mod metric;
pub mod record;
pub mod snapshot;
pub mod trajectory;
pub mod workload;
