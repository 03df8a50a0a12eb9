//! CSV ingestion of categorization exports
//!
//! The input interface is a flat table with a `patient_id,date,category`
//! header; dates use the fixed `%d-%m-%Y` format of the source exports.
//!
//! Rows are validated individually:
//!
//! - parseable date + well-formed category → accepted
//! - parseable date + empty category field → accepted with no category
//!   (counts toward raw totals only)
//! - parseable date + malformed category → accepted with no category,
//!   counted as *flagged*
//! - missing patient id, unparseable date, or unreadable row → *rejected*
//!
//! A bad row never aborts the run and never silently miscounts; the
//! flagged/rejected tallies are carried on the resulting [`RecordSet`].

use std::{fs::File, io, path::Path};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::CategorizationRecord;

/// Date format used by the categorization exports (`31-12-2025`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Failure affecting an entire source, not a single row.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum IngestError {
    /// The file could not be opened.
    #[display("failed to open {path}: {source}")]
    Open { path: String, source: io::Error },
    /// The CSV stream itself became unreadable (I/O failure mid-file).
    #[display("failed to read CSV rows: {source}")]
    Csv { source: csv::Error },
}

/// A labeled, immutable collection of categorization records for one
/// dataset (typically one unit and year), plus ingestion counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Dataset label used in reports (e.g. `"UTINQX 2025"`).
    pub label: String,
    /// Accepted records, in source order.
    pub records: Vec<CategorizationRecord>,
    /// Rows whose category field was present but not `{A-D}{1-3}`.
    pub flagged_categories: u64,
    /// Rows dropped entirely (missing id, unparseable date, bad shape).
    pub rejected_rows: u64,
}

/// Raw CSV row before validation.
#[derive(Debug, Deserialize)]
struct RawRow {
    patient_id: String,
    date: String,
    category: Option<String>,
}

impl RecordSet {
    /// Wraps already-validated records with a label.
    #[must_use]
    pub fn from_records(label: impl Into<String>, records: Vec<CategorizationRecord>) -> Self {
        Self {
            label: label.into(),
            records,
            flagged_categories: 0,
            rejected_rows: 0,
        }
    }

    /// Reads a CSV file from disk.
    pub fn from_csv_path(
        label: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| IngestError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_csv_reader(label, io::BufReader::new(file))
    }

    /// Reads CSV rows from any reader, applying the per-row policy above.
    pub fn from_csv_reader<R>(label: impl Into<String>, reader: R) -> Result<Self, IngestError>
    where
        R: io::Read,
    {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();
        let mut flagged_categories = 0;
        let mut rejected_rows = 0;

        for row in csv_reader.deserialize::<RawRow>() {
            let row = match row {
                Ok(row) => row,
                Err(error) => {
                    // An I/O failure poisons the whole stream; a row that
                    // merely fails to deserialize is rejected and skipped.
                    if matches!(error.kind(), csv::ErrorKind::Io(_)) {
                        return Err(IngestError::Csv { source: error });
                    }
                    rejected_rows += 1;
                    continue;
                }
            };

            let patient_id = row.patient_id.trim();
            if patient_id.is_empty() {
                rejected_rows += 1;
                continue;
            }
            let Ok(date) = NaiveDate::parse_from_str(row.date.trim(), DATE_FORMAT) else {
                rejected_rows += 1;
                continue;
            };
            let category = match row.category.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(code) => match code.parse() {
                    Ok(category) => Some(category),
                    Err(_) => {
                        flagged_categories += 1;
                        None
                    }
                },
            };
            records.push(CategorizationRecord::new(patient_id, date, category));
        }

        Ok(Self {
            label: label.into(),
            records,
            flagged_categories,
            rejected_rows,
        })
    }

    /// Number of accepted records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Complexity scores of every well-formed record, in source order.
    #[must_use]
    pub fn complexity_scores(&self) -> Vec<f64> {
        self.records
            .iter()
            .filter_map(CategorizationRecord::complexity_score)
            .map(f64::from)
            .collect()
    }
}
