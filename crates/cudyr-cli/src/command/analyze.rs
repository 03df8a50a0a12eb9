//! Snapshot report for a single categorization export.

use std::path::PathBuf;

use cudyr_metrics::{ingest::RecordSet, snapshot::MetricsSnapshot};

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the categorization CSV export
    pub records: PathBuf,
    /// Dataset label shown in the report (defaults to the file stem)
    #[arg(long)]
    pub label: Option<String>,
    /// Save the snapshot JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    eprintln!("Loading records from {}...", arg.records.display());
    let set = util::read_record_set(&arg.records, arg.label.as_deref())?;
    eprintln!(
        "Loaded {} records ({} flagged categories, {} rejected rows)",
        set.len(),
        set.flagged_categories,
        set.rejected_rows
    );

    let snapshot = MetricsSnapshot::from_record_set(&set);
    print_report(&set, &snapshot);

    if let Some(path) = &arg.output {
        Output::save_json(&snapshot, Some(path.clone()))?;
        eprintln!("Snapshot saved to {}", path.display());
    }

    Ok(())
}

fn print_report(set: &RecordSet, snapshot: &MetricsSnapshot) {
    println!("Categorization Report: {}", snapshot.label);
    println!("==========================================\n");

    println!("Records:             {}", snapshot.total_records);
    println!("Unique patients:     {}", snapshot.unique_patients);
    println!("Well-formed codes:   {}", snapshot.well_formed_records);
    if set.flagged_categories > 0 || set.rejected_rows > 0 {
        println!(
            "Data quality:        {} flagged categories, {} rejected rows",
            set.flagged_categories, set.rejected_rows
        );
    }
    println!();

    println!(
        "High risk (A+B):     {} ({})",
        snapshot.high_risk.numerator,
        util::fmt_pct(snapshot.high_risk_rate())
    );
    println!("Maximum risk (A1):   {}", snapshot.max_risk_records);
    println!("Complexity load:     {}", snapshot.complexity_load);
    if let Some(complexity) = &snapshot.complexity {
        println!(
            "Complexity score:    mean {:.2}, median {:.1}, P90 {:.1}",
            complexity.stats.mean, complexity.p50, complexity.p90
        );
    }
    println!(
        "Avg records/patient: {}",
        util::fmt_value(snapshot.average_records_per_patient())
    );
    println!(
        "Changed category:    {} of {} patients ({})",
        snapshot.changed_category.numerator,
        snapshot.changed_category.denominator,
        util::fmt_pct(snapshot.changed_category_rate())
    );
    println!(
        "Worsened:            {} of {} scoreable patients ({})",
        snapshot.worsened.numerator,
        snapshot.worsened.denominator,
        util::fmt_pct(snapshot.worsened_rate())
    );
    println!();

    println!("Records per month:");
    util::print_histogram(
        snapshot
            .monthly_counts
            .iter()
            .map(|(month, count)| (util::month_name(month), count)),
    );
    println!();

    println!("Category distribution:");
    util::print_histogram(
        snapshot
            .category_distribution
            .iter()
            .map(|(category, count)| (category.to_string(), *count)),
    );
}
