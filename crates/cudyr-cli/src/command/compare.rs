//! Cross-dataset comparison report.

use std::path::PathBuf;

use anyhow::bail;
use cudyr_metrics::{
    compare::DatasetComparison,
    workload::{StaffingConfig, WorkloadComparison, WorkloadMetrics},
};
use cudyr_stats::{chi_squared::ChiSquaredTest, rank_sum::RankSumTest};
use serde::Serialize;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CompareArg {
    /// Baseline CSV export (last year, or the comparison unit)
    pub baseline: PathBuf,
    /// Current CSV export
    pub current: PathBuf,
    /// Label for the baseline dataset (defaults to the file stem)
    #[arg(long)]
    pub baseline_label: Option<String>,
    /// Label for the current dataset (defaults to the file stem)
    #[arg(long)]
    pub current_label: Option<String>,
    /// Nurse headcount of the baseline unit (enables workload ratios)
    #[arg(long)]
    pub baseline_nurses: Option<u32>,
    /// Nurse headcount of the current unit (enables workload ratios)
    #[arg(long)]
    pub current_nurses: Option<u32>,
    /// Significance level for the hypothesis tests
    #[arg(long, default_value_t = 0.05)]
    pub alpha: f64,
    /// Save the comparison JSON to this path
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Everything the comparison run produced, as written to `--output`.
#[derive(Debug, Clone, Serialize)]
struct CompareReport {
    comparison: DatasetComparison,
    workload: Option<WorkloadComparison>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    let staffing = match (arg.baseline_nurses, arg.current_nurses) {
        (Some(baseline), Some(current)) => Some((
            StaffingConfig { nurses: baseline },
            StaffingConfig { nurses: current },
        )),
        (None, None) => None,
        _ => bail!("--baseline-nurses and --current-nurses must be given together"),
    };

    eprintln!("Loading baseline from {}...", arg.baseline.display());
    let baseline = util::read_record_set(&arg.baseline, arg.baseline_label.as_deref())?;
    eprintln!("Loading current from {}...", arg.current.display());
    let current = util::read_record_set(&arg.current, arg.current_label.as_deref())?;

    eprintln!("Computing comparison...");
    let comparison = DatasetComparison::new(&baseline, &current);
    let workload = staffing.map(|(baseline_staffing, current_staffing)| {
        WorkloadComparison::new(
            WorkloadMetrics::from_snapshot(&comparison.baseline, baseline_staffing),
            WorkloadMetrics::from_snapshot(&comparison.current, current_staffing),
        )
    });

    print_report(&comparison, workload.as_ref(), arg.alpha);

    if let Some(path) = &arg.output {
        let report = CompareReport {
            comparison,
            workload,
        };
        Output::save_json(&report, Some(path.clone()))?;
        eprintln!("Comparison saved to {}", path.display());
    }

    Ok(())
}

fn print_report(comparison: &DatasetComparison, workload: Option<&WorkloadComparison>, alpha: f64) {
    let baseline = &comparison.baseline;
    let current = &comparison.current;

    println!("Comparison: {} vs {}", baseline.label, current.label);
    println!("==========================================\n");

    println!(
        "Records:             {:>8} -> {:<8} ({})",
        baseline.total_records,
        current.total_records,
        util::fmt_signed_pct(comparison.record_growth_pct())
    );
    println!(
        "Unique patients:     {:>8} -> {:<8} ({})",
        baseline.unique_patients,
        current.unique_patients,
        util::fmt_signed_pct(comparison.patient_growth_pct())
    );
    println!(
        "Complexity load:     {:>8} -> {:<8} ({})",
        baseline.complexity_load,
        current.complexity_load,
        util::fmt_signed_pct(comparison.complexity_load_growth_pct())
    );
    println!(
        "High-risk rate:      {:>8} -> {:<8} ({} pp)",
        util::fmt_pct(baseline.high_risk_rate()),
        util::fmt_pct(current.high_risk_rate()),
        match comparison.high_risk_rate_delta() {
            Ok(delta) => format!("{delta:+.1}"),
            Err(_) => "n/a".to_string(),
        }
    );
    println!(
        "Maximum risk (A1):   {:>8} -> {:<8}",
        baseline.max_risk_records, current.max_risk_records
    );
    println!();

    println!("Monthly difference (current - baseline):");
    for (index, diff) in comparison.monthly_count_diff.iter().enumerate() {
        println!("  {:>3}: {:+}", util::MONTH_NAMES[index], diff);
    }
    println!();

    println!("Hypothesis tests (alpha = {alpha}):");
    match &comparison.complexity_test {
        Some(test) => print_rank_sum(test, alpha),
        None => println!("  Complexity (rank-sum):    not computable (insufficient data)"),
    }
    match &comparison.category_test {
        Some(test) => print_chi_squared(test, alpha),
        None => println!("  Categories (chi-squared): not computable (insufficient data)"),
    }

    if let Some(workload) = workload {
        println!();
        print_workload(workload);
    }
}

fn print_rank_sum(test: &RankSumTest, alpha: f64) {
    println!(
        "  Complexity (rank-sum):    U = {:.1}, z = {:.2}, p = {:.4} ({})",
        test.u_statistic,
        test.z_score,
        test.p_value,
        verdict(test.is_significant(alpha))
    );
}

fn print_chi_squared(test: &ChiSquaredTest, alpha: f64) {
    println!(
        "  Categories (chi-squared): chi2 = {:.2} (dof = {}), p = {:.4} ({})",
        test.statistic,
        test.degrees_of_freedom,
        test.p_value,
        verdict(test.is_significant(alpha))
    );
}

fn print_workload(workload: &WorkloadComparison) {
    println!("Workload per nurse:");
    for metrics in [&workload.baseline, &workload.current] {
        println!(
            "  {:<12} ({} nurses): high risk {}, A1 {}, load {}",
            metrics.label,
            metrics.staffing.nurses,
            util::fmt_value(metrics.high_risk_per_nurse.value("high-risk per nurse")),
            util::fmt_value(metrics.max_risk_per_nurse.value("A1 per nurse")),
            util::fmt_value(metrics.load_per_nurse.value("load per nurse")),
        );
    }
    println!(
        "  Load ratio (current/baseline): {}",
        util::fmt_value(workload.high_risk_load_ratio())
    );
}

fn verdict(significant: bool) -> &'static str {
    if significant {
        "SIGNIFICANT"
    } else {
        "not significant"
    }
}
