//! Synthetic categorization exports for exercising the pipeline.
//!
//! Simulates patient stays: each patient is admitted on a random day in
//! the window, stays for a right-skewed number of days, and receives one
//! assessment per day whose category drifts slowly between neighboring
//! tiers. The output has the same CSV shape as a real export, so it can be
//! fed straight into `analyze` and `compare`.

use std::{collections::BTreeMap, path::PathBuf};

use anyhow::Context;
use chrono::{Days, NaiveDate};
use cudyr_metrics::{
    category::{Category, DependencyTier, RiskTier},
    ingest::DATE_FORMAT,
};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rand_pcg::Pcg64;

use crate::util::{self, Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct GenerateRecordsArg {
    /// Number of patients to simulate
    #[arg(long, default_value_t = 200)]
    patients: usize,
    /// First admission date (dd-mm-yyyy)
    #[arg(long, default_value = "01-01-2025")]
    start_date: String,
    /// Admission window in days
    #[arg(long, default_value_t = 365)]
    window_days: u64,
    /// Fraction of rows given a malformed category code
    #[arg(long, default_value_t = 0.0)]
    malformed_rate: f64,
    /// RNG seed, so generated datasets are reproducible
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Output file path (stdout when omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &GenerateRecordsArg) -> anyhow::Result<()> {
    let start = NaiveDate::parse_from_str(&arg.start_date, DATE_FORMAT)
        .with_context(|| format!("Invalid start date: {}", arg.start_date))?;
    let mut rng = Pcg64::seed_from_u64(arg.seed);
    // Most stays are a few days; the tail reaches several weeks
    let stay_length = LogNormal::new(1.0, 0.8)?;
    let malformed_rate = arg.malformed_rate.clamp(0.0, 1.0);

    eprintln!("Generating records for {} patients...", arg.patients);

    let mut writer = csv::Writer::from_writer(Output::from_output_path(arg.output.clone())?);
    writer.write_record(["patient_id", "date", "category"])?;

    let mut code_histogram: BTreeMap<String, u64> = BTreeMap::new();
    let mut total_rows = 0u64;
    for index in 0..arg.patients {
        let patient_id = format!("PAT-{index:05}");
        let admission = start + Days::new(rng.random_range(0..arg.window_days.max(1)));
        let stay_days = sample_stay_days(&stay_length, &mut rng);
        let mut category = random_category(&mut rng);
        for day in 0..stay_days {
            let date = admission + Days::new(day);
            let code = if malformed_rate > 0.0 && rng.random_bool(malformed_rate) {
                "X9".to_owned()
            } else {
                category.to_string()
            };
            let date_text = date.format(DATE_FORMAT).to_string();
            writer.write_record([patient_id.as_str(), date_text.as_str(), code.as_str()])?;
            *code_histogram.entry(code).or_insert(0) += 1;
            total_rows += 1;
            category = drift(category, &mut rng);
        }
    }
    writer.flush()?;

    eprintln!(
        "Generated {total_rows} records for {} patients.",
        arg.patients
    );
    eprintln!("Category histogram:");
    util::print_histogram(code_histogram.iter().map(|(code, count)| (code, *count)));

    Ok(())
}

#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn sample_stay_days<R>(stay_length: &LogNormal<f64>, rng: &mut R) -> u64
where
    R: Rng,
{
    (stay_length.sample(rng).round() as u64).clamp(1, 60)
}

/// Initial category for an admission; intensive care skews high risk.
fn random_category<R>(rng: &mut R) -> Category
where
    R: Rng,
{
    let roll: f64 = rng.random();
    let risk = if roll < 0.25 {
        RiskTier::A
    } else if roll < 0.60 {
        RiskTier::B
    } else if roll < 0.85 {
        RiskTier::C
    } else {
        RiskTier::D
    };
    let roll: f64 = rng.random();
    let dependency = if roll < 0.40 {
        DependencyTier::Total
    } else if roll < 0.80 {
        DependencyTier::Partial
    } else {
        DependencyTier::Minimal
    };
    Category::new(risk, dependency)
}

/// Day-to-day evolution: mostly stable, improving slightly more often
/// than worsening.
fn drift<R>(category: Category, rng: &mut R) -> Category
where
    R: Rng,
{
    let roll: f64 = rng.random();
    let direction = if roll < 0.12 {
        1
    } else if roll < 0.30 {
        -1
    } else {
        return category;
    };
    if rng.random_bool(0.5) {
        Category::new(shift_risk(category.risk, direction), category.dependency)
    } else {
        Category::new(category.risk, shift_dependency(category.dependency, direction))
    }
}

/// Move one risk tier toward A (`direction = 1`) or D (`-1`), saturating.
fn shift_risk(risk: RiskTier, direction: i8) -> RiskTier {
    match (risk, direction) {
        (RiskTier::D, 1) => RiskTier::C,
        (RiskTier::C, 1) => RiskTier::B,
        (RiskTier::B, 1) => RiskTier::A,
        (RiskTier::A, -1) => RiskTier::B,
        (RiskTier::B, -1) => RiskTier::C,
        (RiskTier::C, -1) => RiskTier::D,
        _ => risk,
    }
}

/// Move one dependency tier toward total (`direction = 1`) or minimal
/// (`-1`), saturating.
fn shift_dependency(dependency: DependencyTier, direction: i8) -> DependencyTier {
    match (dependency, direction) {
        (DependencyTier::Minimal, 1) => DependencyTier::Partial,
        (DependencyTier::Partial, 1) => DependencyTier::Total,
        (DependencyTier::Total, -1) => DependencyTier::Partial,
        (DependencyTier::Partial, -1) => DependencyTier::Minimal,
        _ => dependency,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_saturates_at_extremes() {
        assert_eq!(shift_risk(RiskTier::A, 1), RiskTier::A);
        assert_eq!(shift_risk(RiskTier::D, -1), RiskTier::D);
        assert_eq!(shift_dependency(DependencyTier::Total, 1), DependencyTier::Total);
        assert_eq!(
            shift_dependency(DependencyTier::Minimal, -1),
            DependencyTier::Minimal
        );
    }

    #[test]
    fn test_drift_stays_well_formed() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut category = random_category(&mut rng);
        for _ in 0..1000 {
            category = drift(category, &mut rng);
            let score = category.complexity_score();
            assert!((2..=7).contains(&score));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Pcg64::seed_from_u64(42);
        let mut b = Pcg64::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(random_category(&mut a), random_category(&mut b));
        }
    }
}
