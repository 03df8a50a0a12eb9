use clap::{Parser, Subcommand};

use self::{
    analyze::AnalyzeArg, compare::CompareArg, generate_records::GenerateRecordsArg,
};

mod analyze;
mod compare;
mod generate_records;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute the metrics snapshot for one categorization export
    Analyze(#[clap(flatten)] AnalyzeArg),
    /// Compare two exports (two years of one unit, or two units)
    Compare(#[clap(flatten)] CompareArg),
    /// Generate a synthetic categorization export for testing
    GenerateRecords(#[clap(flatten)] GenerateRecordsArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Analyze(arg) => analyze::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::GenerateRecords(arg) => generate_records::run(&arg)?,
    }
    Ok(())
}
