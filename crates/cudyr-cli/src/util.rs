use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context;
use cudyr_metrics::{ingest::RecordSet, metric::EmptyDenominator};

/// Short month labels for the fixed 1-12 report domain.
pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[month as usize - 1]
}

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))?;
        Ok(())
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

/// Read a categorization CSV export into a labeled record set.
///
/// The label falls back to the file stem when not given explicitly.
pub fn read_record_set(path: &Path, label: Option<&str>) -> anyhow::Result<RecordSet> {
    let label = match label {
        Some(label) => label.to_owned(),
        None => path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("dataset")
            .to_owned(),
    };
    let set = RecordSet::from_csv_path(label, path)
        .with_context(|| format!("Failed to ingest records file: {}", path.display()))?;
    Ok(set)
}

/// Format a guarded rate as a percentage, or name the missing data.
pub fn fmt_pct(value: Result<f64, EmptyDenominator>) -> String {
    match value {
        Ok(value) => format!("{value:.1}%"),
        Err(_) => "n/a (no data)".to_string(),
    }
}

/// Format a guarded signed growth percentage.
pub fn fmt_signed_pct(value: Result<f64, EmptyDenominator>) -> String {
    match value {
        Ok(value) => format!("{value:+.1}%"),
        Err(_) => "n/a (no data)".to_string(),
    }
}

/// Format a guarded plain value.
pub fn fmt_value(value: Result<f64, EmptyDenominator>) -> String {
    match value {
        Ok(value) => format!("{value:.2}"),
        Err(_) => "n/a (no data)".to_string(),
    }
}

/// Print labeled counts as an ASCII bar chart.
#[expect(clippy::cast_possible_truncation)]
pub fn print_histogram<I, S>(data: I)
where
    I: Iterator<Item = (S, u64)>,
    S: fmt::Display,
{
    let data = data.collect::<Vec<_>>();
    let max_count = data
        .iter()
        .map(|(_, count)| *count)
        .max()
        .filter(|&count| count > 0)
        .unwrap_or(1);
    let max_bar_width = 50;
    for (label, count) in &data {
        let bar_width = ((count * max_bar_width) / max_count) as usize;
        println!("{:>15} | {:<5} {}", label, count, "#".repeat(bar_width));
    }
}
