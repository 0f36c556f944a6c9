//! ---
//! plt_section: "04-cli"
//! plt_subsection: "binary"
//! plt_type: "source"
//! plt_scope: "code"
//! plt_description: "CLI wiring a telemetry data log through the annotation pipeline."
//! plt_version: "v0.1.0"
//! plt_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use plt_core::PowerlineProcessor;
use plt_datalog::{DataLogReader, DataLogWriter};
use plt_logging as logging;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Annotate a power-line telemetry log with moving averages and anomaly diagnostics",
    long_about = None
)]
struct Cli {
    /// Telemetry data log to read, one reading per line.
    input: PathBuf,
    /// Annotated output file to write.
    output: PathBuf,
    /// Optionally export a JSON run report to this path.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    if !cli.input.exists() {
        bail!("Input file {} does not exist", cli.input.display());
    }

    let mut reader = DataLogReader::open(&cli.input)
        .with_context(|| format!("failed to open input file {}", cli.input.display()))?;
    let mut writer = DataLogWriter::create(&cli.output)
        .with_context(|| format!("failed to create output file {}", cli.output.display()))?;

    let mut processor = PowerlineProcessor::new();
    let report = processor
        .run(&mut reader, &mut writer)
        .context("telemetry annotation failed")?;
    writer.finish().context("failed to flush output file")?;

    if let Some(path) = &cli.report {
        report
            .write_json(path)
            .with_context(|| format!("failed to write run report to {}", path.display()))?;
    }

    info!(
        "Annotated {} -> {} ({} lines, {} anomalies)",
        cli.input.display(),
        cli.output.display(),
        report.lines_processed,
        report.anomalies_detected
    );
    Ok(())
}
