mod common;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mhtml_tables_to_csv::{ConversionReport, ConvertOptions, SourceMode, TableSelection, convert};

#[derive(Debug, Parser)]
#[command(
    name = "mhtml2csv",
    version,
    about = "Convert MHTML file tables to CSV"
)]
struct Cli {
    /// Path to MHTML file.
    input: String,

    /// Output CSV filename (default: combined_output.csv).
    #[arg(short, long, default_value = "combined_output.csv")]
    output: PathBuf,

    /// Specific table index to export (default: all combined).
    #[arg(long, allow_negative_numbers = true)]
    table_index: Option<i64>,

    /// Print debug info about detected tables.
    #[arg(long)]
    debug: bool,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Enable verbose log output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(cli: &Cli) -> Result<ConvertOptions> {
    if !cli.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ConvertOptions {
        source_mode: SourceMode::LocalOnly,
        selection: TableSelection::from(cli.table_index),
        delimiter: cli.delimiter as u8,
        debug: cli.debug,
        ..ConvertOptions::default()
    })
}

fn run(cli: &Cli) -> Result<ConversionReport> {
    let options = parse_options(cli)?;
    let mut stdout = std::io::stdout().lock();
    convert(&cli.input, &cli.output, &options, &mut stdout)
        .with_context(|| format!("failed to convert tables from '{}'", cli.input))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    common::init_tracing(cli.verbose);
    common::finish(run(&cli))
}
