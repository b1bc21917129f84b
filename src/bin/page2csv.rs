mod common;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use mhtml_tables_to_csv::{
    ConversionReport, ConvertOptions, DEFAULT_USER_AGENT, SourceMode, TableSelection, convert,
};

#[derive(Debug, Parser)]
#[command(
    name = "page2csv",
    version,
    about = "Convert MHTML or webpage tables to CSV"
)]
struct Cli {
    /// Path to MHTML file OR URL.
    source: String,

    /// Output CSV filename.
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Print the detected table count and shapes.
    #[arg(long)]
    debug: bool,

    /// Output delimiter character.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// User-Agent header sent when the source is a URL.
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Enable verbose log output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(cli: &Cli) -> Result<ConvertOptions> {
    if !cli.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    Ok(ConvertOptions {
        source_mode: SourceMode::LocalOrRemote,
        selection: TableSelection::All,
        delimiter: cli.delimiter as u8,
        user_agent: cli.user_agent.clone(),
        debug: cli.debug,
    })
}

fn run(cli: &Cli) -> Result<ConversionReport> {
    let options = parse_options(cli)?;
    let mut stdout = std::io::stdout().lock();
    convert(&cli.source, &cli.output, &options, &mut stdout)
        .with_context(|| format!("failed to convert tables from '{}'", cli.source))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    common::init_tracing(cli.verbose);
    common::finish(run(&cli))
}
