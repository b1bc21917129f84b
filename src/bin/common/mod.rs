use std::process::ExitCode;

use mhtml_tables_to_csv::ConversionReport;
use tracing_subscriber::EnvFilter;

pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "mhtml_tables_to_csv=debug"
    } else {
        "mhtml_tables_to_csv=warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

pub fn finish(result: anyhow::Result<ConversionReport>) -> ExitCode {
    match result {
        Ok(report) => {
            println!("Saved CSV to {}", report.output.display());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
