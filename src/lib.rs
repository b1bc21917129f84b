mod csv_out;
mod error;
mod fetch;
mod html_tables;
mod merge;
mod model;
mod options;
mod source;

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use csv_out::{write_csv, write_csv_to_string};
pub use error::ConvertError;
pub use html_tables::extract_tables;
pub use merge::combine_tables;
pub use model::{Table, TableSet};
pub use options::{ConvertOptions, DEFAULT_USER_AGENT, SourceMode, TableSelection};
pub use source::{Source, extract_html_from_mhtml, extract_html_from_mhtml_bytes, resolve_source};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub table_shapes: Vec<(usize, usize)>,
    pub row_count: usize,
    pub column_count: usize,
    pub output: PathBuf,
}

/// Writes the `--debug` summary: table count, then one shape line per table.
pub fn write_table_summary(
    tables: &[Table],
    out: &mut impl Write,
) -> Result<(), ConvertError> {
    writeln!(out, "Detected {} table(s)", tables.len())?;
    for (index, table) in tables.iter().enumerate() {
        let (rows, columns) = table.shape();
        writeln!(out, "Table {index} shape: ({rows}, {columns})")?;
    }
    Ok(())
}

fn validate_options(options: &ConvertOptions) -> Result<(), ConvertError> {
    if !options.delimiter.is_ascii() || options.delimiter == b'"' {
        return Err(ConvertError::InvalidOption(
            "delimiter must be an ASCII character other than '\"'".to_string(),
        ));
    }
    Ok(())
}

fn tables_to_output(
    html: &str,
    options: &ConvertOptions,
    diagnostics: &mut impl Write,
) -> Result<(Table, Vec<(usize, usize)>), ConvertError> {
    let tables = extract_tables(html)?;
    if options.debug {
        write_table_summary(&tables, diagnostics)?;
    }
    let table_shapes = tables.iter().map(Table::shape).collect::<Vec<_>>();
    let output = combine_tables(tables, options.selection)?;
    Ok((output, table_shapes))
}

/// Runs the whole pipeline: resolve the source, extract tables, combine
/// them and write the CSV. Nothing is written unless every earlier stage
/// succeeds.
pub fn convert(
    descriptor: &str,
    output_csv: &Path,
    options: &ConvertOptions,
    diagnostics: &mut impl Write,
) -> Result<ConversionReport, ConvertError> {
    validate_options(options)?;

    let source = resolve_source(descriptor, options);
    debug!(?source, "resolved source");
    let html = source.load_html(options)?;
    debug!(bytes = html.len(), "loaded HTML document");

    let (table, table_shapes) = tables_to_output(&html, options, diagnostics)?;
    write_csv(output_csv, &table, options.delimiter)?;
    info!(path = %output_csv.display(), rows = table.row_count(), "wrote CSV");

    Ok(ConversionReport {
        table_shapes,
        row_count: table.row_count(),
        column_count: table.column_count(),
        output: output_csv.to_path_buf(),
    })
}

/// Same pipeline starting from HTML text, returning the CSV as a string.
pub fn convert_html_to_csv_string(
    html: &str,
    options: &ConvertOptions,
) -> Result<String, ConvertError> {
    validate_options(options)?;
    let (table, _) = tables_to_output(html, options, &mut std::io::sink())?;
    write_csv_to_string(&table, options.delimiter)
}
