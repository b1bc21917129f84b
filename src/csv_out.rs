use std::io;
use std::path::Path;

use csv::{Writer, WriterBuilder};

use crate::error::ConvertError;
use crate::model::Table;

fn write_table<W: io::Write>(mut writer: Writer<W>, table: &Table) -> Result<W, ConvertError> {
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|error| ConvertError::Io(error.into_error()))
}

/// Header line first, one line per row, no row-index column. An existing
/// file at `path` is truncated.
pub fn write_csv(path: &Path, table: &Table, delimiter: u8) -> Result<(), ConvertError> {
    let writer = WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    write_table(writer, table)?;
    Ok(())
}

pub fn write_csv_to_string(table: &Table, delimiter: u8) -> Result<String, ConvertError> {
    let writer = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::<u8>::new());
    let bytes = write_table(writer, table)?;
    // only a non-ASCII delimiter byte can break UTF-8 here
    String::from_utf8(bytes)
        .map_err(|error| ConvertError::Io(io::Error::new(io::ErrorKind::InvalidData, error)))
}
