use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to fetch '{url}': {reason}")]
    Fetch { url: String, reason: String },

    #[error("No text/html part found in MHTML file '{}'", .0.display())]
    NoHtmlPart(PathBuf),

    #[error("No HTML <table> elements found.")]
    NoTables,

    #[error("Table index {index} out of range ({count} table(s) detected)")]
    IndexOutOfRange { index: i64, count: usize },

    #[error("malformed MHTML archive: {0}")]
    MalformedArchive(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<mailparse::MailParseError> for ConvertError {
    fn from(error: mailparse::MailParseError) -> Self {
        Self::MalformedArchive(error.to_string())
    }
}
