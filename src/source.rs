use std::fs;
use std::path::{Path, PathBuf};

use mailparse::ParsedMail;
use tracing::debug;

use crate::error::ConvertError;
use crate::fetch::fetch_html;
use crate::options::{ConvertOptions, SourceMode};

const HTML_CONTENT_TYPE: &str = "text/html";

/// Where the HTML document comes from, decided once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    pub fn load_html(&self, options: &ConvertOptions) -> Result<String, ConvertError> {
        match self {
            Self::Remote(url) => fetch_html(url, &options.user_agent),
            Self::Local(path) => {
                if !path.is_file() {
                    return Err(ConvertError::NotFound(path.clone()));
                }
                extract_html_from_mhtml(path)
            }
        }
    }
}

/// Remote detection is a plain `http` prefix check, and only applies when
/// remote sources are enabled.
#[must_use]
pub fn resolve_source(descriptor: &str, options: &ConvertOptions) -> Source {
    if options.source_mode == SourceMode::LocalOrRemote && descriptor.starts_with("http") {
        Source::Remote(descriptor.to_string())
    } else {
        Source::Local(PathBuf::from(descriptor))
    }
}

pub fn extract_html_from_mhtml(path: &Path) -> Result<String, ConvertError> {
    let raw = fs::read(path)?;
    extract_html_from_mhtml_bytes(&raw)?.ok_or_else(|| ConvertError::NoHtmlPart(path.to_path_buf()))
}

/// Returns the decoded body of the first `text/html` part, walking the MIME
/// tree depth-first with the container itself visited first.
pub fn extract_html_from_mhtml_bytes(raw: &[u8]) -> Result<Option<String>, ConvertError> {
    let message = mailparse::parse_mail(raw)?;
    let Some(part) = first_html_part(&message) else {
        return Ok(None);
    };
    Ok(Some(part.get_body()?))
}

fn first_html_part<'a, 'b>(message: &'b ParsedMail<'a>) -> Option<&'b ParsedMail<'a>> {
    let mut stack = vec![message];
    let mut visited = 0_usize;
    while let Some(part) = stack.pop() {
        visited += 1;
        if part.ctype.mimetype.eq_ignore_ascii_case(HTML_CONTENT_TYPE) {
            debug!(part = visited, "found text/html part");
            return Some(part);
        }
        stack.extend(part.subparts.iter().rev());
    }
    debug!(parts = visited, "no text/html part in archive");
    None
}
