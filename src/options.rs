use std::str::FromStr;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// Whether descriptors that look like URLs are fetched over HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceMode {
    LocalOnly,
    LocalOrRemote,
}

/// Which part of the table set ends up in the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSelection {
    All,
    Index(i64),
}

impl From<Option<i64>> for TableSelection {
    fn from(index: Option<i64>) -> Self {
        index.map_or(Self::All, Self::Index)
    }
}

impl FromStr for TableSelection {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        spec.parse::<i64>()
            .map(Self::Index)
            .map_err(|_| format!("invalid table index: '{spec}'"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    pub source_mode: SourceMode,
    pub selection: TableSelection,
    pub delimiter: u8,
    pub user_agent: String,
    pub debug: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            source_mode: SourceMode::LocalOnly,
            selection: TableSelection::All,
            delimiter: b',',
            user_agent: DEFAULT_USER_AGENT.to_string(),
            debug: false,
        }
    }
}
