use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::ConvertError;
use crate::model::{Table, TableSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Head,
    Body,
    Foot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawCell {
    text: String,
    is_header: bool,
    colspan: usize,
    rowspan: usize,
}

type RawRow = Vec<RawCell>;

const MAX_COLSPAN: usize = 1000;
const MAX_ROWSPAN: usize = 65534;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("hardcoded table selector is valid"));

/// Finds every displayed `<table>` in document order, nested ones included.
pub fn extract_tables(html: &str) -> Result<TableSet, ConvertError> {
    let document = Html::parse_document(html);

    let tables = document
        .select(&TABLE_SELECTOR)
        .filter(|table| is_displayed(*table))
        .filter_map(parse_table)
        .collect::<Vec<_>>();

    debug!(count = tables.len(), "extracted tables");
    if tables.is_empty() {
        return Err(ConvertError::NoTables);
    }
    Ok(tables)
}

fn parse_table(table: ElementRef<'_>) -> Option<Table> {
    let mut head = Vec::new();
    let mut body = Vec::new();
    let mut foot = Vec::new();
    collect_rows(table, Section::Body, &mut |section, row| match section {
        Section::Head => head.push(row),
        Section::Body => body.push(row),
        Section::Foot => foot.push(row),
    });
    body.extend(foot);

    if head.is_empty() {
        let leading = body.iter().take_while(|row| is_header_row(row)).count();
        head = body.drain(..leading).collect();
    }

    let header_grid = expand_spans(&head);
    let mut body_grid = expand_spans(&body);
    body_grid.retain(|row| row.iter().any(|cell| !cell.is_empty()));

    if header_grid.is_empty() && body_grid.is_empty() {
        return None;
    }

    let width = header_grid
        .iter()
        .chain(body_grid.iter())
        .map(Vec::len)
        .max()
        .unwrap_or(0);
    if width == 0 {
        return None;
    }

    let columns = if header_grid.is_empty() {
        (0..width).map(|index| index.to_string()).collect()
    } else {
        dedupe_labels(collapse_header_rows(&header_grid, width))
    };

    let rows = body_grid
        .into_iter()
        .map(|mut row| {
            row.resize(width, String::new());
            row
        })
        .collect();

    Some(Table { columns, rows })
}

/// Inline `display: none` on the element itself.
fn is_hidden(element: ElementRef<'_>) -> bool {
    element.value().attr("style").is_some_and(|style| {
        style
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
            .contains("display:none")
    })
}

fn is_displayed(element: ElementRef<'_>) -> bool {
    !is_hidden(element) && !element.ancestors().filter_map(ElementRef::wrap).any(is_hidden)
}

/// Walks the rows owned by `parent`, skipping anything inside a nested table.
fn collect_rows(parent: ElementRef<'_>, section: Section, sink: &mut impl FnMut(Section, RawRow)) {
    for child in parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| !is_hidden(*child))
    {
        match child.value().name() {
            "table" => {}
            "thead" => collect_rows(child, Section::Head, sink),
            "tbody" => collect_rows(child, Section::Body, sink),
            "tfoot" => collect_rows(child, Section::Foot, sink),
            "tr" => sink(section, parse_row(child)),
            _ => collect_rows(child, section, sink),
        }
    }
}

fn parse_row(tr: ElementRef<'_>) -> RawRow {
    tr.children()
        .filter_map(ElementRef::wrap)
        .filter(|cell| !is_hidden(*cell))
        .filter_map(|cell| {
            let is_header = match cell.value().name() {
                "th" => true,
                "td" => false,
                _ => return None,
            };
            Some(RawCell {
                text: cell_text(cell),
                is_header,
                colspan: span_attr(cell, "colspan", MAX_COLSPAN),
                rowspan: span_attr(cell, "rowspan", MAX_ROWSPAN),
            })
        })
        .collect()
}

fn visible_text<'a>(element: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push(text);
        } else if let Some(nested) = ElementRef::wrap(child)
            && !is_hidden(nested)
        {
            visible_text(nested, out);
        }
    }
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let mut fragments = Vec::new();
    visible_text(cell, &mut fragments);
    fragments
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Missing, unparseable or zero spans count as 1; larger ones are capped.
fn span_attr(cell: ElementRef<'_>, name: &str, max: usize) -> usize {
    cell.value()
        .attr(name)
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map_or(1, |span| usize::try_from(span).unwrap_or(max).clamp(1, max))
}

fn is_header_row(row: &RawRow) -> bool {
    !row.is_empty() && row.iter().all(|cell| cell.is_header)
}

/// Expands `colspan`/`rowspan` so every covered grid slot carries the
/// spanning cell's text.
fn expand_spans(rows: &[RawRow]) -> Vec<Vec<String>> {
    let mut grid = Vec::new();
    // (column, text, rows still to fill), ordered by column
    let mut pending: Vec<(usize, String, usize)> = Vec::new();

    for row in rows {
        let mut texts = Vec::new();
        let mut next_pending = Vec::new();
        let mut carried = pending.into_iter().peekable();
        let mut column = 0_usize;

        for cell in row {
            while let Some((_, text, remaining)) = carried.next_if(|(at, _, _)| *at <= column) {
                if remaining > 1 {
                    next_pending.push((column, text.clone(), remaining - 1));
                }
                texts.push(text);
                column += 1;
            }
            for _ in 0..cell.colspan {
                if cell.rowspan > 1 {
                    next_pending.push((column, cell.text.clone(), cell.rowspan - 1));
                }
                texts.push(cell.text.clone());
                column += 1;
            }
        }
        for (_, text, remaining) in carried {
            if remaining > 1 {
                next_pending.push((column, text.clone(), remaining - 1));
            }
            texts.push(text);
            column += 1;
        }

        grid.push(texts);
        pending = next_pending;
    }

    // rowspans reaching past the last <tr>
    while !pending.is_empty() {
        let mut texts = Vec::new();
        let mut next_pending = Vec::new();
        for (column, text, remaining) in pending {
            if remaining > 1 {
                next_pending.push((column, text.clone(), remaining - 1));
            }
            texts.push(text);
        }
        grid.push(texts);
        pending = next_pending;
    }

    grid.retain(|row| !row.is_empty());
    grid
}

fn collapse_header_rows(header_grid: &[Vec<String>], width: usize) -> Vec<String> {
    (0..width)
        .map(|column| {
            let mut parts: Vec<&str> = Vec::new();
            for label in header_grid.iter().filter_map(|row| row.get(column)) {
                if !label.is_empty() && !parts.contains(&label.as_str()) {
                    parts.push(label);
                }
            }
            parts.join(" ")
        })
        .collect()
}

/// Repeated labels get `.1`, `.2`, ... and a suffixed name that is already
/// taken is suffixed again, so `a, a, a.1` becomes `a, a.1, a.1.1`.
fn dedupe_labels(labels: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    labels
        .into_iter()
        .enumerate()
        .map(|(index, label)| {
            let mut label = if label.is_empty() {
                format!("Unnamed: {index}")
            } else {
                label
            };
            let mut count = counts.get(&label).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(label.clone(), count + 1);
                label = format!("{label}.{count}");
                count = counts.get(&label).copied().unwrap_or(0);
            }
            counts.insert(label.clone(), count + 1);
            label
        })
        .collect()
}
