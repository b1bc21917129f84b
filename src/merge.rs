use std::collections::HashMap;

use tracing::debug;

use crate::error::ConvertError;
use crate::model::{Table, TableSet};
use crate::options::TableSelection;

pub fn combine_tables(
    tables: TableSet,
    selection: TableSelection,
) -> Result<Table, ConvertError> {
    if tables.is_empty() {
        return Err(ConvertError::NoTables);
    }

    match selection {
        TableSelection::All => Ok(concat_tables(&tables)),
        TableSelection::Index(index) => select_table(tables, index),
    }
}

fn select_table(mut tables: TableSet, index: i64) -> Result<Table, ConvertError> {
    let count = tables.len();
    let position = usize::try_from(index)
        .ok()
        .filter(|&position| position < count)
        .ok_or(ConvertError::IndexOutOfRange { index, count })?;
    debug!(index, count, "selected single table");
    Ok(tables.swap_remove(position))
}

/// Appends rows in table order. Columns are matched by label; the output
/// schema is the union of labels in order of first appearance, and cells a
/// table does not have stay empty.
pub(crate) fn concat_tables(tables: &[Table]) -> Table {
    let mut columns: Vec<String> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for label in tables.iter().flat_map(|table| table.columns.iter()) {
        if !positions.contains_key(label.as_str()) {
            positions.insert(label, columns.len());
            columns.push(label.clone());
        }
    }

    let width = columns.len();
    let mut rows = Vec::with_capacity(tables.iter().map(Table::row_count).sum());
    for table in tables {
        let targets = table
            .columns
            .iter()
            .map(|label| positions[label.as_str()])
            .collect::<Vec<_>>();
        for source_row in &table.rows {
            let mut row = vec![String::new(); width];
            for (&target, value) in targets.iter().zip(source_row) {
                row[target].clone_from(value);
            }
            rows.push(row);
        }
    }

    debug!(
        tables = tables.len(),
        rows = rows.len(),
        columns = width,
        "concatenated tables"
    );
    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::{combine_tables, concat_tables};
    use crate::error::ConvertError;
    use crate::model::Table;
    use crate::options::TableSelection;
    use pretty_assertions::assert_eq;

    fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
        Table {
            columns: columns.iter().map(|value| (*value).to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|value| (*value).to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn concatenates_matching_tables_with_fresh_index() {
        let first = table(&["a", "b"], &[&["1", "2"], &["3", "4"], &["5", "6"]]);
        let second = table(
            &["a", "b"],
            &[&["7", "8"], &["9", "10"], &["11", "12"], &["13", "14"]],
        );

        let merged = combine_tables(vec![first, second], TableSelection::All)
            .expect("concat should succeed");
        assert_eq!(merged.shape(), (7, 2));
        assert_eq!(merged.row_index(), 0..7);
        assert_eq!(merged.rows[3], vec!["7", "8"]);
    }

    #[test]
    fn unions_columns_in_first_seen_order() {
        let merged = concat_tables(&[
            table(&["Name", "Age"], &[&["Alice", "30"]]),
            table(&["Name", "City"], &[&["Bob", "Oslo"]]),
        ]);
        assert_eq!(merged.columns, vec!["Name", "Age", "City"]);
        assert_eq!(merged.rows[0], vec!["Alice", "30", ""]);
        assert_eq!(merged.rows[1], vec!["Bob", "", "Oslo"]);
    }

    #[test]
    fn headerless_and_labelled_tables_share_no_columns() {
        let merged = concat_tables(&[
            table(&["0", "1"], &[&["x", "y"]]),
            table(&["Name", "Age"], &[&["Alice", "30"]]),
        ]);
        assert_eq!(merged.columns, vec!["0", "1", "Name", "Age"]);
        assert_eq!(merged.rows[0], vec!["x", "y", "", ""]);
        assert_eq!(merged.rows[1], vec!["", "", "Alice", "30"]);
    }

    #[test]
    fn header_only_table_adds_columns_but_no_rows() {
        let merged = concat_tables(&[
            table(&["a", "b"], &[]),
            table(&["a"], &[&["1"], &["2"]]),
        ]);
        assert_eq!(merged.columns, vec!["a", "b"]);
        assert_eq!(merged.rows, vec![vec!["1", ""], vec!["2", ""]]);
        assert_eq!(merged.row_index(), 0..2);
    }

    #[test]
    fn selects_table_unmodified() {
        let tables = vec![
            table(&["a"], &[&["1"]]),
            table(&["x", "y"], &[&["2", "3"]]),
            table(&["z"], &[&["4"]]),
        ];
        let expected = tables[1].clone();
        let selected =
            combine_tables(tables, TableSelection::Index(1)).expect("index 1 is in range");
        assert_eq!(selected, expected);
    }

    #[test]
    fn rejects_out_of_range_and_negative_indices() {
        let tables = vec![
            table(&["a"], &[&["1"]]),
            table(&["a"], &[&["2"]]),
            table(&["a"], &[&["3"]]),
        ];

        let err = combine_tables(tables.clone(), TableSelection::Index(5))
            .expect_err("index 5 should fail");
        assert!(matches!(
            err,
            ConvertError::IndexOutOfRange { index: 5, count: 3 }
        ));

        let err = combine_tables(tables, TableSelection::Index(-1)).expect_err("negative index");
        assert!(matches!(err, ConvertError::IndexOutOfRange { index: -1, .. }));
    }

    #[test]
    fn empty_table_set_is_rejected() {
        let err = combine_tables(Vec::new(), TableSelection::All).expect_err("empty set");
        assert!(matches!(err, ConvertError::NoTables));
    }
}
