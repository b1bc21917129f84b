use std::ops::Range;

/// A rectangular table: one label per column, every row exactly as wide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`, header excluded.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count(), self.column_count())
    }

    /// Row labels are always contiguous from zero.
    #[must_use]
    pub fn row_index(&self) -> Range<usize> {
        0..self.rows.len()
    }
}

/// All tables of one document, in document order.
pub type TableSet = Vec<Table>;
