//! Row- and column-oriented sparse matrices for TF-IDF features.

use serde::{Deserialize, Serialize};

/// A sparse row: `(column, value)` pairs sorted by column, zeros omitted.
pub type SparseVector = Vec<(usize, f64)>;

/// Value of `column` in a sorted sparse row.
pub fn feature_value(row: &[(usize, f64)], column: usize) -> f64 {
    match row.binary_search_by_key(&column, |&(c, _)| c) {
        Ok(pos) => row[pos].1,
        Err(_) => 0.0,
    }
}

/// Compressed sparse rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix {
    n_cols: usize,
    rows: Vec<SparseVector>,
}

impl SparseMatrix {
    pub fn new(n_cols: usize) -> Self {
        Self {
            n_cols,
            rows: Vec::new(),
        }
    }

    pub fn from_rows(rows: Vec<SparseVector>, n_cols: usize) -> Self {
        Self { n_cols, rows }
    }

    pub fn push_row(&mut self, row: SparseVector) {
        self.rows.push(row);
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row(&self, index: usize) -> &[(usize, f64)] {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[SparseVector] {
        &self.rows
    }

    /// Number of stored (non-zero) entries.
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Column view used by the tree learner.
    pub fn to_columns(&self) -> ColumnIndex {
        let mut columns: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.n_cols];
        for (row_idx, row) in self.rows.iter().enumerate() {
            for &(col, value) in row {
                columns[col].push((row_idx, value));
            }
        }
        for column in &mut columns {
            column.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        }
        ColumnIndex {
            n_rows: self.rows.len(),
            columns,
        }
    }
}

/// Per-column non-zero entries, `(row, value)` sorted by ascending value.
///
/// Features are non-negative, so the implicit zeros of a column always sort
/// before its stored entries.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    n_rows: usize,
    columns: Vec<Vec<(usize, f64)>>,
}

impl ColumnIndex {
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> &[(usize, f64)] {
        &self.columns[index]
    }
}
