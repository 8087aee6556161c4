use std::ops::Range;

use serde_json::{Map, Number, Value};

use crate::models::Period;

/// Number of periods returned when the caller gives no `limit`.
pub const DEFAULT_LIMIT: i64 = 5;

/// A financial statement laid out as a table: line items down the rows,
/// reporting dates across the columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinancialReport {
    rows: Vec<String>,
    columns: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl FinancialReport {
    /// Build a report from row labels, column labels and a row-major cell grid.
    ///
    /// Short rows are padded with empty cells and extra cells are dropped so the
    /// grid always matches the labels.
    pub fn new(rows: Vec<String>, columns: Vec<String>, mut cells: Vec<Vec<Option<f64>>>) -> Self {
        cells.resize_with(rows.len(), Vec::new);
        for row in &mut cells {
            row.resize(columns.len(), None);
        }
        Self {
            rows,
            columns,
            cells,
        }
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|l| l == row)?;
        let c = self.columns.iter().position(|l| l == column)?;
        self.cells[r][c]
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Self {
        let cells = (0..self.columns.len())
            .map(|c| self.cells.iter().map(|row| row[c]).collect())
            .collect();
        Self {
            rows: self.columns.clone(),
            columns: self.rows.clone(),
            cells,
        }
    }

    /// Keep columns `[:limit]`.
    pub fn head_columns(&self, limit: i64) -> Self {
        let keep = slice_range(self.columns.len(), None, Some(limit));
        Self {
            rows: self.rows.clone(),
            columns: self.columns[keep.clone()].to_vec(),
            cells: self.cells.iter().map(|row| row[keep.clone()].to_vec()).collect(),
        }
    }

    /// Keep rows `[-limit:]`.
    ///
    /// `-0` is `0`, so a zero limit keeps every row.
    pub fn tail_rows(&self, limit: i64) -> Self {
        let keep = slice_range(self.rows.len(), Some(limit.saturating_neg()), None);
        Self {
            rows: self.rows[keep.clone()].to_vec(),
            columns: self.columns.clone(),
            cells: self.cells[keep].to_vec(),
        }
    }

    /// Apply the gateway's windowing policy.
    ///
    /// Annual requests keep the first `limit` columns as they are. Any other
    /// period transposes first and keeps the last `limit` rows, which on a
    /// most-recent-first report are the oldest periods.
    pub fn window(&self, period: Period, limit: i64) -> Self {
        match period {
            Period::Annual => self.head_columns(limit),
            Period::Quarterly => self.transpose().tail_rows(limit),
        }
    }

    /// Serialize as `{column -> {row -> value}}` in table order.
    ///
    /// Missing and non-finite cells become `null`.
    pub fn to_json(&self) -> Value {
        let mut out = Map::with_capacity(self.columns.len());
        for (c, column) in self.columns.iter().enumerate() {
            let mut inner = Map::with_capacity(self.rows.len());
            for (r, row) in self.rows.iter().enumerate() {
                let value = self.cells[r][c]
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or(Value::Null);
                inner.insert(row.clone(), value);
            }
            out.insert(column.clone(), Value::Object(inner));
        }
        Value::Object(out)
    }
}

/// Resolve `[start:stop]` against a sequence of `len` items. Negative bounds
/// count from the end and out-of-range bounds clamp.
fn slice_range(len: usize, start: Option<i64>, stop: Option<i64>) -> Range<usize> {
    let resolve = |bound: i64| -> usize {
        let len = len as i64;
        let idx = if bound < 0 { bound + len } else { bound };
        idx.clamp(0, len) as usize
    };
    let start = start.map(resolve).unwrap_or(0);
    let stop = stop.map(resolve).unwrap_or(len);
    start..stop.max(start)
}
