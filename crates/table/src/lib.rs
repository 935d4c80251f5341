// Column-ordered in-memory table

mod error;
mod value;

pub use error::TableError;
pub use value::Value;

use std::collections::HashMap;

/// A rectangular table: an ordered header plus rows of [`Value`]s.
///
/// Every row has exactly one cell per column. Rows keep insertion order,
/// which is what carries labeling order through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TableError> {
        if row.len() != self.columns.len() {
            return Err(TableError::WidthMismatch {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Value>, TableError> {
        let col = self
            .column_index(name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
        Ok(self.rows.iter().map(|r| &r[col]).collect())
    }

    /// Append a 0-based positional index column. Used for labeling order:
    /// row position in the state table is the order labels were applied.
    pub fn add_index_column(&mut self, name: &str) {
        self.columns.push(name.to_string());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.push(Value::Int(i as i64));
        }
    }

    /// Remove the named columns. Names that don't exist are ignored, so
    /// callers can drop columns that only some store versions carry.
    pub fn drop_columns(&mut self, names: &[&str]) {
        let keep: Vec<usize> = (0..self.columns.len())
            .filter(|&i| !names.contains(&self.columns[i].as_str()))
            .collect();
        if keep.len() == self.columns.len() {
            return;
        }
        self.columns = keep.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = keep.iter().map(|&i| row[i].clone()).collect();
        }
    }

    /// Left-join `right` onto `self` on the shared `key` column.
    ///
    /// Every left row is preserved exactly once; unmatched right-side
    /// fields come out `Null`. Duplicate keys on the right are undefined
    /// input; the first matching right row wins, so the left row count is
    /// preserved either way. The key column itself is not duplicated.
    pub fn left_join(&self, right: &Table, key: &str) -> Result<Table, TableError> {
        let left_key = self
            .column_index(key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))?;
        let right_key = right
            .column_index(key)
            .ok_or_else(|| TableError::UnknownColumn(key.to_string()))?;

        // Columns carried over from the right side (everything except the key)
        let carried: Vec<usize> = (0..right.columns.len()).filter(|&i| i != right_key).collect();
        for &i in &carried {
            if self.column_index(&right.columns[i]).is_some() {
                return Err(TableError::DuplicateColumn(right.columns[i].clone()));
            }
        }

        // Index the right side by key display text; first match wins
        let mut index: HashMap<String, usize> = HashMap::new();
        for (i, row) in right.rows.iter().enumerate() {
            index.entry(row[right_key].to_string()).or_insert(i);
        }

        let mut columns = self.columns.clone();
        columns.extend(carried.iter().map(|&i| right.columns[i].clone()));
        let mut out = Table::new(columns);

        for row in &self.rows {
            let mut joined = row.clone();
            match index.get(&row[left_key].to_string()) {
                Some(&r) => {
                    joined.extend(carried.iter().map(|&i| right.rows[r][i].clone()));
                }
                None => {
                    joined.extend(carried.iter().map(|_| Value::Null));
                }
            }
            out.rows.push(joined);
        }

        Ok(out)
    }

    /// Stable sort that surfaces rows whose `column` flag is set before
    /// rows where it is unset or `Null`. A missing column is a no-op so
    /// stores without the flag still pass through.
    pub fn sort_flagged_first(&mut self, column: &str) {
        let Some(col) = self.column_index(column) else {
            return;
        };
        self.rows.sort_by_key(|row| !row[col].is_truthy());
    }

    /// Plain-text preview of the first `n` rows, for progress output.
    pub fn preview(&self, n: usize) -> String {
        let shown = self.rows.iter().take(n);
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        let mut cells: Vec<Vec<String>> = Vec::new();
        for row in shown {
            let rendered: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            for (i, cell) in rendered.iter().enumerate() {
                widths[i] = widths[i].max(cell.len());
            }
            cells.push(rendered);
        }

        let mut out = String::new();
        for (i, name) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{name:<w$}", w = widths[i]));
        }
        out.push('\n');
        for row in &cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    out.push_str("  ");
                }
                out.push_str(&format!("{cell:<w$}", w = widths[i]));
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> Table {
        let mut t = Table::new(vec!["record_id".into(), "title".into()]);
        t.push_row(vec![Value::Int(0), Value::Text("A".into())]).unwrap();
        t.push_row(vec![Value::Int(1), Value::Text("B".into())]).unwrap();
        t.push_row(vec![Value::Int(2), Value::Text("C".into())]).unwrap();
        t
    }

    #[test]
    fn push_row_checks_width() {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        let err = t.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(matches!(err, TableError::WidthMismatch { expected: 2, got: 1 }));
    }

    #[test]
    fn left_join_preserves_unmatched_rows() {
        let mut right = Table::new(vec!["record_id".into(), "label".into()]);
        right.push_row(vec![Value::Int(0), Value::Int(1)]).unwrap();
        right.push_row(vec![Value::Int(1), Value::Int(0)]).unwrap();

        let joined = left().left_join(&right, "record_id").unwrap();
        assert_eq!(joined.n_rows(), 3);
        assert_eq!(joined.columns(), &["record_id", "title", "label"]);
        assert_eq!(joined.get(0, "label"), Some(&Value::Int(1)));
        assert_eq!(joined.get(1, "label"), Some(&Value::Int(0)));
        // Record 2 has no state row: state field is Null, dataset fields kept
        assert_eq!(joined.get(2, "label"), Some(&Value::Null));
        assert_eq!(joined.get(2, "title"), Some(&Value::Text("C".into())));
    }

    #[test]
    fn left_join_duplicate_right_key_keeps_row_count() {
        let mut right = Table::new(vec!["record_id".into(), "label".into()]);
        right.push_row(vec![Value::Int(0), Value::Int(1)]).unwrap();
        right.push_row(vec![Value::Int(0), Value::Int(0)]).unwrap();

        let joined = left().left_join(&right, "record_id").unwrap();
        assert_eq!(joined.n_rows(), 3);
        // First match wins
        assert_eq!(joined.get(0, "label"), Some(&Value::Int(1)));
    }

    #[test]
    fn left_join_rejects_column_collision() {
        let mut right = Table::new(vec!["record_id".into(), "title".into()]);
        right.push_row(vec![Value::Int(0), Value::Text("x".into())]).unwrap();

        let err = left().left_join(&right, "record_id").unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn(_)));
    }

    #[test]
    fn left_join_missing_key_column() {
        let right = Table::new(vec!["other".into()]);
        let err = left().left_join(&right, "record_id").unwrap_err();
        assert!(matches!(err, TableError::UnknownColumn(_)));
    }

    #[test]
    fn index_column_is_positional() {
        let mut t = left();
        t.add_index_column("labeling_order");
        assert_eq!(t.get(0, "labeling_order"), Some(&Value::Int(0)));
        assert_eq!(t.get(2, "labeling_order"), Some(&Value::Int(2)));
    }

    #[test]
    fn drop_columns_ignores_missing() {
        let mut t = left();
        t.drop_columns(&["title", "notes"]);
        assert_eq!(t.columns(), &["record_id"]);
        assert_eq!(t.rows()[1], vec![Value::Int(1)]);
    }

    #[test]
    fn sort_flagged_first_is_stable() {
        let mut t = Table::new(vec!["record_id".into(), "training_set".into()]);
        t.push_row(vec![Value::Int(0), Value::Null]).unwrap();
        t.push_row(vec![Value::Int(1), Value::Int(1)]).unwrap();
        t.push_row(vec![Value::Int(2), Value::Int(0)]).unwrap();
        t.push_row(vec![Value::Int(3), Value::Int(1)]).unwrap();

        t.sort_flagged_first("training_set");

        let ids: Vec<i64> = t
            .column("record_id")
            .unwrap()
            .iter()
            .map(|v| v.as_i64().unwrap())
            .collect();
        // Flagged rows first in original relative order, then the rest
        assert_eq!(ids, vec![1, 3, 0, 2]);
    }

    #[test]
    fn sort_flagged_first_missing_column_is_noop() {
        let mut t = left();
        let before = t.clone();
        t.sort_flagged_first("training_set");
        assert_eq!(t, before);
    }

    #[test]
    fn preview_renders_header_and_rows() {
        let t = left();
        let p = t.preview(2);
        let lines: Vec<&str> = p.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("record_id"));
        assert!(lines[1].contains('A'));
        assert!(!p.contains('C'));
    }
}
