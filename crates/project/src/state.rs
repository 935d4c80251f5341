// Read-only access to the SQLite labeling-state store

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use revstate_table::{Table, Value};

use crate::error::ProjectError;

/// Columns of the labeling table. `record_id` is always present; the rest
/// vary by store version and read as Null when absent.
const RESULT_COLUMNS: &[&str] = &["record_id", "label", "labeling_time", "notes"];

/// Columns of the last ranking snapshot.
const RANKING_COLUMNS: &[&str] = &[
    "record_id",
    "ranking",
    "classifier",
    "query_strategy",
    "balance_strategy",
    "feature_extraction",
    "training_set",
    "time",
];

/// Output column name for the probability snapshot.
pub const PROBABILITIES_COLUMN: &str = "last_probabilities";

#[derive(Debug)]
pub struct StateStore {
    conn: Connection,
}

impl StateStore {
    /// Open the store read-only. The source archive is never mutated.
    pub fn open(path: &Path) -> Result<Self, ProjectError> {
        if !path.exists() {
            return Err(ProjectError::StateUnreadable(format!(
                "{} not found",
                path.display()
            )));
        }
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        Ok(Self { conn })
    }

    /// The full labeling table, one row per applied label, in the order
    /// labels were applied (rowid order).
    pub fn labeling_table(&self) -> Result<Table, ProjectError> {
        self.read_table("results", RESULT_COLUMNS, true)
    }

    /// The ranking snapshot from the most recent model iteration. Stores
    /// from a review that never trained a model have no snapshot; that
    /// reads as an empty table so joins produce Null columns.
    pub fn last_ranking(&self) -> Result<Table, ProjectError> {
        self.read_table("last_ranking", RANKING_COLUMNS, false)
    }

    /// Relevance probabilities from the most recent model iteration, one
    /// score per dataset record in record order. Exposed keyed by
    /// `record_id` derived from the row position.
    pub fn last_probabilities(&self) -> Result<Table, ProjectError> {
        let mut out = Table::new(vec!["record_id".into(), PROBABILITIES_COLUMN.into()]);
        if !self.table_exists("last_probabilities")? {
            return Ok(out);
        }
        let mut stmt = self
            .conn
            .prepare("SELECT proba FROM last_probabilities ORDER BY rowid")
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        let scores = stmt
            .query_map([], |row| row.get::<_, f64>(0))
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        for (record_id, score) in scores.enumerate() {
            let score = score.map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
            out.push_row(vec![Value::Int(record_id as i64), Value::Float(score)])
                .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        }
        Ok(out)
    }

    fn table_exists(&self, name: &str) -> Result<bool, ProjectError> {
        let count: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |row| row.get(0),
            )
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        Ok(count > 0)
    }

    fn existing_columns(&self, table: &str) -> Result<Vec<String>, ProjectError> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM pragma_table_info(?1)")
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        let mut out = Vec::new();
        for name in names {
            out.push(name.map_err(|e| ProjectError::StateUnreadable(e.to_string()))?);
        }
        Ok(out)
    }

    /// Read `table` into a `Table` with exactly the `expected` columns, in
    /// rowid order. Columns the store doesn't have come out Null; a missing
    /// table is either an error (`required`) or an empty table.
    fn read_table(
        &self,
        table: &str,
        expected: &[&str],
        required: bool,
    ) -> Result<Table, ProjectError> {
        let mut out = Table::new(expected.iter().map(|c| c.to_string()).collect());

        if !self.table_exists(table)? {
            if required {
                return Err(ProjectError::StateUnreadable(format!(
                    "store has no '{table}' table"
                )));
            }
            return Ok(out);
        }

        let present = self.existing_columns(table)?;
        // Position of each expected column in the SELECT list, if present
        let mut select: Vec<&str> = Vec::new();
        let mut slots: Vec<Option<usize>> = Vec::with_capacity(expected.len());
        for &col in expected {
            if present.iter().any(|p| p == col) {
                select.push(col);
                slots.push(Some(select.len() - 1));
            } else {
                slots.push(None);
            }
        }

        if select.is_empty() {
            return Err(ProjectError::StateUnreadable(format!(
                "'{table}' has none of the expected columns"
            )));
        }

        let sql = format!("SELECT {} FROM {table} ORDER BY rowid", select.join(", "));
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        let n_selected = select.len();
        let rows = stmt
            .query_map([], |row| {
                let mut fields = Vec::with_capacity(n_selected);
                for i in 0..n_selected {
                    fields.push(read_value(row.get_ref(i)?));
                }
                Ok(fields)
            })
            .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;

        for row in rows {
            let fields = row.map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
            let full: Vec<Value> = slots
                .iter()
                .map(|slot| match slot {
                    Some(i) => fields[*i].clone(),
                    None => Value::Null,
                })
                .collect();
            out.push_row(full)
                .map_err(|e| ProjectError::StateUnreadable(e.to_string()))?;
        }

        Ok(out)
    }
}

fn read_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Int(n),
        ValueRef::Real(x) => Value::Float(x),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        // No blob columns in the consumed schema
        ValueRef::Blob(_) => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(dir: &Path, schema_and_rows: &str) -> StateStore {
        let path = dir.join("results.sql");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(schema_and_rows).unwrap();
        drop(conn);
        StateStore::open(&path).unwrap()
    }

    #[test]
    fn labeling_table_in_rowid_order() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            dir.path(),
            "CREATE TABLE results (
                 record_id INTEGER, label INTEGER, labeling_time TEXT, notes TEXT
             );
             INSERT INTO results VALUES (2, 1, '2026-03-01T10:00:00', NULL);
             INSERT INTO results VALUES (0, 0, '2026-03-01T10:05:00', 'out of scope');",
        );

        let table = store.labeling_table().unwrap();
        assert_eq!(table.n_rows(), 2);
        assert_eq!(table.columns(), RESULT_COLUMNS);
        // First labeled record first
        assert_eq!(table.get(0, "record_id"), Some(&Value::Int(2)));
        assert_eq!(table.get(1, "notes"), Some(&Value::Text("out of scope".into())));
    }

    #[test]
    fn absent_optional_columns_read_null() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            dir.path(),
            "CREATE TABLE results (record_id INTEGER, label INTEGER);
             INSERT INTO results VALUES (0, 1);",
        );

        let table = store.labeling_table().unwrap();
        assert_eq!(table.get(0, "label"), Some(&Value::Int(1)));
        assert_eq!(table.get(0, "notes"), Some(&Value::Null));
        assert_eq!(table.get(0, "labeling_time"), Some(&Value::Null));
    }

    #[test]
    fn missing_results_table_is_error() {
        let dir = TempDir::new().unwrap();
        let store = store_with(dir.path(), "CREATE TABLE unrelated (x INTEGER);");
        assert!(matches!(
            store.labeling_table(),
            Err(ProjectError::StateUnreadable(_))
        ));
    }

    #[test]
    fn missing_snapshots_read_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            dir.path(),
            "CREATE TABLE results (record_id INTEGER, label INTEGER);",
        );
        assert_eq!(store.last_ranking().unwrap().n_rows(), 0);
        let probabilities = store.last_probabilities().unwrap();
        assert_eq!(probabilities.n_rows(), 0);
        assert_eq!(probabilities.columns(), &["record_id", PROBABILITIES_COLUMN]);
    }

    #[test]
    fn probabilities_are_positional() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            dir.path(),
            "CREATE TABLE last_probabilities (proba REAL);
             INSERT INTO last_probabilities VALUES (0.9);
             INSERT INTO last_probabilities VALUES (0.2);
             INSERT INTO last_probabilities VALUES (0.5);",
        );

        let table = store.last_probabilities().unwrap();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.get(1, "record_id"), Some(&Value::Int(1)));
        assert_eq!(table.get(1, PROBABILITIES_COLUMN), Some(&Value::Float(0.2)));
    }

    #[test]
    fn ranking_keeps_strategy_columns() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            dir.path(),
            "CREATE TABLE last_ranking (
                 record_id INTEGER, ranking INTEGER, classifier TEXT,
                 query_strategy TEXT, balance_strategy TEXT,
                 feature_extraction TEXT, training_set INTEGER, time TEXT
             );
             INSERT INTO last_ranking VALUES
                 (0, 1, 'nb', 'max', 'double', 'tfidf', 1, '2026-03-01');",
        );

        let table = store.last_ranking().unwrap();
        assert_eq!(table.columns(), RANKING_COLUMNS);
        assert_eq!(table.get(0, "classifier"), Some(&Value::Text("nb".into())));
        assert_eq!(table.get(0, "training_set"), Some(&Value::Int(1)));
    }

    #[test]
    fn missing_store_file() {
        let dir = TempDir::new().unwrap();
        let err = StateStore::open(&dir.path().join("absent.sql")).unwrap_err();
        assert!(matches!(err, ProjectError::StateUnreadable(_)));
    }
}
