// Dataset loading - format dispatch + record identifier column

use std::path::Path;

use revstate_table::{Table, Value};

/// Load a raw dataset file, dispatching on extension. Datasets without a
/// `record_id` column get a positional one (0-based, in file order) so they
/// join against the state store's record numbering.
pub fn load(path: &Path) -> Result<Table, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let table = match ext.as_str() {
        "csv" | "txt" => crate::csv::read(path)?,
        "tsv" => crate::csv::read_tsv(path)?,
        "xlsx" | "xlsm" | "xls" | "ods" => crate::xlsx::read(path)?,
        other => return Err(format!("unsupported dataset type: .{other}")),
    };

    Ok(ensure_record_id(table))
}

fn ensure_record_id(table: Table) -> Table {
    if table.column_index("record_id").is_some() {
        return table;
    }

    let mut columns = vec!["record_id".to_string()];
    columns.extend(table.columns().iter().cloned());
    let mut out = Table::new(columns);
    for (i, row) in table.rows().iter().enumerate() {
        let mut new_row = Vec::with_capacity(row.len() + 1);
        new_row.push(Value::Int(i as i64));
        new_row.extend(row.iter().cloned());
        // Widths always line up: one added column, one added cell
        let _ = out.push_row(new_row);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn injects_positional_record_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "title,abstract\nA,first\nB,second\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.columns(), &["record_id", "title", "abstract"]);
        assert_eq!(table.get(0, "record_id"), Some(&Value::Int(0)));
        assert_eq!(table.get(1, "record_id"), Some(&Value::Int(1)));
    }

    #[test]
    fn keeps_existing_record_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.csv");
        fs::write(&path, "record_id,title\n7,A\n9,B\n").unwrap();

        let table = load(&path).unwrap();
        assert_eq!(table.columns(), &["record_id", "title"]);
        assert_eq!(table.get(1, "record_id"), Some(&Value::Int(9)));
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load(Path::new("records.parquet")).unwrap_err();
        assert!(err.contains("unsupported dataset type"));
    }
}
