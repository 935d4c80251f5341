// Excel import/export

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;

use revstate_table::{Table, Value};

/// Read the first sheet of a workbook into a table. The first row is the
/// header; blank header cells get positional names.
pub fn read(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path).map_err(|e| e.to_string())?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "workbook has no sheets".to_string())?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| e.to_string())?;

    let mut rows = range.rows();
    let header = match rows.next() {
        Some(cells) => cells,
        None => return Ok(Table::new(Vec::new())),
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string();
            if name.is_empty() {
                format!("column_{i}")
            } else {
                name
            }
        })
        .collect();
    let width = columns.len();
    let mut table = Table::new(columns);

    for cells in rows {
        let row: Vec<Value> = (0..width)
            .map(|i| cells.get(i).map_or(Value::Null, read_cell))
            .collect();
        table.push_row(row).map_err(|e| e.to_string())?;
    }

    Ok(table)
}

fn read_cell(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::Int(n) => Value::Int(*n),
        Data::Float(x) => Value::Float(*x),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) => {
            if s.is_empty() {
                Value::Null
            } else {
                Value::Text(s.clone())
            }
        }
        // Dates keep their serial representation; consumers format them
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Null,
    }
}

/// Write a table as a single-sheet workbook with a header row and no index
/// column. Null cells stay blank.
pub fn write(table: &Table, path: &Path) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col as u16, name)
            .map_err(|e| e.to_string())?;
    }

    for (r, row) in table.rows().iter().enumerate() {
        let excel_row = (r + 1) as u32;
        for (c, value) in row.iter().enumerate() {
            let col = c as u16;
            match value {
                Value::Null => {}
                Value::Int(n) => {
                    worksheet
                        .write_number(excel_row, col, *n as f64)
                        .map_err(|e| e.to_string())?;
                }
                Value::Float(x) => {
                    worksheet
                        .write_number(excel_row, col, *x)
                        .map_err(|e| e.to_string())?;
                }
                Value::Bool(b) => {
                    worksheet
                        .write_boolean(excel_row, col, *b)
                        .map_err(|e| e.to_string())?;
                }
                Value::Text(s) => {
                    worksheet
                        .write_string(excel_row, col, s)
                        .map_err(|e| e.to_string())?;
                }
            }
        }
    }

    workbook.save(path).map_err(|e| e.to_string())?;
    Ok(())
}
