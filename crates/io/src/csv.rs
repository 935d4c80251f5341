// CSV/TSV import/export

use std::path::Path;

use revstate_table::{Table, Value};

/// Read a delimited file into a table. The first row is the header; the
/// delimiter is sniffed from the content.
pub fn read(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    read_from_string(&content, sniff_delimiter(&content))
}

pub fn read_tsv(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    read_from_string(&content, b'\t')
}

/// Guess the field delimiter from a sample of up to ten lines.
///
/// A candidate is ruled out when the header line stays a single field.
/// Among the rest, the winner maximizes the number of sampled lines whose
/// field count matches the header, weighted by that count. Comma is the
/// default when nothing qualifies.
fn sniff_delimiter(content: &str) -> u8 {
    const CANDIDATES: [u8; 4] = [b'\t', b';', b',', b'|'];

    let sample: Vec<&str> = content.lines().take(10).collect();
    let mut winner = (b',', 0u64);

    for delim in CANDIDATES {
        let counts: Vec<usize> = sample.iter().map(|line| field_count(line, delim)).collect();
        let Some(&header_width) = counts.first() else {
            break;
        };
        if header_width < 2 {
            continue;
        }
        let matching = counts.iter().filter(|&&c| c == header_width).count() as u64;
        let score = matching * header_width as u64;
        if score > winner.1 {
            winner = (delim, score);
        }
    }

    winner.0
}

// Parsed field count of one line, so quoting rules are respected.
fn field_count(line: &str, delimiter: u8) -> usize {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes())
        .records()
        .next()
        .and_then(|record| record.ok())
        .map_or(1, |record| record.len())
}

/// Read a file into a string, decoding Windows-1252 when the bytes are not
/// valid UTF-8. Spreadsheet tools still emit that encoding routinely.
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(invalid) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(invalid.as_bytes());
            Ok(decoded.into_owned())
        }
    }
}

fn read_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let width = columns.len();
    let mut table = Table::new(columns);

    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
        // Short rows are padded with Null, long rows truncated to the header
        let row: Vec<Value> = (0..width)
            .map(|i| record.get(i).map_or(Value::Null, Value::parse))
            .collect();
        table.push_row(row).map_err(|e| e.to_string())?;
    }

    Ok(table)
}

/// Write a table as comma-delimited text with a header row and no index
/// column. Null cells come out empty.
pub fn write(table: &Table, path: &Path) -> Result<(), String> {
    write_with_delimiter(table, path, b',')
}

/// Write a table as tab-delimited text, mirroring [`read_tsv`].
pub fn write_tsv(table: &Table, path: &Path) -> Result<(), String> {
    write_with_delimiter(table, path, b'\t')
}

fn write_with_delimiter(table: &Table, path: &Path, delimiter: u8) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)
        .map_err(|e| e.to_string())?;

    writer.write_record(table.columns()).map_err(|e| e.to_string())?;
    for row in table.rows() {
        let record: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }

    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}
