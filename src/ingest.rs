use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::table::{Cell, Table};

/// Read a CSV file with a header row into a [`Table`].
pub fn read_table(path: &Path) -> Result<Table> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = parse_table(file).with_context(|| format!("Failed to parse CSV {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "loaded table"
    );
    Ok(table)
}

/// Parse CSV from any reader.
///
/// Header names are trimmed (and a UTF-8 BOM dropped). Blank cells become
/// [`Cell::Empty`] and every other cell keeps its trimmed text. Rows may be
/// ragged; rows with no values at all are skipped.
pub fn parse_table<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers().context("Failed to read header row")?;
    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = if i == 0 { h.trim_start_matches('\u{feff}') } else { h };
            h.trim().to_string()
        })
        .collect();
    if columns.iter().all(String::is_empty) {
        anyhow::bail!("CSV has no header row");
    }

    let mut table = Table::new(columns);
    for (i, record) in reader.records().enumerate() {
        // +2: 1-based, after the header line
        let record = record.with_context(|| format!("Invalid CSV record at line {}", i + 2))?;
        let row: Vec<Cell> = record.iter().map(Cell::from_raw).collect();
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        table.push_row(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_keeps_text_cells() {
        let csv = "participant_id,mark1,mark2,mark3\nP1,10,,5\nP2,7.5,abc,\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["participant_id", "mark1", "mark2", "mark3"]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.rows()[0],
            vec![
                Cell::Text("P1".to_string()),
                Cell::Text("10".to_string()),
                Cell::Empty,
                Cell::Text("5".to_string())
            ]
        );
        assert_eq!(table.cell(1, 2), &Cell::Text("abc".to_string()));
    }

    #[test]
    fn test_parse_trims_headers_and_bom() {
        let csv = "\u{feff} Chest No , mark1\n101,4\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, vec!["Chest No", "mark1"]);
        assert_eq!(table.cell(0, 0), &Cell::Text("101".to_string()));
    }

    #[test]
    fn test_parse_preserves_leading_zeros() {
        let csv = "Chest No,Phone,Postcode\n007,0412345678,02134\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        let values: Vec<String> = table.rows()[0].iter().map(Cell::to_string).collect();
        assert_eq!(values, vec!["007", "0412345678", "02134"]);
    }

    #[test]
    fn test_parse_ragged_and_blank_rows() {
        let csv = "id,mark1,mark2\nA,1\n,,\nB,2,3,99\n";
        let table = parse_table(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), &Cell::Empty);
        assert_eq!(table.rows()[1].len(), 3);
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(parse_table("".as_bytes()).is_err());
    }

    #[test]
    fn test_read_missing_file() {
        let path = env::temp_dir().join("podium_test_missing_input.csv");
        let _ = std::fs::remove_file(&path);
        let err = read_table(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to open"));
    }
}
