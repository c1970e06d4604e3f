use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// A single table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

static EMPTY_CELL: Cell = Cell::Empty;

impl Cell {
    /// Wrap a raw CSV field. Blank -> Empty, anything else is kept as text
    /// (so `007` stays `007`); see [`Cell::to_number`] for numeric columns.
    pub fn from_raw(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Read the cell as a finite number, parsing text if needed.
    pub fn to_number(&self) -> Option<f64> {
        let n = match self {
            Cell::Empty => return None,
            Cell::Number(n) => *n,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        n.is_finite().then_some(n)
    }

    /// Normalized join key. The number `101` and the text `"101"` share a key.
    pub fn key(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Number(n) => Some(format_number(*n)),
            Cell::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    None
                } else if let Ok(n) = s.parse::<f64>() {
                    if n.is_finite() {
                        Some(format_number(n))
                    } else {
                        Some(s.to_string())
                    }
                } else {
                    Some(s.to_string())
                }
            }
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Number(n) => f.write_str(&format_number(*n)),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl From<Option<f64>> for Cell {
    fn from(n: Option<f64>) -> Self {
        n.map_or(Cell::Empty, Cell::Number)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

/// Format a number without a trailing ".0" for integral values (15, 12.5).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Column names plus rows of cells. Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Serializes as a list of `{column: cell}` records, in column order.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&Record {
                columns: &self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

struct Record<'a> {
    columns: &'a [String],
    row: &'a [Cell],
}

impl Serialize for Record<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.row) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl Table {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with empty cells and dropping overflow.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (row, column); out-of-range lookups read as empty.
    pub fn cell(&self, row: usize, column: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Stable sort of the rows.
    pub fn sort_rows_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Vec<Cell>, &Vec<Cell>) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }

    /// Append every row of `other`, matching columns by name.
    /// Columns unknown to `self` are added at the end.
    pub fn append(&mut self, other: &Table) {
        for name in &other.columns {
            if !self.has_column(name) {
                self.columns.push(name.clone());
                for row in &mut self.rows {
                    row.push(Cell::Empty);
                }
            }
        }
        let mapping: Vec<usize> = other
            .columns
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();
        for row in &other.rows {
            let mut merged = vec![Cell::Empty; self.columns.len()];
            for (src, &dst) in row.iter().zip(&mapping) {
                merged[dst] = src.clone();
            }
            self.rows.push(merged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_coercion() {
        assert_eq!(Cell::from_raw(""), Cell::Empty);
        assert_eq!(Cell::from_raw("   "), Cell::Empty);
        assert_eq!(Cell::from_raw(" 7 "), Cell::Text("7".to_string()));
        assert_eq!(Cell::from_raw("abc"), Cell::Text("abc".to_string()));
    }

    #[test]
    fn test_from_raw_keeps_leading_zeros_and_exponents() {
        for raw in ["007", "0412345678", "02134", "1e3", "12.50"] {
            let cell = Cell::from_raw(raw);
            assert_eq!(cell, Cell::Text(raw.to_string()));
            assert_eq!(cell.to_string(), raw);
        }
    }

    #[test]
    fn test_to_number() {
        assert_eq!(Cell::Text(" 12.5 ".to_string()).to_number(), Some(12.5));
        assert_eq!(Cell::Text("007".to_string()).to_number(), Some(7.0));
        assert_eq!(Cell::Number(3.0).to_number(), Some(3.0));
        assert_eq!(Cell::Number(f64::NAN).to_number(), None);
        assert_eq!(Cell::Text("NaN".to_string()).to_number(), None);
        assert_eq!(Cell::Text("inf".to_string()).to_number(), None);
        assert_eq!(Cell::Text("ten".to_string()).to_number(), None);
        assert_eq!(Cell::Empty.to_number(), None);
    }

    #[test]
    fn test_key_normalizes_numbers_and_text() {
        assert_eq!(Cell::Number(101.0).key(), Some("101".to_string()));
        assert_eq!(Cell::Text("101".to_string()).key(), Some("101".to_string()));
        assert_eq!(Cell::Text(" A7 ".to_string()).key(), Some("A7".to_string()));
        assert_eq!(Cell::Text("  ".to_string()).key(), None);
        assert_eq!(Cell::Empty.key(), None);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(15.0), "15");
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_push_row_pads_and_truncates() {
        let mut table = Table::new(["a", "b", "c"]);
        table.push_row(vec![Cell::Number(1.0)]);
        table.push_row(vec![
            Cell::Number(1.0),
            Cell::Number(2.0),
            Cell::Number(3.0),
            Cell::Number(4.0),
        ]);
        assert_eq!(table.rows()[0].len(), 3);
        assert_eq!(table.rows()[1].len(), 3);
        assert_eq!(table.cell(0, 2), &Cell::Empty);
        assert_eq!(table.cell(5, 0), &Cell::Empty);
    }

    #[test]
    fn test_append_matches_columns_by_name() {
        let mut first = Table::new(["id", "points"]);
        first.push_row(vec!["A".into(), 5.0.into()]);
        let mut second = Table::new(["points", "id", "region"]);
        second.push_row(vec![3.0.into(), "B".into(), "North".into()]);

        first.append(&second);

        assert_eq!(first.columns, vec!["id", "points", "region"]);
        assert_eq!(first.len(), 2);
        assert_eq!(first.cell(0, 2), &Cell::Empty);
        assert_eq!(first.cell(1, 0), &Cell::Text("B".to_string()));
        assert_eq!(first.cell(1, 1), &Cell::Number(3.0));
        assert_eq!(first.cell(1, 2), &Cell::Text("North".to_string()));
    }

    #[test]
    fn test_serialize_as_records() {
        let mut table = Table::new(["id", "name", "aggregate_score"]);
        table.push_row(vec!["007".into(), "Asha".into(), 12.5.into()]);
        table.push_row(vec!["008".into(), "Ben".into(), Cell::Empty]);

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": "007", "name": "Asha", "aggregate_score": 12.5},
                {"id": "008", "name": "Ben", "aggregate_score": null},
            ])
        );
    }
}
