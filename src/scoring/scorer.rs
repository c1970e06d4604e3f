use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::config::ColumnConfig;
use crate::error::{Error, Result};
use crate::table::{Cell, Table};

/// Normalized participant identifier (see [`Cell::key`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An input row with its marks totalled.
#[derive(Debug, Clone, PartialEq)]
pub struct Entrant {
    pub participant_id: ParticipantId,
    /// The id cell as it appeared in the input, kept for export.
    pub id_cell: Cell,
    pub marks: Vec<Option<f64>>,
    pub aggregate_score: f64,
}

/// Sum the configured mark columns of every row.
///
/// Absent marks (empty cells, or a mark column missing from the table) count
/// as zero. Mark cells are parsed as numbers; unparseable or non-finite marks, a missing id column, and missing or
/// duplicated ids are rejected.
pub fn score_entrants(table: &Table, columns: &ColumnConfig) -> Result<Vec<Entrant>> {
    let id_index = table.column_index(&columns.participant_id).ok_or_else(|| {
        Error::MalformedInput(format!(
            "participant id column '{}' not found",
            columns.participant_id
        ))
    })?;
    let mark_indices: Vec<Option<usize>> = columns
        .marks
        .iter()
        .map(|name| table.column_index(name))
        .collect();

    let mut seen = HashSet::new();
    let mut entrants = Vec::with_capacity(table.len());

    for row in 0..table.len() {
        // 1-based data row, as a spreadsheet user would count it
        let line = row + 1;
        let id_cell = table.cell(row, id_index).clone();
        let participant_id = id_cell.key().map(ParticipantId).ok_or_else(|| {
            Error::MalformedInput(format!("row {}: missing participant id", line))
        })?;
        if !seen.insert(participant_id.clone()) {
            return Err(Error::MalformedInput(format!(
                "row {}: duplicate participant id '{}'",
                line, participant_id
            )));
        }

        let mut marks = Vec::with_capacity(mark_indices.len());
        for (name, index) in columns.marks.iter().zip(&mark_indices) {
            let mark = match index.map(|i| table.cell(row, i)) {
                None | Some(Cell::Empty) => None,
                Some(cell) => match cell.to_number() {
                    Some(n) => Some(n),
                    None => {
                        return Err(Error::MalformedInput(format!(
                            "row {}: {} for '{}' is not a number: '{}'",
                            line, name, participant_id, cell
                        )))
                    }
                },
            };
            marks.push(mark);
        }

        let aggregate_score = marks.iter().flatten().fold(0.0, |acc, m| acc + m);
        entrants.push(Entrant {
            participant_id,
            id_cell,
            marks,
            aggregate_score,
        });
    }

    tracing::debug!(entrants = entrants.len(), "scored entrants");
    Ok(entrants)
}
