use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::config::{ColumnConfig, PointsConfig};
use super::rank::min_ranks;
use super::scorer::{score_entrants, ParticipantId};
use super::ties::{detect_ties, TieGroups};
use crate::error::{Error, Result};
use crate::table::{Cell, Table};

/// Output column names for the derived fields.
pub const AGGREGATE_COLUMN: &str = "aggregate_score";
pub const RANK_COLUMN: &str = "rank";
pub const POINTS_COLUMN: &str = "points";
pub const TIE_STATUS_COLUMN: &str = "tie_status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TieStatus {
    None,
    Tied,
}

impl fmt::Display for TieStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TieStatus::None => f.write_str("none"),
            TieStatus::Tied => f.write_str("tied"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntrant {
    pub participant_id: ParticipantId,
    #[serde(skip)]
    pub id_cell: Cell,
    pub marks: Vec<Option<f64>>,
    pub aggregate_score: f64,
    pub rank: u32,
    pub points: f64,
    pub tie_status: TieStatus,
}

/// Fully annotated results, sorted by aggregate score descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultTable {
    pub id_column: String,
    pub mark_columns: Vec<String>,
    pub entrants: Vec<ScoredEntrant>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&ScoredEntrant> {
        self.entrants.iter().find(|e| &e.participant_id == id)
    }

    /// Flatten into a [`Table`]: id, marks, then the derived columns.
    pub fn to_table(&self) -> Table {
        let mut columns = Vec::with_capacity(self.mark_columns.len() + 5);
        columns.push(self.id_column.clone());
        columns.extend(self.mark_columns.iter().cloned());
        columns.extend(
            [AGGREGATE_COLUMN, RANK_COLUMN, POINTS_COLUMN, TIE_STATUS_COLUMN]
                .iter()
                .map(|c| c.to_string()),
        );

        let mut table = Table::new(columns);
        for entrant in &self.entrants {
            let mut row = Vec::with_capacity(table.columns.len());
            row.push(entrant.id_cell.clone());
            row.extend(entrant.marks.iter().map(|m| Cell::from(*m)));
            row.push(Cell::Number(entrant.aggregate_score));
            row.push(Cell::Number(f64::from(entrant.rank)));
            row.push(Cell::Number(entrant.points));
            row.push(Cell::Text(entrant.tie_status.to_string()));
            table.push_row(row);
        }
        table
    }
}

/// Score, rank and tie-check every entrant in `entrants`.
///
/// Every call recomputes from the raw marks; nothing in the input table is
/// reused as a derived value.
pub fn compute_results(
    entrants: &Table,
    columns: &ColumnConfig,
    points: &PointsConfig,
) -> Result<(ResultTable, TieGroups)> {
    for (place, value) in [
        ("first", points.first),
        ("second", points.second),
        ("third", points.third),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::MalformedInput(format!(
                "{} place points must be a non-negative number, got {}",
                place, value
            )));
        }
    }

    let scored = score_entrants(entrants, columns)?;
    let scores: Vec<f64> = scored.iter().map(|e| e.aggregate_score).collect();
    let ranks = min_ranks(&scores);
    let ties = detect_ties(scored.iter().map(|e| (&e.participant_id, e.aggregate_score)));

    let tied: HashSet<&ParticipantId> = ties.iter().flat_map(|g| &g.participants).collect();
    let mut results: Vec<ScoredEntrant> = scored
        .iter()
        .zip(&ranks)
        .map(|(entrant, &rank)| ScoredEntrant {
            participant_id: entrant.participant_id.clone(),
            id_cell: entrant.id_cell.clone(),
            marks: entrant.marks.clone(),
            aggregate_score: entrant.aggregate_score,
            rank,
            points: points.points_for(rank),
            tie_status: if tied.contains(&entrant.participant_id) {
                TieStatus::Tied
            } else {
                TieStatus::None
            },
        })
        .collect();

    // Stable: equal scores keep input order
    results.sort_by(|a, b| b.aggregate_score.total_cmp(&a.aggregate_score));

    tracing::debug!(
        entrants = results.len(),
        tie_groups = ties.len(),
        "computed results"
    );

    Ok((
        ResultTable {
            id_column: columns.participant_id.clone(),
            mark_columns: columns.marks.clone(),
            entrants: results,
        },
        ties,
    ))
}
