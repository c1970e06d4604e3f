use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::scoring::AGGREGATE_COLUMN;
use crate::table::{Cell, Table};

/// Suffix for result columns whose name is already taken by a roster column.
pub const COLLISION_SUFFIX: &str = "_result";

/// Enrich every roster row with its computed results.
///
/// The roster is the definitive participant list: every roster row appears
/// exactly once, rows without results get empty derived cells, and results
/// for participants missing from the roster are dropped. The output is
/// roster columns followed by the result columns (minus `key`), sorted by
/// aggregate score descending with empty scores last.
pub fn merge_with_roster(results: &Table, roster: &Table, key: &str) -> Result<Table> {
    let results_key = results
        .column_index(key)
        .ok_or_else(|| Error::MissingKeyColumn {
            column: key.to_string(),
            table: "results",
        })?;
    let roster_key = roster
        .column_index(key)
        .ok_or_else(|| Error::MissingKeyColumn {
            column: key.to_string(),
            table: "roster",
        })?;

    let carried: Vec<usize> = (0..results.columns.len())
        .filter(|&i| i != results_key)
        .collect();

    let mut columns = roster.columns.clone();
    for &i in &carried {
        let name = &results.columns[i];
        if roster.has_column(name) {
            columns.push(format!("{}{}", name, COLLISION_SUFFIX));
        } else {
            columns.push(name.clone());
        }
    }
    let aggregate_index = results
        .column_index(AGGREGATE_COLUMN)
        .and_then(|i| carried.iter().position(|&c| c == i))
        .map(|offset| roster.columns.len() + offset);

    // First occurrence wins; computed result sets never repeat an id
    let mut by_key: HashMap<String, usize> = HashMap::new();
    for row in 0..results.len() {
        if let Some(k) = results.cell(row, results_key).key() {
            by_key.entry(k).or_insert(row);
        }
    }

    let mut merged = Table::new(columns);
    let mut roster_keys = HashSet::new();
    let mut unmatched = 0usize;
    for (row, roster_row) in roster.rows().iter().enumerate() {
        let mut out = roster_row.clone();
        let matched = roster.cell(row, roster_key).key().and_then(|k| {
            let hit = by_key.get(&k).copied();
            roster_keys.insert(k);
            hit
        });
        match matched {
            Some(result_row) => {
                out.extend(carried.iter().map(|&i| results.cell(result_row, i).clone()));
            }
            None => {
                unmatched += 1;
                out.extend(std::iter::repeat(Cell::Empty).take(carried.len()));
            }
        }
        merged.push_row(out);
    }

    let dropped = by_key.keys().filter(|k| !roster_keys.contains(*k)).count();
    if dropped > 0 {
        tracing::warn!(dropped, "results without a roster entry were left out of the merge");
    }
    tracing::debug!(rows = merged.len(), unmatched, "merged results with roster");

    if let Some(index) = aggregate_index {
        merged.sort_rows_by(|a, b| descending_nulls_last(&a[index], &b[index]));
    }
    Ok(merged)
}

fn descending_nulls_last(a: &Cell, b: &Cell) -> Ordering {
    match (a.to_number(), b.to_number()) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
