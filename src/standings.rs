use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::scoring::POINTS_COLUMN;
use crate::table::{Cell, Table};

/// Points collected by one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    /// Values of the grouping columns, in `group_by` order, as first seen.
    pub group: Vec<String>,
    pub total_points: f64,
    /// Rows that carried a points value.
    pub scored_rows: usize,
    pub rows: usize,
}

impl Standing {
    /// Mean points over the rows that carried a value.
    pub fn mean_points(&self) -> Option<f64> {
        if self.scored_rows == 0 {
            None
        } else {
            Some(self.total_points / self.scored_rows as f64)
        }
    }

    pub fn label(&self) -> String {
        self.group.join(" / ")
    }
}

/// Number of distinct non-empty values in one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistinctCount {
    pub column: String,
    pub values: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StandingsSummary {
    pub groups: usize,
    /// Mean over groups of each group's mean row points.
    pub average_points_per_group: f64,
    pub distinct: Vec<DistinctCount>,
}

impl StandingsSummary {
    /// Two-column `statistic,value` table for export.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(["statistic", "value"]);
        table.push_row(vec!["Total groups".into(), (self.groups as f64).into()]);
        for count in &self.distinct {
            table.push_row(vec![
                format!("Distinct {}", count.column).into(),
                (count.values as f64).into(),
            ]);
        }
        table.push_row(vec![
            "Average points per group".into(),
            format!("{:.2}", self.average_points_per_group).into(),
        ]);
        table
    }
}

/// All groups, ordered by total points descending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standings {
    pub group_by: Vec<String>,
    pub standings: Vec<Standing>,
    /// Distinct values per grouping column, plus any extra counted columns.
    pub distinct: Vec<DistinctCount>,
}

impl Standings {
    pub fn top(&self, n: usize) -> &[Standing] {
        &self.standings[..n.min(self.standings.len())]
    }

    /// The top `n` groups as a table: grouping columns then total points.
    pub fn to_table(&self, n: usize) -> Table {
        let mut table = Table::new(self.group_by.iter().map(String::as_str).chain([POINTS_COLUMN]));
        for standing in self.top(n) {
            let mut row: Vec<Cell> = standing.group.iter().map(|v| v.as_str().into()).collect();
            row.push(standing.total_points.into());
            table.push_row(row);
        }
        table
    }

    pub fn summary(&self) -> StandingsSummary {
        let means: Vec<f64> = self
            .standings
            .iter()
            .filter_map(Standing::mean_points)
            .collect();
        let average = if means.is_empty() {
            0.0
        } else {
            means.iter().sum::<f64>() / means.len() as f64
        };
        StandingsSummary {
            groups: self.standings.len(),
            average_points_per_group: average,
            distinct: self.distinct.clone(),
        }
    }
}

fn standings_columns(table: &Table, names: &[String]) -> Result<Vec<usize>> {
    names
        .iter()
        .map(|name| {
            table.column_index(name).ok_or_else(|| Error::MissingKeyColumn {
                column: name.clone(),
                table: "standings input",
            })
        })
        .collect()
}

/// Count distinct non-empty values of each column (`101` and `"101"` count once).
pub fn count_distinct(table: &Table, columns: &[String]) -> Result<Vec<DistinctCount>> {
    let indices = standings_columns(table, columns)?;
    Ok(columns
        .iter()
        .zip(indices)
        .map(|(column, index)| {
            let values: HashSet<String> = (0..table.len())
                .filter_map(|row| table.cell(row, index).key())
                .collect();
            DistinctCount {
                column: column.clone(),
                values: values.len(),
            }
        })
        .collect())
}

/// Group `table` rows by `group_by` and total the points column.
///
/// Rows with an empty grouping cell are skipped. Group values match on their
/// normalized key and are labelled with the first text seen. Empty points
/// cells (roster entries with no result) add nothing; points that do not parse
/// as numbers are rejected. Groups with equal totals keep first-seen order.
pub fn compute_standings(table: &Table, group_by: &[String]) -> Result<Standings> {
    if group_by.is_empty() {
        return Err(Error::MalformedInput(
            "at least one grouping column is required".to_string(),
        ));
    }
    let group_indices = standings_columns(table, group_by)?;
    let points_index =
        table
            .column_index(POINTS_COLUMN)
            .ok_or_else(|| Error::MissingKeyColumn {
                column: POINTS_COLUMN.to_string(),
                table: "standings input",
            })?;

    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
    let mut standings: Vec<Standing> = Vec::new();
    let mut skipped = 0usize;

    for row in 0..table.len() {
        let key: Option<Vec<String>> = group_indices
            .iter()
            .map(|&i| table.cell(row, i).key())
            .collect();
        let Some(key) = key else {
            skipped += 1;
            continue;
        };

        let points = match table.cell(row, points_index) {
            Cell::Empty => None,
            cell => match cell.to_number() {
                Some(n) => Some(n),
                None => {
                    return Err(Error::MalformedInput(format!(
                        "row {}: points value '{}' is not a number",
                        row + 1,
                        cell
                    )))
                }
            },
        };

        let position = *positions.entry(key).or_insert_with(|| {
            standings.push(Standing {
                group: group_indices
                    .iter()
                    .map(|&i| table.cell(row, i).to_string())
                    .collect(),
                total_points: 0.0,
                scored_rows: 0,
                rows: 0,
            });
            standings.len() - 1
        });
        let standing = &mut standings[position];
        standing.rows += 1;
        if let Some(points) = points {
            standing.total_points += points;
            standing.scored_rows += 1;
        }
    }

    if skipped > 0 {
        tracing::info!(skipped, "rows without a group value were skipped");
    }

    standings.sort_by(|a, b| b.total_points.total_cmp(&a.total_points));
    Ok(Standings {
        group_by: group_by.to_vec(),
        standings,
        distinct: count_distinct(table, group_by)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points_table(rows: &[(&str, &str, Option<f64>)]) -> Table {
        let mut table = Table::new(["name", "church", POINTS_COLUMN]);
        for (name, church, points) in rows {
            table.push_row(vec![(*name).into(), (*church).into(), Cell::from(*points)]);
        }
        table
    }

    fn by(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_totals_and_order() {
        let table = points_table(&[
            ("Asha", "St Mary", Some(5.0)),
            ("Ben", "St John", Some(3.0)),
            ("Cara", "St John", Some(5.0)),
            ("Dev", "St Mary", Some(1.0)),
            ("Eli", "Grace", Some(1.0)),
        ]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();
        let labels: Vec<String> = standings.standings.iter().map(Standing::label).collect();
        assert_eq!(labels, vec!["St John", "St Mary", "Grace"]);
        assert_eq!(standings.standings[0].total_points, 8.0);
        assert_eq!(standings.standings[1].total_points, 6.0);
    }

    #[test]
    fn test_equal_totals_keep_first_seen_order() {
        let table = points_table(&[
            ("Asha", "B", Some(3.0)),
            ("Ben", "A", Some(3.0)),
        ]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();
        assert_eq!(standings.standings[0].label(), "B");
        assert_eq!(standings.standings[1].label(), "A");
    }

    #[test]
    fn test_top_n() {
        let table = points_table(&[
            ("Asha", "A", Some(5.0)),
            ("Ben", "B", Some(3.0)),
            ("Cara", "C", Some(1.0)),
        ]);
        let standings = compute_standings(&table, &by(&["name"])).unwrap();
        assert_eq!(standings.top(2).len(), 2);
        assert_eq!(standings.top(10).len(), 3);
        assert_eq!(standings.top(1)[0].label(), "Asha");
    }

    #[test]
    fn test_summary_mean_of_group_means() {
        let table = points_table(&[
            ("Asha", "A", Some(5.0)),
            ("Ben", "A", Some(1.0)),
            ("Cara", "B", Some(0.0)),
        ]);
        let summary = compute_standings(&table, &by(&["church"]))
            .unwrap()
            .summary();
        assert_eq!(summary.groups, 2);
        // A: mean 3, B: mean 0
        assert!((summary.average_points_per_group - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_points_add_nothing() {
        let table = points_table(&[("Asha", "A", Some(5.0)), ("Ben", "A", None)]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();
        let a = &standings.standings[0];
        assert_eq!(a.total_points, 5.0);
        assert_eq!(a.rows, 2);
        assert_eq!(a.mean_points(), Some(5.0));
    }

    #[test]
    fn test_multi_column_grouping() {
        let table = points_table(&[
            ("Asha", "A", Some(5.0)),
            ("Asha", "A", Some(3.0)),
            ("Asha", "B", Some(1.0)),
        ]);
        let standings = compute_standings(&table, &by(&["name", "church"])).unwrap();
        assert_eq!(standings.standings.len(), 2);
        assert_eq!(standings.standings[0].group, vec!["Asha", "A"]);
        assert_eq!(standings.standings[0].total_points, 8.0);
    }

    #[test]
    fn test_empty_group_cell_skipped() {
        let table = points_table(&[("Asha", "", Some(5.0)), ("Ben", "A", Some(1.0))]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();
        assert_eq!(standings.standings.len(), 1);
    }

    #[test]
    fn test_missing_columns() {
        let table = points_table(&[]);
        let err = compute_standings(&table, &by(&["region"])).unwrap_err();
        assert!(matches!(err, Error::MissingKeyColumn { ref column, .. } if column == "region"));

        let no_points = Table::new(["church"]);
        let err = compute_standings(&no_points, &by(&["church"])).unwrap_err();
        assert!(matches!(err, Error::MissingKeyColumn { ref column, .. } if column == POINTS_COLUMN));
    }

    #[test]
    fn test_group_label_keeps_first_seen_text() {
        let mut table = Table::new(["ID No", POINTS_COLUMN]);
        table.push_row(vec!["007".into(), "5".into()]);
        table.push_row(vec![Cell::Number(7.0), "3".into()]);
        let standings = compute_standings(&table, &by(&["ID No"])).unwrap();
        assert_eq!(standings.standings.len(), 1);
        assert_eq!(standings.standings[0].label(), "007");
        assert_eq!(standings.standings[0].total_points, 8.0);
    }

    #[test]
    fn test_points_parsed_from_text() {
        let mut table = Table::new(["church", POINTS_COLUMN]);
        table.push_row(vec!["A".into(), " 2.5 ".into()]);
        table.push_row(vec!["A".into(), Cell::Empty]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();
        assert_eq!(standings.standings[0].total_points, 2.5);
    }

    #[test]
    fn test_distinct_counts() {
        let table = points_table(&[
            ("Asha", "St Mary", Some(5.0)),
            ("Ben", "St John", Some(3.0)),
            ("Asha", "St Mary", Some(1.0)),
            ("Cara", "", Some(1.0)),
        ]);
        let standings = compute_standings(&table, &by(&["name"])).unwrap();
        assert_eq!(
            standings.distinct,
            vec![DistinctCount {
                column: "name".to_string(),
                values: 3
            }]
        );
        let churches = count_distinct(&table, &by(&["church"])).unwrap();
        assert_eq!(churches[0].values, 2);
        assert!(count_distinct(&table, &by(&["region"])).is_err());
    }

    #[test]
    fn test_to_tables() {
        let table = points_table(&[
            ("Asha", "St Mary", Some(5.0)),
            ("Ben", "St John", Some(3.0)),
            ("Cara", "St John", Some(2.5)),
            ("Dev", "Grace", Some(1.0)),
        ]);
        let standings = compute_standings(&table, &by(&["church"])).unwrap();

        let top = standings.to_table(2);
        assert_eq!(top.columns, vec!["church", POINTS_COLUMN]);
        assert_eq!(top.len(), 2);
        assert_eq!(top.cell(0, 0).to_string(), "St John");
        assert_eq!(top.cell(0, 1).to_string(), "5.5");
        assert_eq!(top.cell(1, 0).to_string(), "St Mary");

        let summary = standings.summary().to_table();
        assert_eq!(summary.columns, vec!["statistic", "value"]);
        let rows: Vec<(String, String)> = summary
            .rows()
            .iter()
            .map(|r| (r[0].to_string(), r[1].to_string()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Total groups".to_string(), "3".to_string()),
                ("Distinct church".to_string(), "3".to_string()),
                ("Average points per group".to_string(), "2.92".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_points_rejected() {
        let mut table = Table::new(["church", POINTS_COLUMN]);
        table.push_row(vec!["A".into(), "five".into()]);
        let err = compute_standings(&table, &by(&["church"])).unwrap_err();
        assert!(matches!(err, Error::MalformedInput(_)));
    }
}
