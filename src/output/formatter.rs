use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::scoring::{PointsConfig, TieGroups, TieStatus};
use crate::standings::Standings;
use crate::table::{format_number, Cell, Table};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score compactly: integral values without decimals, others
/// with at most two (15, 12.5, 3.33).
pub fn format_score(score: f64) -> String {
    let rounded = (score * 100.0).round() / 100.0;
    format_number(rounded)
}

fn display_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => format_score(*n),
        other => other.to_string(),
    }
}

/// Format a table with a header row and aligned columns.
/// Numbers are right-aligned, text left-aligned. Tied rows are highlighted.
pub fn format_table(table: &Table, use_colors: bool) -> String {
    if table.is_empty() {
        return "No results.".to_string();
    }

    let cells: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let tie_column = table.column_index(crate::scoring::TIE_STATUS_COLUMN);
    let separator = "  ";

    let header = table
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, &width)| format!("{:<width$}", name, width = width))
        .collect::<Vec<_>>()
        .join(separator);
    let header = header.trim_end().to_string();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (row, rendered) in table.rows().iter().zip(&cells) {
        let line = row
            .iter()
            .zip(rendered)
            .zip(&widths)
            .map(|((cell, text), &width)| match cell {
                Cell::Number(_) => format!("{:>width$}", text, width = width),
                _ => format!("{:<width$}", text, width = width),
            })
            .collect::<Vec<_>>()
            .join(separator);
        let line = line.trim_end().to_string();

        let tied = tie_column
            .map(|i| row[i] == Cell::Text(TieStatus::Tied.to_string()))
            .unwrap_or(false);
        lines.push(if use_colors && tied {
            line.yellow().to_string()
        } else {
            line
        });
    }

    lines.join("\n")
}

/// Format a table as tab-separated values for scripting (header included, no colors)
pub fn format_tsv(table: &Table) -> String {
    let mut lines = Vec::with_capacity(table.len() + 1);
    lines.push(table.columns.join("\t"));
    for row in table.rows() {
        lines.push(
            row.iter()
                .map(|cell| cell.to_string().replace(['\t', '\n'], " "))
                .collect::<Vec<_>>()
                .join("\t"),
        );
    }
    lines.join("\n")
}

/// Describe detected ties, one block per tied score.
pub fn format_tie_report(ties: &TieGroups, use_colors: bool) -> String {
    if ties.is_empty() {
        let msg = "No ties detected in the results (excluding entries with 0 marks).";
        return if use_colors {
            msg.green().to_string()
        } else {
            msg.to_string()
        };
    }

    let heading = "Ties detected!";
    let mut lines = vec![
        if use_colors {
            heading.yellow().bold().to_string()
        } else {
            heading.to_string()
        },
        "The following participants have tied scores:".to_string(),
    ];
    for group in ties {
        let ids = group
            .participants
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("  Total mark: {}", format_score(group.score)));
        lines.push(format!("  Tied participants: {}", ids));
    }
    lines.join("\n")
}

/// Current rank-to-points mapping.
pub fn format_points_summary(points: &PointsConfig) -> String {
    format!(
        "Points distribution:\n  Rank 1: {} points\n  Rank 2: {} points\n  Rank 3: {} points\n  Other ranks: 0 points",
        format_score(points.first),
        format_score(points.second),
        format_score(points.third)
    )
}

/// Leaderboard of the top `n` groups followed by summary statistics.
pub fn format_standings(standings: &Standings, n: usize, use_colors: bool) -> String {
    let title = format!("Top {} by points ({})", n, standings.group_by.join(", "));
    let mut lines = vec![if use_colors {
        title.bold().to_string()
    } else {
        title
    }];

    let top = standings.top(n);
    if top.is_empty() {
        lines.push("No results.".to_string());
    } else {
        let label_width = top
            .iter()
            .map(|s| s.label().chars().count())
            .max()
            .unwrap_or(0);
        for (idx, standing) in top.iter().enumerate() {
            let index_str = format!("{:>2}.", idx + 1);
            lines.push(format!(
                "{} {:<width$}  {:>7}",
                if use_colors {
                    index_str.dimmed().to_string()
                } else {
                    index_str
                },
                standing.label(),
                format_score(standing.total_points),
                width = label_width
            ));
        }
    }

    let summary = standings.summary();
    lines.push(String::new());
    lines.push(format!("Total groups: {}", summary.groups));
    for count in &summary.distinct {
        lines.push(format!("Distinct {}: {}", count.column, count.values));
    }
    lines.push(format!(
        "Average points per group: {:.2}",
        summary.average_points_per_group
    ));
    lines.join("\n")
}
