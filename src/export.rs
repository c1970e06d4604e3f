use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::scoring::{PointsConfig, ResultTable, TieGroups};
use crate::table::Table;

/// Spaces become underscores and path separators become dashes.
fn file_stem(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            c if c.is_whitespace() => '_',
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}

fn event_stem(event_name: &str) -> crate::error::Result<String> {
    if event_name.trim().is_empty() {
        return Err(Error::EmptyEventName);
    }
    Ok(file_stem(event_name))
}

/// File name for an event's exported results: `{event}_results.{extension}`.
///
/// An empty or blank event name is rejected.
pub fn export_file_name(event_name: &str, extension: &str) -> crate::error::Result<String> {
    Ok(format!("{}_results.{}", event_stem(event_name)?, extension))
}

/// Full export path inside `dir`.
pub fn export_path(dir: &Path, event_name: &str, extension: &str) -> crate::error::Result<PathBuf> {
    Ok(dir.join(export_file_name(event_name, extension)?))
}

/// Paths for a standings export: `{event}_{category}_results.csv` with the
/// top groups and `{event}_{category}_summary.csv` with the summary, where
/// the category is the grouping columns joined by `_`.
pub fn standings_export_paths(
    dir: &Path,
    event_name: &str,
    group_by: &[String],
) -> crate::error::Result<(PathBuf, PathBuf)> {
    let event = event_stem(event_name)?;
    let category = group_by
        .iter()
        .map(|column| file_stem(column))
        .collect::<Vec<_>>()
        .join("_");
    Ok((
        dir.join(format!("{}_{}_results.csv", event, category)),
        dir.join(format!("{}_{}_summary.csv", event, category)),
    ))
}

/// Write `table` as CSV (header row first).
///
/// Uses atomic-write-file so a failed export never leaves a partial file.
pub fn write_csv(path: &Path, table: &Table) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    {
        let mut writer = csv::Writer::from_writer(&mut file);
        writer
            .write_record(&table.columns)
            .context("Failed to write CSV header")?;
        for row in table.rows() {
            writer
                .write_record(row.iter().map(|cell| cell.to_string()))
                .context("Failed to write CSV row")?;
        }
        writer.flush().context("Failed to flush CSV output")?;
    }

    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = table.len(), "exported CSV");
    Ok(())
}

/// Everything one computation produced, in a serializable shape.
#[derive(Debug, Serialize)]
pub struct ResultsReport<'a> {
    pub event: &'a str,
    pub points: &'a PointsConfig,
    pub results: &'a ResultTable,
    pub ties: &'a TieGroups,
    /// Roster rows enriched with results, when a roster was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merged: Option<&'a Table>,
}

/// Write a [`ResultsReport`] as pretty JSON, atomically.
pub fn write_json(path: &Path, report: &ResultsReport<'_>) -> Result<()> {
    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    serde_json::to_writer_pretty(&mut file, report).context("Failed to serialize results")?;
    file.commit()
        .with_context(|| format!("Failed to save {}", path.display()))?;
    tracing::info!(path = %path.display(), "exported JSON");
    Ok(())
}
