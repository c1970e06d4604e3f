use std::collections::HashSet;

use super::config::{ColumnConfig, PointsConfig};

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(points: &PointsConfig, columns: &ColumnConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("first", points.first),
        ("second", points.second),
        ("third", points.third),
    ] {
        if !value.is_finite() {
            errors.push(format!("points.{}: must be a number", field));
        } else if value < 0.0 {
            errors.push(format!("points.{}: must be non-negative", field));
        }
    }

    if columns.participant_id.trim().is_empty() {
        errors.push("columns.participant_id: must not be empty".to_string());
    }

    let mut seen = HashSet::new();
    for (i, mark) in columns.marks.iter().enumerate() {
        if mark.trim().is_empty() {
            errors.push(format!("columns.marks[{}]: must not be empty", i));
        } else if mark == &columns.participant_id {
            errors.push(format!(
                "columns.marks[{}]: '{}' is the participant id column",
                i, mark
            ));
        } else if !seen.insert(mark.as_str()) {
            errors.push(format!("columns.marks[{}]: duplicate column '{}'", i, mark));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
