use thiserror::Error;

/// Errors reported by scoring, merging and export naming.
///
/// All of them are recoverable: the caller fixes the input and recomputes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Required fields missing or invalid in the scoring input.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Join or grouping column absent from a table.
    #[error("column '{column}' not found in {table} table")]
    MissingKeyColumn { column: String, table: &'static str },

    /// Export was requested without an event name.
    #[error("event name must not be empty")]
    EmptyEventName,
}

pub type Result<T> = std::result::Result<T, Error>;
