pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod merge;
pub mod output;
pub mod scoring;
pub mod standings;
pub mod table;

pub use error::{Error, Result};
pub use merge::merge_with_roster;
pub use scoring::{compute_results, ColumnConfig, PointsConfig, ResultTable, TieGroups};
pub use table::{Cell, Table};
