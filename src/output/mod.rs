pub mod formatter;

pub use formatter::{
    format_points_summary, format_score, format_standings, format_table, format_tie_report,
    format_tsv, should_use_colors,
};
