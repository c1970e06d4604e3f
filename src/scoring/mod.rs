pub mod config;
pub mod engine;
pub mod rank;
pub mod scorer;
pub mod ties;
pub mod validation;

pub use config::*;
pub use engine::{
    compute_results, ResultTable, ScoredEntrant, TieStatus, AGGREGATE_COLUMN, POINTS_COLUMN,
    RANK_COLUMN, TIE_STATUS_COLUMN,
};
pub use rank::min_ranks;
pub use scorer::{score_entrants, Entrant, ParticipantId};
pub use ties::{detect_ties, TieGroup, TieGroups};
pub use validation::validate_scoring;
