use chess::Color;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Engine output matched none of the known score shapes. The ply is skipped.
    #[error("cannot parse number from score: \"{0}\"")]
    UnparsableScore(String),

    #[error("only one of depth ({depth}) or time ({time}s) can be specified")]
    ConfigurationConflict { depth: u8, time: f64 },

    #[error("invalid search limit: {0}")]
    InvalidLimit(String),

    #[error("{side:?} made no moves, average centipawn loss is not computable")]
    EmptySequence { side: Color },

    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("engine timed out: {0}")]
    EngineTimeout(String),
}
