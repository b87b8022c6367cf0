// The analyzer only needs something that can score a position. The `core` binary provides a
// UCI engine process; tests script the answers.

use chess::Board;

use crate::{AnalysisError, RawEvaluation, SearchLimit};

/// Position evaluation interface.
pub trait Evaluator {
    fn name(&self) -> String;
    /// Evaluate `board` within `limit`. The score is relative to the side to move.
    ///
    /// Errors are fatal for the game: after one failure no further scores can be obtained.
    fn evaluate(&mut self, board: &Board, limit: SearchLimit)
        -> Result<RawEvaluation, AnalysisError>;
}
