//! Centipawn loss analysis.
//!
//! Engine scores are normalized to White's perspective, turned into a per-move loss for the side
//! that moved and aggregated into per-side averages.

pub mod config;
pub mod driver;
mod error;
pub mod loss;
pub mod scores;
pub mod stats;
mod traits;

pub use config::{AnalysisConfig, SearchLimit, DEFAULT_DEPTH};
pub use driver::{GameAnalyzer, GameReport, MoveRecord, SideReport};
pub use error::AnalysisError;
pub use loss::{move_loss, ply_loss, MAX_LOSS};
pub use scores::{NormalizedScore, RawEvaluation};
pub use stats::{LossSequence, TrailingStatistics, ZeroTail};
pub use traits::Evaluator;
