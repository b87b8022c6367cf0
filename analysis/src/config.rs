use std::fmt;
use std::time::Duration;

use uci::GoParams;

use crate::AnalysisError;

/// Depth used when neither a depth nor a time limit is given.
pub const DEFAULT_DEPTH: u8 = 10;

/// How long the engine may think about each position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchLimit {
    Depth(u8),
    Time(Duration),
}

impl SearchLimit {
    pub fn go_params(&self) -> GoParams {
        match *self {
            SearchLimit::Depth(depth) => GoParams {
                depth: Some(depth),
                ..Default::default()
            },
            SearchLimit::Time(time) => GoParams {
                // UCI movetime is in whole milliseconds
                move_time: Some((time.as_millis() as u64).max(1)),
                ..Default::default()
            },
        }
    }
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLimit::Depth(depth) => write!(f, "depth limit of [{}]", depth),
            SearchLimit::Time(time) => write!(f, "time limit of [{}]", time.as_secs_f64()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub limit: SearchLimit,
    /// Compute trailing statistics at the end of the game.
    pub detailed: bool,
}

impl AnalysisConfig {
    /// Validates the user supplied limits. At most one of `depth` and `time` may be given.
    pub fn from_limits(
        depth: Option<u8>,
        time: Option<f64>,
        detailed: bool,
    ) -> Result<Self, AnalysisError> {
        let limit = match (depth, time) {
            (Some(depth), Some(time)) => {
                return Err(AnalysisError::ConfigurationConflict { depth, time });
            }
            (Some(0), None) => {
                return Err(AnalysisError::InvalidLimit(
                    "depth must be at least 1".to_string(),
                ));
            }
            (Some(depth), None) => SearchLimit::Depth(depth),
            (None, Some(time)) => {
                let invalid = || {
                    AnalysisError::InvalidLimit(format!(
                        "time must be a positive number of seconds, got {}",
                        time
                    ))
                };
                if !time.is_finite() || time <= 0.0 {
                    return Err(invalid());
                }
                SearchLimit::Time(Duration::try_from_secs_f64(time).map_err(|_| invalid())?)
            }
            (None, None) => SearchLimit::Depth(DEFAULT_DEPTH),
        };

        Ok(Self { limit, detailed })
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            limit: SearchLimit::Depth(DEFAULT_DEPTH),
            detailed: false,
        }
    }
}
