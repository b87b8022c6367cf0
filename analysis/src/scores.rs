use std::fmt;

use chess::Color;
use uci::Score;

use crate::AnalysisError;

/// Base of the mate band. Mate in `n` maps to `MATE_VALUE - n * MATE_STEP`.
pub const MATE_VALUE: i32 = 32_765;
/// Distance between two neighbouring mate scores.
pub const MATE_STEP: i32 = 1_000;

/// Evaluation in centipawns from White's perspective. Positive = White advantage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedScore(i32);

impl NormalizedScore {
    /// Score assumed before the first move of a game.
    pub const EVEN: Self = Self(0);

    pub const fn new(white_centipawns: i32) -> Self {
        Self(white_centipawns)
    }

    #[inline]
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for NormalizedScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Forward width/alignment so report columns line up
        fmt::Display::fmt(&self.0, f)
    }
}

/// An engine score as reported, relative to `pov` (the side to move in the evaluated position).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvaluation {
    Centipawns { cp: i32, pov: Color },
    Mate { moves: i32, pov: Color },
    Unparsable(String),
}

impl RawEvaluation {
    /// Decodes a UCI score. `raw` is the engine output it came from, kept for diagnostics.
    pub fn from_uci(score: Option<&Score>, pov: Color, raw: &str) -> Self {
        match score {
            Some(Score::Centipawns(cp)) => Self::Centipawns { cp: *cp, pov },
            Some(Score::Mate(moves)) => Self::Mate { moves: *moves, pov },
            Some(Score::Unrecognized(_)) | None => {
                if raw.is_empty() {
                    Self::Unparsable("<no score reported>".to_string())
                } else {
                    Self::Unparsable(raw.to_string())
                }
            }
        }
    }

    /// Maps the score onto the White-perspective scale.
    pub fn normalize(&self) -> Result<NormalizedScore, AnalysisError> {
        match *self {
            Self::Centipawns { cp, pov } => Ok(NormalizedScore(from_pov(cp, pov))),
            Self::Mate { moves, pov } => Ok(NormalizedScore(from_pov(mate_score(moves), pov))),
            Self::Unparsable(ref raw) => Err(AnalysisError::UnparsableScore(raw.clone())),
        }
    }
}

/// Mate score from the perspective of the side the distance refers to.
/// A distance of 0 means that side is already mated.
#[inline]
fn mate_score(moves: i32) -> i32 {
    let band = MATE_VALUE.saturating_sub(MATE_STEP.saturating_mul(moves.saturating_abs()));
    if moves > 0 {
        band
    } else {
        -band
    }
}

#[inline]
fn from_pov(score: i32, pov: Color) -> i32 {
    match pov {
        Color::White => score,
        Color::Black => score.saturating_neg(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn normalize(raw: RawEvaluation) -> i32 {
        raw.normalize().unwrap().value()
    }

    #[test]
    fn test_centipawns_white() {
        let raw = RawEvaluation::Centipawns {
            cp: 35,
            pov: Color::White,
        };
        assert_eq!(normalize(raw), 35);
    }

    #[test]
    fn test_centipawns_black() {
        let raw = RawEvaluation::Centipawns {
            cp: 35,
            pov: Color::Black,
        };
        assert_eq!(normalize(raw), -35);

        let raw = RawEvaluation::Centipawns {
            cp: -120,
            pov: Color::Black,
        };
        assert_eq!(normalize(raw), 120);
    }

    #[test]
    fn test_mate_white_perspective() {
        // White mates in 3
        let raw = RawEvaluation::Mate {
            moves: 3,
            pov: Color::White,
        };
        assert_eq!(normalize(raw), 29_765);

        // Black mates in 2
        let raw = RawEvaluation::Mate {
            moves: -2,
            pov: Color::White,
        };
        assert_eq!(normalize(raw), -30_765);
    }

    #[test]
    fn test_mate_black_perspective() {
        // Black mates in 2
        let raw = RawEvaluation::Mate {
            moves: 2,
            pov: Color::Black,
        };
        assert_eq!(normalize(raw), -30_765);

        // White mates in 4
        let raw = RawEvaluation::Mate {
            moves: -4,
            pov: Color::Black,
        };
        assert_eq!(normalize(raw), 28_765);
    }

    #[test]
    fn test_mated_position() {
        // Side to move is checkmated
        let raw = RawEvaluation::Mate {
            moves: 0,
            pov: Color::White,
        };
        assert_eq!(normalize(raw), -MATE_VALUE);

        let raw = RawEvaluation::Mate {
            moves: 0,
            pov: Color::Black,
        };
        assert_eq!(normalize(raw), MATE_VALUE);
    }

    #[test]
    fn test_unparsable() {
        let raw = RawEvaluation::Unparsable("info depth 3 score wdl 10".to_string());
        assert_eq!(
            raw.normalize(),
            Err(AnalysisError::UnparsableScore(
                "info depth 3 score wdl 10".to_string()
            ))
        );
    }

    #[test]
    fn test_from_uci() {
        let raw = RawEvaluation::from_uci(Some(&Score::Centipawns(12)), Color::Black, "line");
        assert_eq!(
            raw,
            RawEvaluation::Centipawns {
                cp: 12,
                pov: Color::Black
            }
        );

        let raw = RawEvaluation::from_uci(Some(&Score::Mate(-1)), Color::White, "line");
        assert_eq!(
            raw,
            RawEvaluation::Mate {
                moves: -1,
                pov: Color::White
            }
        );

        let raw = RawEvaluation::from_uci(
            Some(&Score::Unrecognized("cp x".to_string())),
            Color::White,
            "info score cp x",
        );
        assert_eq!(raw, RawEvaluation::Unparsable("info score cp x".to_string()));

        let raw = RawEvaluation::from_uci(None, Color::White, "");
        assert!(matches!(raw, RawEvaluation::Unparsable(_)));
    }

    #[test]
    fn test_sign_matches_favored_side() {
        let mut rng = rand::thread_rng();

        for _ in 0..1_000 {
            let cp = rng.gen_range(1..=3_000);
            let moves = rng.gen_range(1..=20);

            // Positive from the mover's view favours that side
            for pov in [Color::White, Color::Black] {
                let expected_sign = if pov == Color::White { 1 } else { -1 };
                let score = normalize(RawEvaluation::Centipawns { cp, pov });
                assert_eq!(score.signum(), expected_sign);
                let score = normalize(RawEvaluation::Mate { moves, pov });
                assert_eq!(score.signum(), expected_sign);
                let score = normalize(RawEvaluation::Mate { moves: -moves, pov });
                assert_eq!(score.signum(), -expected_sign);
            }
        }
    }

    #[test]
    fn test_mate_magnitude_ordering() {
        let mate_in = |moves| {
            normalize(RawEvaluation::Mate {
                moves,
                pov: Color::White,
            })
            .abs()
        };

        for moves in 1..20 {
            assert!(mate_in(moves) > mate_in(moves + 1));
        }
        assert!(mate_in(1) > mate_in(20));
        assert!(mate_in(20) > 3_000);
    }
}
