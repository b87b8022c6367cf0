use chess::Color;
use log::{debug, warn};
use utils::PlayedMove;

use crate::loss::ply_loss;
use crate::stats::{overall_average, LossSequence, TrailingStatistics};
use crate::{AnalysisConfig, AnalysisError, Evaluator, NormalizedScore};

/// One analysed ply.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRecord {
    pub ply: usize,
    pub move_number: u32,
    pub mover: Color,
    pub san: String,
    pub score_before: Option<NormalizedScore>,
    pub score_after: Option<NormalizedScore>,
    /// `None` when either score is missing; the ply then counts for neither side.
    pub loss: Option<i32>,
}

impl MoveRecord {
    /// SAN with the `...` prefix used for Black's moves.
    pub fn notation(&self) -> String {
        match self.mover {
            Color::White => self.san.clone(),
            Color::Black => format!("...{}", self.san),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SideReport {
    pub losses: LossSequence,
    /// `EmptySequence` when the side has no recorded loss.
    pub average: Result<f64, AnalysisError>,
    /// Only computed for detailed reports.
    pub trailing: Option<TrailingStatistics>,
}

impl SideReport {
    fn new(losses: LossSequence, detailed: bool) -> Self {
        let average = overall_average(&losses);
        if let Err(e) = &average {
            warn!("{}", e);
        }

        let trailing = detailed.then(|| TrailingStatistics::compute(&losses));

        Self {
            losses,
            average,
            trailing,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameReport {
    pub moves: Vec<MoveRecord>,
    pub white: SideReport,
    pub black: SideReport,
    /// Plies without a recorded loss, because a score was missing.
    pub skipped_plies: Vec<usize>,
}

impl GameReport {
    /// True when some plies are missing from the statistics.
    #[inline]
    pub fn is_partial(&self) -> bool {
        !self.skipped_plies.is_empty()
    }

    pub fn side(&self, color: Color) -> &SideReport {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }
}

/// Walks a game ply by ply, scoring each resulting position.
pub struct GameAnalyzer<'a, E: Evaluator> {
    config: AnalysisConfig,
    evaluator: &'a mut E,
}

impl<'a, E: Evaluator> GameAnalyzer<'a, E> {
    pub fn new(config: AnalysisConfig, evaluator: &'a mut E) -> Self {
        Self { config, evaluator }
    }

    /// Analyses `moves` in order. `on_move` sees every record as soon as its ply is done.
    ///
    /// Engine failures abort the analysis. Unparsable scores only drop the affected plies.
    pub fn analyze<I, F>(&mut self, moves: I, mut on_move: F) -> Result<GameReport, AnalysisError>
    where
        I: IntoIterator<Item = PlayedMove>,
        F: FnMut(&MoveRecord),
    {
        debug!(
            "Analysing with {} at {}",
            self.evaluator.name(),
            self.config.limit
        );

        let mut white = LossSequence::new(Color::White);
        let mut black = LossSequence::new(Color::Black);
        let mut records = Vec::new();
        let mut skipped_plies = Vec::new();

        let mut previous = Some(NormalizedScore::EVEN);

        for played in moves {
            let raw = self.evaluator.evaluate(&played.board, self.config.limit)?;

            let score = match raw.normalize() {
                Ok(score) => Some(score),
                Err(e) => {
                    warn!("Ply {} ({}): {}", played.ply, played.san, e);
                    None
                }
            };

            let loss = ply_loss(previous, score, played.mover);
            match loss {
                Some(loss) => match played.mover {
                    Color::White => white.push(loss),
                    Color::Black => black.push(loss),
                },
                None => {
                    debug!("Ply {} has no loss recorded", played.ply);
                    skipped_plies.push(played.ply);
                }
            }

            let record = MoveRecord {
                ply: played.ply,
                move_number: played.move_number,
                mover: played.mover,
                san: played.san,
                score_before: previous,
                score_after: score,
                loss,
            };
            on_move(&record);
            records.push(record);

            previous = score;
        }

        if !skipped_plies.is_empty() {
            warn!(
                "Statistics are partial, {} plies without a loss: {:?}",
                skipped_plies.len(),
                skipped_plies
            );
        }

        Ok(GameReport {
            moves: records,
            white: SideReport::new(white, self.config.detailed),
            black: SideReport::new(black, self.config.detailed),
            skipped_plies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ZeroTail;
    use crate::{RawEvaluation, SearchLimit};
    use chess::Board;
    use std::collections::VecDeque;
    use utils::GameRecord;

    /// What the scripted engine answers for one position.
    enum Answer {
        /// Centipawns from White's perspective, reported from the side to move.
        White(i32),
        /// Mate distance from White's perspective.
        WhiteMate(i32),
        Garbage,
        Fail,
    }

    struct ScriptedEvaluator {
        answers: VecDeque<Answer>,
        calls: usize,
        limits: Vec<SearchLimit>,
    }

    impl ScriptedEvaluator {
        fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                calls: 0,
                limits: Vec::new(),
            }
        }
    }

    impl Evaluator for ScriptedEvaluator {
        fn name(&self) -> String {
            "scripted".to_string()
        }

        fn evaluate(
            &mut self,
            board: &Board,
            limit: SearchLimit,
        ) -> Result<RawEvaluation, AnalysisError> {
            self.calls += 1;
            self.limits.push(limit);

            let pov = board.side_to_move();
            let flip = if pov == Color::White { 1 } else { -1 };

            match self.answers.pop_front() {
                Some(Answer::White(cp)) => Ok(RawEvaluation::Centipawns { cp: cp * flip, pov }),
                Some(Answer::WhiteMate(moves)) => Ok(RawEvaluation::Mate {
                    moves: moves * flip,
                    pov,
                }),
                Some(Answer::Garbage) => Ok(RawEvaluation::Unparsable(
                    "info depth 1 score ???".to_string(),
                )),
                Some(Answer::Fail) | None => {
                    Err(AnalysisError::EngineUnavailable("engine exited".to_string()))
                }
            }
        }
    }

    const OPENING: &[&str] = &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "d3", "d6"];

    fn moves(san: &[&str]) -> GameRecord {
        GameRecord::from_san_moves(san).unwrap()
    }

    fn detailed() -> AnalysisConfig {
        AnalysisConfig {
            detailed: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_losses_per_side() {
        let game = moves(OPENING);
        let mut engine = ScriptedEvaluator::new(
            [30, 30, 10, 10, -40, -40, -90, -90]
                .into_iter()
                .map(Answer::White)
                .collect(),
        );

        let report = GameAnalyzer::new(detailed(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert_eq!(report.white.losses.as_slice(), &[0, 20, 50, 50]);
        assert_eq!(report.black.losses.as_slice(), &[0, 0, 0, 0]);
        assert_eq!(report.white.average, Ok(30.0));
        assert_eq!(report.black.average, Ok(0.0));
        assert!(!report.is_partial());

        let white = report.white.trailing.as_ref().unwrap();
        assert_eq!(white.series, vec![30.0, 40.0, 50.0, 50.0]);
        assert_eq!(white.zero_tail, None);

        let black = report.black.trailing.as_ref().unwrap();
        assert_eq!(
            black.zero_tail,
            Some(ZeroTail {
                from_move: 1,
                to_move: 4
            })
        );
    }

    #[test]
    fn test_records_and_callback() {
        let game = moves(&OPENING[..3]);
        let mut engine =
            ScriptedEvaluator::new(vec![Answer::White(25), Answer::White(60), Answer::White(40)]);
        let mut seen = Vec::new();

        let report = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |record| seen.push(record.notation()))
            .unwrap();

        assert_eq!(seen, vec!["e4", "...e5", "Nf3"]);
        assert_eq!(report.moves.len(), 3);

        let second = &report.moves[1];
        assert_eq!(second.move_number, 1);
        assert_eq!(second.mover, Color::Black);
        assert_eq!(second.score_before, Some(NormalizedScore::new(25)));
        assert_eq!(second.score_after, Some(NormalizedScore::new(60)));
        assert_eq!(second.loss, Some(35));

        assert_eq!(report.moves[2].move_number, 2);
        assert_eq!(report.moves[2].loss, Some(20));
    }

    #[test]
    fn test_trailing_only_when_detailed() {
        let game = moves(&OPENING[..2]);
        let mut engine = ScriptedEvaluator::new(vec![Answer::White(20), Answer::White(20)]);

        let report = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert!(report.white.trailing.is_none());
        assert!(report.black.trailing.is_none());
    }

    #[test]
    fn test_unparsable_score_skips_plies() {
        let game = moves(&OPENING[..5]);
        let mut engine = ScriptedEvaluator::new(vec![
            Answer::White(20),
            Answer::Garbage,
            Answer::White(-30),
            Answer::White(-30),
            Answer::White(-50),
        ]);

        let report = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        // Ply 2 has no score and ply 3 has nothing to compare against
        assert_eq!(report.skipped_plies, vec![2, 3]);
        assert!(report.is_partial());
        assert_eq!(report.moves[1].score_after, None);
        assert_eq!(report.moves[2].loss, None);
        assert_eq!(report.white.losses.as_slice(), &[0, 20]);
        assert_eq!(report.black.losses.as_slice(), &[0]);
        assert_eq!(engine.calls, 5);
    }

    #[test]
    fn test_engine_failure_is_fatal() {
        let game = moves(&OPENING[..4]);
        let mut engine = ScriptedEvaluator::new(vec![Answer::White(20), Answer::Fail]);

        let result = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |_| {});

        assert!(matches!(result, Err(AnalysisError::EngineUnavailable(_))));
        assert_eq!(engine.calls, 2);
    }

    #[test]
    fn test_configuration_conflict_queries_nothing() {
        let game = moves(OPENING);
        let mut engine = ScriptedEvaluator::new(Vec::new());

        let result = AnalysisConfig::from_limits(Some(5), Some(2.5), false).and_then(|config| {
            GameAnalyzer::new(config, &mut engine).analyze(game.replay(), |_| {})
        });

        assert!(matches!(
            result,
            Err(AnalysisError::ConfigurationConflict { .. })
        ));
        assert_eq!(engine.calls, 0);
    }

    #[test]
    fn test_single_ply_game() {
        let game = moves(&["e4"]);
        let mut engine = ScriptedEvaluator::new(vec![Answer::White(35)]);

        let report = GameAnalyzer::new(detailed(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert_eq!(report.white.average, Ok(0.0));
        assert_eq!(
            report.black.average,
            Err(AnalysisError::EmptySequence { side: Color::Black })
        );
        assert_eq!(report.black.trailing.as_ref().unwrap().series, Vec::<f64>::new());
    }

    #[test]
    fn test_mate_bucket_transition_costs_nothing() {
        let game = moves(&OPENING[..2]);
        let mut engine = ScriptedEvaluator::new(vec![Answer::WhiteMate(3), Answer::WhiteMate(2)]);

        let report = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert_eq!(report.moves[0].score_after, Some(NormalizedScore::new(29_765)));
        assert_eq!(report.moves[1].score_after, Some(NormalizedScore::new(30_765)));
        assert_eq!(report.moves[1].loss, Some(0));
    }

    #[test]
    fn test_limit_is_forwarded() {
        let game = moves(&OPENING[..2]);
        let mut engine = ScriptedEvaluator::new(vec![Answer::White(0), Answer::White(0)]);
        let config = AnalysisConfig::from_limits(None, Some(0.5), false).unwrap();

        GameAnalyzer::new(config.clone(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert_eq!(engine.limits, vec![config.limit; 2]);
    }

    #[test]
    fn test_empty_game() {
        let game = moves(&[]);
        let mut engine = ScriptedEvaluator::new(Vec::new());

        let report = GameAnalyzer::new(AnalysisConfig::default(), &mut engine)
            .analyze(game.replay(), |_| {})
            .unwrap();

        assert!(report.moves.is_empty());
        assert!(report.white.average.is_err());
        assert!(report.black.average.is_err());
        assert_eq!(engine.calls, 0);
    }
}
