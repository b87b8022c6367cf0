use std::path::Path;
use std::time::Duration;

use analysis::{AnalysisError, Evaluator, RawEvaluation, SearchLimit};
use chess::Board;
use log::{debug, info};
use uci::{ConnectionError, EngineConnection, EngineOutput, Info, Terminator, UciCommand};

/// How long the engine gets to answer `uci` and `isready`.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// An external UCI engine used as the position evaluator.
pub struct UciEngine {
    connection: EngineConnection,
    name: String,
}

impl UciEngine {
    /// Starts the engine, applies `options` and prepares it for a new game.
    pub fn start(path: &Path, options: &[(String, String)]) -> Result<Self, AnalysisError> {
        let mut connection = EngineConnection::spawn(path).map_err(into_analysis_error)?;

        let name = handshake(&mut connection, options).map_err(into_analysis_error)?;
        let name = name.unwrap_or_else(|| path.display().to_string());
        info!("Engine ready: {}", name);

        Ok(Self { connection, name })
    }

    pub fn terminator(&self) -> Terminator {
        self.connection.terminator()
    }

    fn search(
        &mut self,
        board: &Board,
        limit: SearchLimit,
    ) -> Result<Option<Info>, ConnectionError> {
        self.connection.send(&UciCommand::Position {
            fen: board.to_string(),
        })?;
        self.connection.send(&UciCommand::Go(limit.go_params()))?;

        // The last scored line before `bestmove` is the deepest one
        let mut last: Option<Info> = None;
        loop {
            match self.connection.recv()? {
                EngineOutput::Info(info) if info.score.is_some() => {
                    // Bounded scores are provisional; keep them only until an exact one arrives
                    let exact = info.bound.is_none();
                    let have_exact = last.as_ref().map_or(false, |l| l.bound.is_none());
                    if exact || !have_exact {
                        last = Some(info);
                    }
                }
                EngineOutput::BestMove { best_move, .. } => {
                    debug!("Best move {}", best_move);
                    return Ok(last);
                }
                _ => {}
            }
        }
    }
}

impl Evaluator for UciEngine {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn evaluate(
        &mut self,
        board: &Board,
        limit: SearchLimit,
    ) -> Result<RawEvaluation, AnalysisError> {
        let info = self.search(board, limit).map_err(into_analysis_error)?;

        let (score, raw) = match &info {
            Some(info) => (info.score.as_ref(), info.raw.as_str()),
            None => (None, ""),
        };

        Ok(RawEvaluation::from_uci(score, board.side_to_move(), raw))
    }
}

/// Runs `uci` / `setoption` / `isready` / `ucinewgame`, returning the engine's name if it gave one.
fn handshake(
    connection: &mut EngineConnection,
    options: &[(String, String)],
) -> Result<Option<String>, ConnectionError> {
    let mut name = None;

    connection.send(&UciCommand::Uci)?;
    connection.wait_for(HANDSHAKE_TIMEOUT, |output| match output {
        EngineOutput::IdName(id) => {
            name = Some(id.clone());
            false
        }
        EngineOutput::UciOk => true,
        _ => false,
    })?;

    for (option, value) in options {
        debug!("Setting option '{}' to '{}'", option, value);
        connection.send(&UciCommand::SetOption {
            name: option.clone(),
            value: value.clone(),
        })?;
    }

    connection.send(&UciCommand::IsReady)?;
    connection.wait_for(HANDSHAKE_TIMEOUT, |output| *output == EngineOutput::ReadyOk)?;

    connection.send(&UciCommand::UciNewGame)?;

    Ok(name)
}

fn into_analysis_error(e: ConnectionError) -> AnalysisError {
    match e {
        ConnectionError::Timeout(_) => AnalysisError::EngineTimeout(e.to_string()),
        _ => AnalysisError::EngineUnavailable(e.to_string()),
    }
}
