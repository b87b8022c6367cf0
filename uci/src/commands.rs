/// Commands sent from the analyzer to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum UciCommand {
    Uci,
    IsReady,

    UciNewGame,
    Position { fen: String },
    Go(GoParams),

    Quit,
    SetOption { name: String, value: String },
}

/// Lines received from the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    IdName(String),
    IdAuthor(String),
    UciOk,
    ReadyOk,
    BestMove {
        best_move: String,
        ponder: Option<String>,
    },
    Info(Info),
    Option(String),
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info {
    pub depth: Option<u8>,
    pub sel_depth: Option<u8>,
    pub multi_pv: Option<u8>,
    pub nodes: Option<u64>,
    pub nodes_per_second: Option<u64>,
    pub time: Option<u64>,
    pub pv: Vec<String>,
    pub score: Option<Score>,
    pub bound: Option<Bound>,

    /// The line as received, kept for diagnostics.
    pub raw: String,
}

/// Score as reported by the engine, relative to the side to move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Score {
    Centipawns(i32),
    Mate(i32), // Positive for mate-in-n, negative for mated-in-n
    /// A `score` token we could not interpret, e.g. `score wdl ...` or a non-integer value.
    Unrecognized(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoParams {
    // Search depth ply only.
    pub depth: Option<u8>,

    // Search exactly movetime milliseconds.
    pub move_time: Option<u64>,
}
