pub mod pgn;
pub mod replay;
pub mod san;

pub use pgn::{resolve_san, GameRecord, PgnError};
pub use replay::{PlayedMove, Replay};
pub use san::to_san;
