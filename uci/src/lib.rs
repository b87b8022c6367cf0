mod connection;
mod decoder;
mod encoder;

pub mod commands;

pub use commands::{Bound, EngineOutput, GoParams, Info, Score, UciCommand};
pub use connection::{ConnectionError, EngineConnection, Terminator};
pub use decoder::Decoder;
pub use encoder::Encoder;
