//! Minimal PGN reader.
//!
//! Reads the first game of a PGN text: tag pairs, an optional `FEN` starting position and the
//! main line. Comments, NAGs, variations and annotation glyphs are skipped.

use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::{Chars, FromStr};

use chess::{Board, ChessMove, MoveGen};
use thiserror::Error;

use crate::replay::Replay;
use crate::san::to_san_without_suffix;

const RESULT_TOKENS: &[&str] = &["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Debug, Error)]
pub enum PgnError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("no game found")]
    NoGame,

    #[error("malformed tag pair: [{0}]")]
    MalformedTag(String),

    #[error("invalid FEN \"{fen}\": {reason}")]
    InvalidFen { fen: String, reason: String },

    #[error("illegal or unreadable move \"{san}\" at ply {ply}")]
    IllegalMove { san: String, ply: usize },
}

/// One game: its tags, starting position and main line.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub tags: Vec<(String, String)>,
    pub start: Board,
    pub starting_move_number: u32,
    pub moves: Vec<ChessMove>,
    pub result: Option<String>,
}

impl GameRecord {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PgnError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PgnError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&text)
    }

    /// Parses the first game found in `text`.
    pub fn parse(text: &str) -> Result<Self, PgnError> {
        let mut parser = Parser::new(text);
        parser.run()?;
        parser.finish()
    }

    /// Builds a game from SAN moves played from the standard starting position.
    pub fn from_san_moves(moves: &[&str]) -> Result<Self, PgnError> {
        let mut board = Board::default();
        let mut played = Vec::with_capacity(moves.len());

        for (ply, san) in moves.iter().enumerate() {
            let mv = resolve_san(&board, san).ok_or_else(|| PgnError::IllegalMove {
                san: san.to_string(),
                ply: ply + 1,
            })?;
            board = board.make_move_new(mv);
            played.push(mv);
        }

        Ok(Self {
            tags: Vec::new(),
            start: Board::default(),
            starting_move_number: 1,
            moves: played,
            result: None,
        })
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replays the main line from the starting position.
    pub fn replay(&self) -> Replay<'_> {
        Replay::new(self.start, self.starting_move_number, &self.moves)
    }
}

struct Parser<'a> {
    chars: Peekable<Chars<'a>>,
    tags: Vec<(String, String)>,
    board: Option<Board>,
    starting_move_number: u32,
    moves: Vec<ChessMove>,
    result: Option<String>,
}

impl<'a> Parser<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            tags: Vec::new(),
            board: None,
            starting_move_number: 1,
            moves: Vec::new(),
            result: None,
        }
    }

    fn run(&mut self) -> Result<(), PgnError> {
        while let Some(&c) = self.chars.peek() {
            match c {
                _ if c.is_whitespace() => {
                    self.chars.next();
                }
                '[' => {
                    // A tag section after movetext belongs to the next game
                    if !self.moves.is_empty() {
                        return Ok(());
                    }
                    self.chars.next();
                    let body = self.take_until(']');
                    self.read_tag(&body)?;
                }
                '{' => {
                    self.chars.next();
                    self.take_until('}');
                }
                ';' | '%' => {
                    self.take_until('\n');
                }
                '(' => self.skip_variation(),
                '$' => {
                    self.chars.next();
                    while self.chars.next_if(|c| c.is_ascii_digit()).is_some() {}
                }
                _ => {
                    let token = self.take_token();
                    if RESULT_TOKENS.contains(&token.as_str()) {
                        self.result = Some(token);
                        return Ok(());
                    }
                    self.read_move(&token)?;
                }
            }
        }

        Ok(())
    }

    fn finish(self) -> Result<GameRecord, PgnError> {
        if self.tags.is_empty() && self.moves.is_empty() && self.result.is_none() {
            return Err(PgnError::NoGame);
        }

        let start = self.initial_board()?;

        Ok(GameRecord {
            tags: self.tags,
            start,
            starting_move_number: self.starting_move_number,
            moves: self.moves,
            result: self.result,
        })
    }

    fn initial_board(&self) -> Result<Board, PgnError> {
        match self.fen_tag() {
            Some(fen) => parse_fen(fen),
            None => Ok(Board::default()),
        }
    }

    fn fen_tag(&self) -> Option<&str> {
        self.tags
            .iter()
            .find(|(key, _)| key == "FEN")
            .map(|(_, value)| value.as_str())
    }

    fn read_tag(&mut self, body: &str) -> Result<(), PgnError> {
        let body = body.trim();
        let (name, rest) = body
            .split_once(char::is_whitespace)
            .ok_or_else(|| PgnError::MalformedTag(body.to_string()))?;

        let value = rest
            .trim()
            .strip_prefix('"')
            .and_then(|v| v.strip_suffix('"'))
            .ok_or_else(|| PgnError::MalformedTag(body.to_string()))?
            .replace("\\\"", "\"")
            .replace("\\\\", "\\");

        if name == "FEN" {
            let board = parse_fen(&value)?;
            self.starting_move_number = fullmove_number(&value);
            self.board = Some(board);
        }

        self.tags.push((name.to_string(), value));
        Ok(())
    }

    fn read_move(&mut self, token: &str) -> Result<(), PgnError> {
        // "12." / "12..." / "12.e4"
        let san = match token.split_once('.') {
            Some((number, rest)) if number.chars().all(|c| c.is_ascii_digit()) => {
                rest.trim_start_matches('.')
            }
            _ => token,
        };
        if san.is_empty() || san == "e.p." {
            return Ok(());
        }

        let board = self.current_board();
        let ply = self.moves.len() + 1;
        let mv = resolve_san(&board, san).ok_or_else(|| PgnError::IllegalMove {
            san: san.to_string(),
            ply,
        })?;

        self.board = Some(board.make_move_new(mv));
        self.moves.push(mv);
        Ok(())
    }

    fn current_board(&self) -> Board {
        self.board.unwrap_or_default()
    }

    fn take_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(c) = self
            .chars
            .next_if(|c| !c.is_whitespace() && !"{}()[];$".contains(*c))
        {
            token.push(c);
        }

        // Never stall on a stray delimiter
        if token.is_empty() {
            if let Some(c) = self.chars.next() {
                token.push(c);
            }
        }

        token
    }

    fn take_until(&mut self, end: char) -> String {
        let mut body = String::new();
        for c in self.chars.by_ref() {
            if c == end {
                break;
            }
            body.push(c);
        }
        body
    }

    fn skip_variation(&mut self) {
        let mut depth = 0;
        while let Some(c) = self.chars.next() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                '{' => {
                    self.take_until('}');
                }
                _ => {}
            }
        }
    }
}

/// Finds the legal move on `board` written as `san`. Check marks, annotation glyphs and
/// zero-style castling are tolerated.
pub fn resolve_san(board: &Board, san: &str) -> Option<ChessMove> {
    let cleaned = san
        .trim_end_matches(|c| matches!(c, '+' | '#' | '!' | '?'))
        .trim_end_matches("e.p.")
        .replace('0', "O");

    let found = MoveGen::new_legal(board).find(|mv| to_san_without_suffix(board, *mv) == cleaned);
    if found.is_some() {
        return found;
    }

    // Over-disambiguated SAN such as "Ngf3" is left to the chess crate
    ChessMove::from_san(board, &cleaned)
        .ok()
        .filter(|mv| board.legal(*mv))
}

fn parse_fen(fen: &str) -> Result<Board, PgnError> {
    Board::from_str(fen).map_err(|e| PgnError::InvalidFen {
        fen: fen.to_string(),
        reason: e.to_string(),
    })
}

fn fullmove_number(fen: &str) -> u32 {
    fen.split_whitespace()
        .nth(5)
        .and_then(|s| s.parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}
