use std::slice;

use chess::{Board, ChessMove, Color};

use crate::san::to_san;

/// A move of the main line, with the position it produced.
#[derive(Debug, Clone)]
pub struct PlayedMove {
    /// 1-based ply counted from the start of the record.
    pub ply: usize,
    pub move_number: u32,
    pub mover: Color,
    pub san: String,
    pub board: Board,
}

/// Plays a move list forward, one ply at a time.
pub struct Replay<'a> {
    board: Board,
    move_number: u32,
    ply: usize,
    moves: slice::Iter<'a, ChessMove>,
}

impl<'a> Replay<'a> {
    pub fn new(start: Board, move_number: u32, moves: &'a [ChessMove]) -> Self {
        Self {
            board: start,
            move_number,
            ply: 0,
            moves: moves.iter(),
        }
    }

    /// The position after the last yielded move.
    pub fn board(&self) -> &Board {
        &self.board
    }
}

impl Iterator for Replay<'_> {
    type Item = PlayedMove;

    fn next(&mut self) -> Option<Self::Item> {
        let mv = *self.moves.next()?;
        let mover = self.board.side_to_move();
        let san = to_san(&self.board, mv);
        let move_number = self.move_number;

        self.board = self.board.make_move_new(mv);
        self.ply += 1;
        if mover == Color::Black {
            self.move_number += 1;
        }

        Some(PlayedMove {
            ply: self.ply,
            move_number,
            mover,
            san,
            board: self.board,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.moves.size_hint()
    }
}
