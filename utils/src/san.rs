use chess::{Board, BoardStatus, ChessMove, File, MoveGen, Piece, Rank, Square, EMPTY};

/// Renders `mv` in standard algebraic notation, including the check (`+`) or mate (`#`) suffix.
pub fn to_san(board: &Board, mv: ChessMove) -> String {
    let mut san = to_san_without_suffix(board, mv);

    let after = board.make_move_new(mv);
    if after.status() == BoardStatus::Checkmate {
        san.push('#');
    } else if *after.checkers() != EMPTY {
        san.push('+');
    }

    san
}

// The chess crate only parses SAN, so this builds it the other way around.
pub(crate) fn to_san_without_suffix(board: &Board, mv: ChessMove) -> String {
    let from_square = mv.get_source();
    let to_square = mv.get_dest();
    let Some(moving_piece) = board.piece_on(from_square) else {
        return square_to_string(from_square) + &square_to_string(to_square);
    };
    let is_capture = board.piece_on(to_square).is_some()
        || (moving_piece == Piece::Pawn && from_square.get_file() != to_square.get_file());

    if moving_piece == Piece::King && from_square.get_file() == File::E {
        match to_square.get_file() {
            File::G => return "O-O".to_string(),
            File::C => return "O-O-O".to_string(),
            _ => {}
        }
    }

    let mut san = String::new();

    if moving_piece != Piece::Pawn {
        san.push(piece_to_char(moving_piece));
        san.push_str(&get_disambiguation(board, mv, moving_piece));
    } else if is_capture {
        // Pawn captures name the source file
        san.push(file_to_char(from_square.get_file()));
    }

    if is_capture {
        san.push('x');
    }

    san.push_str(&square_to_string(to_square));

    if let Some(promotion) = mv.get_promotion() {
        san.push('=');
        san.push(piece_to_char(promotion));
    }

    san
}

#[inline]
fn piece_to_char(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'P',
        Piece::Knight => 'N',
        Piece::Bishop => 'B',
        Piece::Rook => 'R',
        Piece::Queen => 'Q',
        Piece::King => 'K',
    }
}

#[inline]
fn file_to_char(file: File) -> char {
    (b'a' + file.to_index() as u8) as char
}

#[inline]
fn rank_to_char(rank: Rank) -> char {
    (b'1' + rank.to_index() as u8) as char
}

#[inline]
fn square_to_string(square: Square) -> String {
    format!(
        "{}{}",
        file_to_char(square.get_file()),
        rank_to_char(square.get_rank())
    )
}

fn get_disambiguation(board: &Board, mv: ChessMove, piece: Piece) -> String {
    let dest = mv.get_dest();
    let source = mv.get_source();

    // Other pieces of the same type that can reach the same square
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|m| {
            m.get_dest() == dest
                && m.get_source() != source
                && board.piece_on(m.get_source()) == Some(piece)
        })
        .map(|m| m.get_source())
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let source_file = source.get_file();
    if !rivals.iter().any(|sq| sq.get_file() == source_file) {
        return file_to_char(source_file).to_string();
    }

    let source_rank = source.get_rank();
    if !rivals.iter().any(|sq| sq.get_rank() == source_rank) {
        return rank_to_char(source_rank).to_string();
    }

    square_to_string(source)
}
