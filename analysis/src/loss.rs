use chess::Color;

use crate::scores::{NormalizedScore, MATE_STEP};

/// Upper bound on the loss charged for a single move.
pub const MAX_LOSS: i32 = 1_000;

/// Centipawn loss of the side that moved, given the White-perspective scores before and after.
///
/// Differences that are an exact multiple of [`MATE_STEP`] are treated as a move between mate
/// buckets and cost nothing. Gains are not rewarded: the result lies in `0..=MAX_LOSS`.
pub fn move_loss(before: NormalizedScore, after: NormalizedScore, mover: Color) -> i32 {
    let mut diff = before.value().saturating_sub(after.value());

    if diff % MATE_STEP == 0 {
        diff = 0;
    }

    let diff = diff.clamp(-MAX_LOSS, MAX_LOSS);
    let diff = match mover {
        Color::White => diff,
        Color::Black => -diff,
    };

    diff.max(0)
}

/// Loss for a ply whose scores may be missing. Without both scores there is nothing to charge.
pub fn ply_loss(
    before: Option<NormalizedScore>,
    after: Option<NormalizedScore>,
    mover: Color,
) -> Option<i32> {
    Some(move_loss(before?, after?, mover))
}
