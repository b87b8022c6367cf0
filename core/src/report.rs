use std::fmt;

use analysis::{GameReport, MoveRecord, SideReport, TrailingStatistics};
use chess::Color;

/// One console line per analysed ply.
pub struct PlyLine<'a>(pub &'a MoveRecord);

impl fmt::Display for PlyLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.0;
        let score = record
            .score_after
            .map_or_else(|| "-".to_string(), |score| score.to_string());
        let loss = record
            .loss
            .map_or_else(|| "-".to_string(), |loss| loss.to_string());

        write!(
            f,
            "{:<3} {:<9} eval: {:<5}   {} loss: {}",
            record.move_number,
            record.notation(),
            score,
            side_name(record.mover),
            loss
        )
    }
}

/// End of game summary: averages, and the trailing series when they were computed.
pub struct Summary<'a>(pub &'a GameReport);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;

        for color in [Color::White, Color::Black] {
            match &report.side(color).average {
                Ok(average) => writeln!(f, "{} avg cp loss: [{:.1}]", title(color), average)?,
                Err(_) => writeln!(f, "{} avg cp loss: [n/a]", title(color))?,
            }
        }

        if report.is_partial() {
            writeln!(
                f,
                "WARNING: partial statistics, no loss recorded for plies {:?}",
                report.skipped_plies
            )?;
        }

        if report.white.trailing.is_some() || report.black.trailing.is_some() {
            writeln!(f)?;
            writeln!(f, "> Calculating statistics for centipawn loss per move to the end...")?;
            writeln!(
                f,
                "> ie. first index indicates centipawn loss avg from that move to the end, etc..."
            )?;
            writeln!(f, "> White moves: {}", report.white.losses.len())?;
            writeln!(f, "> Black moves: {}", report.black.losses.len())?;

            write_trailing(f, &report.white)?;
            write_trailing(f, &report.black)?;
        }

        Ok(())
    }
}

fn write_trailing(f: &mut fmt::Formatter<'_>, side: &SideReport) -> fmt::Result {
    let Some(stats) = &side.trailing else {
        return Ok(());
    };

    writeln!(f)?;
    writeln!(f, "{}:", title(stats.side))?;
    writeln!(f, "{}", Series(stats))?;

    if let Some(tail) = stats.zero_tail {
        writeln!(f, "***")?;
        writeln!(
            f,
            "{} had no centipawn loss from move [{}] to move [{}]",
            title(stats.side),
            tail.from_move,
            tail.to_move
        )?;
        writeln!(f, "***")?;
    }

    Ok(())
}

struct Series<'a>(&'a TrailingStatistics);

impl fmt::Display for Series<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, average) in self.0.series.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.1}", average)?;
        }
        write!(f, "]")
    }
}

#[inline]
fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

#[inline]
fn title(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}
