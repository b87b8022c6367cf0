use chess::Color;

use crate::AnalysisError;

/// Losses of one side, in the order the moves were played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LossSequence {
    side: Color,
    losses: Vec<i32>,
}

impl LossSequence {
    pub fn new(side: Color) -> Self {
        Self {
            side,
            losses: Vec::new(),
        }
    }

    pub fn from_losses(side: Color, losses: Vec<i32>) -> Self {
        Self { side, losses }
    }

    #[inline]
    pub fn push(&mut self, loss: i32) {
        self.losses.push(loss);
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn as_slice(&self) -> &[i32] {
        &self.losses
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.losses.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.losses.is_empty()
    }
}

/// First move from which a side lost nothing until the end of the game (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZeroTail {
    pub from_move: usize,
    pub to_move: usize,
}

/// Average loss from each move to the end of the game.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailingStatistics {
    pub side: Color,
    pub series: Vec<f64>,
    pub zero_tail: Option<ZeroTail>,
}

impl TrailingStatistics {
    pub fn compute(losses: &LossSequence) -> Self {
        let series = trailing_averages(losses);
        let zero_tail = zero_tail(&series);

        Self {
            side: losses.side(),
            series,
            zero_tail,
        }
    }
}

/// Rounds to one decimal on the exact binary value, ties to even.
///
/// Scaling by 10 first would round twice: 7/20 is stored just below 0.35 but scales to exactly 3.5.
pub fn round_to_tenth(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}

/// Mean loss over the whole sequence, rounded to one decimal.
pub fn overall_average(losses: &LossSequence) -> Result<f64, AnalysisError> {
    if losses.is_empty() {
        return Err(AnalysisError::EmptySequence {
            side: losses.side(),
        });
    }

    let total: i64 = losses.as_slice().iter().map(|&loss| loss as i64).sum();
    Ok(round_to_tenth(total as f64 / losses.len() as f64))
}

/// Entry `i` is the mean of entries `i..` rounded to one decimal.
///
/// For Black, negative entries are left out of both the sum and the count of every window
/// containing them. A window left with nothing to count averages to 0.
pub fn trailing_averages(losses: &LossSequence) -> Vec<f64> {
    let skip_negative = losses.side() == Color::Black;
    let mut series = vec![0.0; losses.len()];

    let mut total: i64 = 0;
    let mut count: usize = 0;

    for (i, &loss) in losses.as_slice().iter().enumerate().rev() {
        if !(skip_negative && loss < 0) {
            total += loss as i64;
            count += 1;
        }

        if count > 0 {
            series[i] = round_to_tenth(total as f64 / count as f64);
        }
    }

    series
}

/// Earliest index whose trailing average is exactly zero.
pub fn zero_tail(series: &[f64]) -> Option<ZeroTail> {
    series
        .iter()
        .position(|&average| average == 0.0)
        .map(|index| ZeroTail {
            from_move: index + 1,
            to_move: series.len(),
        })
}
