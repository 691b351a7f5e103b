// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD      = EMA(12) - EMA(26)
//   Signal    = EMA(9) of MACD
//   Histogram = MACD - Signal
//
// All three lines use the first-value-seeded EMA recursion from `ema.rs`, so
// they are defined from the first bar onward.

use super::ema::calculate_ema;

pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;

/// The three MACD lines, each aligned with the input closes.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Compute MACD(12, 26, 9) for `closes`.
pub fn calculate_macd(closes: &[f64]) -> MacdSeries {
    let fast = calculate_ema(closes, MACD_FAST);
    let slow = calculate_ema(closes, MACD_SLOW);

    let macd: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
    let signal = calculate_ema(&macd, MACD_SIGNAL);
    let histogram = macd.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd,
        signal,
        histogram,
    }
}
