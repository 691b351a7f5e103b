// =============================================================================
// Bar Structure — body, range and Williams-style 5-bar fractals
// =============================================================================
//
// Fractal high at i:  high[i-2] < high[i-1] < high[i] > high[i+1] > high[i+2]
// Fractal low  at i:  low[i-2]  > low[i-1]  > low[i]  < low[i+1]  < low[i+2]
//
// The pattern is centred, so it needs two bars of look-ahead: the last two
// bars of a live series can never be flagged yet.  Both flags are `false`
// within two bars of either edge.

use crate::market_data::Bar;

/// |close - open| per bar.
pub fn body(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| (b.close - b.open).abs()).collect()
}

/// high - low per bar.
pub fn range(bars: &[Bar]) -> Vec<f64> {
    bars.iter().map(|b| b.high - b.low).collect()
}

pub fn fractal_highs(bars: &[Bar]) -> Vec<bool> {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    centred_pattern(&highs, |a, b| a < b)
}

pub fn fractal_lows(bars: &[Bar]) -> Vec<bool> {
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    centred_pattern(&lows, |a, b| a > b)
}

/// Flags `i` when the values strictly climb (per `rising`) into `i` over two
/// bars and strictly fall away from it over the next two.
fn centred_pattern(values: &[f64], rising: impl Fn(f64, f64) -> bool) -> Vec<bool> {
    let n = values.len();
    (0..n)
        .map(|i| {
            if i < 2 || i + 2 >= n {
                return false;
            }
            rising(values[i - 2], values[i - 1])
                && rising(values[i - 1], values[i])
                && rising(values[i + 1], values[i])
                && rising(values[i + 2], values[i + 1])
        })
        .collect()
}
