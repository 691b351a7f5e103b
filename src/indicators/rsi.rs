// =============================================================================
// Relative Strength Index (RSI) — simple-mean variant
// =============================================================================
//
// Step 1 — Price changes (deltas) from consecutive closes; delta_0 undefined.
// Step 2 — gain = max(delta, 0), loss = max(-delta, 0).
// Step 3 — avg_gain / avg_loss are plain trailing means over `period` deltas.
//          This is *not* Wilder's recursive smoothing; downstream readers are
//          calibrated to the simple-mean numbers.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// The first defined value sits at index `period`: it needs `period` deltas and
// there is no delta at index 0.
// =============================================================================

use super::rolling::{diff, rolling_mean_opt};

/// Look-back used for every timeframe.
pub const RSI_PERIOD: usize = 5;

/// Compute the RSI series for `closes`, aligned with the input.
///
/// # Edge cases
/// - `period == 0` or fewer than `period + 1` closes => all `None`
/// - avg_loss == 0 and avg_gain > 0 => saturates at 100.0
/// - avg_loss == 0 and avg_gain == 0 (flat window) => `None`
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let deltas = diff(closes);
    let gains: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean_opt(&gains, period);
    let avg_loss = rolling_mean_opt(&losses, period);

    avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(g, l)| rsi_from_averages(g?, l?))
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
