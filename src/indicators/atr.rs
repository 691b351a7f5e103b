// =============================================================================
// Average True Range (ATR) — simple trailing mean
// =============================================================================
//
// ATR measures market volatility by decomposing the entire range of a bar.
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// TR_0 has no previous close and is undefined.  ATR is the trailing simple
// mean of `period` TR values, so the first defined ATR sits at index `period`.
//
// Default period: 14
// =============================================================================

use super::rolling::rolling_mean_opt;
use crate::market_data::Bar;

pub const ATR_PERIOD: usize = 14;

/// True range per bar, undefined for the first bar.
pub fn true_range(bars: &[Bar]) -> Vec<Option<f64>> {
    (0..bars.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let high = bars[i].high;
            let low = bars[i].low;
            let prev_close = bars[i - 1].close;

            let hl = high - low;
            let hc = (high - prev_close).abs();
            let lc = (low - prev_close).abs();

            Some(hl.max(hc).max(lc))
        })
        .collect()
}

/// ATR series aligned with `bars`.
///
/// # Returns
/// `None` at every index before `period` (not enough true ranges), and
/// everywhere when `period` is zero.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    rolling_mean_opt(&true_range(bars), period)
}
