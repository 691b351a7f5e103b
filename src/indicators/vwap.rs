// =============================================================================
// Volume-Weighted Average Price (VWAP)
// =============================================================================
//
//   VWAP_t = Σ_{0..=t} close * volume / Σ_{0..=t} volume
//
// Accumulation starts at the first bar of the window, so the anchor moves with
// the rolling window on every recompute.  Zero-volume bars are treated as
// missing volume: they add nothing to either sum and their own VWAP slot is
// undefined.

use crate::market_data::Bar;

pub fn calculate_vwap(bars: &[Bar]) -> Vec<Option<f64>> {
    let mut cum_pv = 0.0_f64;
    let mut cum_vol = 0.0_f64;

    bars.iter()
        .map(|bar| {
            let volume = bar.tick_volume as f64;
            cum_pv += bar.close * volume;
            if bar.tick_volume == 0 {
                return None;
            }
            cum_vol += volume;
            Some(cum_pv / cum_vol)
        })
        .collect()
}
