// =============================================================================
// Spike Flags
// =============================================================================
//
// A value "spikes" when it exceeds `factor` times its own trailing mean:
//
//   spike_t = value_t > factor * mean(value_{t-period+1..=t})
//
// Used for ATR (volatility burst) and tick volume (participation burst), both
// with period 10 and factor 1.5.  If either side of the comparison is
// undefined the flag is `None`, so an unknown baseline can never read as a
// spike.

use super::rolling::rolling_mean_opt;

pub const SPIKE_PERIOD: usize = 10;
pub const SPIKE_FACTOR: f64 = 1.5;

pub fn spike_flags(values: &[Option<f64>], period: usize, factor: f64) -> Vec<Option<bool>> {
    let baseline = rolling_mean_opt(values, period);
    values
        .iter()
        .zip(baseline)
        .map(|(value, mean)| Some((*value)? > factor * mean?))
        .collect()
}
