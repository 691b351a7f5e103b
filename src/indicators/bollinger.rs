// =============================================================================
// Bollinger Band Width
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), with σ the *sample* standard deviation of the
// window.  The snapshot only carries the normalised width:
//
//   BBW = (upper - lower) / middle
//
// Note: no ×100 scaling; the value is a plain ratio.

use super::rolling::{rolling_mean, rolling_sample_std};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;

/// Band width series aligned with `closes`.
///
/// `None` for the first `period - 1` closes and wherever the middle band is
/// zero.
pub fn calculate_bandwidth(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<f64>> {
    let middle = rolling_mean(closes, period);
    let std_dev = rolling_sample_std(closes, period);

    middle
        .into_iter()
        .zip(std_dev)
        .map(|(mid, sd)| {
            let (mid, sd) = (mid?, sd?);
            if mid == 0.0 {
                return None;
            }
            let upper = mid + num_std * sd;
            let lower = mid - num_std * sd;
            let width = (upper - lower) / mid;
            width.is_finite().then_some(width)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bandwidth_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let out = calculate_bandwidth(&closes, 20, 2.0);
        assert!(out[..19].iter().all(Option::is_none));
        // mean 10.5, sample std sqrt(35) => width 4*sqrt(35)/10.5
        let expected = 4.0 * 35.0_f64.sqrt() / 10.5;
        assert!((out[19].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn bandwidth_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bandwidth(&closes, 20, 2.0).iter().all(Option::is_none));
    }

    #[test]
    fn bandwidth_flat() {
        let closes = vec![100.0; 20];
        let out = calculate_bandwidth(&closes, 20, 2.0);
        assert!((out[19].unwrap() - 0.0).abs() < 1e-10);
    }

    #[test]
    fn bandwidth_zero_middle_is_undefined() {
        let closes = vec![0.0; 25];
        assert!(calculate_bandwidth(&closes, 20, 2.0).iter().all(Option::is_none));
    }
}
