// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (span + 1)
//   EMA_0      = close_0
//   EMA_t      = close_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The recursion is seeded with the first close rather than an SMA, so the
// series is defined from the very first bar and has the same length as its
// input.
// =============================================================================

use super::rolling::diff;

/// Spans computed for every timeframe.
pub const EMA_SPANS: [usize; 5] = [9, 21, 50, 100, 200];

/// Compute the EMA series for `values` with smoothing span `span`.
///
/// # Edge cases
/// - empty input => empty vec
/// - `span == 0` is treated like `span == 1` (multiplier 2 would overshoot,
///   so the multiplier is clamped to 1 and the EMA tracks the input).
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };

    let multiplier = (2.0 / (span as f64 + 1.0)).min(1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut prev_ema = first;
    result.push(prev_ema);

    for &value in &values[1..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        result.push(ema);
        prev_ema = ema;
    }

    result
}

/// Bar-to-bar change of an EMA series, undefined at index 0.
pub fn ema_slope(ema: &[f64]) -> Vec<Option<f64>> {
    diff(ema)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_seeded_with_first_close() {
        let closes = vec![2.0, 4.0, 6.0, 3.0];
        for span in EMA_SPANS {
            let ema = calculate_ema(&closes, span);
            assert_eq!(ema.len(), closes.len());
            assert_eq!(ema[0], closes[0]);
        }
    }

    #[test]
    fn ema_known_values() {
        // span 5 => multiplier 1/3
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);

        let mult = 2.0 / 6.0;
        let mut expected = 1.0;
        let mut expected_vec = vec![expected];
        for &c in &closes[1..] {
            expected = c * mult + expected * (1.0 - mult);
            expected_vec.push(expected);
        }
        for (a, b) in ema.iter().zip(expected_vec.iter()) {
            assert!((a - b).abs() < 1e-10, "got {a}, expected {b}");
        }
    }

    #[test]
    fn ema_span_one_tracks_input() {
        let closes = vec![5.0, 1.0, 9.0];
        assert_eq!(calculate_ema(&closes, 1), closes);
        assert_eq!(calculate_ema(&closes, 0), closes);
    }

    #[test]
    fn ema_flat_series_stays_flat() {
        let closes = vec![100.0; 50];
        assert!(calculate_ema(&closes, 21).iter().all(|v| (v - 100.0).abs() < 1e-12));
    }

    #[test]
    fn slope_follows_ema_direction() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        let slope = ema_slope(&calculate_ema(&closes, 21));
        assert_eq!(slope.len(), 30);
        assert!(slope[0].is_none());
        assert!(slope[1..].iter().all(|s| s.unwrap() > 0.0));
    }
}
