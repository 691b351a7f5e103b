// =============================================================================
// Trailing-window statistics
// =============================================================================
//
// Building blocks shared by the windowed indicators.  Every output is aligned
// index-for-index with its input; position `i` only ever looks at the window
// `[i + 1 - period, i]`, so there is no look-ahead.  A window that is not yet
// full, or that contains an undefined input, yields `None`.

/// Trailing simple mean over `period` values.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let lifted: Vec<Option<f64>> = values.iter().copied().map(Some).collect();
    rolling_mean_opt(&lifted, period)
}

/// Trailing simple mean over a partially-defined series.
pub fn rolling_mean_opt(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let win = window(values, i, period)?;
            let sum = win.iter().try_fold(0.0_f64, |acc, v| v.map(|x| acc + x))?;
            Some(sum / period as f64)
        })
        .collect()
}

/// Trailing sample standard deviation (divisor `period - 1`).
///
/// Undefined for `period < 2`, where the sample variance has no meaning.
pub fn rolling_sample_std(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            let win = window(values, i, period)?;
            let mean = win.iter().sum::<f64>() / period as f64;
            let ss: f64 = win.iter().map(|x| (x - mean).powi(2)).sum();
            Some((ss / (period - 1) as f64).sqrt())
        })
        .collect()
}

/// First difference, undefined at index 0.
pub fn diff(values: &[f64]) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| if i == 0 { None } else { Some(values[i] - values[i - 1]) })
        .collect()
}

/// The full trailing window ending at `i`, if one exists.
fn window<T>(values: &[T], i: usize, period: usize) -> Option<&[T]> {
    if period == 0 || i + 1 < period {
        return None;
    }
    Some(&values[i + 1 - period..=i])
}
