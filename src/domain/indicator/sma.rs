//! Simple moving average.

use super::MovingAverage;

/// Trailing arithmetic mean of the last `window` closes ending at each index.
///
/// The first `window - 1` entries are `None`. A zero window or one longer
/// than the series yields no defined values. Each window is averaged from
/// scratch with an incremental mean, so a window of identical closes
/// averages to exactly that close.
pub fn calculate_sma(closes: &[f64], window: usize) -> MovingAverage {
    if window == 0 || closes.len() < window {
        return MovingAverage {
            window,
            values: vec![None; closes.len()],
        };
    }

    let mut values: Vec<Option<f64>> = Vec::with_capacity(closes.len());
    values.resize(window - 1, None);
    values.extend(closes.windows(window).map(|w| Some(window_mean(w))));

    MovingAverage { window, values }
}

fn window_mean(window: &[f64]) -> f64 {
    window
        .iter()
        .enumerate()
        .fold(0.0, |mean, (k, &x)| mean + (x - mean) / (k + 1) as f64)
}
