//! Rolling-window primitives over time-ordered series.
//!
//! A point is `None` until enough history exists to fill its window. A window
//! that contains an undefined point is itself undefined, so gaps propagate
//! forward instead of being silently averaged away.

/// Denominator substituted for an exact zero in ratio indicators.
pub const ZERO_DIVISOR_GUARD: f64 = 1e-10;

/// Lift a fully defined series into the optional representation.
pub fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}

/// Apply `reduce` to every trailing window of `period` values.
///
/// Output has the same length as the input; indices below `period - 1` are
/// `None`, as is any window containing a `None`.
pub fn rolling<F>(values: &[Option<f64>], period: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = Vec::with_capacity(values.len());
    let mut window = Vec::with_capacity(period);

    for i in 0..values.len() {
        if period == 0 || i + 1 < period {
            out.push(None);
            continue;
        }

        window.clear();
        let complete = values[i + 1 - period..=i].iter().all(|v| match v {
            Some(x) => {
                window.push(*x);
                true
            }
            None => false,
        });

        out.push(if complete { reduce(&window) } else { None });
    }

    out
}

/// Simple moving average over the trailing `period` values.
pub fn sma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| Some(mean(w)))
}

/// Exponential moving average with `alpha = 2 / (period + 1)`.
///
/// Seeded with the first value (no SMA warm-up), so every index is defined:
/// `ema[0] = x[0]`, `ema[i] = alpha * x[i] + (1 - alpha) * ema[i - 1]`.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let alpha = 2.0 / (period.max(1) as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());

    for &value in values {
        let next = match out.last() {
            Some(&prev) => alpha * value + (1.0 - alpha) * prev,
            None => value,
        };
        out.push(next);
    }

    out
}

/// Rolling sample standard deviation (n - 1 denominator).
///
/// A single-element window has no sample deviation, so `period < 2` yields
/// an all-`None` series.
pub fn rolling_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, sample_std)
}

/// Trailing-window minimum.
pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::min))
}

/// Trailing-window maximum.
pub fn rolling_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::max))
}

/// Divide, substituting [`ZERO_DIVISOR_GUARD`] when the denominator is exactly zero.
pub fn guarded_div(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        numerator / ZERO_DIVISOR_GUARD
    } else {
        numerator / denominator
    }
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

fn sample_std(window: &[f64]) -> Option<f64> {
    if window.len() < 2 {
        return None;
    }
    let avg = mean(window);
    let sum_sq: f64 = window.iter().map(|x| (x - avg).powi(2)).sum();
    Some((sum_sq / (window.len() - 1) as f64).sqrt())
}
