use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Smoothing factor for exponential smoothing
pub const SMOOTHING_ALPHA: f64 = 0.3;
/// Season length in days for the seasonal-naive method
pub const SEASON_LENGTH: usize = 7;
/// Window for the flat moving-average fallback
pub const MOVING_AVERAGE_WINDOW: usize = 7;

/// Forecasting method selector.
///
/// Every method is a total function over (series, horizon): it never
/// panics on short or empty input, never emits a negative value, and
/// always returns exactly `horizon` values. `Combined` is the unweighted
/// mean of the three single methods and the recommended default.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ForecastMethod {
    Linear,
    Exponential,
    Seasonal,
    #[default]
    Combined,
}

impl ForecastMethod {
    /// Predict daily demand for `horizon` days past the end of `values`.
    pub fn predict(self, values: &[f64], horizon: usize) -> Vec<i64> {
        match self {
            ForecastMethod::Linear => linear_trend(values, horizon),
            ForecastMethod::Exponential => exponential_smoothing(values, horizon),
            ForecastMethod::Seasonal => seasonal_naive(values, horizon),
            ForecastMethod::Combined => combined(values, horizon),
        }
    }

    /// In-sample accuracy of this method against the historical series.
    pub fn in_sample_fit(self, values: &[f64]) -> FitMetrics {
        fit_metrics(&self.fitted(values), values)
    }

    /// Per-day fitted values over the historical window. `None` marks days
    /// the method cannot fit (e.g. the first season for seasonal naive).
    fn fitted(self, values: &[f64]) -> Vec<Option<f64>> {
        match self {
            ForecastMethod::Linear => fitted_linear(values),
            ForecastMethod::Exponential => {
                smoothed_sequence(values).into_iter().map(Some).collect()
            }
            ForecastMethod::Seasonal => (0..values.len())
                .map(|t| (t >= SEASON_LENGTH).then(|| values[t - SEASON_LENGTH]))
                .collect(),
            ForecastMethod::Combined => {
                let linear = fitted_linear(values);
                let exponential = smoothed_sequence(values);
                (0..values.len())
                    .map(|t| match (linear[t], t >= SEASON_LENGTH) {
                        (Some(l), true) => {
                            Some((l + exponential[t] + values[t - SEASON_LENGTH]) / 3.0)
                        }
                        _ => None,
                    })
                    .collect()
            }
        }
    }
}

/// In-sample fit of a method over the historical window.
///
/// MAPE is a percentage and skips zero-demand days; both metrics are
/// `None` when no historical day qualifies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitMetrics {
    pub mae: Option<f64>,
    pub mape: Option<f64>,
}

fn round_non_negative(value: f64) -> i64 {
    value.max(0.0).round() as i64
}

/// Mean of the last `min(window, len)` values; 0 for an empty series.
fn moving_average(values: &[f64], window: usize) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let take = window.min(values.len());
    let tail = &values[values.len() - take..];
    tail.iter().sum::<f64>() / take as f64
}

fn repeat_last(values: &[f64], horizon: usize) -> Vec<i64> {
    let last = values.last().copied().unwrap_or(0.0);
    vec![round_non_negative(last); horizon]
}

/// Ordinary least-squares fit over (index, value) pairs.
///
/// `None` for fewer than two points or a numerically degenerate fit.
fn least_squares(values: &[f64]) -> Option<(f64, f64)> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let nf = n as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_xx) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_xx += x * x;
    }

    let denominator = nf * sum_xx - sum_x * sum_x;
    let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
    let intercept = (sum_y - slope * sum_x) / nf;

    (slope.is_finite() && intercept.is_finite()).then_some((slope, intercept))
}

fn linear_trend(values: &[f64], horizon: usize) -> Vec<i64> {
    let n = values.len();
    match least_squares(values) {
        Some((slope, intercept)) => (n..n + horizon)
            .map(|i| round_non_negative(intercept + slope * i as f64))
            .collect(),
        None => repeat_last(values, horizon),
    }
}

fn fitted_linear(values: &[f64]) -> Vec<Option<f64>> {
    match least_squares(values) {
        Some((slope, intercept)) => (0..values.len())
            .map(|i| Some(intercept + slope * i as f64))
            .collect(),
        None => vec![None; values.len()],
    }
}

/// Smoothed level over the whole series: level_0 = y_0,
/// level_i = alpha * y_i + (1 - alpha) * level_{i-1}.
fn smoothed_sequence(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let Some(&first) = values.first() else {
        return out;
    };
    let mut level = first;
    out.push(level);
    for &value in &values[1..] {
        level = SMOOTHING_ALPHA * value + (1.0 - SMOOTHING_ALPHA) * level;
        out.push(level);
    }
    out
}

fn exponential_smoothing(values: &[f64], horizon: usize) -> Vec<i64> {
    let level = smoothed_sequence(values).last().copied().unwrap_or(0.0);
    vec![round_non_negative(level); horizon]
}

fn seasonal_naive(values: &[f64], horizon: usize) -> Vec<i64> {
    let len = values.len();
    if len < SEASON_LENGTH {
        // Not even one full season observed: fall back to a flat forecast
        let flat = round_non_negative(moving_average(values, MOVING_AVERAGE_WINDOW));
        return vec![flat; horizon];
    }

    (0..horizon)
        .map(|i| {
            values
                .get(len - SEASON_LENGTH + (i % SEASON_LENGTH))
                .copied()
                .unwrap_or(0.0)
        })
        .map(round_non_negative)
        .collect()
}

fn combined(values: &[f64], horizon: usize) -> Vec<i64> {
    let linear = linear_trend(values, horizon);
    let exponential = exponential_smoothing(values, horizon);
    let seasonal = seasonal_naive(values, horizon);

    (0..horizon)
        .map(|i| ((linear[i] + exponential[i] + seasonal[i]) as f64 / 3.0).round() as i64)
        .collect()
}

fn fit_metrics(fitted: &[Option<f64>], actual: &[f64]) -> FitMetrics {
    let mut abs_sum = 0.0;
    let mut abs_count = 0usize;
    let mut pct_sum = 0.0;
    let mut pct_count = 0usize;

    for (fit, &observed) in fitted.iter().zip(actual) {
        if let Some(fit) = fit {
            abs_sum += (fit - observed).abs();
            abs_count += 1;
            if observed > 0.0 {
                pct_sum += (fit - observed).abs() / observed;
                pct_count += 1;
            }
        }
    }

    FitMetrics {
        mae: (abs_count > 0).then(|| abs_sum / abs_count as f64),
        mape: (pct_count > 0).then(|| 100.0 * pct_sum / pct_count as f64),
    }
}
