use log::{debug, warn};
use super::{Breakpoints, MicReading, Trend, TrendResult};
use super::risk::assess_risk;
use crate::config::TrendConfig;
use crate::renal::round_to;

/// MIC trend analyzer. Holds its thresholds so callers can inject a tuned
/// configuration; `TrendAnalyzer::default()` reproduces the reference values.
#[derive(Debug, Clone, Default)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Analyzes readings for one organism-antibiotic pair, oldest first.
    pub fn analyze(&self, readings: &[MicReading], breakpoints: Option<&Breakpoints>) -> TrendResult {
        let n = readings.len();
        if n < 2 {
            debug!("Only {} MIC reading(s); trend not computed", n);
            return TrendResult::insufficient_data(n);
        }

        let mics: Vec<f64> = readings.iter().map(|r| r.mic_value).collect();
        let baseline = mics[0];
        let current = mics[n - 1];

        let ratio = current / self.effective_baseline(baseline);
        let trend = self.classify_direction(&mics, ratio);
        let velocity = ratio.powf(1.0 / (n - 1) as f64);

        let (risk_level, alert) = assess_risk(current, ratio, trend, breakpoints);
        debug!(
            "MIC trend: baseline={} current={} ratio={:.3} trend={} velocity={:.3} risk={}",
            baseline, current, ratio, trend, velocity, risk_level
        );

        TrendResult {
            baseline_mic: Some(baseline),
            current_mic: Some(current),
            ratio: Some(round_to(ratio, 2)),
            trend,
            velocity: Some(round_to(velocity, 3)),
            risk_level,
            alert,
            reading_count: n,
        }
    }

    fn effective_baseline(&self, baseline: f64) -> f64 {
        if baseline == 0.0 {
            warn!("Baseline MIC is zero; substituting {}", self.config.zero_baseline_floor);
            self.config.zero_baseline_floor
        } else {
            baseline
        }
    }

    fn classify_direction(&self, mics: &[f64], ratio: f64) -> Trend {
        if mics.len() >= 3 {
            let slope = regression_slope(mics);
            if slope > self.config.slope_threshold {
                Trend::Increasing
            } else if slope < -self.config.slope_threshold {
                Trend::Decreasing
            } else {
                Trend::Stable
            }
        } else if ratio > self.config.increase_ratio {
            Trend::Increasing
        } else if ratio < self.config.decrease_ratio {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }
}

/// Ordinary least squares slope of `values` against their index.
pub fn regression_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

/// Trend analysis with the default thresholds.
pub fn analyze_trend(readings: &[MicReading], breakpoints: Option<&Breakpoints>) -> TrendResult {
    TrendAnalyzer::default().analyze(readings, breakpoints)
}
