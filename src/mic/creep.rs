use serde::{Deserialize, Serialize};
use log::info;
use super::{Breakpoints, MicReading, RiskLevel, Trend, TrendAnalyzer, TrendResult};
use crate::renal::round_to;

/// Trend analysis for one organism-antibiotic pair plus the projected number
/// of further readings until the susceptible breakpoint is crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreepReport {
    pub organism: String,
    pub antibiotic: String,
    pub breakpoint_susceptible: Option<f64>,
    pub breakpoint_resistant: Option<f64>,
    #[serde(flatten)]
    pub analysis: TrendResult,
    pub estimated_readings_to_resistance: Option<f64>,
}

impl CreepReport {
    pub fn is_actionable(&self) -> bool {
        self.analysis.risk_level >= RiskLevel::High
    }
}

/// Readings until `current * velocity^k` reaches the susceptible breakpoint.
///
/// Only defined for an increasing trend with velocity above 1 and a current
/// MIC still below the breakpoint.
pub fn projected_readings_to_breakpoint(result: &TrendResult, susceptible_breakpoint: f64) -> Option<f64> {
    if result.trend != Trend::Increasing {
        return None;
    }

    let current = result.current_mic?;
    let velocity = result.velocity?;
    if velocity <= 1.0 || current <= 0.0 || current >= susceptible_breakpoint {
        return None;
    }

    let doublings_needed = (susceptible_breakpoint / current).log2();
    let log_velocity = velocity.log2();
    if log_velocity <= 0.0 {
        return None;
    }

    Some(round_to(doublings_needed / log_velocity, 1))
}

pub fn estimate_time_to_resistance(readings: &[MicReading], susceptible_breakpoint: Option<f64>) -> Option<f64> {
    TrendAnalyzer::default().estimate_time_to_resistance(readings, susceptible_breakpoint)
}

pub fn detect_mic_creep(
    organism: &str,
    antibiotic: &str,
    readings: &[MicReading],
    breakpoints: Option<&Breakpoints>,
) -> CreepReport {
    TrendAnalyzer::default().detect_creep(organism, antibiotic, readings, breakpoints)
}

impl TrendAnalyzer {
    pub fn estimate_time_to_resistance(&self, readings: &[MicReading], susceptible_breakpoint: Option<f64>) -> Option<f64> {
        let s_bp = susceptible_breakpoint?;
        let result = self.analyze(readings, None);
        projected_readings_to_breakpoint(&result, s_bp)
    }

    pub fn detect_creep(
        &self,
        organism: &str,
        antibiotic: &str,
        readings: &[MicReading],
        breakpoints: Option<&Breakpoints>,
    ) -> CreepReport {
        let analysis = self.analyze(readings, breakpoints);
        let estimate = breakpoints
            .and_then(|bps| projected_readings_to_breakpoint(&analysis, bps.susceptible()));

        info!(
            "{} / {}: {} ({} readings, trend {})",
            organism, antibiotic, analysis.risk_level, analysis.reading_count, analysis.trend
        );

        CreepReport {
            organism: organism.to_string(),
            antibiotic: antibiotic.to_string(),
            breakpoint_susceptible: breakpoints.map(|b| b.susceptible()),
            breakpoint_resistant: breakpoints.map(|b| b.resistant()),
            analysis,
            estimated_readings_to_resistance: estimate,
        }
    }
}
