pub mod trend;
pub mod risk;
pub mod creep;
pub mod interpret;

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::error::{AmrError, AmrResult};

pub use trend::*;
pub use risk::*;
pub use creep::*;
pub use interpret::*;

/// A single MIC measurement. `sequence` is an opaque ordering key (a date
/// string or index); readings are consumed in the order supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicReading {
    pub sequence: String,
    pub mic_value: f64, // mg/L
}

impl MicReading {
    pub fn new(sequence: impl Into<String>, mic_value: f64) -> AmrResult<Self> {
        if !mic_value.is_finite() || mic_value < 0.0 {
            return Err(AmrError::InvalidInput(
                format!("MIC value must be a non-negative number, got {}", mic_value)
            ));
        }
        Ok(Self { sequence: sequence.into(), mic_value })
    }

    /// Builds readings keyed by their position, for callers that only have values.
    pub fn from_values(values: &[f64]) -> AmrResult<Vec<Self>> {
        values.iter()
            .enumerate()
            .map(|(i, &v)| Self::new(i.to_string(), v))
            .collect()
    }
}

/// Susceptible/resistant MIC thresholds (mg/L), S <= R.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Breakpoints {
    susceptible: f64,
    resistant: f64,
}

impl Breakpoints {
    pub fn new(susceptible: f64, resistant: f64) -> AmrResult<Self> {
        if !susceptible.is_finite() || !resistant.is_finite() || susceptible > resistant {
            return Err(AmrError::InvalidBreakpoints { susceptible, resistant });
        }
        Ok(Self { susceptible, resistant })
    }

    /// Breakpoints only exist when both thresholds are known.
    pub fn from_pair(susceptible: Option<f64>, resistant: Option<f64>) -> AmrResult<Option<Self>> {
        match (susceptible, resistant) {
            (Some(s), Some(r)) => Self::new(s, r).map(Some),
            _ => Ok(None),
        }
    }

    pub fn susceptible(&self) -> f64 {
        self.susceptible
    }

    pub fn resistant(&self) -> f64 {
        self.resistant
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Stable,
    Increasing,
    Decreasing,
    InsufficientData,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Stable => "stable",
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::InsufficientData => "insufficient_data",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Unknown,
    Low,
    Moderate,
    High,
    Critical,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Unknown => "UNKNOWN",
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
            RiskLevel::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Outcome of a trend analysis. Numeric fields are `None` only when fewer
/// than two readings were supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub baseline_mic: Option<f64>,
    pub current_mic: Option<f64>,
    pub ratio: Option<f64>,
    pub trend: Trend,
    pub velocity: Option<f64>,
    pub risk_level: RiskLevel,
    pub alert: String,
    pub reading_count: usize,
}

impl TrendResult {
    pub fn insufficient_data(reading_count: usize) -> Self {
        Self {
            baseline_mic: None,
            current_mic: None,
            ratio: None,
            trend: Trend::InsufficientData,
            velocity: None,
            risk_level: RiskLevel::Unknown,
            alert: "Need at least 2 MIC values for trend analysis".to_string(),
            reading_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_validation() {
        assert!(MicReading::new("2024-01", 0.5).is_ok());
        assert!(MicReading::new("2024-01", 0.0).is_ok());
        assert!(MicReading::new("2024-01", -1.0).is_err());
        assert!(MicReading::new("2024-01", f64::INFINITY).is_err());

        let readings = MicReading::from_values(&[1.0, 2.0]).unwrap();
        assert_eq!(readings[1].sequence, "1");
    }

    #[test]
    fn test_breakpoints_invariant() {
        assert!(Breakpoints::new(2.0, 4.0).is_ok());
        assert!(Breakpoints::new(2.0, 2.0).is_ok());
        assert!(matches!(Breakpoints::new(4.0, 2.0), Err(AmrError::InvalidBreakpoints { .. })));
        assert_eq!(Breakpoints::from_pair(Some(2.0), None).unwrap(), None);
        assert!(Breakpoints::from_pair(Some(2.0), Some(4.0)).unwrap().is_some());
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(serde_json::to_string(&Trend::InsufficientData).unwrap(), "\"insufficient_data\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Critical).unwrap(), "\"CRITICAL\"");
        assert!(RiskLevel::Critical > RiskLevel::High);
    }
}
