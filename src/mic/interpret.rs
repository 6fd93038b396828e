use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Susceptibility {
    Susceptible,
    Intermediate,
    Resistant,
    Unknown,
}

impl fmt::Display for Susceptibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Susceptibility::Susceptible => "SUSCEPTIBLE",
            Susceptibility::Intermediate => "INTERMEDIATE",
            Susceptibility::Resistant => "RESISTANT",
            Susceptibility::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicInterpretation {
    pub interpretation: Susceptibility,
    pub message: String,
    pub mic_value: f64,
    pub susceptible_breakpoint: Option<f64>,
    pub resistant_breakpoint: Option<f64>,
}

/// S/I/R category of a single MIC. Either breakpoint may be missing, in which
/// case only the comparisons it supports are made.
pub fn interpret_mic(mic_value: f64, susceptible: Option<f64>, resistant: Option<f64>) -> MicInterpretation {
    let (interpretation, message) = match (susceptible, resistant) {
        (Some(s), _) if mic_value <= s => (
            Susceptibility::Susceptible,
            format!("MIC ({} mg/L) <= S breakpoint ({} mg/L)", mic_value, s),
        ),
        (_, Some(r)) if mic_value > r => (
            Susceptibility::Resistant,
            format!("MIC ({} mg/L) > R breakpoint ({} mg/L)", mic_value, r),
        ),
        (Some(s), Some(r)) => (
            Susceptibility::Intermediate,
            format!("MIC ({} mg/L) between S ({}) and R ({}) breakpoints", mic_value, s, r),
        ),
        (None, None) => (
            Susceptibility::Unknown,
            "No breakpoint available".to_string(),
        ),
        _ => (
            Susceptibility::Unknown,
            "Incomplete breakpoint data".to_string(),
        ),
    };

    MicInterpretation {
        interpretation,
        message,
        mic_value,
        susceptible_breakpoint: susceptible,
        resistant_breakpoint: resistant,
    }
}
