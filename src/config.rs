use serde::{Deserialize, Serialize};
use std::path::Path;
use log::debug;
use crate::error::{AmrError, AmrResult};
use crate::mic::Breakpoints;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub trend: TrendConfig,
    pub renal: RenalConfig,
    pub breakpoints: Vec<BreakpointEntry>,
}

/// Thresholds used by the trend analyzer. The defaults are the historical
/// values the risk tiers were calibrated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    pub slope_threshold: f64,     // MIC units per step, used when n >= 3
    pub increase_ratio: f64,      // current/baseline above this is increasing (n == 2)
    pub decrease_ratio: f64,      // current/baseline below this is decreasing (n == 2)
    pub zero_baseline_floor: f64, // substituted for a zero baseline
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            slope_threshold: 0.5,
            increase_ratio: 1.5,
            decrease_ratio: 0.67,
            zero_baseline_floor: 0.001,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenalConfig {
    /// Fail instead of falling back to actual weight when ideal weight is
    /// requested without a height.
    pub strict_ideal_weight: bool,
}

/// One row of an EUCAST/CLSI style breakpoint table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointEntry {
    pub pathogen_group: String,
    pub antibiotic: String,
    pub susceptible: f64,
    pub resistant: f64,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BreakpointEntry {
    pub fn breakpoints(&self) -> AmrResult<Breakpoints> {
        Breakpoints::new(self.susceptible, self.resistant)
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> AmrResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AmrResult<()> {
        self.validate_trend()?;

        for entry in &self.breakpoints {
            if entry.pathogen_group.trim().is_empty() || entry.antibiotic.trim().is_empty() {
                return Err(AmrError::Validation(
                    "Breakpoint entries need both a pathogen group and an antibiotic".to_string()
                ));
            }
            if entry.susceptible <= 0.0 || entry.resistant <= 0.0 {
                return Err(AmrError::Validation(
                    format!("Breakpoints for {} / {} must be positive", entry.pathogen_group, entry.antibiotic)
                ));
            }
            entry.breakpoints()?;
        }

        Ok(())
    }

    fn validate_trend(&self) -> AmrResult<()> {
        let trend = &self.trend;

        if !trend.slope_threshold.is_finite() || trend.slope_threshold < 0.0 {
            return Err(AmrError::Validation(
                "Slope threshold must be a non-negative number".to_string()
            ));
        }

        if !trend.zero_baseline_floor.is_finite() || trend.zero_baseline_floor <= 0.0 {
            return Err(AmrError::Validation(
                "Zero-baseline floor must be positive".to_string()
            ));
        }

        if !(trend.decrease_ratio > 0.0 && trend.decrease_ratio < 1.0 && trend.increase_ratio > 1.0) {
            return Err(AmrError::Validation(
                format!(
                    "Ratio thresholds must satisfy 0 < decrease ({}) < 1 < increase ({})",
                    trend.decrease_ratio, trend.increase_ratio
                )
            ));
        }

        Ok(())
    }

    /// Case-insensitive substring lookup on both pathogen group and antibiotic.
    /// The first matching entry wins.
    /// Blank queries match nothing.
    pub fn find_breakpoints(&self, organism: &str, antibiotic: &str) -> Option<&BreakpointEntry> {
        let organism = organism.trim().to_lowercase();
        let antibiotic = antibiotic.trim().to_lowercase();
        if organism.is_empty() || antibiotic.is_empty() {
            return None;
        }

        let found = self.breakpoints.iter().find(|entry| {
            let group = entry.pathogen_group.to_lowercase();
            let drug = entry.antibiotic.to_lowercase();
            (group.contains(&organism) || organism.contains(&group))
                && (drug.contains(&antibiotic) || antibiotic.contains(&drug))
        });

        debug!("Breakpoint lookup for {} / {}: {:?}", organism, antibiotic, found.map(|e| &e.pathogen_group));
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(group: &str, drug: &str, s: f64, r: f64) -> BreakpointEntry {
        BreakpointEntry {
            pathogen_group: group.to_string(),
            antibiotic: drug.to_string(),
            susceptible: s,
            resistant: r,
            route: None,
            notes: None,
        }
    }

    #[test]
    fn test_defaults_match_calibrated_constants() {
        let config = Config::default();
        assert_eq!(config.trend.slope_threshold, 0.5);
        assert_eq!(config.trend.increase_ratio, 1.5);
        assert_eq!(config.trend.decrease_ratio, 0.67);
        assert_eq!(config.trend.zero_baseline_floor, 0.001);
        assert!(!config.renal.strict_ideal_weight);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "renal": { "strict_ideal_weight": true },
            "breakpoints": [
                { "pathogen_group": "Enterobacterales", "antibiotic": "ciprofloxacin",
                  "susceptible": 0.25, "resistant": 0.5 }
            ]
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.renal.strict_ideal_weight);
        assert_eq!(config.trend, TrendConfig::default());
        assert_eq!(config.breakpoints.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_inverted_breakpoints_rejected() {
        let config = Config {
            breakpoints: vec![entry("Staphylococcus aureus", "vancomycin", 4.0, 2.0)],
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(AmrError::InvalidBreakpoints { .. })));
    }

    #[test]
    fn test_bad_ratio_thresholds_rejected() {
        let mut config = Config::default();
        config.trend.increase_ratio = 0.9;
        assert!(matches!(config.validate(), Err(AmrError::Validation(_))));
    }

    #[test]
    fn test_find_breakpoints_case_insensitive() {
        let config = Config {
            breakpoints: vec![
                entry("Enterobacterales", "ciprofloxacin", 0.25, 0.5),
                entry("Staphylococcus aureus", "vancomycin", 2.0, 2.0),
            ],
            ..Config::default()
        };

        let found = config.find_breakpoints("staphylococcus aureus (MRSA)", "Vancomycin").unwrap();
        assert_eq!(found.susceptible, 2.0);
        assert!(config.find_breakpoints("Pseudomonas aeruginosa", "meropenem").is_none());
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let config = Config {
            breakpoints: vec![entry("Enterobacterales", "ciprofloxacin", 0.25, 0.5)],
            ..Config::default()
        };

        assert!(config.find_breakpoints("", "ciprofloxacin").is_none());
        assert!(config.find_breakpoints("Enterobacterales", "  ").is_none());
    }
}
