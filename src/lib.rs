//! Antimicrobial stewardship calculations: Cockcroft-Gault renal dosing
//! estimates and MIC creep detection for organism-antibiotic pairs.
//!
//! Everything in `renal` and `mic` is a pure function of its arguments; the
//! remaining modules load inputs, persist reports and hold configuration.

pub mod config;
pub mod error;
pub mod input;
pub mod mic;
pub mod normalize;
pub mod output;
pub mod renal;
pub mod safety;

pub use error::{AmrError, AmrResult};
pub use mic::{
    analyze_trend, detect_mic_creep, estimate_time_to_resistance, Breakpoints, MicReading,
    RiskLevel, Trend, TrendAnalyzer, TrendResult,
};
pub use renal::{classify_renal_function, estimate_crcl, PatientRenalInputs, RenalCategory, Sex};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_reexports_cover_trend_workflow() {
        let readings = MicReading::from_values(&[1.0, 2.0, 4.0]).unwrap();
        let bps = Breakpoints::new(8.0, 16.0).unwrap();

        let result: TrendResult = TrendAnalyzer::default().analyze(&readings, Some(&bps));
        assert_eq!(result, analyze_trend(&readings, Some(&bps)));
        assert_eq!(result.trend, Trend::Increasing);
        assert_ne!(result.risk_level, RiskLevel::Unknown);
        assert_eq!(estimate_time_to_resistance(&readings, Some(8.0)), Some(1.0));

        let report = detect_mic_creep("E. coli", "ciprofloxacin", &readings, Some(&bps));
        assert_eq!(report.estimated_readings_to_resistance, Some(1.0));

        let crcl: AmrResult<f64> = estimate_crcl(65.0, 70.0, 1.0, Sex::Male, false, None);
        assert_eq!(classify_renal_function(crcl.unwrap()), RenalCategory::MildImpairment);
        let inputs = PatientRenalInputs::new(65.0, 70.0, 0.0, Sex::Male);
        assert!(matches!(inputs.estimate_crcl(), Err(AmrError::InvalidInput(_))));
    }
}
