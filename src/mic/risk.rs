use super::{Breakpoints, RiskLevel, Trend};

const CRITICAL_FOLD: f64 = 8.0;
const HIGH_FOLD: f64 = 4.0;
const MODERATE_FOLD: f64 = 2.0;
const NARROW_MARGIN: f64 = 2.0;
const ADEQUATE_MARGIN: f64 = 4.0;

/// Risk tier and clinician-facing alert for the latest MIC.
///
/// With breakpoints the classification is driven by the margin between the
/// current MIC and the susceptible breakpoint; without them by the fold change
/// from baseline.
pub fn assess_risk(
    current_mic: f64,
    ratio: f64,
    trend: Trend,
    breakpoints: Option<&Breakpoints>,
) -> (RiskLevel, String) {
    match breakpoints {
        Some(bps) => assess_against_breakpoints(current_mic, trend, bps),
        None => assess_fold_change(ratio, trend),
    }
}

/// How many times the current MIC fits under the susceptible breakpoint.
pub fn breakpoint_margin(current_mic: f64, susceptible: f64) -> f64 {
    if current_mic > 0.0 {
        susceptible / current_mic
    } else {
        f64::INFINITY
    }
}

fn assess_against_breakpoints(current_mic: f64, trend: Trend, bps: &Breakpoints) -> (RiskLevel, String) {
    let s_bp = bps.susceptible();
    let r_bp = bps.resistant();
    let margin = breakpoint_margin(current_mic, s_bp);
    let increasing = trend == Trend::Increasing;

    if current_mic > r_bp {
        return (
            RiskLevel::Critical,
            format!("MIC ({}) exceeds resistant breakpoint ({}). Organism is RESISTANT.", current_mic, r_bp),
        );
    }

    if current_mic > s_bp {
        return (
            RiskLevel::High,
            format!("MIC ({}) exceeds susceptible breakpoint ({}). Consider alternative therapy.", current_mic, s_bp),
        );
    }

    if margin < NARROW_MARGIN {
        return if increasing {
            (
                RiskLevel::High,
                format!("MIC approaching breakpoint (margin: {:.1}x) with increasing trend. High risk of resistance emergence.", margin),
            )
        } else {
            (
                RiskLevel::Moderate,
                format!("MIC close to breakpoint (margin: {:.1}x). Monitor closely.", margin),
            )
        };
    }

    if margin < ADEQUATE_MARGIN {
        return if increasing {
            (
                RiskLevel::Moderate,
                format!("MIC rising with {:.1}x margin to breakpoint. Consider enhanced monitoring.", margin),
            )
        } else {
            (RiskLevel::Low, "MIC stable with adequate margin to breakpoint.".to_string())
        };
    }

    (RiskLevel::Low, "MIC well below breakpoint with good safety margin.".to_string())
}

fn assess_fold_change(ratio: f64, trend: Trend) -> (RiskLevel, String) {
    if ratio >= CRITICAL_FOLD {
        return (
            RiskLevel::Critical,
            format!("MIC increased {:.1}-fold from baseline. Urgent review needed.", ratio),
        );
    }

    if ratio >= HIGH_FOLD {
        return (
            RiskLevel::High,
            format!("MIC increased {:.1}-fold from baseline. High risk of treatment failure.", ratio),
        );
    }

    if ratio >= MODERATE_FOLD {
        return if trend == Trend::Increasing {
            (
                RiskLevel::Moderate,
                format!("MIC increased {:.1}-fold with rising trend. Enhanced monitoring recommended.", ratio),
            )
        } else {
            (
                RiskLevel::Low,
                format!("MIC increased {:.1}-fold but trend is {}.", ratio, trend),
            )
        };
    }

    if trend == Trend::Increasing {
        return (RiskLevel::Moderate, "MIC showing upward trend. Continue monitoring.".to_string());
    }

    (RiskLevel::Low, "MIC stable or decreasing. Current therapy appropriate.".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bps(s: f64, r: f64) -> Breakpoints {
        Breakpoints::new(s, r).unwrap()
    }

    #[test]
    fn test_resistant_is_critical_regardless_of_trend() {
        for trend in [Trend::Increasing, Trend::Stable, Trend::Decreasing] {
            let (level, alert) = assess_risk(8.0, 1.0, trend, Some(&bps(2.0, 4.0)));
            assert_eq!(level, RiskLevel::Critical);
            assert!(alert.contains("RESISTANT"));
        }
    }

    #[test]
    fn test_above_susceptible_breakpoint_is_high() {
        let (level, alert) = assess_risk(3.0, 1.0, Trend::Stable, Some(&bps(2.0, 4.0)));
        assert_eq!(level, RiskLevel::High);
        assert!(alert.contains("alternative therapy"));
    }

    #[test]
    fn test_margin_tiers() {
        let bp = bps(2.0, 4.0);
        // margin 1.33x
        assert_eq!(assess_risk(1.5, 3.0, Trend::Increasing, Some(&bp)).0, RiskLevel::High);
        assert_eq!(assess_risk(1.5, 1.0, Trend::Stable, Some(&bp)).0, RiskLevel::Moderate);
        // margin exactly 2x falls through to the next tier
        assert_eq!(assess_risk(1.0, 2.0, Trend::Increasing, Some(&bp)).0, RiskLevel::Moderate);
        assert_eq!(assess_risk(1.0, 1.0, Trend::Stable, Some(&bp)).0, RiskLevel::Low);
        // margin 8x
        let (level, alert) = assess_risk(0.25, 8.0, Trend::Increasing, Some(&bp));
        assert_eq!(level, RiskLevel::Low);
        assert!(alert.contains("well below"));
    }

    #[test]
    fn test_zero_current_mic_has_infinite_margin() {
        assert_eq!(breakpoint_margin(0.0, 2.0), f64::INFINITY);
        assert_eq!(assess_risk(0.0, 0.0, Trend::Decreasing, Some(&bps(2.0, 4.0))).0, RiskLevel::Low);
    }

    #[test]
    fn test_fold_change_tiers() {
        assert_eq!(assess_risk(8.0, 8.0, Trend::Stable, None).0, RiskLevel::Critical);
        assert_eq!(assess_risk(4.0, 4.0, Trend::Stable, None).0, RiskLevel::High);
        assert_eq!(assess_risk(3.0, 3.0, Trend::Increasing, None).0, RiskLevel::Moderate);

        let (level, alert) = assess_risk(2.0, 2.0, Trend::Stable, None);
        assert_eq!(level, RiskLevel::Low);
        assert_eq!(alert, "MIC increased 2.0-fold but trend is stable.");

        assert_eq!(assess_risk(1.8, 1.8, Trend::Increasing, None).0, RiskLevel::Moderate);
        assert_eq!(assess_risk(0.5, 0.5, Trend::Decreasing, None).0, RiskLevel::Low);
    }

    #[test]
    fn test_alert_formatting() {
        let (_, alert) = assess_risk(12.0, 12.0, Trend::Increasing, None);
        assert_eq!(alert, "MIC increased 12.0-fold from baseline. Urgent review needed.");

        let (_, alert) = assess_risk(1.5, 1.0, Trend::Stable, Some(&bps(2.0, 4.0)));
        assert_eq!(alert, "MIC close to breakpoint (margin: 1.3x). Monitor closely.");
    }
}
