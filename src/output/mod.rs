use crate::mic::{CreepReport, RiskLevel};
use crate::error::AmrResult;
use serde::Serialize;
use std::path::Path;
use std::fs::File;
use log::info;

#[derive(Debug, Serialize)]
pub struct RiskSummary {
    pub n_pairs: usize,
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
    pub unknown: usize,
}

impl RiskSummary {
    pub fn from_reports(reports: &[CreepReport]) -> Self {
        let count = |level: RiskLevel| reports.iter()
            .filter(|r| r.analysis.risk_level == level)
            .count();

        Self {
            n_pairs: reports.len(),
            critical: count(RiskLevel::Critical),
            high: count(RiskLevel::High),
            moderate: count(RiskLevel::Moderate),
            low: count(RiskLevel::Low),
            unknown: count(RiskLevel::Unknown),
        }
    }
}

pub fn save_reports<P: AsRef<Path>>(reports: &[CreepReport], output_dir: P) -> AmrResult<()> {
    let output_path = output_dir.as_ref();

    save_json_reports(reports, &output_path.join("creep_reports.json"))?;
    save_trend_summary(reports, &output_path.join("trend_summary.csv"))?;
    generate_report(reports, output_path)?;

    info!("All reports saved to {:?}", output_path);
    Ok(())
}

fn save_json_reports<P: AsRef<Path>>(reports: &[CreepReport], path: P) -> AmrResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, reports)?;
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn save_trend_summary<P: AsRef<Path>>(reports: &[CreepReport], path: P) -> AmrResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "ORGANISM", "ANTIBIOTIC", "N", "BASELINE_MIC", "CURRENT_MIC", "RATIO",
        "TREND", "VELOCITY", "RISK", "S_BREAKPOINT", "R_BREAKPOINT", "READINGS_TO_RESISTANCE",
    ])?;

    for report in reports {
        let a = &report.analysis;
        writer.write_record(&[
            report.organism.clone(),
            report.antibiotic.clone(),
            a.reading_count.to_string(),
            fmt_opt(a.baseline_mic),
            fmt_opt(a.current_mic),
            fmt_opt(a.ratio),
            a.trend.to_string(),
            fmt_opt(a.velocity),
            a.risk_level.to_string(),
            fmt_opt(report.breakpoint_susceptible),
            fmt_opt(report.breakpoint_resistant),
            fmt_opt(report.estimated_readings_to_resistance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Markdown summary for clinicians, highest risk first.
pub fn generate_report<P: AsRef<Path>>(reports: &[CreepReport], output_dir: P) -> AmrResult<()> {
    let report_path = output_dir.as_ref().join("mic_trend_report.md");
    let summary = RiskSummary::from_reports(reports);

    let mut ordered: Vec<&CreepReport> = reports.iter().collect();
    ordered.sort_by(|a, b| b.analysis.risk_level.cmp(&a.analysis.risk_level));

    let mut content = format!(
        r#"# MIC Trend Report

Generated: {}

## Overview
- **Organism-antibiotic pairs**: {}
- **CRITICAL**: {}
- **HIGH**: {}
- **MODERATE**: {}
- **LOW**: {}
- **UNKNOWN (insufficient data)**: {}

## Pairs
"#,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        summary.n_pairs,
        summary.critical,
        summary.high,
        summary.moderate,
        summary.low,
        summary.unknown,
    );

    for report in ordered {
        let a = &report.analysis;
        content.push_str(&format!(
            "\n### {} / {} [{}]\n- Readings: {}\n- Trend: {}\n",
            report.organism, report.antibiotic, a.risk_level, a.reading_count, a.trend,
        ));
        if let (Some(baseline), Some(current), Some(ratio)) = (a.baseline_mic, a.current_mic, a.ratio) {
            content.push_str(&format!(
                "- MIC: {} -> {} mg/L ({}x, velocity {})\n",
                baseline, current, ratio, fmt_opt(a.velocity),
            ));
        }
        if let (Some(s), Some(r)) = (report.breakpoint_susceptible, report.breakpoint_resistant) {
            content.push_str(&format!("- Breakpoints: S <= {} / R > {} mg/L\n", s, r));
        }
        if let Some(estimate) = report.estimated_readings_to_resistance {
            content.push_str(&format!("- Projected readings until breakpoint: {:.1}\n", estimate));
        }
        content.push_str(&format!("- Alert: {}\n", a.alert));
    }

    std::fs::write(report_path, content)?;
    Ok(())
}
