use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use serde_json::json;
use std::path::PathBuf;

use amr_guard::config::Config;
use amr_guard::input::{group_records, load_records};
use amr_guard::mic::{interpret_mic, Breakpoints, TrendAnalyzer};
use amr_guard::normalize::{normalize_antibiotic_name, normalize_organism_name};
use amr_guard::output::save_reports;
use amr_guard::renal::{classify_renal_function, PatientRenalInputs, Sex};
use amr_guard::safety::screen_allergies;

#[derive(Parser)]
#[command(name = "amr_guard")]
#[command(about = "MIC creep detection and renal dosing calculator")]
struct Cli {
    /// Configuration file path (thresholds and breakpoint table)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate creatinine clearance (Cockcroft-Gault)
    Crcl {
        /// Age in years
        #[arg(long)]
        age: f64,

        /// Actual body weight in kg
        #[arg(long)]
        weight: f64,

        /// Serum creatinine in mg/dL
        #[arg(long)]
        creatinine: f64,

        /// male or female
        #[arg(long)]
        sex: Sex,

        /// Use ideal (or adjusted) body weight instead of actual weight
        #[arg(long)]
        ideal_weight: bool,

        /// Height in cm, needed for ideal body weight
        #[arg(long)]
        height: Option<f64>,
    },

    /// Analyze MIC histories for creep
    Trend {
        /// CSV or JSON file of MIC readings, oldest first
        #[arg(short, long)]
        readings: PathBuf,

        /// Organism for rows without an organism column
        #[arg(long)]
        organism: Option<String>,

        /// Antibiotic for rows without an antibiotic column
        #[arg(long)]
        antibiotic: Option<String>,

        /// Susceptible breakpoint (mg/L), overrides the configured table
        #[arg(long, requires = "resistant")]
        susceptible: Option<f64>,

        /// Resistant breakpoint (mg/L), overrides the configured table
        #[arg(long, requires = "susceptible")]
        resistant: Option<f64>,

        /// Output directory for JSON, CSV and Markdown reports
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interpret a single MIC against breakpoints (S/I/R)
    Interpret {
        /// MIC in mg/L
        #[arg(long)]
        mic: f64,

        #[arg(long)]
        organism: Option<String>,

        #[arg(long)]
        antibiotic: Option<String>,

        #[arg(long)]
        susceptible: Option<f64>,

        #[arg(long)]
        resistant: Option<f64>,
    },

    /// Screen an antibiotic against documented allergies
    Screen {
        #[arg(long)]
        antibiotic: String,

        /// Documented allergy (repeatable)
        #[arg(long = "allergy")]
        allergies: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("Failed to load configuration from {:?}", path))?;
            info!("Loaded configuration from {:?} ({} breakpoint entries)", path, config.breakpoints.len());
            config
        },
        None => Config::default(),
    };

    match cli.command {
        Command::Crcl { age, weight, creatinine, sex, ideal_weight, height } => {
            let mut inputs = PatientRenalInputs::new(age, weight, creatinine, sex);
            if ideal_weight {
                inputs = inputs.with_ideal_weight(height);
            }
            let crcl = inputs.estimate_crcl_with(&config.renal)?;
            let category = classify_renal_function(crcl);
            info!("CrCl {} mL/min ({})", crcl, category);
            println!("{}", serde_json::to_string_pretty(&json!({
                "crcl_ml_min": crcl,
                "renal_category": category,
            }))?);
        },

        Command::Trend { readings, organism, antibiotic, susceptible, resistant, output } => {
            let records = load_records(&readings)
                .with_context(|| format!("Failed to read MIC history from {:?}", readings))?;
            let series = group_records(records, organism.as_deref(), antibiotic.as_deref())?;
            let override_bps = Breakpoints::from_pair(susceptible, resistant)?;
            let analyzer = TrendAnalyzer::new(config.trend.clone());

            let mut reports = Vec::with_capacity(series.len());
            for s in &series {
                let bps = match override_bps {
                    Some(bps) => Some(bps),
                    None => config.find_breakpoints(&s.organism, &s.antibiotic)
                        .map(|entry| entry.breakpoints())
                        .transpose()?,
                };
                if bps.is_none() {
                    warn!("No breakpoints for {} / {}; using fold-change thresholds", s.organism, s.antibiotic);
                }
                reports.push(analyzer.detect_creep(&s.organism, &s.antibiotic, &s.readings, bps.as_ref()));
            }

            println!("{}", serde_json::to_string_pretty(&reports)?);

            if let Some(dir) = output {
                std::fs::create_dir_all(&dir)
                    .with_context(|| format!("Failed to create output directory {:?}", dir))?;
                save_reports(&reports, &dir)?;
                info!("Reports saved to {:?}", dir);
            }
        },

        Command::Interpret { mic, organism, antibiotic, susceptible, resistant } => {
            let (s_bp, r_bp) = match (susceptible, resistant, organism, antibiotic) {
                (None, None, Some(org), Some(abx)) => {
                    let org = normalize_organism_name(&org);
                    let abx = normalize_antibiotic_name(&abx);
                    match config.find_breakpoints(&org, &abx) {
                        Some(entry) => (Some(entry.susceptible), Some(entry.resistant)),
                        None => {
                            warn!("No breakpoint found for {} against {}", abx, org);
                            (None, None)
                        },
                    }
                },
                (s, r, _, _) => (s, r),
            };
            let interpretation = interpret_mic(mic, s_bp, r_bp);
            println!("{}", serde_json::to_string_pretty(&interpretation)?);
        },

        Command::Screen { antibiotic, allergies } => {
            let antibiotic = normalize_antibiotic_name(&antibiotic);
            let screen = screen_allergies(&antibiotic, &allergies);
            println!("{}", serde_json::to_string_pretty(&screen)?);
        },
    }

    Ok(())
}
