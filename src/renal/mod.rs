//! Renal function estimation for antibiotic dose adjustment.
//!
//! Creatinine clearance is estimated with the Cockcroft-Gault equation:
//!
//! ```text
//! CrCl = ((140 - age) * weight) / (72 * SCr)   [* 0.85 if female]
//! ```
//!
//! Optionally the dosing weight is replaced by the Devine ideal body weight,
//! or by the adjusted body weight when the patient is above 130% of ideal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use log::{debug, warn};
use crate::config::RenalConfig;
use crate::error::{AmrError, AmrResult};

const OBESITY_THRESHOLD: f64 = 1.3;
const ADJUSTED_WEIGHT_FACTOR: f64 = 0.4;
const FEMALE_FACTOR: f64 = 0.85;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Devine base weight in kg for a height of 60 inches.
    fn ibw_base(self) -> f64 {
        match self {
            Sex::Male => 50.0,
            Sex::Female => 45.5,
        }
    }
}

impl FromStr for Sex {
    type Err = AmrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(AmrError::InvalidInput(format!("Unknown sex: {}", other))),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRenalInputs {
    pub age_years: f64,
    pub weight_kg: f64,
    pub serum_creatinine_mg_dl: f64,
    pub sex: Sex,
    #[serde(default)]
    pub use_ideal_weight: bool,
    #[serde(default)]
    pub height_cm: Option<f64>,
}

impl PatientRenalInputs {
    pub fn new(age_years: f64, weight_kg: f64, serum_creatinine_mg_dl: f64, sex: Sex) -> Self {
        Self {
            age_years,
            weight_kg,
            serum_creatinine_mg_dl,
            sex,
            use_ideal_weight: false,
            height_cm: None,
        }
    }

    pub fn with_ideal_weight(mut self, height_cm: Option<f64>) -> Self {
        self.use_ideal_weight = true;
        self.height_cm = height_cm;
        self
    }

    fn validate(&self) -> AmrResult<()> {
        if !(self.serum_creatinine_mg_dl > 0.0) || !self.serum_creatinine_mg_dl.is_finite() {
            return Err(AmrError::InvalidInput(
                "Serum creatinine must be positive".to_string()
            ));
        }
        if !(self.age_years > 0.0) || !(self.weight_kg > 0.0)
            || !self.age_years.is_finite() || !self.weight_kg.is_finite() {
            return Err(AmrError::InvalidInput(
                "Age and weight must be positive".to_string()
            ));
        }
        if let Some(height) = self.height_cm {
            if !(height > 0.0) || !height.is_finite() {
                return Err(AmrError::InvalidInput(
                    "Height must be positive".to_string()
                ));
            }
        }
        Ok(())
    }

    /// Weight fed into Cockcroft-Gault after the ideal/adjusted weight rules.
    pub fn dosing_weight(&self, config: &RenalConfig) -> AmrResult<f64> {
        if !self.use_ideal_weight {
            return Ok(self.weight_kg);
        }

        let height = match self.height_cm {
            Some(h) => h,
            None if config.strict_ideal_weight => {
                return Err(AmrError::InvalidInput(
                    "Height is required when ideal body weight is requested".to_string()
                ));
            },
            None => {
                warn!("Ideal body weight requested without height; using actual weight");
                return Ok(self.weight_kg);
            },
        };

        let ibw = ideal_body_weight(height, self.sex);
        if self.weight_kg > ibw * OBESITY_THRESHOLD {
            let adjbw = adjusted_body_weight(ibw, self.weight_kg);
            debug!("Actual weight {} kg exceeds 130% of IBW {} kg; using AdjBW {} kg", self.weight_kg, ibw, adjbw);
            Ok(adjbw)
        } else {
            debug!("Using IBW {} kg", ibw);
            Ok(ibw)
        }
    }

    pub fn estimate_crcl(&self) -> AmrResult<f64> {
        self.estimate_crcl_with(&RenalConfig::default())
    }

    /// Cockcroft-Gault CrCl in mL/min, rounded to one decimal. Ages above 140
    /// give a negative value; no clamping is applied.
    pub fn estimate_crcl_with(&self, config: &RenalConfig) -> AmrResult<f64> {
        self.validate()?;

        let weight = self.dosing_weight(config)?;
        let mut crcl = ((140.0 - self.age_years) * weight) / (72.0 * self.serum_creatinine_mg_dl);

        if self.sex == Sex::Female {
            crcl *= FEMALE_FACTOR;
        }

        Ok(round_to(crcl, 1))
    }
}

/// Cockcroft-Gault creatinine clearance (mL/min).
pub fn estimate_crcl(
    age_years: f64,
    weight_kg: f64,
    serum_creatinine_mg_dl: f64,
    sex: Sex,
    use_ideal_weight: bool,
    height_cm: Option<f64>,
) -> AmrResult<f64> {
    let mut inputs = PatientRenalInputs::new(age_years, weight_kg, serum_creatinine_mg_dl, sex);
    if use_ideal_weight {
        inputs = inputs.with_ideal_weight(height_cm);
    }
    inputs.estimate_crcl()
}

/// Devine ideal body weight in kg, rounded to 0.1 kg.
pub fn ideal_body_weight(height_cm: f64, sex: Sex) -> f64 {
    let height_inches = height_cm / 2.54;
    let height_over_60 = (height_inches - 60.0).max(0.0);
    round_to(sex.ibw_base() + 2.3 * height_over_60, 1)
}

/// Adjusted body weight for obese patients: IBW + 0.4 * (actual - IBW).
pub fn adjusted_body_weight(ibw: f64, actual_weight: f64) -> f64 {
    round_to(ibw + ADJUSTED_WEIGHT_FACTOR * (actual_weight - ibw), 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenalCategory {
    Normal,
    MildImpairment,
    ModerateImpairment,
    SevereImpairment,
    Esrd,
}

impl RenalCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenalCategory::Normal => "normal",
            RenalCategory::MildImpairment => "mild_impairment",
            RenalCategory::ModerateImpairment => "moderate_impairment",
            RenalCategory::SevereImpairment => "severe_impairment",
            RenalCategory::Esrd => "esrd",
        }
    }
}

impl fmt::Display for RenalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dosing category for a CrCl value. Lower bounds are inclusive.
pub fn classify_renal_function(crcl: f64) -> RenalCategory {
    if crcl >= 90.0 {
        RenalCategory::Normal
    } else if crcl >= 60.0 {
        RenalCategory::MildImpairment
    } else if crcl >= 30.0 {
        RenalCategory::ModerateImpairment
    } else if crcl >= 15.0 {
        RenalCategory::SevereImpairment
    } else {
        RenalCategory::Esrd
    }
}

/// Rounds to `decimals` places with ties to even (0.125 -> 0.12).
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}
