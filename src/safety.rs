use serde::{Deserialize, Serialize};
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAlert {
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergyScreen {
    pub antibiotic: String,
    pub safe_to_use: bool,
    pub alerts: Vec<SafetyAlert>,
    pub allergy_warnings: Vec<SafetyAlert>,
    pub summary: String,
}

/// Allergy class -> members that may cross-react.
const CROSS_REACTIVITY: &[(&str, &[&str])] = &[
    ("penicillin", &["amoxicillin", "ampicillin", "piperacillin", "cephalosporin"]),
    ("cephalosporin", &["ceftriaxone", "cefotaxime", "ceftazidime", "cefepime"]),
    ("sulfa", &["sulfamethoxazole", "trimethoprim-sulfamethoxazole", "bactrim"]),
    ("fluoroquinolone", &["ciprofloxacin", "levofloxacin", "moxifloxacin"]),
];

/// Screens a proposed antibiotic against documented allergies.
///
/// A direct name match is a contraindication; a shared drug class only raises
/// a warning.
pub fn screen_allergies(antibiotic: &str, allergies: &[String]) -> AllergyScreen {
    let antibiotic_lower = antibiotic.to_lowercase();
    let mut alerts = Vec::new();
    let mut allergy_warnings = Vec::new();

    for allergy in allergies {
        let allergy_lower = allergy.trim().to_lowercase();
        if allergy_lower.is_empty() {
            continue;
        }

        if antibiotic_lower.contains(&allergy_lower) {
            warn!("{} contraindicated by documented {} allergy", antibiotic, allergy);
            allergy_warnings.push(SafetyAlert {
                level: AlertLevel::Critical,
                message: format!("Patient has documented allergy to {}. CONTRAINDICATED.", allergy),
            });
        }

        for (allergen, related) in CROSS_REACTIVITY {
            if !allergy_lower.contains(allergen) {
                continue;
            }
            if related.iter().any(|drug| antibiotic_lower.contains(drug)) {
                alerts.push(SafetyAlert {
                    level: AlertLevel::Warning,
                    message: format!(
                        "Potential cross-reactivity: Patient allergic to {}, {} is in related class.",
                        allergy, antibiotic
                    ),
                });
            }
        }
    }

    let safe_to_use = allergy_warnings.is_empty();
    let summary = if safe_to_use {
        "No critical safety concerns identified."
    } else {
        "SAFETY CONCERNS IDENTIFIED - Review required before prescribing."
    };

    AllergyScreen {
        antibiotic: antibiotic.to_string(),
        safe_to_use,
        alerts,
        allergy_warnings,
        summary: summary.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allergies(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_direct_allergy_is_contraindication() {
        let screen = screen_allergies("Amoxicillin", &allergies(&["amoxicillin"]));
        assert!(!screen.safe_to_use);
        assert_eq!(screen.allergy_warnings.len(), 1);
        assert_eq!(screen.allergy_warnings[0].level, AlertLevel::Critical);
    }

    #[test]
    fn test_class_cross_reactivity_warns() {
        let screen = screen_allergies("piperacillin-tazobactam", &allergies(&["Penicillin"]));
        assert!(screen.safe_to_use);
        assert_eq!(screen.alerts.len(), 1);
        assert_eq!(screen.alerts[0].level, AlertLevel::Warning);
    }

    #[test]
    fn test_alert_levels_serialize() {
        assert_eq!(serde_json::to_string(&AlertLevel::Warning).unwrap(), "\"WARNING\"");
        assert_eq!(serde_json::to_string(&AlertLevel::Critical).unwrap(), "\"CRITICAL\"");
    }

    #[test]
    fn test_no_allergies() {
        let screen = screen_allergies("meropenem", &[]);
        assert!(screen.safe_to_use);
        assert!(screen.alerts.is_empty());
        assert_eq!(screen.summary, "No critical safety concerns identified.");
    }
}
