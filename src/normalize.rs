//! Canonical names for antibiotics and organisms as they arrive from lab
//! reports, so that breakpoint lookups and report grouping line up.

/// Abbreviation or brand name to generic name.
const ANTIBIOTIC_ALIASES: &[(&str, &str)] = &[
    ("amox", "amoxicillin"),
    ("amox/clav", "amoxicillin-clavulanate"),
    ("augmentin", "amoxicillin-clavulanate"),
    ("pip/tazo", "piperacillin-tazobactam"),
    ("zosyn", "piperacillin-tazobactam"),
    ("tmp/smx", "trimethoprim-sulfamethoxazole"),
    ("bactrim", "trimethoprim-sulfamethoxazole"),
    ("cipro", "ciprofloxacin"),
    ("levo", "levofloxacin"),
    ("moxi", "moxifloxacin"),
    ("vanc", "vancomycin"),
    ("vanco", "vancomycin"),
    ("mero", "meropenem"),
    ("imi", "imipenem"),
    ("gent", "gentamicin"),
    ("tobra", "tobramycin"),
    ("ceftriax", "ceftriaxone"),
    ("rocephin", "ceftriaxone"),
    ("maxipime", "cefepime"),
];

const ORGANISM_ALIASES: &[(&str, &str)] = &[
    ("e. coli", "Escherichia coli"),
    ("e.coli", "Escherichia coli"),
    ("k. pneumoniae", "Klebsiella pneumoniae"),
    ("k.pneumoniae", "Klebsiella pneumoniae"),
    ("p. aeruginosa", "Pseudomonas aeruginosa"),
    ("p.aeruginosa", "Pseudomonas aeruginosa"),
    ("s. aureus", "Staphylococcus aureus"),
    ("s.aureus", "Staphylococcus aureus"),
    ("mrsa", "Staphylococcus aureus (MRSA)"),
    ("mssa", "Staphylococcus aureus (MSSA)"),
    ("enterococcus", "Enterococcus species"),
    ("vre", "Enterococcus (VRE)"),
];

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(alias, _)| *alias == key).map(|(_, name)| *name)
}

/// Lower-cased generic antibiotic name.
pub fn normalize_antibiotic_name(name: &str) -> String {
    let normalized = name.trim().to_lowercase();
    lookup(ANTIBIOTIC_ALIASES, &normalized)
        .map(str::to_string)
        .unwrap_or(normalized)
}

/// Full species name for common abbreviations; anything else is returned trimmed.
pub fn normalize_organism_name(name: &str) -> String {
    let trimmed = name.trim();
    lookup(ORGANISM_ALIASES, &trimmed.to_lowercase())
        .map(str::to_string)
        .unwrap_or_else(|| trimmed.to_string())
}
