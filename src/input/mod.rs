use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use log::{debug, info};
use crate::mic::MicReading;
use crate::normalize::{normalize_antibiotic_name, normalize_organism_name};
use crate::error::{AmrError, AmrResult};

/// One row of a MIC history file.
#[derive(Debug, Clone, Deserialize)]
pub struct MicRecord {
    #[serde(default)]
    pub organism: Option<String>,
    #[serde(default)]
    pub antibiotic: Option<String>,
    #[serde(deserialize_with = "sequence_key")]
    pub sequence: String,
    pub mic_value: f64,
}

/// Accepts dates, labels or plain indices as the ordering key.
fn sequence_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct SequenceKey;

    impl<'de> Visitor<'de> for SequenceKey {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or numeric sequence key")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(SequenceKey)
}

/// All readings for one organism-antibiotic pair, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct MicSeries {
    pub organism: String,
    pub antibiotic: String,
    pub readings: Vec<MicReading>,
}

pub fn load_records<P: AsRef<Path>>(path: P) -> AmrResult<Vec<MicRecord>> {
    let path = path.as_ref();
    let is_json = path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let records = if is_json {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)?
    } else {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;
        reader.deserialize().collect::<Result<Vec<MicRecord>, _>>()?
    };

    info!("Loaded {} MIC records from {:?}", records.len(), path);
    Ok(records)
}

/// Groups records into series keyed by normalized organism and antibiotic.
///
/// Rows without an organism or antibiotic column take the supplied defaults.
/// Series appear in order of first occurrence and readings are never re-sorted.
pub fn group_records(
    records: Vec<MicRecord>,
    default_organism: Option<&str>,
    default_antibiotic: Option<&str>,
) -> AmrResult<Vec<MicSeries>> {
    let mut series: Vec<MicSeries> = Vec::new();

    for (row, record) in records.into_iter().enumerate() {
        let organism = record.organism.as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(default_organism)
            .ok_or_else(|| AmrError::InvalidInput(format!("Row {}: missing organism", row + 1)))?;
        let antibiotic = record.antibiotic.as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(default_antibiotic)
            .ok_or_else(|| AmrError::InvalidInput(format!("Row {}: missing antibiotic", row + 1)))?;

        let organism = normalize_organism_name(organism);
        let antibiotic = normalize_antibiotic_name(antibiotic);
        let reading = MicReading::new(record.sequence, record.mic_value)
            .map_err(|e| AmrError::InvalidInput(format!("Row {}: {}", row + 1, e)))?;

        match series.iter_mut().find(|s| s.organism == organism && s.antibiotic == antibiotic) {
            Some(existing) => existing.readings.push(reading),
            None => series.push(MicSeries { organism, antibiotic, readings: vec![reading] }),
        }
    }

    debug!("Grouped MIC records into {} series", series.len());
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_file(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("amr_guard_input_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_csv_with_pair_columns() {
        let path = scratch_file("panel.csv", "\
organism,antibiotic,sequence,mic_value
E. coli,cipro,2023-01,0.25
K. pneumoniae,mero,2023-01,0.5
E. coli,cipro,2023-06,0.5
E. coli,cipro,2023-03,1.0
");
        let series = group_records(load_records(&path).unwrap(), None, None).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].organism, "Escherichia coli");
        assert_eq!(series[0].antibiotic, "ciprofloxacin");
        // file order kept, not re-sorted by sequence
        let sequences: Vec<&str> = series[0].readings.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(sequences, vec!["2023-01", "2023-06", "2023-03"]);
        assert_eq!(series[1].readings.len(), 1);
    }

    #[test]
    fn test_csv_without_pair_columns_uses_defaults() {
        let path = scratch_file("single.csv", "sequence,mic_value\n1,1.0\n2,4.0\n");
        let records = load_records(&path).unwrap();
        assert!(group_records(records.clone(), None, Some("vancomycin")).is_err());

        let series = group_records(records, Some("MRSA"), Some("vanco")).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].organism, "Staphylococcus aureus (MRSA)");
        assert_eq!(series[0].antibiotic, "vancomycin");
    }

    #[test]
    fn test_json_records() {
        let path = scratch_file("history.json", r#"[
            {"sequence": "a", "mic_value": 2.0},
            {"sequence": "b", "mic_value": 2.0}
        ]"#);
        let series = group_records(load_records(&path).unwrap(), Some("E. coli"), Some("amox")).unwrap();
        assert_eq!(series[0].readings.len(), 2);
    }

    #[test]
    fn test_json_numeric_sequence_keys() {
        let path = scratch_file("indexed.json", r#"[
            {"sequence": 1, "mic_value": 1.0},
            {"sequence": 2, "mic_value": 2.0},
            {"sequence": 3.5, "mic_value": 4.0}
        ]"#);
        let records = load_records(&path).unwrap();
        let keys: Vec<&str> = records.iter().map(|r| r.sequence.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "3.5"]);

        let series = group_records(records, Some("E. coli"), Some("cipro")).unwrap();
        assert_eq!(series[0].readings.len(), 3);
        assert_eq!(series[0].readings[2].mic_value, 4.0);
    }

    #[test]
    fn test_negative_mic_rejected() {
        let records = vec![MicRecord {
            organism: Some("E. coli".to_string()),
            antibiotic: Some("cipro".to_string()),
            sequence: "1".to_string(),
            mic_value: -0.5,
        }];
        assert!(matches!(group_records(records, None, None), Err(AmrError::InvalidInput(_))));
    }
}
