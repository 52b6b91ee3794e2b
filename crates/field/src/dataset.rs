//! The immutable zone table every renderer reads from.
//!
//! Records are embedded as JSON and validated once at load: a record that
//! is missing a field, carries an unknown one, breaks the stress banding or
//! holds an out-of-range index rejects the whole dataset.

use std::collections::HashSet;
use std::fmt;

use bevy::prelude::*;

use crate::config::STRESS_SCORE_MAX;
use crate::zone::{self, FieldZone, StressLevel};

/// Zone records shipped with the build.
const EMBEDDED_ZONES: &str = include_str!("../data/zones.json");

// ---------------------------------------------------------------------------
// DatasetError
// ---------------------------------------------------------------------------

/// Errors raised while loading the zone dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetError {
    /// JSON was malformed or a record had missing/unknown fields.
    Parse(String),
    /// The dataset contained no zones.
    Empty,
    /// Two records share a zone code.
    DuplicateCode(String),
    /// `stress_level` disagrees with the banding of `stress_score`.
    BandMismatch {
        code: String,
        score: u8,
        level: StressLevel,
    },
    /// A numeric field is outside its valid range.
    OutOfRange {
        code: String,
        field: &'static str,
        value: f64,
    },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetError::Parse(msg) => write!(f, "Malformed zone dataset: {msg}"),
            DatasetError::Empty => write!(f, "Zone dataset is empty"),
            DatasetError::DuplicateCode(code) => write!(f, "Duplicate zone code: {code}"),
            DatasetError::BandMismatch { code, score, level } => write!(
                f,
                "Zone {code}: stress score {score} does not fall in the {} band",
                level.label()
            ),
            DatasetError::OutOfRange { code, field, value } => {
                write!(f, "Zone {code}: {field} = {value} is out of range")
            }
        }
    }
}

impl std::error::Error for DatasetError {}

impl From<serde_json::Error> for DatasetError {
    fn from(e: serde_json::Error) -> Self {
        DatasetError::Parse(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// ZoneDataset
// ---------------------------------------------------------------------------

/// Read-only table of field zones, in display order.
#[derive(Resource, Debug, Clone)]
pub struct ZoneDataset {
    zones: Vec<FieldZone>,
}

impl ZoneDataset {
    /// Load the dataset compiled into the binary.
    pub fn embedded() -> Result<Self, DatasetError> {
        Self::from_json(EMBEDDED_ZONES)
    }

    /// Parse and validate a JSON array of zone records.
    pub fn from_json(json: &str) -> Result<Self, DatasetError> {
        let zones: Vec<FieldZone> = serde_json::from_str(json)?;
        Self::from_zones(zones)
    }

    /// Validate already-built records.
    pub fn from_zones(zones: Vec<FieldZone>) -> Result<Self, DatasetError> {
        if zones.is_empty() {
            return Err(DatasetError::Empty);
        }
        let mut seen = HashSet::new();
        for zone in &zones {
            if !seen.insert(zone.code.as_str()) {
                return Err(DatasetError::DuplicateCode(zone.code.clone()));
            }
            validate_zone(zone)?;
        }
        Ok(Self { zones })
    }

    pub fn zones(&self) -> &[FieldZone] {
        &self.zones
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldZone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Look up a zone by its short code.
    pub fn get(&self, code: &str) -> Option<&FieldZone> {
        self.zones.iter().find(|z| z.code == code)
    }

    /// Sum of all zone areas in hectares.
    pub fn total_area_ha(&self) -> f32 {
        self.zones.iter().map(|z| z.area_ha).sum()
    }

    /// Zone with the highest stress score; first in dataset order on ties.
    pub fn most_stressed(&self) -> Option<&FieldZone> {
        zone::most_stressed(&self.zones)
    }
}

fn validate_zone(zone: &FieldZone) -> Result<(), DatasetError> {
    let out_of_range = |field: &'static str, value: f64| DatasetError::OutOfRange {
        code: zone.code.clone(),
        field,
        value,
    };

    if zone.stress_score > STRESS_SCORE_MAX {
        return Err(out_of_range("stressScore", f64::from(zone.stress_score)));
    }
    if !zone.band_is_consistent() {
        return Err(DatasetError::BandMismatch {
            code: zone.code.clone(),
            score: zone.stress_score,
            level: zone.stress_level,
        });
    }
    if !(zone.area_ha > 0.0) {
        return Err(out_of_range("area", f64::from(zone.area_ha)));
    }
    if !(0.0..=1.0).contains(&zone.ndvi) {
        return Err(out_of_range("ndvi", f64::from(zone.ndvi)));
    }
    if !(0.0..=1.0).contains(&zone.nitrogen_index) {
        return Err(out_of_range("nitrogenIndex", f64::from(zone.nitrogen_index)));
    }
    if !(-1.0..=1.0).contains(&zone.ndwi) {
        return Err(out_of_range("ndwi", f64::from(zone.ndwi)));
    }
    if !(0.0..=100.0).contains(&zone.water_content) {
        return Err(out_of_range("waterContent", f64::from(zone.water_content)));
    }
    if !zone.lst.is_finite() {
        return Err(out_of_range("lst", f64::from(zone.lst)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(level: &str, score: u8) -> String {
        format!(
            r#"[{{"code":"T1","name":"Test","lat":0.0,"lon":0.0,"area":1.0,"crop":"Oats",
            "stressLevel":"{level}","stressScore":{score},"waterContent":30.0,
            "nitrogenIndex":0.5,"ndvi":0.5,"ndwi":0.0,"lst":33.0}}]"#
        )
    }

    #[test]
    fn test_embedded_dataset_loads() {
        let dataset = ZoneDataset::embedded().expect("embedded dataset is valid");
        assert!(dataset.len() >= 6);
        assert!(dataset.get("Z1").is_some());
    }

    #[test]
    fn test_every_embedded_zone_agrees_with_banding() {
        let dataset = ZoneDataset::embedded().expect("embedded dataset is valid");
        for zone in dataset.iter() {
            assert_eq!(
                StressLevel::from_score(zone.stress_score),
                zone.stress_level,
                "zone {} score {} disagrees with level {:?}",
                zone.code,
                zone.stress_score,
                zone.stress_level
            );
        }
    }

    #[test]
    fn test_z1_is_the_severe_sample() {
        let dataset = ZoneDataset::embedded().expect("embedded dataset is valid");
        let z1 = dataset.get("Z1").expect("Z1 present");
        assert_eq!(z1.stress_score, 87);
        assert_eq!(z1.stress_level, StressLevel::Severe);
        assert_eq!(dataset.most_stressed().map(|z| z.code.as_str()), Some("Z1"));
    }

    #[test]
    fn test_most_stressed_prefers_first_on_tie() {
        let mut zones = ZoneDataset::embedded().expect("valid").zones().to_vec();
        zones[1].stress_score = zones[0].stress_score;
        zones[1].stress_level = zones[0].stress_level;
        let first = zones[0].code.clone();
        let dataset = ZoneDataset::from_zones(zones).expect("valid");
        assert_eq!(dataset.most_stressed().map(|z| z.code.clone()), Some(first));
    }

    #[test]
    fn test_band_mismatch_rejected() {
        let err = ZoneDataset::from_json(&sample_json("low", 80)).unwrap_err();
        assert!(matches!(err, DatasetError::BandMismatch { score: 80, .. }));
    }

    #[test]
    fn test_missing_field_rejected() {
        let json = r#"[{"code":"T1","name":"Test"}]"#;
        let err = ZoneDataset::from_json(json).unwrap_err();
        assert!(matches!(err, DatasetError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let json = sample_json("low", 20).replace("\"lst\":33.0", "\"lst\":33.0,\"yield\":4");
        assert!(matches!(
            ZoneDataset::from_json(&json),
            Err(DatasetError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let one = sample_json("low", 20);
        let body = one.trim().trim_start_matches('[').trim_end_matches(']');
        let json = format!("[{body},{body}]");
        assert_eq!(
            ZoneDataset::from_json(&json).unwrap_err(),
            DatasetError::DuplicateCode("T1".to_string())
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(ZoneDataset::from_json("[]").unwrap_err(), DatasetError::Empty);
    }

    #[test]
    fn test_out_of_range_ndvi_rejected() {
        let json = sample_json("low", 20).replace("\"ndvi\":0.5", "\"ndvi\":1.5");
        let err = ZoneDataset::from_json(&json).unwrap_err();
        assert!(matches!(err, DatasetError::OutOfRange { field: "ndvi", .. }));
    }

    #[test]
    fn test_alert_age_optional() {
        let dataset = ZoneDataset::from_json(&sample_json("low", 20)).expect("valid");
        assert_eq!(dataset.zones()[0].alert_age, None);
    }

    #[test]
    fn test_error_display() {
        let err = DatasetError::BandMismatch {
            code: "Z9".to_string(),
            score: 10,
            level: StressLevel::High,
        };
        let msg = format!("{err}");
        assert!(msg.contains("Z9"), "got: {msg}");
        assert!(msg.contains("High"), "got: {msg}");
    }
}
