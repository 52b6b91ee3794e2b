//! Field-zone records and the stress banding that ties score to level.

use serde::{Deserialize, Serialize};

use crate::config::{
    STRESS_BAND_HIGH_MAX, STRESS_BAND_LOW_MAX, STRESS_BAND_MODERATE_MAX, STRESS_BAND_NONE_MAX,
};

// ---------------------------------------------------------------------------
// StressLevel
// ---------------------------------------------------------------------------

/// Categorical stress level. Ordered from healthy to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StressLevel {
    None,
    Low,
    Moderate,
    High,
    Severe,
}

impl StressLevel {
    /// All levels in ascending order.
    pub const ALL: [StressLevel; 5] = [
        StressLevel::None,
        StressLevel::Low,
        StressLevel::Moderate,
        StressLevel::High,
        StressLevel::Severe,
    ];

    /// The level a score falls into under the fixed banding
    /// (0-15 none, 16-35 low, 36-55 moderate, 56-75 high, 76-100 severe).
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s <= STRESS_BAND_NONE_MAX => StressLevel::None,
            s if s <= STRESS_BAND_LOW_MAX => StressLevel::Low,
            s if s <= STRESS_BAND_MODERATE_MAX => StressLevel::Moderate,
            s if s <= STRESS_BAND_HIGH_MAX => StressLevel::High,
            _ => StressLevel::Severe,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            StressLevel::None => "None",
            StressLevel::Low => "Low",
            StressLevel::Moderate => "Moderate",
            StressLevel::High => "High",
            StressLevel::Severe => "Severe",
        }
    }

    /// High and severe zones get the pulse highlight.
    pub fn is_elevated(self) -> bool {
        matches!(self, StressLevel::High | StressLevel::Severe)
    }
}

// ---------------------------------------------------------------------------
// FieldZone
// ---------------------------------------------------------------------------

/// One schematic field sub-area with its simulated telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FieldZone {
    pub code: String,
    pub name: String,
    /// Centroid, display only.
    pub lat: f64,
    pub lon: f64,
    /// Area in hectares.
    #[serde(rename = "area")]
    pub area_ha: f32,
    pub crop: String,
    pub stress_level: StressLevel,
    /// 0..=100, consistent with `stress_level`.
    pub stress_score: u8,
    /// Canopy water content, percent.
    pub water_content: f32,
    pub nitrogen_index: f32,
    pub ndvi: f32,
    pub ndwi: f32,
    /// Land-surface temperature, deg C.
    pub lst: f32,
    /// Days since pre-visual detection; `None` if never alerted.
    #[serde(default)]
    pub alert_age: Option<u32>,
}

impl FieldZone {
    /// Whether `stress_level` matches the banding of `stress_score`.
    pub fn band_is_consistent(&self) -> bool {
        StressLevel::from_score(self.stress_score) == self.stress_level
    }

    /// Stress score as a 0..1 fraction.
    pub fn stress_fraction(&self) -> f32 {
        f32::from(self.stress_score) / 100.0
    }

    /// True when stress was flagged before it became visible in true color.
    pub fn has_pre_visual_alert(&self) -> bool {
        self.alert_age.is_some()
    }
}

/// Zone with the highest stress score; first in order on ties.
pub fn most_stressed(zones: &[FieldZone]) -> Option<&FieldZone> {
    zones
        .iter()
        .reduce(|best, z| if z.stress_score > best.stress_score { z } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(StressLevel::from_score(0), StressLevel::None);
        assert_eq!(StressLevel::from_score(15), StressLevel::None);
        assert_eq!(StressLevel::from_score(16), StressLevel::Low);
        assert_eq!(StressLevel::from_score(35), StressLevel::Low);
        assert_eq!(StressLevel::from_score(36), StressLevel::Moderate);
        assert_eq!(StressLevel::from_score(55), StressLevel::Moderate);
        assert_eq!(StressLevel::from_score(56), StressLevel::High);
        assert_eq!(StressLevel::from_score(75), StressLevel::High);
        assert_eq!(StressLevel::from_score(76), StressLevel::Severe);
        assert_eq!(StressLevel::from_score(100), StressLevel::Severe);
    }

    #[test]
    fn test_banding_is_monotonic() {
        let mut prev = StressLevel::None;
        for score in 0..=100u8 {
            let level = StressLevel::from_score(score);
            assert!(level >= prev, "level dropped at score {score}");
            prev = level;
        }
    }

    #[test]
    fn test_elevated_levels() {
        assert!(!StressLevel::Moderate.is_elevated());
        assert!(StressLevel::High.is_elevated());
        assert!(StressLevel::Severe.is_elevated());
    }

    #[test]
    fn test_level_deserializes_lowercase() {
        let level: StressLevel = serde_json::from_str("\"severe\"").expect("parse");
        assert_eq!(level, StressLevel::Severe);
    }
}
