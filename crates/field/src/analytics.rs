//! Field-level stress analytics: alert levels, advisories, the area-weighted
//! health distribution, NDVI anomalies and the short-range stress forecast
//! shown in the inspector.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::config::{
    ALERT_CRITICAL_ABOVE, ALERT_MONITOR_MIN, FORECAST_DAYS, FORECAST_DRIFT, FORECAST_SPREAD,
};
use crate::dataset::ZoneDataset;
use crate::zone::FieldZone;

// ---------------------------------------------------------------------------
// Alert level
// ---------------------------------------------------------------------------

/// Coarse alert derived from a stress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Safe,
    Monitor,
    Critical,
}

impl AlertLevel {
    /// `< 30` safe, `30..=60` monitor, `> 60` critical.
    pub fn from_percent(stress_pct: f32) -> Self {
        if stress_pct < ALERT_MONITOR_MIN {
            AlertLevel::Safe
        } else if stress_pct <= ALERT_CRITICAL_ABOVE {
            AlertLevel::Monitor
        } else {
            AlertLevel::Critical
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertLevel::Safe => "SAFE",
            AlertLevel::Monitor => "MONITOR",
            AlertLevel::Critical => "CRITICAL",
        }
    }
}

/// Field advisory for a stress percentage.
pub fn advisory(stress_pct: f32) -> String {
    match AlertLevel::from_percent(stress_pct) {
        AlertLevel::Safe => format!(
            "Field stress is LOW at {stress_pct:.1}%. Crop canopy appears healthy. \
             Maintain current irrigation and nutrient schedules."
        ),
        AlertLevel::Monitor => format!(
            "Field stress is MODERATE at {stress_pct:.1}%. Recommend soil moisture sampling \
             and targeted scouting within 48 hours. Consider supplementary irrigation if no \
             rainfall is forecast."
        ),
        AlertLevel::Critical => format!(
            "CRITICAL stress detected at {stress_pct:.1}%. Immediate field inspection required. \
             Check for drought, nutrient deficiency, or pest pressure. Apply corrective \
             intervention within 24 hours."
        ),
    }
}

// ---------------------------------------------------------------------------
// Distribution / summary
// ---------------------------------------------------------------------------

/// Percentage of field area in each health bucket, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StressDistribution {
    /// Stress below 30%.
    pub healthy: f32,
    /// Stress in 30%..60%.
    pub moderate: f32,
    /// Stress at or above 60%.
    pub critical: f32,
}

/// Area-weighted health distribution over the dataset.
pub fn distribution(dataset: &ZoneDataset) -> StressDistribution {
    let total = dataset.total_area_ha();
    if total <= 0.0 {
        return StressDistribution::default();
    }

    let (mut healthy, mut moderate, mut critical) = (0.0f32, 0.0f32, 0.0f32);
    for zone in dataset.iter() {
        let s = zone.stress_fraction();
        if s < 0.3 {
            healthy += zone.area_ha;
        } else if s < 0.6 {
            moderate += zone.area_ha;
        } else {
            critical += zone.area_ha;
        }
    }

    StressDistribution {
        healthy: round2(healthy / total * 100.0),
        moderate: round2(moderate / total * 100.0),
        critical: round2(critical / total * 100.0),
    }
}

/// Headline numbers for the whole field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSummary {
    pub zone_count: usize,
    pub total_area_ha: f32,
    /// Area-weighted mean stress score, 0..100.
    pub mean_stress: f32,
    pub alert: AlertLevel,
    /// Zones flagged before visible symptoms.
    pub pre_visual_alerts: usize,
}

pub fn summarize(dataset: &ZoneDataset) -> FieldSummary {
    let total = dataset.total_area_ha();
    let weighted: f32 = dataset
        .iter()
        .map(|z| f32::from(z.stress_score) * z.area_ha)
        .sum();
    let mean_stress = if total > 0.0 { weighted / total } else { 0.0 };

    FieldSummary {
        zone_count: dataset.len(),
        total_area_ha: total,
        mean_stress,
        alert: AlertLevel::from_percent(mean_stress),
        pre_visual_alerts: dataset.iter().filter(|z| z.has_pre_visual_alert()).count(),
    }
}

// ---------------------------------------------------------------------------
// NDVI anomaly
// ---------------------------------------------------------------------------

/// Absolute NDVI z-score of every zone against the whole field, in dataset
/// order. All zeros when the field NDVI has no spread.
pub fn ndvi_anomalies(dataset: &ZoneDataset) -> Vec<f32> {
    let n = dataset.len();
    if n == 0 {
        return Vec::new();
    }
    let mean = dataset.iter().map(|z| f64::from(z.ndvi)).sum::<f64>() / n as f64;
    let variance = dataset
        .iter()
        .map(|z| (f64::from(z.ndvi) - mean).powi(2))
        .sum::<f64>()
        / n as f64;
    let sigma = variance.sqrt();
    if sigma < 1e-9 {
        return vec![0.0; n];
    }
    dataset
        .iter()
        .map(|z| ((f64::from(z.ndvi) - mean) / sigma).abs() as f32)
        .collect()
}

// ---------------------------------------------------------------------------
// Forecast
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastDay {
    /// 1-based day offset from today.
    pub day: u8,
    /// Projected stress, 0..100, rounded to 1 decimal.
    pub stress: f32,
    pub alert: AlertLevel,
}

/// Random walk with a slight upward drift starting at `stress_pct`.
///
/// Same seed, same walk.
pub fn forecast(stress_pct: f32, seed: u64) -> Vec<ForecastDay> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut current = stress_pct.clamp(0.0, 100.0);
    (1..=FORECAST_DAYS)
        .map(|day| {
            let z: f32 = rng.sample(StandardNormal);
            current = (current + FORECAST_DRIFT + FORECAST_SPREAD * z).clamp(0.0, 100.0);
            let stress = (current * 10.0).round() / 10.0;
            ForecastDay {
                day,
                stress,
                alert: AlertLevel::from_percent(stress),
            }
        })
        .collect()
}

/// Forecast for one zone, seeded from its code so it is stable across runs.
pub fn zone_forecast(zone: &FieldZone) -> Vec<ForecastDay> {
    forecast(f32::from(zone.stress_score), zone_seed(&zone.code))
}

/// FNV-1a over the zone code.
fn zone_seed(code: &str) -> u64 {
    code.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, b| {
        (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    })
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}
