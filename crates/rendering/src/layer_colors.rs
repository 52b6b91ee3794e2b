//! Per-layer color mapping for field zones.
//!
//! Each analysis layer maps a zone record to a fill color and, for some
//! layers, a one-line annotation. The functions are pure: the palette is
//! passed in, nothing is read from global state.

use bevy::color::Srgba;

use field::config::{THERMAL_MAX_C, THERMAL_MIN_C};
use field::{AnalysisLayer, FieldZone, StressPalette};

use crate::color_ramps::{NDVI, RED_EDGE, THERMAL, TRUE_COLOR};
use crate::error::RenderError;

/// Fill color and optional annotation for one zone under one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerColor {
    pub fill: Srgba,
    pub annotation: Option<String>,
}

/// Map `zone` to its color under `layer`.
pub fn color_for(layer: AnalysisLayer, zone: &FieldZone, palette: &StressPalette) -> LayerColor {
    match layer {
        AnalysisLayer::TrueColor => LayerColor {
            fill: TRUE_COLOR.sample(visible_stress(zone.stress_score)),
            annotation: None,
        },
        AnalysisLayer::Ndvi => LayerColor {
            fill: NDVI.sample(zone.ndvi),
            annotation: Some(format!("NDVI {:.2}", zone.ndvi)),
        },
        AnalysisLayer::Thermal => LayerColor {
            fill: THERMAL.sample(thermal_fraction(zone.lst)),
            annotation: Some(format!("{:.1}°C", zone.lst)),
        },
        AnalysisLayer::Hyperspectral => LayerColor {
            fill: hyperspectral_false_color(zone.stress_fraction()),
            annotation: None,
        },
        AnalysisLayer::StressFusion => LayerColor {
            fill: palette.color(zone.stress_level),
            annotation: Some(format!("{}% stress", zone.stress_score)),
        },
        AnalysisLayer::RedEdge => LayerColor {
            fill: RED_EDGE.sample(zone.nitrogen_index),
            annotation: Some(format!("N {:.2}", zone.nitrogen_index)),
        },
    }
}

/// Like [`color_for`], selecting the layer by its string id.
pub fn color_for_id(
    layer_id: &str,
    zone: &FieldZone,
    palette: &StressPalette,
) -> Result<LayerColor, RenderError> {
    let layer: AnalysisLayer = layer_id.parse()?;
    Ok(color_for(layer, zone, palette))
}

/// How much of the stress score shows up in an RGB composite.
///
/// Nearly flat through the low and moderate bands, then climbs steeply:
/// true color only reveals stress once it is advanced.
fn visible_stress(score: u8) -> f32 {
    let s = f32::from(score) / 100.0;
    let late = ((s - 0.55) / 0.45).clamp(0.0, 1.0);
    0.06 * s + 0.94 * late * late
}

fn thermal_fraction(lst: f32) -> f32 {
    ((lst - THERMAL_MIN_C) / (THERMAL_MAX_C - THERMAL_MIN_C)).clamp(0.0, 1.0)
}

/// False-color composite: red rises with stress, green and blue fall.
fn hyperspectral_false_color(stress: f32) -> Srgba {
    let s = stress.clamp(0.0, 1.0);
    Srgba::rgb(0.22 + 0.72 * s, 0.72 - 0.48 * s, 0.92 - 0.34 * s)
}
