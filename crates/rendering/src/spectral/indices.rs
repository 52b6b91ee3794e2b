//! Vegetation indices computed from a signature.

use super::Signature;

const RED: usize = 3;
const RED_EDGE: usize = 4;
const NIR: usize = 7;
const SWIR: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralIndices {
    /// `(NIR - Red) / (NIR + Red)`
    pub ndvi: f32,
    /// `(NIR - RedEdge) / (NIR + RedEdge)`
    pub ndre: f32,
    /// Moisture stress index, `SWIR / NIR`. Higher is drier.
    pub msi: f32,
}

impl SpectralIndices {
    pub fn from_signature(curve: &Signature) -> Self {
        let (red, red_edge, nir, swir) = (curve[RED], curve[RED_EDGE], curve[NIR], curve[SWIR]);
        Self {
            ndvi: safe_div(nir - red, nir + red),
            ndre: safe_div(nir - red_edge, nir + red_edge),
            msi: safe_div(swir, nir),
        }
    }
}

/// `num / den`, or zero when `den` is effectively zero.
fn safe_div(num: f32, den: f32) -> f32 {
    if den.abs() < 1e-9 {
        0.0
    } else {
        num / den
    }
}
