//! Synthetic spectral signatures.
//!
//! A zone's curve is the healthy reference with the red-edge/NIR block
//! suppressed and the visible green/red bands slightly raised, both scaled
//! by the zone's stress score. Red-edge suppression shows up well before
//! the visible bands move much.

pub mod chart;
pub mod indices;

use field::FieldZone;

pub use chart::render_chart;
pub use indices::SpectralIndices;

pub const BAND_COUNT: usize = 12;

/// Sentinel-2 band names, in curve order.
pub const BAND_NAMES: [&str; BAND_COUNT] = [
    "B1", "B2", "B3", "B4", "B5", "B6", "B7", "B8", "B8A", "B9", "B11", "B12",
];

/// Central wavelength of each band, in nanometres.
pub const BAND_WAVELENGTHS_NM: [u16; BAND_COUNT] = [
    443, 490, 560, 665, 705, 740, 783, 842, 865, 945, 1610, 2190,
];

/// Reflectance of dense, healthy canopy per band.
pub const HEALTHY_REFERENCE: [f32; BAND_COUNT] = [
    0.03, 0.045, 0.09, 0.05, 0.30, 0.42, 0.47, 0.49, 0.50, 0.27, 0.22, 0.12,
];

/// Red-edge and NIR bands (B5..B8A), suppressed under stress.
pub const RED_EDGE_NIR: std::ops::RangeInclusive<usize> = 4..=8;

/// Visible green and red bands (B3, B4), raised under stress.
pub const VISIBLE_GREEN_RED: [usize; 2] = [2, 3];

/// Score divisor for the damping factor; keeps it above zero at score 100.
const DAMPING_DIVISOR: f32 = 130.0;

/// How strongly the visible bands rise as damping increases.
const VISIBLE_GAIN: f32 = 0.4;

pub type Signature = [f32; BAND_COUNT];

/// Damping factor for `score`, in `(0, 1]`.
pub fn damping(score: u8) -> f32 {
    1.0 - f32::from(score) / DAMPING_DIVISOR
}

/// Signature for a zone with the given stress score.
pub fn synthesize_score(score: u8) -> Signature {
    let f = damping(score);
    let mut curve = HEALTHY_REFERENCE;
    for band in RED_EDGE_NIR {
        curve[band] *= f;
    }
    for band in VISIBLE_GREEN_RED {
        curve[band] *= 1.0 + (1.0 - f) * VISIBLE_GAIN;
    }
    curve
}

pub fn synthesize(zone: &FieldZone) -> Signature {
    synthesize_score(zone.stress_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use field::ZoneDataset;

    #[test]
    fn test_reference_peaks_in_red_edge_nir_block() {
        let block_min = RED_EDGE_NIR
            .map(|b| HEALTHY_REFERENCE[b])
            .fold(f32::INFINITY, f32::min);
        for (band, value) in HEALTHY_REFERENCE.iter().enumerate() {
            if !RED_EDGE_NIR.contains(&band) {
                assert!(*value < block_min, "band {band} rivals the NIR block");
            }
        }
    }

    #[test]
    fn test_zero_stress_is_reference() {
        assert_eq!(synthesize_score(0), HEALTHY_REFERENCE);
    }

    #[test]
    fn test_severe_zone_shape() {
        let dataset = ZoneDataset::embedded().expect("valid");
        let z1 = dataset.get("Z1").expect("Z1");
        assert_eq!(z1.stress_score, 87);
        let curve = synthesize(z1);

        for band in RED_EDGE_NIR {
            assert!(curve[band] < HEALTHY_REFERENCE[band], "band {band}");
        }
        for band in VISIBLE_GREEN_RED {
            assert!(curve[band] > HEALTHY_REFERENCE[band], "band {band}");
        }
        for band in [0, 1, 9, 10, 11] {
            assert_eq!(curve[band], HEALTHY_REFERENCE[band]);
        }
    }

    #[test]
    fn test_damping_bounds() {
        assert_eq!(damping(0), 1.0);
        let max = damping(100);
        assert!(max > 0.0 && max < 1.0);
    }

    #[test]
    fn test_more_stress_lowers_nir() {
        let mild = synthesize_score(20);
        let severe = synthesize_score(90);
        assert!(severe[7] < mild[7]);
        assert!(severe[3] > mild[3]);
    }
}
