//! Continuous color ramps for the analysis layers.
//!
//! Ramps are defined in sRGB space as evenly spaced control points and
//! interpolated linearly for intermediate values.

use bevy::color::Srgba;

use crate::surface::mix;

// ---------------------------------------------------------------------------
// ColorRamp
// ---------------------------------------------------------------------------

/// A continuous color ramp defined by evenly-spaced sRGB control points.
pub struct ColorRamp {
    /// Control points, evenly spaced from t=0..1.
    points: &'static [Srgba],
}

impl ColorRamp {
    /// Sample the ramp at parameter `t` (clamped to `[0, 1]`).
    pub fn sample(&self, t: f32) -> Srgba {
        let Some((&first, rest)) = self.points.split_first() else {
            return Srgba::BLACK;
        };
        if rest.is_empty() {
            return first;
        }
        let span = t.clamp(0.0, 1.0) * rest.len() as f32;
        let i = (span as usize).min(rest.len() - 1);
        mix(self.points[i], rest[i], span - i as f32)
    }
}

// ---------------------------------------------------------------------------
// Thermal: cold blue -> green midpoint -> hot red
// ---------------------------------------------------------------------------
pub static THERMAL: ColorRamp = ColorRamp {
    points: &[
        Srgba::rgb(0.15, 0.30, 0.90), // 0   - cool (blue)
        Srgba::rgb(0.10, 0.60, 0.85),
        Srgba::rgb(0.20, 0.78, 0.45), // 0.4 - mild (green)
        Srgba::rgb(0.75, 0.82, 0.20),
        Srgba::rgb(0.96, 0.55, 0.12),
        Srgba::rgb(0.92, 0.18, 0.12), // 1   - hot (red)
    ],
};

// ---------------------------------------------------------------------------
// NDVI: bare / senescent red -> dense canopy green
// ---------------------------------------------------------------------------
pub static NDVI: ColorRamp = ColorRamp {
    points: &[
        Srgba::rgb(0.84, 0.16, 0.14), // 0 - low vigor (red)
        Srgba::rgb(0.13, 0.78, 0.30), // 1 - high vigor (green)
    ],
};

// ---------------------------------------------------------------------------
// Red-edge nitrogen: deficient purple -> well supplied yellow
// ---------------------------------------------------------------------------
pub static RED_EDGE: ColorRamp = ColorRamp {
    points: &[
        Srgba::rgb(0.42, 0.18, 0.66), // 0 - deficient (purple)
        Srgba::rgb(0.70, 0.42, 0.48),
        Srgba::rgb(0.98, 0.86, 0.20), // 1 - sufficient (yellow)
    ],
};

// ---------------------------------------------------------------------------
// True color: saturated canopy green -> dry yellow-brown
// ---------------------------------------------------------------------------
pub static TRUE_COLOR: ColorRamp = ColorRamp {
    points: &[
        Srgba::rgb(0.18, 0.52, 0.20), // 0 - healthy canopy
        Srgba::rgb(0.48, 0.55, 0.22),
        Srgba::rgb(0.66, 0.54, 0.26), // 1 - dry, yellow-brown
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_endpoints() {
        let lo = THERMAL.sample(0.0);
        let hi = THERMAL.sample(1.0);
        assert!(lo.blue > lo.red, "cold end should be blue");
        assert!(hi.red > hi.blue, "hot end should be red");
    }

    #[test]
    fn test_sample_clamps() {
        assert_eq!(NDVI.sample(-1.0), NDVI.sample(0.0));
        assert_eq!(NDVI.sample(2.0), NDVI.sample(1.0));
    }

    #[test]
    fn test_thermal_midpoint_leans_green() {
        let mid = THERMAL.sample(0.4);
        assert!(mid.green > mid.red && mid.green > mid.blue);
    }

    #[test]
    fn test_ramps_are_opaque() {
        for ramp in [&THERMAL, &NDVI, &RED_EDGE, &TRUE_COLOR] {
            for i in 0..=10 {
                assert_eq!(ramp.sample(i as f32 / 10.0).alpha, 1.0);
            }
        }
    }
}
