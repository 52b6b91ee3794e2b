//! Canonical stress-level colors.
//!
//! Shared by the fused-stress layer, the high/severe pulse highlight, the
//! legend panel and the spectral chart legend, so every surface agrees on
//! what "severe" looks like.

use bevy::color::Srgba;

use crate::zone::StressLevel;

/// Fixed mapping from stress level to display color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressPalette {
    pub none: Srgba,
    pub low: Srgba,
    pub moderate: Srgba,
    pub high: Srgba,
    pub severe: Srgba,
}

impl Default for StressPalette {
    fn default() -> Self {
        Self {
            none: Srgba::rgb(0.133, 0.773, 0.369),     // green
            low: Srgba::rgb(0.518, 0.800, 0.086),      // lime
            moderate: Srgba::rgb(0.918, 0.702, 0.031), // amber
            high: Srgba::rgb(0.976, 0.451, 0.086),     // orange
            severe: Srgba::rgb(0.937, 0.267, 0.267),   // red
        }
    }
}

impl StressPalette {
    /// Color for a stress level.
    pub fn color(&self, level: StressLevel) -> Srgba {
        match level {
            StressLevel::None => self.none,
            StressLevel::Low => self.low,
            StressLevel::Moderate => self.moderate,
            StressLevel::High => self.high,
            StressLevel::Severe => self.severe,
        }
    }

    /// Legend entries in ascending severity.
    pub fn entries(&self) -> [(StressLevel, Srgba); 5] {
        StressLevel::ALL.map(|level| (level, self.color(level)))
    }
}
