//! Compile-time configuration shared by the field data and its renderers.

/// Upper bound (inclusive) of each stress band, ordered none..severe.
/// Scores above the last high bound fall into `Severe`.
pub const STRESS_BAND_NONE_MAX: u8 = 15;
pub const STRESS_BAND_LOW_MAX: u8 = 35;
pub const STRESS_BAND_MODERATE_MAX: u8 = 55;
pub const STRESS_BAND_HIGH_MAX: u8 = 75;

/// Maximum valid stress score.
pub const STRESS_SCORE_MAX: u8 = 100;

/// Land-surface temperature range (deg C) mapped onto the thermal ramp.
pub const THERMAL_MIN_C: f32 = 28.0;
pub const THERMAL_MAX_C: f32 = 44.0;

/// Logical canvas the zone footprints are laid out in. Surfaces of any size
/// are scaled from this space.
pub const LAYOUT_WIDTH: f32 = 800.0;
pub const LAYOUT_HEIGHT: f32 = 500.0;

/// Spacing of the viewer grid overlay, in layout units.
pub const GRID_PITCH: f32 = 50.0;

/// Scan-line sweep speed in layout units per second.
pub const SCAN_SPEED: f32 = 140.0;

/// Extra travel below the bottom edge before the scan line wraps.
pub const SCAN_MARGIN: f32 = 40.0;

/// Alert thresholds (stress percent) used by field analytics.
pub const ALERT_MONITOR_MIN: f32 = 30.0;
pub const ALERT_CRITICAL_ABOVE: f32 = 60.0;

/// Stress forecast horizon in days.
pub const FORECAST_DAYS: u8 = 7;
/// Mean daily stress change of the forecast walk, in percentage points.
pub const FORECAST_DRIFT: f32 = 0.8;
/// Standard deviation of the daily change.
pub const FORECAST_SPREAD: f32 = 3.5;

/// Environment variable that pins the speckle-noise seed.
pub const SEED_ENV_VAR: &str = "FIELD_VIEWER_SEED";
