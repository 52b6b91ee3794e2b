//! Viewfinder decoration drawn over the composited field: grid, scan-line
//! sweep, corner brackets, crosshair and HUD text.
//!
//! Everything time-dependent takes the instant as a parameter.

use std::f32::consts::TAU;

use bevy::color::Srgba;
use bevy::math::{Rect, Vec2};
use chrono::{DateTime, Utc};

use field::config::{GRID_PITCH, SCAN_MARGIN, SCAN_SPEED};

use crate::layout::layout_scale;
use crate::surface::{with_alpha, Paint, Stroke, Surface, TextAlign, TextStyle};

pub const BACKGROUND: Srgba = Srgba::rgb(0.035, 0.05, 0.07);

/// Fixed scene centroid shown bottom-left.
pub const COORDINATES: &str = "36.7395° N, 119.7806° W";
pub const SENSOR: &str = "SENTINEL-2 L2A";

const GRID_COLOR: Srgba = Srgba::new(1.0, 1.0, 1.0, 0.07);
const FRAME_COLOR: Srgba = Srgba::new(1.0, 1.0, 1.0, 0.75);
const HUD_TEXT: Srgba = Srgba::new(0.85, 0.92, 0.95, 0.9);

/// Half-height of the scan-line glow band.
const SCAN_BAND: f32 = 18.0;
const BRACKET_INSET: f32 = 14.0;
const BRACKET_ARM: f32 = 30.0;
const CROSSHAIR_ARM: f32 = 22.0;
const CROSSHAIR_GAP: f32 = 6.0;

/// Period of the pulse-glow breathing, in seconds.
const PULSE_PERIOD: f32 = 1.6;
const PULSE_MIN: f32 = 0.3;

fn seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

/// Vertical position of the scan line at `now` on a surface `height` tall.
///
/// Sweeps top to bottom at a fixed speed in pixels per second and wraps
/// with a margin so the band fully leaves the view before restarting.
pub fn scan_line_y(now: DateTime<Utc>, height: f32) -> f32 {
    let period = f64::from(height + SCAN_MARGIN);
    let travelled = (seconds(now) * f64::from(SCAN_SPEED)).rem_euclid(period);
    travelled as f32 - SCAN_MARGIN * 0.5
}

/// Pulse glow multiplier at `now`, oscillating in `[0.3, 1.0]`.
pub fn pulse_intensity(now: DateTime<Utc>) -> f32 {
    let phase = seconds(now).rem_euclid(f64::from(PULSE_PERIOD)) as f32 / PULSE_PERIOD;
    (0.65 + 0.35 * (phase * TAU).sin()).clamp(PULSE_MIN, 1.0)
}

/// HUD text for the bottom-right corner.
pub fn sensor_label(now: DateTime<Utc>) -> String {
    format!("{SENSOR} · {}", now.format("%Y-%m-%d"))
}

pub fn draw_grid(surface: &mut dyn Surface) {
    let size = surface.size();
    let scale = layout_scale(size);
    let stroke = Stroke::solid(GRID_COLOR, 1.0);

    let step_x = GRID_PITCH * scale.x;
    let step_y = GRID_PITCH * scale.y;
    if step_x <= 0.0 || step_y <= 0.0 {
        return;
    }
    let mut x = step_x;
    while x < size.x {
        surface.stroke_line(Vec2::new(x, 0.0), Vec2::new(x, size.y), &stroke);
        x += step_x;
    }
    let mut y = step_y;
    while y < size.y {
        surface.stroke_line(Vec2::new(0.0, y), Vec2::new(size.x, y), &stroke);
        y += step_y;
    }
}

pub fn draw_scan_line(surface: &mut dyn Surface, y: f32, accent: Srgba) {
    let width = surface.size().x;
    let clear = with_alpha(accent, 0.0);
    let glow = with_alpha(accent, 0.22);

    surface.fill_rect(
        Rect::new(0.0, y - SCAN_BAND, width, y),
        &Paint::Linear {
            from: Vec2::new(0.0, y - SCAN_BAND),
            to: Vec2::new(0.0, y),
            start: clear,
            end: glow,
        },
    );
    surface.fill_rect(
        Rect::new(0.0, y, width, y + SCAN_BAND),
        &Paint::Linear {
            from: Vec2::new(0.0, y),
            to: Vec2::new(0.0, y + SCAN_BAND),
            start: glow,
            end: clear,
        },
    );
    surface.stroke_line(
        Vec2::new(0.0, y),
        Vec2::new(width, y),
        &Stroke::solid(with_alpha(accent, 0.85), 2.0),
    );
}

/// Four L-shaped viewfinder brackets, one per corner.
pub fn draw_corner_brackets(surface: &mut dyn Surface) {
    let size = surface.size();
    let stroke = Stroke::solid(FRAME_COLOR, 2.0);
    let (l, t) = (BRACKET_INSET, BRACKET_INSET);
    let (r, b) = (size.x - BRACKET_INSET, size.y - BRACKET_INSET);
    let a = BRACKET_ARM;

    for corner in [
        [Vec2::new(l, t + a), Vec2::new(l, t), Vec2::new(l + a, t)],
        [Vec2::new(r - a, t), Vec2::new(r, t), Vec2::new(r, t + a)],
        [Vec2::new(r, b - a), Vec2::new(r, b), Vec2::new(r - a, b)],
        [Vec2::new(l + a, b), Vec2::new(l, b), Vec2::new(l, b - a)],
    ] {
        surface.stroke_polyline(&corner, &stroke);
    }
}

pub fn draw_crosshair(surface: &mut dyn Surface) {
    let c = surface.size() * 0.5;
    let stroke = Stroke::dashed(FRAME_COLOR, 1.0, 4.0, 3.0);
    let (near, far) = (CROSSHAIR_GAP, CROSSHAIR_GAP + CROSSHAIR_ARM);

    surface.stroke_line(c - Vec2::X * far, c - Vec2::X * near, &stroke);
    surface.stroke_line(c + Vec2::X * near, c + Vec2::X * far, &stroke);
    surface.stroke_line(c - Vec2::Y * far, c - Vec2::Y * near, &stroke);
    surface.stroke_line(c + Vec2::Y * near, c + Vec2::Y * far, &stroke);
}

pub fn draw_labels(surface: &mut dyn Surface, now: DateTime<Utc>) {
    let size = surface.size();
    let y = size.y - 24.0;
    surface.fill_text(
        COORDINATES,
        Vec2::new(BRACKET_INSET + 10.0, y),
        &TextStyle::new(HUD_TEXT, 12.0).monospace(),
    );
    surface.fill_text(
        &sensor_label(now),
        Vec2::new(size.x - BRACKET_INSET - 10.0, y),
        &TextStyle::new(HUD_TEXT, 12.0)
            .monospace()
            .align(TextAlign::Right),
    );
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::surface::{DrawOp, RecordingSurface};

    fn at(secs: i64, millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(secs * 1_000 + millis)
            .single()
            .expect("valid instant")
    }

    #[test]
    fn test_scan_line_is_time_driven() {
        let t0 = at(1_760_000_000, 0);
        let t1 = at(1_760_000_000, 500);
        let y0 = scan_line_y(t0, 500.0);
        let y1 = scan_line_y(t1, 500.0);
        let moved = (y1 - y0).rem_euclid(500.0 + SCAN_MARGIN);
        assert!((moved - SCAN_SPEED * 0.5).abs() < 0.01, "moved {moved}");
    }

    #[test]
    fn test_scan_line_stays_within_wrap_range() {
        for ms in (0..20_000).step_by(137) {
            let y = scan_line_y(at(1_700_000_000, ms), 500.0);
            assert!(y >= -SCAN_MARGIN * 0.5 && y < 500.0 + SCAN_MARGIN * 0.5);
        }
    }

    #[test]
    fn test_pulse_intensity_range() {
        let mut lo = f32::MAX;
        let mut hi = f32::MIN;
        for ms in 0..1600 {
            let p = pulse_intensity(at(1_700_000_000, ms));
            assert!((PULSE_MIN..=1.0).contains(&p), "{p} at {ms}ms");
            lo = lo.min(p);
            hi = hi.max(p);
        }
        // A full period reaches both ends.
        assert!(lo < 0.31 && hi > 0.99, "lo={lo} hi={hi}");
    }

    #[test]
    fn test_sensor_label_uses_given_date() {
        let now = Utc
            .with_ymd_and_hms(2025, 7, 14, 10, 30, 0)
            .single()
            .expect("valid");
        assert_eq!(sensor_label(now), "SENTINEL-2 L2A · 2025-07-14");
    }

    #[test]
    fn test_grid_pitch_scales_with_surface() {
        let mut surface = RecordingSurface::new(800, 500);
        draw_grid(&mut surface);
        // 15 interior verticals + 9 horizontals at a 50px pitch.
        assert_eq!(surface.ops().len(), 15 + 9);

        let mut half = RecordingSurface::new(400, 250);
        draw_grid(&mut half);
        assert_eq!(half.ops().len(), 15 + 9);
    }

    #[test]
    fn test_brackets_and_crosshair_are_static() {
        let mut a = RecordingSurface::new(800, 500);
        draw_corner_brackets(&mut a);
        draw_crosshair(&mut a);
        assert_eq!(a.ops().len(), 4 + 4);
        assert!(a.ops()[4..].iter().all(|op| matches!(
            op,
            DrawOp::StrokePolyline { stroke, .. } if stroke.dash.is_some()
        )));
    }
}
