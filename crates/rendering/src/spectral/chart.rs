//! Spectral-signature chart: healthy reference vs. a zone's stressed curve.

use bevy::color::Srgba;
use bevy::math::{Rect, Vec2};

use field::{FieldZone, StressPalette};

use super::{
    synthesize, Signature, BAND_COUNT, BAND_WAVELENGTHS_NM, HEALTHY_REFERENCE, RED_EDGE_NIR,
};
use crate::surface::{with_alpha, Paint, Stroke, Surface, TextAlign, TextStyle};

/// Top of the reflectance axis.
pub const REFLECTANCE_MAX: f32 = 0.55;

pub const CHART_BACKGROUND: Srgba = Srgba::rgb(0.055, 0.07, 0.09);
pub const REFERENCE_COLOR: Srgba = Srgba::rgb(0.20, 0.83, 0.45);
pub const RED_EDGE_LABEL: &str = "Red edge / NIR";
pub const REFERENCE_LABEL: &str = "Healthy reference";

const AXIS_COLOR: Srgba = Srgba::new(1.0, 1.0, 1.0, 0.35);
const TICK_TEXT: Srgba = Srgba::new(0.75, 0.8, 0.85, 0.9);
const BAND_SHADE: Srgba = Srgba::new(0.94, 0.27, 0.27, 0.09);

const MARGIN_LEFT: f32 = 52.0;
const MARGIN_RIGHT: f32 = 18.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 42.0;

/// Maps band index / reflectance to surface pixels.
struct ChartFrame {
    plot: Rect,
}

impl ChartFrame {
    fn new(size: Vec2) -> Self {
        Self {
            plot: Rect::new(
                MARGIN_LEFT,
                MARGIN_TOP,
                (size.x - MARGIN_RIGHT).max(MARGIN_LEFT + 1.0),
                (size.y - MARGIN_BOTTOM).max(MARGIN_TOP + 1.0),
            ),
        }
    }

    fn step(&self) -> f32 {
        self.plot.width() / (BAND_COUNT - 1) as f32
    }

    fn x(&self, band: usize) -> f32 {
        self.plot.min.x + band as f32 * self.step()
    }

    fn y(&self, reflectance: f32) -> f32 {
        let t = (reflectance / REFLECTANCE_MAX).clamp(0.0, 1.0);
        self.plot.max.y - t * self.plot.height()
    }

    fn point(&self, band: usize, reflectance: f32) -> Vec2 {
        Vec2::new(self.x(band), self.y(reflectance))
    }

    fn line(&self, curve: &Signature) -> Vec<Vec2> {
        curve
            .iter()
            .enumerate()
            .map(|(band, value)| self.point(band, *value))
            .collect()
    }

    /// Curve closed down to the x axis.
    fn area(&self, curve: &Signature) -> Vec<Vec2> {
        let mut points = self.line(curve);
        points.push(Vec2::new(self.x(BAND_COUNT - 1), self.plot.max.y));
        points.push(Vec2::new(self.x(0), self.plot.max.y));
        points
    }
}

/// Draw the full chart for `zone` onto `surface`, replacing its contents.
pub fn render_chart(surface: &mut dyn Surface, zone: &FieldZone, palette: &StressPalette) {
    let frame = ChartFrame::new(surface.size());
    let stressed = synthesize(zone);
    let zone_color = palette.color(zone.stress_level);

    surface.clear(CHART_BACKGROUND);
    draw_red_edge_band(surface, &frame);
    draw_axes(surface, &frame);

    surface.fill_polygon(
        &frame.area(&HEALTHY_REFERENCE),
        &Paint::Solid(with_alpha(REFERENCE_COLOR, 0.14)),
    );
    surface.stroke_polyline(
        &frame.line(&HEALTHY_REFERENCE),
        &Stroke::solid(REFERENCE_COLOR, 2.0),
    );

    // Stressed curve goes second so it layers over the reference.
    surface.fill_polygon(
        &frame.area(&stressed),
        &Paint::Solid(with_alpha(zone_color, 0.16)),
    );
    surface.stroke_polyline(
        &frame.line(&stressed),
        &Stroke::dashed(zone_color, 2.0, 6.0, 4.0),
    );

    draw_nir_drop(surface, &frame, &stressed, zone_color);
    draw_legend(surface, &frame, zone, zone_color);
}

fn draw_red_edge_band(surface: &mut dyn Surface, frame: &ChartFrame) {
    let half = frame.step() * 0.5;
    let left = frame.x(*RED_EDGE_NIR.start()) - half;
    let right = frame.x(*RED_EDGE_NIR.end()) + half;
    surface.fill_rect(
        Rect::new(left, frame.plot.min.y, right, frame.plot.max.y),
        &Paint::Solid(BAND_SHADE),
    );
    surface.fill_text(
        RED_EDGE_LABEL,
        Vec2::new((left + right) * 0.5, frame.plot.min.y + 10.0),
        &TextStyle::new(with_alpha(BAND_SHADE, 0.9), 11.0).align(TextAlign::Center),
    );
}

fn draw_axes(surface: &mut dyn Surface, frame: &ChartFrame) {
    let plot = frame.plot;
    let axis = Stroke::solid(AXIS_COLOR, 1.0);
    let gridline = Stroke::solid(with_alpha(AXIS_COLOR, 0.08), 1.0);
    surface.stroke_polyline(
        &[
            Vec2::new(plot.min.x, plot.min.y),
            Vec2::new(plot.min.x, plot.max.y),
            Vec2::new(plot.max.x, plot.max.y),
        ],
        &axis,
    );

    // Reflectance ticks every 0.1
    let tick_style = TextStyle::new(TICK_TEXT, 10.0)
        .align(TextAlign::Right)
        .monospace();
    for step in 0..=5 {
        let value = step as f32 * 0.1;
        let y = frame.y(value);
        if step > 0 {
            surface.stroke_line(
                Vec2::new(plot.min.x, y),
                Vec2::new(plot.max.x, y),
                &gridline,
            );
        }
        surface.fill_text(
            &format!("{value:.1}"),
            Vec2::new(plot.min.x - 8.0, y),
            &tick_style,
        );
    }

    let band_style = TextStyle::new(TICK_TEXT, 9.0)
        .align(TextAlign::Center)
        .monospace();
    for (band, nm) in BAND_WAVELENGTHS_NM.iter().enumerate() {
        surface.fill_text(
            &nm.to_string(),
            Vec2::new(frame.x(band), plot.max.y + 12.0),
            &band_style,
        );
    }
    surface.fill_text(
        "Wavelength (nm)",
        Vec2::new(plot.center().x, plot.max.y + 30.0),
        &TextStyle::new(TICK_TEXT, 10.0).align(TextAlign::Center),
    );
}

/// Callout at the NIR peak showing how far the zone dropped.
fn draw_nir_drop(
    surface: &mut dyn Surface,
    frame: &ChartFrame,
    stressed: &Signature,
    color: Srgba,
) {
    let nir = *RED_EDGE_NIR.end() - 1;
    let reference = HEALTHY_REFERENCE[nir];
    if reference <= 0.0 {
        return;
    }
    let drop = (1.0 - stressed[nir] / reference) * 100.0;
    if drop < 0.5 {
        return;
    }
    let at = frame.point(nir, stressed[nir]);
    surface.stroke_line(
        frame.point(nir, reference),
        at,
        &Stroke::dashed(with_alpha(color, 0.7), 1.0, 3.0, 3.0),
    );
    surface.fill_text(
        &format!("NIR -{drop:.0}%"),
        at + Vec2::new(8.0, 12.0),
        &TextStyle::new(color, 11.0),
    );
}

fn draw_legend(
    surface: &mut dyn Surface,
    frame: &ChartFrame,
    zone: &FieldZone,
    zone_color: Srgba,
) {
    let right = frame.plot.max.x - 8.0;
    let top = frame.plot.min.y + 30.0;
    let swatch = 18.0;
    let entries = [
        (REFERENCE_LABEL.to_string(), Stroke::solid(REFERENCE_COLOR, 2.0)),
        (
            format!("{} ({})", zone.name, zone.stress_level.label()),
            Stroke::dashed(zone_color, 2.0, 6.0, 4.0),
        ),
    ];
    for (row, (label, stroke)) in entries.iter().enumerate() {
        let y = top + row as f32 * 16.0;
        let start = Vec2::new(right - 170.0, y);
        surface.stroke_line(start, start + Vec2::X * swatch, stroke);
        surface.fill_text(
            label,
            start + Vec2::X * (swatch + 6.0),
            &TextStyle::new(TICK_TEXT, 11.0),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawOp, Raster, RecordingSurface};
    use field::ZoneDataset;

    fn zone(code: &str) -> FieldZone {
        ZoneDataset::embedded()
            .expect("valid")
            .get(code)
            .expect("zone")
            .clone()
    }

    fn curve_strokes(surface: &RecordingSurface) -> Vec<(usize, &Stroke)> {
        surface
            .ops()
            .iter()
            .enumerate()
            .filter_map(|(i, op)| match op {
                DrawOp::StrokePolyline { points, stroke } if points.len() == BAND_COUNT => {
                    Some((i, stroke))
                }
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_stressed_curve_dashed_and_drawn_after_reference() {
        let mut surface = RecordingSurface::new(640, 320);
        render_chart(&mut surface, &zone("Z1"), &StressPalette::default());
        let strokes = curve_strokes(&surface);
        assert_eq!(strokes.len(), 2);
        let (ref_idx, reference) = strokes[0];
        let (stress_idx, stressed) = strokes[1];
        assert!(ref_idx < stress_idx);
        assert!(reference.dash.is_none());
        assert!(stressed.dash.is_some());
    }

    #[test]
    fn test_stressed_curve_below_reference_at_band_six() {
        let mut surface = RecordingSurface::new(640, 320);
        render_chart(&mut surface, &zone("Z1"), &StressPalette::default());
        let lines: Vec<&Vec<Vec2>> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::StrokePolyline { points, .. } if points.len() == BAND_COUNT => Some(points),
                _ => None,
            })
            .collect();
        // Surface y grows downward: lower reflectance means larger y.
        assert!(lines[1][5].y > lines[0][5].y);
    }

    #[test]
    fn test_labels_ticks_and_legend() {
        let z1 = zone("Z1");
        let mut surface = RecordingSurface::new(640, 320);
        render_chart(&mut surface, &z1, &StressPalette::default());
        let texts = surface.texts();
        assert!(texts.contains(&RED_EDGE_LABEL));
        assert!(texts.contains(&REFERENCE_LABEL));
        assert!(texts.contains(&"North Ridge Block (Severe)"));
        for nm in ["443", "740", "2190"] {
            assert!(texts.contains(&nm), "missing tick {nm}");
        }
        for tick in ["0.0", "0.3", "0.5"] {
            assert!(texts.contains(&tick), "missing tick {tick}");
        }
        assert!(texts.iter().any(|t| t.starts_with("NIR -")));
    }

    #[test]
    fn test_healthy_zone_has_no_drop_callout() {
        let mut healthy = zone("Z3");
        healthy.stress_score = 0;
        let mut surface = RecordingSurface::new(640, 320);
        render_chart(&mut surface, &healthy, &StressPalette::default());
        assert!(!surface.texts().iter().any(|t| t.starts_with("NIR -")));
    }

    #[test]
    fn test_renders_into_raster() {
        let mut raster = Raster::new(640, 320);
        render_chart(&mut raster, &zone("Z4"), &StressPalette::default());
        assert!(!raster.text_runs().is_empty());
        let corner = raster.pixel(0, 0).expect("in bounds");
        let inside = raster.pixel(320, 250).expect("in bounds");
        assert_ne!(corner, inside, "curve areas should tint the plot");
    }
}
