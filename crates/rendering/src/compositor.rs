//! Field-texture compositor: paints every zone footprint for one analysis
//! layer onto a surface.
//!
//! Per zone, in dataset order: flat fill at the requested opacity, speckle
//! noise so the fill does not read as synthetic, the radial pulse for
//! high/severe zones on pulsing layers, then the code label and annotation.
//! Labels come last so they always sit on top.

use bevy::color::Srgba;
use bevy::math::{Rect, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use field::{AnalysisLayer, FieldZone, StressPalette, VisualConfig, ZoneDataset};

use crate::error::RenderError;
use crate::layer_colors::color_for;
use crate::layout::{layout_scale, to_surface, FieldLayout, FOOTPRINT_RADIUS};
use crate::surface::{rounded_rect_contains, with_alpha, Paint, Surface, TextAlign, TextStyle};

/// Side of one speckle cell, in layout units.
const SPECKLE_CELL: f32 = 6.0;

/// Largest alpha a speckle square can get before opacity scaling.
const SPECKLE_MAX_ALPHA: f32 = 0.07;

/// Peak alpha of the pulse glow at full intensity.
const PULSE_ALPHA: f32 = 0.6;

const LABEL_SIZE: f32 = 14.0;
const ANNOTATION_SIZE: f32 = 11.0;

/// Paints zone footprints for a layer. Owns the speckle RNG; everything
/// else is read-only configuration.
#[derive(Debug, Clone)]
pub struct FieldCompositor {
    zones: Vec<FieldZone>,
    layout: FieldLayout,
    palette: StressPalette,
    speckle: Option<ChaCha8Rng>,
    pulse_intensity: f32,
}

impl FieldCompositor {
    /// Build a compositor for `dataset`. Speckle noise is seeded from OS
    /// entropy, so it differs on every run.
    pub fn new(dataset: &ZoneDataset, config: &VisualConfig) -> Result<Self, RenderError> {
        Ok(Self {
            zones: dataset.zones().to_vec(),
            layout: FieldLayout::resolve(dataset)?,
            palette: config.palette,
            speckle: Some(ChaCha8Rng::from_entropy()),
            pulse_intensity: 1.0,
        })
    }

    /// Use a fixed speckle seed for reproducible output.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.speckle = Some(ChaCha8Rng::seed_from_u64(seed));
        self
    }

    /// Disable the speckle pass entirely.
    pub fn without_speckle(mut self) -> Self {
        self.speckle = None;
        self
    }

    /// Scale of the pulse glow, clamped to `[0, 1]`. The viewer animates it.
    pub fn set_pulse_intensity(&mut self, intensity: f32) {
        self.pulse_intensity = intensity.clamp(0.0, 1.0);
    }

    pub fn pulse_intensity(&self) -> f32 {
        self.pulse_intensity
    }

    pub fn zones(&self) -> &[FieldZone] {
        &self.zones
    }

    /// Footprint of `code` on a surface of `size` pixels.
    pub fn zone_rect(&self, code: &str, size: Vec2) -> Option<Rect> {
        let index = self.zones.iter().position(|z| z.code == code)?;
        self.layout.footprint(index).map(|fp| to_surface(fp, size))
    }

    /// Paint all zones for `layer` with fills at `opacity` (0..=1).
    pub fn paint_layer(
        &mut self,
        surface: &mut dyn Surface,
        layer: AnalysisLayer,
        opacity: f32,
    ) -> Result<(), RenderError> {
        if !(0.0..=1.0).contains(&opacity) {
            return Err(RenderError::InvalidOpacity(opacity));
        }

        let size = surface.size();
        let scale = layout_scale(size);
        let unit = scale.min_element();

        for (index, zone) in self.zones.iter().enumerate() {
            let Some(footprint) = self.layout.footprint(index) else {
                return Err(RenderError::MissingFootprint(zone.code.clone()));
            };
            let rect = to_surface(footprint, size);
            let radius = FOOTPRINT_RADIUS * unit;
            let color = color_for(layer, zone, &self.palette);

            // 1. Flat fill
            surface.fill_rounded_rect(
                rect,
                radius,
                &Paint::Solid(with_alpha(color.fill, color.fill.alpha * opacity)),
            );

            // 2. Speckle
            if let Some(rng) = self.speckle.as_mut() {
                paint_speckle(surface, rng, rect, radius, SPECKLE_CELL * unit, opacity);
            }

            // 3. Pulse
            if layer.has_pulse() && zone.stress_level.is_elevated() {
                let glow = self.palette.color(zone.stress_level);
                surface.fill_rounded_rect(
                    rect,
                    radius,
                    &Paint::Radial {
                        center: rect.center(),
                        radius: rect.size().max_element() * 0.6,
                        inner: with_alpha(glow, PULSE_ALPHA * self.pulse_intensity * opacity),
                        outer: with_alpha(glow, 0.0),
                    },
                );
            }

            // 4. Labels
            let center_x = rect.center().x;
            surface.fill_text(
                &zone.code,
                Vec2::new(center_x, rect.min.y + 16.0 * unit),
                &TextStyle::new(Srgba::WHITE, LABEL_SIZE * unit).align(TextAlign::Center),
            );
            if let Some(annotation) = &color.annotation {
                surface.fill_text(
                    annotation,
                    Vec2::new(center_x, rect.max.y - 14.0 * unit),
                    &TextStyle::new(Srgba::new(1.0, 1.0, 1.0, 0.85), ANNOTATION_SIZE * unit)
                        .align(TextAlign::Center)
                        .monospace(),
                );
            }
        }
        Ok(())
    }
}

/// Tile `rect` in `cell`-sized squares of near-transparent white or black.
fn paint_speckle(
    surface: &mut dyn Surface,
    rng: &mut ChaCha8Rng,
    rect: Rect,
    radius: f32,
    cell: f32,
    opacity: f32,
) {
    if cell <= 0.0 {
        return;
    }
    let mut y = rect.min.y;
    while y < rect.max.y {
        let mut x = rect.min.x;
        while x < rect.max.x {
            let square = Rect::new(x, y, (x + cell).min(rect.max.x), (y + cell).min(rect.max.y));
            if rounded_rect_contains(rect, radius, square.center()) {
                let alpha = rng.gen_range(0.0..SPECKLE_MAX_ALPHA) * opacity;
                let tone = if rng.gen_bool(0.5) {
                    Srgba::new(1.0, 1.0, 1.0, alpha)
                } else {
                    Srgba::new(0.0, 0.0, 0.0, alpha)
                };
                surface.fill_rect(square, &Paint::Solid(tone));
            }
            x += cell;
        }
        y += cell;
    }
}
