//! 2D drawing surface used by every renderer.
//!
//! Renderers only talk to the [`Surface`] trait. [`Raster`] paints into an
//! RGBA pixel buffer for display; [`RecordingSurface`] keeps a log of draw
//! calls so tests can assert ordering without looking at pixels.

mod raster;
mod recording;

use bevy::color::Srgba;
use bevy::math::{Rect, UVec2, Vec2};

pub use raster::{Raster, TextRun};
pub use recording::{DrawOp, RecordingSurface};

// ---------------------------------------------------------------------------
// Paint
// ---------------------------------------------------------------------------

/// How a filled shape is colored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Solid(Srgba),
    /// Center-weighted gradient: `inner` at `center`, `outer` at `radius`
    /// and beyond.
    Radial {
        center: Vec2,
        radius: f32,
        inner: Srgba,
        outer: Srgba,
    },
    /// Gradient along the `from -> to` axis, clamped at both ends.
    Linear {
        from: Vec2,
        to: Vec2,
        start: Srgba,
        end: Srgba,
    },
}

impl Paint {
    /// Color of this paint at point `p`.
    pub fn sample(&self, p: Vec2) -> Srgba {
        match *self {
            Paint::Solid(c) => c,
            Paint::Radial {
                center,
                radius,
                inner,
                outer,
            } => {
                let t = if radius > 0.0 {
                    p.distance(center) / radius
                } else {
                    1.0
                };
                mix(inner, outer, t)
            }
            Paint::Linear {
                from,
                to,
                start,
                end,
            } => {
                let axis = to - from;
                let len2 = axis.length_squared();
                let t = if len2 > 0.0 {
                    (p - from).dot(axis) / len2
                } else {
                    0.0
                };
                mix(start, end, t)
            }
        }
    }
}

/// Straight interpolation of all four channels, `t` clamped to `[0, 1]`.
pub fn mix(a: Srgba, b: Srgba, t: f32) -> Srgba {
    let t = t.clamp(0.0, 1.0);
    Srgba::new(
        a.red + (b.red - a.red) * t,
        a.green + (b.green - a.green) * t,
        a.blue + (b.blue - a.blue) * t,
        a.alpha + (b.alpha - a.alpha) * t,
    )
}

/// `color` with its alpha replaced.
pub fn with_alpha(color: Srgba, alpha: f32) -> Srgba {
    Srgba { alpha, ..color }
}

// ---------------------------------------------------------------------------
// Stroke / text styles
// ---------------------------------------------------------------------------

/// Line style for polylines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Srgba,
    pub width: f32,
    /// `[on, off]` lengths for a dashed line; `None` draws solid.
    pub dash: Option<[f32; 2]>,
}

impl Stroke {
    pub fn solid(color: Srgba, width: f32) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Srgba, width: f32, on: f32, off: f32) -> Self {
        Self {
            color,
            width,
            dash: Some([on, off]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Text appearance. `size` is the font height in surface pixels; the text
/// anchor is the vertical middle of the line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Srgba,
    pub size: f32,
    pub align: TextAlign,
    pub monospace: bool,
}

impl TextStyle {
    pub fn new(color: Srgba, size: f32) -> Self {
        Self {
            color,
            size,
            align: TextAlign::Left,
            monospace: false,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

/// A raster drawing target. Coordinates are in surface pixels with the
/// origin at the top-left corner.
pub trait Surface {
    /// Width and height in pixels.
    fn dimensions(&self) -> UVec2;

    /// Replace every pixel with `color` and drop any pending text.
    fn clear(&mut self, color: Srgba);

    fn fill_rect(&mut self, rect: Rect, paint: &Paint);

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint);

    /// Fill a closed polygon (even-odd rule).
    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint);

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke);

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle);

    fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
        self.stroke_polyline(&[from, to], stroke);
    }

    /// Dimensions as floats, for layout math.
    fn size(&self) -> Vec2 {
        self.dimensions().as_vec2()
    }
}

/// Whether `p` lies inside `rect` with corners rounded by `radius`.
pub fn rounded_rect_contains(rect: Rect, radius: f32, p: Vec2) -> bool {
    if !(p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y) {
        return false;
    }
    let r = radius
        .min(rect.width() * 0.5)
        .min(rect.height() * 0.5)
        .max(0.0);
    let nearest = Vec2::new(
        p.x.clamp(rect.min.x + r, rect.max.x - r),
        p.y.clamp(rect.min.y + r, rect.max.y - r),
    );
    p.distance_squared(nearest) <= r * r
}
