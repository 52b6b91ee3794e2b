//! Software RGBA raster with source-over blending.
//!
//! Text is not rasterized here: glyph runs are kept beside the pixel buffer
//! and drawn by the UI layer on top of the uploaded texture.

use bevy::color::Srgba;
use bevy::math::{Rect, UVec2, Vec2};

use super::{rounded_rect_contains, Paint, Stroke, Surface, TextStyle};

/// Distance between stroke samples, in pixels.
const STROKE_STEP: f32 = 0.5;

/// A text draw kept for the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub position: Vec2,
    pub style: TextStyle,
}

/// Pixel buffer target, row-major, straight (non-premultiplied) alpha.
#[derive(Debug, Clone)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
    text: Vec<TextRun>,
}

impl Raster {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0u8; 4]; (width as usize) * (height as usize)],
            text: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[self.index(x, y)])
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    /// Flattened RGBA bytes for texture upload.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            data.extend_from_slice(pixel);
        }
        data
    }

    /// Text drawn since the last `clear`.
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Clip a float rect to integer pixel bounds `(x0, y0, x1, y1)`, exclusive max.
    fn pixel_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let x0 = rect.min.x.floor().max(0.0) as u32;
        let y0 = rect.min.y.floor().max(0.0) as u32;
        let x1 = (rect.max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (rect.max.y.ceil().max(0.0) as u32).min(self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, y0, x1, y1))
    }

    fn blend(&mut self, x: u32, y: u32, color: Srgba) {
        let idx = self.index(x, y);
        self.pixels[idx] = blend_over(self.pixels[idx], color);
    }

    /// Blend every pixel whose center satisfies `inside`.
    fn fill_where(&mut self, bounds: Rect, paint: &Paint, inside: impl Fn(Vec2) -> bool) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(bounds) else {
            return;
        };
        for py in y0..y1 {
            for px in x0..x1 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                if inside(center) {
                    self.blend(px, py, paint.sample(center));
                }
            }
        }
    }
}

impl Surface for Raster {
    fn dimensions(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    fn clear(&mut self, color: Srgba) {
        let rgba = to_rgba8(color);
        self.pixels.fill(rgba);
        self.text.clear();
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.fill_where(rect, paint, |p| {
            p.x >= rect.min.x && p.x < rect.max.x && p.y >= rect.min.y && p.y < rect.max.y
        });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        self.fill_where(rect, paint, |p| rounded_rect_contains(rect, radius, p));
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        if points.len() < 3 {
            return;
        }
        let mut bounds = Rect::from_corners(points[0], points[0]);
        for &p in &points[1..] {
            bounds = bounds.union_point(p);
        }
        self.fill_where(bounds, paint, |p| polygon_contains(points, p));
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        if points.len() < 2 || stroke.width <= 0.0 {
            return;
        }
        let radius = stroke.width * 0.5;
        let r2 = radius * radius + 0.25;
        let mut covered: Vec<usize> = Vec::new();
        let mut travelled = 0.0f32;

        for seg in points.windows(2) {
            let (a, b) = (seg[0], seg[1]);
            let len = a.distance(b);
            let steps = (len / STROKE_STEP).ceil().max(1.0) as usize;
            for i in 0..=steps {
                let t = i as f32 / steps as f32;
                let d = travelled + len * t;
                if let Some([on, off]) = stroke.dash {
                    let period = on + off;
                    if period > 0.0 && d.rem_euclid(period) >= on {
                        continue;
                    }
                }
                let c = a.lerp(b, t);
                let min_x = (c.x - radius).floor().max(0.0) as u32;
                let min_y = (c.y - radius).floor().max(0.0) as u32;
                let max_x = ((c.x + radius).ceil().max(0.0) as u32).min(self.width);
                let max_y = ((c.y + radius).ceil().max(0.0) as u32).min(self.height);
                for py in min_y..max_y {
                    for px in min_x..max_x {
                        let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                        if center.distance_squared(c) <= r2 {
                            covered.push(self.index(px, py));
                        }
                    }
                }
            }
            travelled += len;
        }

        // Each covered pixel is blended once so translucent lines stay even.
        covered.sort_unstable();
        covered.dedup();
        for idx in covered {
            self.pixels[idx] = blend_over(self.pixels[idx], stroke.color);
        }
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.text.push(TextRun {
            text: text.to_string(),
            position: at,
            style: *style,
        });
    }
}

// ---------------------------------------------------------------------------
// Pixel helpers
// ---------------------------------------------------------------------------

/// Convert floating-point RGBA (0.0-1.0) to `[u8; 4]`.
pub(crate) fn to_rgba8(c: Srgba) -> [u8; 4] {
    [
        (c.red * 255.0).round().clamp(0.0, 255.0) as u8,
        (c.green * 255.0).round().clamp(0.0, 255.0) as u8,
        (c.blue * 255.0).round().clamp(0.0, 255.0) as u8,
        (c.alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ]
}

/// Source-over compositing of `src` onto `dst`.
fn blend_over(dst: [u8; 4], src: Srgba) -> [u8; 4] {
    let sa = src.alpha.clamp(0.0, 1.0);
    if sa <= 0.0 {
        return dst;
    }
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0, 0, 0, 0];
    }
    let channel = |s: f32, d: u8| {
        let d = f32::from(d) / 255.0;
        (s * sa + d * da * (1.0 - sa)) / out_a
    };
    to_rgba8(Srgba::new(
        channel(src.red, dst[0]),
        channel(src.green, dst[1]),
        channel(src.blue, dst[2]),
        out_a,
    ))
}

/// Even-odd point-in-polygon test.
fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (a, b) = (points[i], points[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
