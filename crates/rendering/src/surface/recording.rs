//! Surface that records draw calls instead of painting pixels.

use bevy::color::Srgba;
use bevy::math::{Rect, UVec2, Vec2};

use super::{Paint, Stroke, Surface, TextStyle};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Srgba),
    FillRect {
        rect: Rect,
        paint: Paint,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        paint: Paint,
    },
    FillPolygon {
        points: Vec<Vec2>,
        paint: Paint,
    },
    StrokePolyline {
        points: Vec<Vec2>,
        stroke: Stroke,
    },
    Text {
        text: String,
        at: Vec2,
        style: TextStyle,
    },
}

/// Draw-call log with fixed dimensions.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    dimensions: UVec2,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            dimensions: UVec2::new(width, height),
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every recorded text string, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn dimensions(&self) -> UVec2 {
        self.dimensions
    }

    fn clear(&mut self, color: Srgba) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, paint: &Paint) {
        self.ops.push(DrawOp::FillRect { rect, paint: *paint });
    }

    fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, paint: &Paint) {
        self.ops.push(DrawOp::FillRoundedRect {
            rect,
            radius,
            paint: *paint,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], paint: &Paint) {
        self.ops.push(DrawOp::FillPolygon {
            points: points.to_vec(),
            paint: *paint,
        });
    }

    fn stroke_polyline(&mut self, points: &[Vec2], stroke: &Stroke) {
        self.ops.push(DrawOp::StrokePolyline {
            points: points.to_vec(),
            stroke: *stroke,
        });
    }

    fn fill_text(&mut self, text: &str, at: Vec2, style: &TextStyle) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
            style: *style,
        });
    }
}
