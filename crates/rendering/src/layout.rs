//! Static schematic layout of the field.
//!
//! Footprints are hardcoded per zone code in an 800 x 500 layout space and
//! scaled to whatever surface they are drawn on. They are not derived from
//! the zone centroids: this is a schematic, not a georeferenced map.

use bevy::math::{Rect, Vec2};

use field::config::{LAYOUT_HEIGHT, LAYOUT_WIDTH};
use field::ZoneDataset;

use crate::error::RenderError;

/// Corner radius of every footprint, in layout units.
pub const FOOTPRINT_RADIUS: f32 = 10.0;

/// `(code, [x, y, width, height])` in layout units.
const FOOTPRINTS: [(&str, [f32; 4]); 6] = [
    ("Z1", [40.0, 40.0, 230.0, 180.0]),
    ("Z2", [290.0, 40.0, 200.0, 120.0]),
    ("Z3", [510.0, 40.0, 250.0, 200.0]),
    ("Z4", [40.0, 250.0, 260.0, 200.0]),
    ("Z5", [320.0, 190.0, 170.0, 260.0]),
    ("Z6", [510.0, 270.0, 250.0, 180.0]),
];

/// Footprint of `code` in layout units.
pub fn footprint_for(code: &str) -> Option<Rect> {
    FOOTPRINTS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, [x, y, w, h])| Rect::new(*x, *y, x + w, y + h))
}

/// Layout-to-surface scale factors for a surface of `size` pixels.
pub fn layout_scale(size: Vec2) -> Vec2 {
    Vec2::new(size.x / LAYOUT_WIDTH, size.y / LAYOUT_HEIGHT)
}

/// Map a layout-space rect onto a surface of `size` pixels.
pub fn to_surface(rect: Rect, size: Vec2) -> Rect {
    let scale = layout_scale(size);
    Rect::from_corners(rect.min * scale, rect.max * scale)
}

/// Footprints for every dataset zone, in dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLayout {
    footprints: Vec<Rect>,
}

impl FieldLayout {
    /// Resolve a footprint for each zone; a zone without one is an error.
    pub fn resolve(dataset: &ZoneDataset) -> Result<Self, RenderError> {
        let footprints = dataset
            .iter()
            .map(|zone| {
                footprint_for(&zone.code)
                    .ok_or_else(|| RenderError::MissingFootprint(zone.code.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { footprints })
    }

    /// Layout-space footprint of the `index`-th dataset zone.
    pub fn footprint(&self, index: usize) -> Option<Rect> {
        self.footprints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_embedded_zone_has_a_footprint() {
        let dataset = ZoneDataset::embedded().expect("valid");
        let layout = FieldLayout::resolve(&dataset).expect("all zones laid out");
        assert_eq!(layout.len(), dataset.len());
    }

    #[test]
    fn test_footprints_do_not_overlap() {
        for (i, (a_code, _)) in FOOTPRINTS.iter().enumerate() {
            for (b_code, _) in FOOTPRINTS.iter().skip(i + 1) {
                let a = footprint_for(a_code).expect("a");
                let b = footprint_for(b_code).expect("b");
                assert!(
                    a.intersect(b).is_empty(),
                    "{a_code} overlaps {b_code}"
                );
            }
        }
    }

    #[test]
    fn test_footprints_inside_layout() {
        let canvas = Rect::new(0.0, 0.0, LAYOUT_WIDTH, LAYOUT_HEIGHT);
        for (code, _) in FOOTPRINTS {
            let fp = footprint_for(code).expect("fp");
            assert_eq!(canvas.union(fp), canvas, "{code} leaves the canvas");
        }
    }

    #[test]
    fn test_to_surface_scales() {
        let r = to_surface(Rect::new(40.0, 40.0, 80.0, 90.0), Vec2::new(400.0, 250.0));
        assert_eq!(r, Rect::new(20.0, 20.0, 40.0, 45.0));
    }

    #[test]
    fn test_unknown_code_has_no_footprint() {
        assert!(footprint_for("Z99").is_none());
    }
}
