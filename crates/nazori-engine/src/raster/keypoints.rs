//! Key-point extraction.
//!
//! Coarse silhouette sampling of a template mask: the "must trace" spots a
//! learner's strokes should pass near. Not a contour trace. Four edge scans
//! over the ink bounding box, each recording the first ink pixel met along
//! the scan direction:
//!
//! - top: columns left→right, scanning down
//! - bottom: columns right→left, scanning up
//! - left: rows top→bottom, scanning right
//! - right: rows bottom→top, scanning left
//!
//! Results are concatenated without dedup; duplicates do not affect scoring.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::raster::mask::OpacityMask;

/// Sampling stride (px) for the bounding box and along each scan line.
pub const GRID_STRIDE: i64 = 5;
/// Target number of scan lines per edge.
pub const SCANS_PER_EDGE: i64 = 10;

/// A sampled boundary pixel of the template silhouette.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct KeyPoint {
    pub x: f32,
    pub y: f32,
}

impl KeyPoint {
    pub const FLOATS: usize = 2;

    pub fn new(x: i64, y: i64) -> Self {
        Self { x: x as f32, y: y as f32 }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Inclusive pixel bounds of the ink, found on the coarse grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkBounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

/// Bounding box of ink pixels sampled every [`GRID_STRIDE`] pixels.
/// `None` when no sampled pixel is ink.
pub fn ink_bounds(mask: &OpacityMask) -> Option<InkBounds> {
    let (w, h) = (mask.width() as i64, mask.height() as i64);
    let mut bounds: Option<InkBounds> = None;

    for y in (0..h).step_by(GRID_STRIDE as usize) {
        for x in (0..w).step_by(GRID_STRIDE as usize) {
            if !mask.is_ink(x, y) {
                continue;
            }
            let b = bounds.get_or_insert(InkBounds { min_x: x, min_y: y, max_x: x, max_y: y });
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
    }
    bounds
}

/// Extract the key-point set for a template mask.
pub fn extract_key_points(mask: &OpacityMask) -> Vec<KeyPoint> {
    let Some(b) = ink_bounds(mask) else {
        log::debug!("key points: template has no ink");
        return Vec::new();
    };

    let step_x = GRID_STRIDE.max((b.max_x - b.min_x) / SCANS_PER_EDGE);
    let step_y = GRID_STRIDE.max((b.max_y - b.min_y) / SCANS_PER_EDGE);
    let mut points = Vec::with_capacity(4 * (SCANS_PER_EDGE as usize + 1));

    // Top edge.
    for x in ascending(b.min_x, b.max_x, step_x) {
        if let Some(y) = ascending(b.min_y, b.max_y, GRID_STRIDE).find(|&y| mask.is_ink(x, y)) {
            points.push(KeyPoint::new(x, y));
        }
    }

    // Bottom edge.
    for x in descending(b.max_x, b.min_x, step_x) {
        if let Some(y) = descending(b.max_y, b.min_y, GRID_STRIDE).find(|&y| mask.is_ink(x, y)) {
            points.push(KeyPoint::new(x, y));
        }
    }

    // Left edge.
    for y in ascending(b.min_y, b.max_y, step_y) {
        if let Some(x) = ascending(b.min_x, b.max_x, GRID_STRIDE).find(|&x| mask.is_ink(x, y)) {
            points.push(KeyPoint::new(x, y));
        }
    }

    // Right edge.
    for y in descending(b.max_y, b.min_y, step_y) {
        if let Some(x) = descending(b.max_x, b.min_x, GRID_STRIDE).find(|&x| mask.is_ink(x, y)) {
            points.push(KeyPoint::new(x, y));
        }
    }

    log::debug!("key points: {} extracted from bounds {:?}", points.len(), b);
    points
}

fn ascending(from: i64, to: i64, step: i64) -> impl Iterator<Item = i64> {
    (0..).map(move |i| from + i * step).take_while(move |&v| v <= to)
}

fn descending(from: i64, to: i64, step: i64) -> impl Iterator<Item = i64> {
    (0..).map(move |i| from - i * step).take_while(move |&v| v >= to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::mask::{CanvasSize, INK_ALPHA};

    fn filled_rect(w: u32, h: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> OpacityMask {
        let mut mask = OpacityMask::new(CanvasSize::new(w, h).unwrap());
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.set(x, y, INK_ALPHA);
            }
        }
        mask
    }

    #[test]
    fn empty_mask_has_no_key_points() {
        let mask = OpacityMask::new(CanvasSize::new(50, 50).unwrap());
        assert_eq!(ink_bounds(&mask), None);
        assert!(extract_key_points(&mask).is_empty());
    }

    #[test]
    fn bounds_are_grid_aligned() {
        let mask = filled_rect(100, 100, 12, 21, 58, 77);
        let b = ink_bounds(&mask).unwrap();
        assert_eq!(b, InkBounds { min_x: 15, min_y: 25, max_x: 55, max_y: 75 });
    }

    #[test]
    fn rectangle_key_points_sit_on_its_edges() {
        let mask = filled_rect(200, 200, 50, 60, 150, 140);
        let points = extract_key_points(&mask);

        // Span 100 → 10 px steps → 11 scan lines on top and bottom; 80 → 8 px → 11 rows.
        assert_eq!(points.len(), 44);
        for p in &points {
            assert!(mask.ink_at(p.pos()), "{p:?} is not ink");
            let on_edge = p.x == 50.0 || p.x == 150.0 || p.y == 60.0 || p.y == 140.0;
            assert!(on_edge, "{p:?} is not on the rectangle edge");
        }
        assert_eq!(points[0], KeyPoint::new(50, 60));
    }

    #[test]
    fn tiny_glyph_uses_minimum_stride() {
        let mask = filled_rect(40, 40, 10, 10, 20, 20);
        let points = extract_key_points(&mask);
        // Span 10 → stride 5 → 3 scan lines per edge.
        assert_eq!(points.len(), 12);
    }

    #[test]
    fn extraction_is_deterministic() {
        let mask = filled_rect(120, 90, 7, 3, 99, 61);
        assert_eq!(extract_key_points(&mask), extract_key_points(&mask));
    }
}
