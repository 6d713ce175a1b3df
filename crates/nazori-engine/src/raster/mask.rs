use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PracticeError;

/// Alpha values strictly above this count as glyph ink.
pub const INK_THRESHOLD: u8 = 0;

/// Alpha written for ink pixels by the rasterizer.
pub const INK_ALPHA: u8 = 255;

/// Drawing surface size in pixels. Shared by templates, key points and strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    /// Validated constructor; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> Result<Self, PracticeError> {
        if width == 0 || height == 0 {
            return Err(PracticeError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn min_side(&self) -> f32 {
        self.width.min(self.height) as f32
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when `pos` lies on the canvas, edges included.
    pub fn contains(&self, pos: Vec2) -> bool {
        pos.x >= 0.0 && pos.y >= 0.0 && pos.x <= self.width as f32 && pos.y <= self.height as f32
    }
}

/// Off-screen opacity mask of a rendered glyph, one alpha byte per pixel (row-major).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpacityMask {
    size: CanvasSize,
    alpha: Vec<u8>,
    ink_pixels: usize,
}

impl OpacityMask {
    /// A fully transparent mask.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            alpha: vec![0; size.pixel_count()],
            ink_pixels: 0,
        }
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Number of pixels whose alpha counts as ink.
    pub fn ink_pixel_count(&self) -> usize {
        self.ink_pixels
    }

    /// Row-major alpha bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.alpha
    }

    /// Alpha at (x, y); 0 outside the mask.
    pub fn alpha(&self, x: i64, y: i64) -> u8 {
        if x < 0 || y < 0 || x >= self.size.width as i64 || y >= self.size.height as i64 {
            return 0;
        }
        self.alpha[y as usize * self.size.width as usize + x as usize]
    }

    pub fn is_ink(&self, x: i64, y: i64) -> bool {
        self.alpha(x, y) > INK_THRESHOLD
    }

    /// Ink test for the pixel containing `pos`.
    pub fn ink_at(&self, pos: Vec2) -> bool {
        self.is_ink(pos.x.floor() as i64, pos.y.floor() as i64)
    }

    /// True when any pixel within `radius` of the pixel containing `pos` is ink.
    pub fn ink_within(&self, pos: Vec2, radius: f32) -> bool {
        let cx = pos.x.floor() as i64;
        let cy = pos.y.floor() as i64;
        let r = radius.max(0.0) as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                if dx * dx + dy * dy <= r * r && self.is_ink(cx + dx, cy + dy) {
                    return true;
                }
            }
        }
        false
    }

    /// Write one pixel, keeping the ink count in sync. Out-of-range writes are dropped.
    pub fn set(&mut self, x: u32, y: u32, alpha: u8) {
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let idx = y as usize * self.size.width as usize + x as usize;
        let was_ink = self.alpha[idx] > INK_THRESHOLD;
        let is_ink = alpha > INK_THRESHOLD;
        self.alpha[idx] = alpha;
        match (was_ink, is_ink) {
            (false, true) => self.ink_pixels += 1,
            (true, false) => self.ink_pixels -= 1,
            _ => {}
        }
    }
}
