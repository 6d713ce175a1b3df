use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::PracticeError;

/// Pen colours offered by the practice UI, first entry is the default.
pub const PALETTE: [&str; 7] = [
    "#FF6B6B", // red
    "#FF9E7D", // orange
    "#FFDA77", // yellow
    "#91F48F", // green
    "#4CACBC", // blue
    "#7367F0", // purple
    "#F77FBE", // pink
];

/// Default pen width in canvas pixels.
pub const DEFAULT_PEN_WIDTH: f32 = 12.0;
/// Accepted pen widths. Width sets both the coverage footprint and the
/// key-point reach, so it is bounded.
pub const MIN_PEN_WIDTH: f32 = 2.0;
pub const MAX_PEN_WIDTH: f32 = 30.0;

/// RGBA ink colour, components in 0.0 - 1.0.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct InkColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl InkColor {
    /// Create a fully opaque colour from RGB u8 values (0-255).
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Parse `#RRGGBB` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, PracticeError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(PracticeError::InvalidColor(hex.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| PracticeError::InvalidColor(hex.to_string()))
        };
        Ok(Self::rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        let to_u8 = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02X}{:02X}{:02X}", to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }
}

/// Colour and width applied to points as they are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenStyle {
    pub color: InkColor,
    pub width: f32,
}

impl PenStyle {
    /// Clamp a requested width into `MIN_PEN_WIDTH..=MAX_PEN_WIDTH`.
    /// `None` for non-finite or non-positive widths.
    pub fn checked_width(width: f32) -> Option<f32> {
        if width.is_finite() && width > 0.0 {
            Some(width.clamp(MIN_PEN_WIDTH, MAX_PEN_WIDTH))
        } else {
            None
        }
    }
}

impl Default for PenStyle {
    fn default() -> Self {
        Self {
            color: InkColor::rgb8(0xFF, 0x6B, 0x6B),
            width: DEFAULT_PEN_WIDTH,
        }
    }
}

/// One recorded input sample. Flat 7-float layout so strokes can be handed
/// to the JS renderer without conversion.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    pub color: InkColor,
    pub width: f32,
}

impl SamplePoint {
    pub const FLOATS: usize = 7;

    pub fn new(pos: Vec2, pen: &PenStyle) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            color: pen.color,
            width: pen.width,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite()
    }
}

/// One pointer-down to pointer-up gesture. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<SamplePoint>,
}

impl Stroke {
    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// All strokes drawn since the last reset, plus the one being drawn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrokeSet {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    active: Option<Vec<SamplePoint>>,
}

impl StrokeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new stroke. An already open stroke is closed first.
    pub fn begin(&mut self) {
        if self.active.is_some() {
            self.end();
        }
        self.active = Some(Vec::with_capacity(128));
    }

    /// Append to the open stroke. Returns false when no stroke is open or
    /// the point has a non-finite coordinate or width.
    pub fn push(&mut self, point: SamplePoint) -> bool {
        if !point.is_finite() {
            log::warn!("dropping non-finite point ({}, {})", point.x, point.y);
            return false;
        }
        match self.active.as_mut() {
            Some(points) => {
                points.push(point);
                true
            }
            None => false,
        }
    }

    /// Close the open stroke. Strokes without points are discarded.
    /// Returns true when a stroke was kept.
    pub fn end(&mut self) -> bool {
        match self.active.take() {
            Some(points) if !points.is_empty() => {
                self.strokes.push(Stroke { points });
                true
            }
            _ => false,
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// Closed strokes in drawing order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Points of the open stroke, if any.
    pub fn active_points(&self) -> &[SamplePoint] {
        self.active.as_deref().unwrap_or(&[])
    }

    /// Every recorded point, closed strokes first, then the open stroke.
    pub fn points(&self) -> impl Iterator<Item = &SamplePoint> {
        self.strokes
            .iter()
            .flat_map(|s| s.points.iter())
            .chain(self.active_points().iter())
    }

    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(Stroke::len).sum::<usize>() + self.active_points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }
}
