//! Reference rasterizer.
//!
//! Renders a glyph's baked pen skeleton into an [`OpacityMask`] at canvas
//! resolution. Each stroke is tessellated with Lyon (round caps and joins,
//! pen weight proportional to the em size) and the resulting triangles are
//! scan-filled: a pixel is ink when its centre lies inside a triangle.
//!
//! The layout matches the on-screen guide glyph so that reference and display
//! agree on placement:
//!
//! ```text
//! em        = 0.70 × min(width, height)
//! centre x  = width / 2
//! centre y  = 0.45 × height   (desktop)
//!           = 0.30 × height   (mobile)
//! ```

use glam::Vec2;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, LineCap, LineJoin, StrokeOptions, StrokeTessellator, StrokeVertex,
    StrokeVertexConstructor, VertexBuffers,
};

use crate::device::DeviceClass;
use crate::error::PracticeError;
use crate::glyphs::{Glyph, GlyphCatalog, StrokeShape};
use crate::raster::mask::{CanvasSize, OpacityMask, INK_ALPHA};

/// Glyph em size as a fraction of the canvas' shorter side.
pub const EM_RATIO: f32 = 0.7;
/// Vertical position of the em box centre, as a fraction of canvas height.
pub const DESKTOP_ANCHOR_Y: f32 = 0.45;
pub const MOBILE_ANCHOR_Y: f32 = 0.30;

/// Flattening tolerance for curved strokes, in pixels.
const TOLERANCE: f32 = 0.1;

/// Placement of the em box on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphFrame {
    /// Top-left corner of the em box in canvas pixels.
    pub origin: Vec2,
    /// Em box side length in canvas pixels.
    pub em: f32,
}

impl GlyphFrame {
    pub fn new(size: CanvasSize, device: DeviceClass) -> Self {
        let em = size.min_side() * EM_RATIO;
        let anchor_y = match device {
            DeviceClass::Desktop => DESKTOP_ANCHOR_Y,
            DeviceClass::Mobile => MOBILE_ANCHOR_Y,
        };
        let center = Vec2::new(size.width as f32 * 0.5, size.height as f32 * anchor_y);
        Self {
            origin: center - Vec2::splat(em * 0.5),
            em,
        }
    }

    /// Map an em-space point (0..1, y down) to canvas pixels.
    pub fn to_canvas(&self, p: [f32; 2]) -> Vec2 {
        self.origin + Vec2::new(p[0], p[1]) * self.em
    }

    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::splat(self.em * 0.5)
    }
}

/// Vertex constructor for lyon stroke tessellation; only positions are kept.
struct PositionCtor;

impl StrokeVertexConstructor<Vec2> for PositionCtor {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> Vec2 {
        Vec2::new(vertex.position().x, vertex.position().y)
    }
}

/// Renders glyph templates. Holds the tessellator and scratch geometry so
/// repeated renders do not reallocate.
pub struct TemplateRasterizer {
    stroke_tess: StrokeTessellator,
    geometry: VertexBuffers<Vec2, u32>,
}

impl TemplateRasterizer {
    pub fn new() -> Self {
        Self {
            stroke_tess: StrokeTessellator::new(),
            geometry: VertexBuffers::new(),
        }
    }

    /// Render `glyph` at `size` for the given device class.
    ///
    /// Deterministic: the same inputs always produce the same mask.
    pub fn render(
        &mut self,
        catalog: &GlyphCatalog,
        glyph: Glyph,
        size: CanvasSize,
        device: DeviceClass,
    ) -> Result<OpacityMask, PracticeError> {
        // Re-validate in case the size was built without `CanvasSize::new`.
        let size = CanvasSize::new(size.width, size.height)?;
        let def = catalog.def(glyph).ok_or(PracticeError::InvalidGlyph {
            category: glyph.category,
            ch: glyph.ch,
        })?;

        let frame = GlyphFrame::new(size, device);
        let pen_width = catalog.weight(def) * frame.em;
        let mut mask = OpacityMask::new(size);

        for shape in &def.strokes {
            let Some(path) = build_path(shape, &frame) else {
                continue;
            };
            self.tessellate(&path, pen_width);
            fill_triangles(&self.geometry, &mut mask);
        }

        log::debug!(
            "rendered template {:?} at {}x{} ({:?}): {} ink pixels",
            glyph.ch,
            size.width,
            size.height,
            device,
            mask.ink_pixel_count()
        );
        Ok(mask)
    }

    fn tessellate(&mut self, path: &Path, width: f32) {
        self.geometry.vertices.clear();
        self.geometry.indices.clear();

        let options = StrokeOptions::tolerance(TOLERANCE)
            .with_line_width(width)
            .with_line_cap(LineCap::Round)
            .with_line_join(LineJoin::Round);
        let result = self.stroke_tess.tessellate_path(
            path,
            &options,
            &mut BuffersBuilder::new(&mut self.geometry, PositionCtor),
        );

        if let Err(err) = result {
            log::warn!("stroke tessellation failed: {err:?}");
            self.geometry.vertices.clear();
            self.geometry.indices.clear();
        }
    }
}

impl Default for TemplateRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper around a one-off [`TemplateRasterizer`].
pub fn render_template(
    catalog: &GlyphCatalog,
    glyph: Glyph,
    size: CanvasSize,
    device: DeviceClass,
) -> Result<OpacityMask, PracticeError> {
    TemplateRasterizer::new().render(catalog, glyph, size, device)
}

fn build_path(shape: &StrokeShape, frame: &GlyphFrame) -> Option<Path> {
    let mut builder = Path::builder();
    match shape {
        StrokeShape::Polyline(points) => {
            let (first, rest) = points.split_first()?;
            let start = frame.to_canvas(*first);
            builder.begin(point(start.x, start.y));
            for p in rest {
                let p = frame.to_canvas(*p);
                builder.line_to(point(p.x, p.y));
            }
            builder.end(false);
        }
        StrokeShape::Ellipse { center, radii } => {
            if radii[0] <= 0.0 || radii[1] <= 0.0 {
                return None;
            }
            let c = frame.to_canvas(*center);
            builder.add_ellipse(
                point(c.x, c.y),
                lyon::math::vector(radii[0] * frame.em, radii[1] * frame.em),
                lyon::math::Angle::radians(0.0),
                lyon::path::Winding::Positive,
            );
        }
    }
    Some(builder.build())
}

/// Mark every pixel whose centre falls inside one of the indexed triangles.
fn fill_triangles(geometry: &VertexBuffers<Vec2, u32>, mask: &mut OpacityMask) {
    let max_x = mask.width() as f32 - 1.0;
    let max_y = mask.height() as f32 - 1.0;

    for tri in geometry.indices.chunks_exact(3) {
        let a = geometry.vertices[tri[0] as usize];
        let b = geometry.vertices[tri[1] as usize];
        let c = geometry.vertices[tri[2] as usize];

        let area = edge(a, b, c);
        if area.abs() <= f32::EPSILON {
            continue;
        }

        let lo = a.min(b).min(c);
        let hi = a.max(b).max(c);
        let x0 = (lo.x - 0.5).ceil().max(0.0);
        let y0 = (lo.y - 0.5).ceil().max(0.0);
        let x1 = (hi.x - 0.5).floor().min(max_x);
        let y1 = (hi.y - 0.5).floor().min(max_y);
        if x0 > x1 || y0 > y1 {
            continue;
        }

        for y in y0 as u32..=y1 as u32 {
            for x in x0 as u32..=x1 as u32 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(b, c, p);
                let w1 = edge(c, a, p);
                let w2 = edge(a, b, p);
                let inside = if area > 0.0 {
                    w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0
                } else {
                    w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0
                };
                if inside {
                    mask.set(x, y, INK_ALPHA);
                }
            }
        }
    }
}

/// Twice the signed area of triangle (a, b, p).
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
