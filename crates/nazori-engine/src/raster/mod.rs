pub mod keypoints;
pub mod mask;
pub mod template;

pub use keypoints::{extract_key_points, ink_bounds, InkBounds, KeyPoint};
pub use mask::{CanvasSize, OpacityMask, INK_ALPHA, INK_THRESHOLD};
pub use template::{render_template, GlyphFrame, TemplateRasterizer};
