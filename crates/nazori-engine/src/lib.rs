pub mod api;
pub mod device;
pub mod error;
pub mod glyphs;
pub mod input;
pub mod raster;
pub mod scoring;

// Re-export key types at crate root for convenience
pub use api::session::{Session, Template, DEFAULT_GLYPH};
pub use device::{DeviceClass, MOBILE_MAX_WINDOW_WIDTH};
pub use error::PracticeError;
pub use glyphs::{Category, Glyph, GlyphCatalog, GlyphDef, StrokeShape};
pub use input::queue::{InputEvent, InputQueue};
pub use input::stroke::{
    InkColor, PenStyle, SamplePoint, Stroke, StrokeSet, DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH,
    MIN_PEN_WIDTH, PALETTE,
};
pub use raster::{
    extract_key_points, render_template, CanvasSize, KeyPoint, OpacityMask, TemplateRasterizer,
};
pub use scoring::{
    CategoryWeights, CompositeRule, Feedback, Score, ScoreContext, ScoringConfig, ScoringProfile,
    SubScores, Tier, TierThresholds, Tone,
};
