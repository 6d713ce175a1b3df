pub mod queue;
pub mod stroke;

pub use queue::{InputEvent, InputQueue};
pub use stroke::{
    InkColor, PenStyle, SamplePoint, Stroke, StrokeSet, DEFAULT_PEN_WIDTH, MAX_PEN_WIDTH,
    MIN_PEN_WIDTH, PALETTE,
};
