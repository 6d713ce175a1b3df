pub mod session;

pub use session::{Session, Template, DEFAULT_GLYPH};
