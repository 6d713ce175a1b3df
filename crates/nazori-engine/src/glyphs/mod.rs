pub mod catalog;

pub use catalog::{Category, CatalogMeta, Glyph, GlyphCatalog, GlyphDef, StrokeShape};
