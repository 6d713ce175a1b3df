use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::PracticeError;

const BUILTIN_JSON: &str = include_str!("data/glyphs.json");

/// Glyph families offered for practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hiragana,
    Katakana,
    Digit,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Hiragana, Category::Katakana, Category::Digit];

    pub fn name(self) -> &'static str {
        match self {
            Category::Hiragana => "hiragana",
            Category::Katakana => "katakana",
            Category::Digit => "digit",
        }
    }

    /// Parse a category id. Accepts `numbers` as an alias for `digit`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "hiragana" => Some(Category::Hiragana),
            "katakana" => Some(Category::Katakana),
            "digit" | "numbers" => Some(Category::Digit),
            _ => None,
        }
    }
}

/// A single practicable character together with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Glyph {
    pub category: Category,
    pub ch: char,
}

impl Glyph {
    pub const fn new(category: Category, ch: char) -> Self {
        Self { category, ch }
    }
}

/// One pen stroke of a baked glyph skeleton, in em units (0..1, y down).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeShape {
    /// Open polyline through the given points.
    Polyline(Vec<[f32; 2]>),
    /// Closed ellipse outline.
    Ellipse { center: [f32; 2], radii: [f32; 2] },
}

/// Metadata about the baked glyph set.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogMeta {
    pub version: u32,
    /// Default pen weight in em units.
    pub weight: f32,
}

/// Ordered character list per category, stored as plain strings.
#[derive(Debug, Clone, Deserialize)]
struct CategoryLists {
    hiragana: String,
    katakana: String,
    digit: String,
}

/// Definition of a single glyph.
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphDef {
    /// Pen weight override in em units.
    #[serde(default)]
    pub weight: Option<f32>,
    pub strokes: Vec<StrokeShape>,
}

/// The closed set of glyphs a learner can trace, baked as pen skeletons.
#[derive(Debug, Clone, Deserialize)]
pub struct GlyphCatalog {
    pub meta: CatalogMeta,
    categories: CategoryLists,
    glyphs: HashMap<String, GlyphDef>,
}

impl GlyphCatalog {
    /// Parse baked glyph JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The catalogue shipped with the crate (46 hiragana, 46 katakana, 10 digits).
    pub fn builtin() -> &'static GlyphCatalog {
        static BUILTIN: OnceLock<GlyphCatalog> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            GlyphCatalog::from_json(BUILTIN_JSON).expect("embedded glyph catalogue is valid JSON")
        })
    }

    fn list(&self, category: Category) -> &str {
        match category {
            Category::Hiragana => &self.categories.hiragana,
            Category::Katakana => &self.categories.katakana,
            Category::Digit => &self.categories.digit,
        }
    }

    /// Glyphs of a category in display order.
    pub fn glyphs(&self, category: Category) -> impl Iterator<Item = Glyph> + '_ {
        self.list(category).chars().map(move |ch| Glyph::new(category, ch))
    }

    /// First glyph of a category, selected when the category changes.
    pub fn default_glyph(&self, category: Category) -> Option<Glyph> {
        self.glyphs(category).next()
    }

    /// Validate a category/character pair against the catalogue.
    pub fn lookup(&self, category: Category, ch: char) -> Result<Glyph, PracticeError> {
        let key = ch.to_string();
        if self.list(category).contains(ch) && self.glyphs.contains_key(&key) {
            Ok(Glyph::new(category, ch))
        } else {
            Err(PracticeError::InvalidGlyph { category, ch })
        }
    }

    /// Stroke skeleton for a glyph, if the glyph belongs to this catalogue.
    pub fn def(&self, glyph: Glyph) -> Option<&GlyphDef> {
        if !self.list(glyph.category).contains(glyph.ch) {
            return None;
        }
        let key = glyph.ch.to_string();
        self.glyphs.get(&key)
    }

    /// Pen weight for a glyph in em units.
    pub fn weight(&self, def: &GlyphDef) -> f32 {
        def.weight.unwrap_or(self.meta.weight)
    }
}
