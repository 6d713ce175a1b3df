//! Errors raised by the practice engine.

use std::fmt;

use crate::glyphs::Category;

/// Caller precondition violations. None of these are transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PracticeError {
    /// The character is not part of the given category's glyph set.
    InvalidGlyph { category: Category, ch: char },
    /// Canvas width or height was zero.
    InvalidDimensions { width: u32, height: u32 },
    /// A pen colour string could not be parsed as `#RRGGBB`.
    InvalidColor(String),
}

impl fmt::Display for PracticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGlyph { category, ch } => {
                write!(f, "invalid glyph: {ch:?} is not in category {}", category.name())
            }
            Self::InvalidDimensions { width, height } => {
                write!(f, "invalid canvas dimensions: {width}x{height}")
            }
            Self::InvalidColor(s) => write!(f, "invalid pen colour: {s:?}"),
        }
    }
}

impl std::error::Error for PracticeError {}
