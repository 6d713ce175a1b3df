use serde::{Deserialize, Serialize};

/// Widest host window (CSS px) still treated as a phone-sized layout.
pub const MOBILE_MAX_WINDOW_WIDTH: u32 = 768;

/// Device class of the drawing surface.
///
/// Selects the scoring profile and where the reference glyph sits vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    #[default]
    Desktop,
    /// Touch-first layouts; graded with the lenient profile.
    Mobile,
}

impl DeviceClass {
    /// Classify from the host window width.
    pub fn from_window_width(window_width: u32) -> Self {
        if window_width <= MOBILE_MAX_WINDOW_WIDTH {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }

    pub fn is_mobile(self) -> bool {
        self == DeviceClass::Mobile
    }
}
