//! Scoring configuration: device profiles, category weights and tier thresholds.
//!
//! Everything here is plain data with the tuned constants as defaults. A JSON
//! document may override any top-level section.

use serde::{Deserialize, Serialize};

use crate::device::DeviceClass;
use crate::glyphs::Category;
use crate::scoring::tier::TierThresholds;

/// Per-device leniency knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringProfile {
    /// Fraction of on-ink points that earns full accuracy.
    pub accuracy_threshold: f32,
    /// Neighbourhood radius (px) searched for ink around each point; 0 = exact pixel.
    pub accuracy_radius: f32,
    /// Multiplier on half the pen width for the coverage window.
    pub coverage_radius_scale: f32,
    /// Multiplier on the pen width for key-point reach.
    pub key_point_reach: f32,
    /// Extra multiplier on the key-point score.
    pub key_point_boost: f32,
    /// Multiplier applied to every sub-score before weighting.
    pub sub_score_scale: f32,
    /// Flat bonus added to the composite.
    pub bonus: f32,
}

impl ScoringProfile {
    /// Desktop grading.
    pub const STRICT: Self = Self {
        accuracy_threshold: 0.6,
        accuracy_radius: 0.0,
        coverage_radius_scale: 1.0,
        key_point_reach: 1.5,
        key_point_boost: 1.0,
        sub_score_scale: 1.0,
        bonus: 0.0,
    };

    /// Touch grading: fingers are wider and less precise than a mouse.
    pub const LENIENT: Self = Self {
        accuracy_threshold: 0.4,
        accuracy_radius: 3.0,
        coverage_radius_scale: 1.5,
        key_point_reach: 3.0,
        key_point_boost: 1.5,
        sub_score_scale: 1.2,
        bonus: 10.0,
    };
}

/// Raise coverage to `coverage` once the key-point score reaches `min_key_points`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageFloor {
    pub min_key_points: f32,
    pub coverage: f32,
}

/// Cap the weighted sum at `ceiling` while both coverage and key points stay low.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffortCeiling {
    pub coverage_below: f32,
    pub key_points_below: f32,
    pub ceiling: f32,
}

/// Sub-score weights and adjustments for one glyph category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub accuracy: f32,
    pub coverage: f32,
    pub key_points: f32,
    /// Multiplier on the key-point score before the profile boost.
    pub key_point_boost: f32,
    #[serde(default)]
    pub coverage_floor: Option<CoverageFloor>,
    #[serde(default)]
    pub effort_ceiling: Option<EffortCeiling>,
}

impl CategoryWeights {
    /// Digits are simple shapes: hitting the key points matters most.
    pub const DIGIT: Self = Self {
        accuracy: 0.2,
        coverage: 0.3,
        key_points: 0.5,
        key_point_boost: 1.3,
        coverage_floor: Some(CoverageFloor {
            min_key_points: 60.0,
            coverage: 50.0,
        }),
        effort_ceiling: None,
    };

    pub const KANA: Self = Self {
        accuracy: 0.25,
        coverage: 0.35,
        key_points: 0.4,
        key_point_boost: 1.0,
        coverage_floor: None,
        effort_ceiling: Some(EffortCeiling {
            coverage_below: 20.0,
            key_points_below: 30.0,
            ceiling: 40.0,
        }),
    };
}

/// Complete scoring configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub desktop: ScoringProfile,
    pub mobile: ScoringProfile,
    pub digit: CategoryWeights,
    pub kana: CategoryWeights,
    pub tiers: TierThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            desktop: ScoringProfile::STRICT,
            mobile: ScoringProfile::LENIENT,
            digit: CategoryWeights::DIGIT,
            kana: CategoryWeights::KANA,
            tiers: TierThresholds::default(),
        }
    }
}

impl ScoringConfig {
    /// Parse a configuration from JSON. Missing sections keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn profile(&self, device: DeviceClass) -> &ScoringProfile {
        match device {
            DeviceClass::Desktop => &self.desktop,
            DeviceClass::Mobile => &self.mobile,
        }
    }

    pub fn weights(&self, category: Category) -> &CategoryWeights {
        match category {
            Category::Digit => &self.digit,
            Category::Hiragana | Category::Katakana => &self.kana,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weights_sum_to_one() {
        for w in [CategoryWeights::DIGIT, CategoryWeights::KANA] {
            let sum = w.accuracy + w.coverage + w.key_points;
            assert!((sum - 1.0).abs() < 1e-6, "{w:?} sums to {sum}");
        }
    }

    #[test]
    fn profile_and_weights_follow_inputs() {
        let config = ScoringConfig::default();
        assert_eq!(*config.profile(DeviceClass::Mobile), ScoringProfile::LENIENT);
        assert_eq!(*config.profile(DeviceClass::Desktop), ScoringProfile::STRICT);
        assert_eq!(*config.weights(Category::Katakana), CategoryWeights::KANA);
        assert_eq!(*config.weights(Category::Digit), CategoryWeights::DIGIT);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ScoringConfig::from_json(r#"{ "tiers": { "excellent": 80 } }"#).unwrap();
        assert_eq!(config.tiers.excellent, 80);
        assert_eq!(config.tiers.good, 40);
        assert_eq!(config.desktop, ScoringProfile::STRICT);
        assert_eq!(config.digit, CategoryWeights::DIGIT);
    }

    #[test]
    fn json_round_trip_preserves_overrides() {
        let mut config = ScoringConfig::default();
        config.mobile.bonus = 5.0;
        config.kana.effort_ceiling = None;
        let parsed = ScoringConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ScoringConfig::from_json("{ \"desktop\": 3 }").is_err());
    }
}
