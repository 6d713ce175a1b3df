//! Result tiers and the feedback shown for each.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Friendly outcome bucket for a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Excellent,
    Good,
    Retry,
}

/// Inclusive lower bounds of the upper two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub excellent: u32,
    pub good: u32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: 70,
            good: 40,
        }
    }
}

impl TierThresholds {
    pub fn classify(&self, composite: u32) -> Tier {
        if composite >= self.excellent {
            Tier::Excellent
        } else if composite >= self.good {
            Tier::Good
        } else {
            Tier::Retry
        }
    }
}

/// One sine tone of a feedback cue. Flat 4-float layout for the audio side.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct Tone {
    pub frequency_hz: f32,
    pub start_s: f32,
    pub duration_s: f32,
    pub gain: f32,
}

impl Tone {
    pub const FLOATS: usize = 4;

    const fn new(frequency_hz: f32, start_s: f32, duration_s: f32) -> Self {
        Self {
            frequency_hz,
            start_s,
            duration_s,
            gain: TONE_GAIN,
        }
    }
}

const TONE_GAIN: f32 = 0.2;

const C5: f32 = 523.25;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const G4: f32 = 392.00;
const E4: f32 = 329.63;

const EXCELLENT_TONES: [Tone; 3] = [
    Tone::new(C5, 0.0, 0.2),
    Tone::new(E5, 0.2, 0.2),
    Tone::new(G5, 0.4, 0.3),
];
const GOOD_TONES: [Tone; 2] = [Tone::new(G4, 0.0, 0.3), Tone::new(C5, 0.3, 0.3)];
const RETRY_TONES: [Tone; 1] = [Tone::new(E4, 0.0, 0.4)];

/// Presentation data for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Feedback {
    pub tier: Tier,
    pub stars: &'static str,
    pub message: &'static str,
    /// `#RRGGBB` accent colour for the message.
    pub color: &'static str,
    pub tones: &'static [Tone],
}

impl Tier {
    /// Star count shown for the tier (3/2/1).
    pub fn stars(self) -> u32 {
        match self {
            Tier::Excellent => 3,
            Tier::Good => 2,
            Tier::Retry => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Excellent => "excellent",
            Tier::Good => "good",
            Tier::Retry => "retry",
        }
    }

    pub fn tones(self) -> &'static [Tone] {
        match self {
            Tier::Excellent => &EXCELLENT_TONES,
            Tier::Good => &GOOD_TONES,
            Tier::Retry => &RETRY_TONES,
        }
    }

    pub fn feedback(self) -> Feedback {
        let (stars, message, color) = match self {
            Tier::Excellent => ("⭐⭐⭐", "すごい！", "#4CAF50"),
            Tier::Good => ("⭐⭐", "がんばったね！", "#FFC107"),
            Tier::Retry => ("⭐", "もう一度チャレンジ！", "#FF5722"),
        };
        Feedback {
            tier: self,
            stars,
            message,
            color,
            tones: self.tones(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive() {
        let t = TierThresholds::default();
        assert_eq!(t.classify(100), Tier::Excellent);
        assert_eq!(t.classify(70), Tier::Excellent);
        assert_eq!(t.classify(69), Tier::Good);
        assert_eq!(t.classify(40), Tier::Good);
        assert_eq!(t.classify(39), Tier::Retry);
        assert_eq!(t.classify(0), Tier::Retry);
    }

    #[test]
    fn classify_is_monotone() {
        let t = TierThresholds::default();
        let mut prev = t.classify(0).stars();
        for score in 1..=100 {
            let stars = t.classify(score).stars();
            assert!(stars >= prev);
            prev = stars;
        }
    }

    #[test]
    fn feedback_matches_tier() {
        let fb = Tier::Excellent.feedback();
        assert_eq!(fb.stars.chars().count(), 3);
        assert_eq!(fb.message, "すごい！");
        assert_eq!(fb.tones.len(), 3);

        assert_eq!(Tier::Good.feedback().stars.chars().count(), 2);
        assert_eq!(Tier::Retry.feedback().tones[0].frequency_hz, 329.63);
    }

    #[test]
    fn tones_are_ordered_and_flat() {
        for tier in [Tier::Excellent, Tier::Good, Tier::Retry] {
            let tones = tier.tones();
            assert!(tones.windows(2).all(|w| w[0].start_s < w[1].start_s));
            let flat: &[f32] = bytemuck::cast_slice(tones);
            assert_eq!(flat.len(), tones.len() * Tone::FLOATS);
        }
    }
}
