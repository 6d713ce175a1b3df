//! Stroke scoring.
//!
//! Three sub-scores, each in 0..=100, compare the learner's sample points with
//! the template:
//!
//! - accuracy: how many points land on ink
//! - coverage: how much of the ink the pen footprint touched
//! - key points: how many silhouette samples some point came close to
//!
//! [`CompositeRule`] folds them into one integer using the category weights
//! and the device profile.

use serde::Serialize;

use crate::device::DeviceClass;
use crate::glyphs::Category;
use crate::input::SamplePoint;
use crate::raster::{KeyPoint, OpacityMask};
use crate::scoring::profile::{CategoryWeights, ScoringConfig, ScoringProfile};
use crate::scoring::tier::{Tier, TierThresholds};

const MAX_SCORE: f32 = 100.0;

/// Guards the final truncation against f32 noise (e.g. 99.99999 for a perfect trace).
const TRUNCATION_EPSILON: f64 = 1e-6;

/// Scoring knobs resolved once per check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub profile: ScoringProfile,
    pub weights: CategoryWeights,
    pub tiers: TierThresholds,
}

impl ScoreContext {
    pub fn resolve(config: &ScoringConfig, device: DeviceClass, category: Category) -> Self {
        Self {
            profile: *config.profile(device),
            weights: *config.weights(category),
            tiers: config.tiers,
        }
    }
}

/// Raw sub-scores, each in 0..=100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SubScores {
    pub accuracy: f32,
    pub coverage: f32,
    pub key_points: f32,
}

/// Result of one check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Score {
    pub accuracy: f32,
    pub coverage: f32,
    pub key_points: f32,
    pub composite: u32,
    pub tier: Tier,
}

impl Score {
    /// Score of an attempt with no sample points.
    pub const EMPTY: Self = Self {
        accuracy: 0.0,
        coverage: 0.0,
        key_points: 0.0,
        composite: 0,
        tier: Tier::Retry,
    };
}

/// Percentage of points on ink, scaled so that `accuracy_threshold` of them earns 100.
pub fn accuracy(points: &[SamplePoint], mask: &OpacityMask, profile: &ScoringProfile) -> f32 {
    if points.is_empty() {
        return 0.0;
    }
    let hits = points
        .iter()
        .filter(|p| {
            if profile.accuracy_radius > 0.0 {
                mask.ink_within(p.pos(), profile.accuracy_radius)
            } else {
                mask.ink_at(p.pos())
            }
        })
        .count();

    let ratio = hits as f32 / points.len() as f32;
    let threshold = profile.accuracy_threshold.max(f32::EPSILON);
    (ratio / threshold * MAX_SCORE).min(MAX_SCORE)
}

/// Percentage of template ink pixels inside the square footprint of some point.
pub fn coverage(points: &[SamplePoint], mask: &OpacityMask, profile: &ScoringProfile) -> f32 {
    let total = mask.ink_pixel_count();
    if total == 0 || points.is_empty() {
        return 0.0;
    }

    let (w, h) = (mask.width() as i64, mask.height() as i64);
    let mut seen = vec![false; mask.size().pixel_count()];
    let mut covered = 0usize;

    for p in points {
        let r = p.width * 0.5 * profile.coverage_radius_scale;
        let x0 = ((p.x - r).floor() as i64).max(0);
        let x1 = ((p.x + r).floor() as i64).min(w - 1);
        let y0 = ((p.y - r).floor() as i64).max(0);
        let y1 = ((p.y + r).floor() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let idx = (y * w + x) as usize;
                if !seen[idx] && mask.is_ink(x, y) {
                    seen[idx] = true;
                    covered += 1;
                }
            }
        }
    }

    (covered as f32 / total as f32 * MAX_SCORE).min(MAX_SCORE)
}

/// Percentage of key points within `width × key_point_reach` of some point.
pub fn key_point_coverage(
    points: &[SamplePoint],
    key_points: &[KeyPoint],
    profile: &ScoringProfile,
) -> f32 {
    if key_points.is_empty() || points.is_empty() {
        return 0.0;
    }
    let reached = key_points
        .iter()
        .filter(|kp| {
            let target = kp.pos();
            points.iter().any(|p| {
                let reach = p.width * profile.key_point_reach;
                p.pos().distance_squared(target) <= reach * reach
            })
        })
        .count();

    reached as f32 / key_points.len() as f32 * MAX_SCORE
}

/// Folds sub-scores into the composite. Every step is non-decreasing in
/// each input, so the composite is monotone in every sub-score.
pub struct CompositeRule;

impl CompositeRule {
    pub fn combine(sub: SubScores, ctx: &ScoreContext) -> u32 {
        let profile = &ctx.profile;
        let weights = &ctx.weights;
        let cap = |v: f64| v.clamp(0.0, MAX_SCORE as f64);

        let key_points = cap(
            sub.key_points as f64 * weights.key_point_boost as f64 * profile.key_point_boost as f64,
        );

        let mut coverage = sub.coverage as f64;
        if let Some(floor) = weights.coverage_floor {
            if key_points >= floor.min_key_points as f64 {
                coverage = coverage.max(floor.coverage as f64);
            }
        }

        let scale = profile.sub_score_scale as f64;
        let accuracy = cap(sub.accuracy as f64 * scale);
        let coverage = cap(coverage * scale);
        let key_points = cap(key_points * scale);

        let mut total = accuracy * weights.accuracy as f64
            + coverage * weights.coverage as f64
            + key_points * weights.key_points as f64;

        if let Some(ceiling) = weights.effort_ceiling {
            if coverage < ceiling.coverage_below as f64
                && key_points < ceiling.key_points_below as f64
            {
                total = total.min(ceiling.ceiling as f64);
            }
        }

        let total = cap(total + profile.bonus as f64);
        (total + TRUNCATION_EPSILON).floor().min(MAX_SCORE as f64) as u32
    }
}

/// Score `points` against a rendered template.
pub fn score(
    points: &[SamplePoint],
    mask: &OpacityMask,
    key_points: &[KeyPoint],
    ctx: &ScoreContext,
) -> Score {
    if points.is_empty() {
        return Score::EMPTY;
    }

    let sub = SubScores {
        accuracy: accuracy(points, mask, &ctx.profile),
        coverage: coverage(points, mask, &ctx.profile),
        key_points: key_point_coverage(points, key_points, &ctx.profile),
    };
    let composite = CompositeRule::combine(sub, ctx);

    Score {
        accuracy: sub.accuracy,
        coverage: sub.coverage,
        key_points: sub.key_points,
        composite,
        tier: ctx.tiers.classify(composite),
    }
}
