pub mod engine;
pub mod profile;
pub mod tier;

pub use engine::{
    accuracy, coverage, key_point_coverage, score, CompositeRule, Score, ScoreContext, SubScores,
};
pub use profile::{CategoryWeights, CoverageFloor, EffortCeiling, ScoringConfig, ScoringProfile};
pub use tier::{Feedback, Tier, TierThresholds, Tone};
