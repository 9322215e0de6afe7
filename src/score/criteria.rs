//! Weighted criterion scoring.
//!
//! Each qualitative criterion is resolved from exactly three sub-scores,
//! every one on the 0..=2 scale, combined with fixed per-criterion weights
//! that sum to 1.0. The result is rounded to two decimals before any
//! downstream arithmetic sees it.

use std::collections::BTreeMap;

use crate::error::ScoreError;
use crate::score::round2;

pub const SUB_SCORE_MIN: f64 = 0.0;
pub const SUB_SCORE_MAX: f64 = 2.0;

/// Static description of one weighted criterion: which sub-score keys it
/// reads and how much each contributes.
#[derive(Debug, Clone, Copy)]
pub struct CriterionSpec {
    pub name: &'static str,
    pub keys: [&'static str; 3],
    pub weights: [f64; 3],
}

pub const INDIVIDUALITY: CriterionSpec = CriterionSpec {
    name: "individuality",
    keys: [
        "1a_goal_independence",
        "1b_moral_complexity",
        "1c_emotional_interiority",
    ],
    weights: [0.40, 0.35, 0.25],
};

pub const CULTURAL_IDENTITY: CriterionSpec = CriterionSpec {
    name: "cultural_identity",
    keys: [
        "2a_explicit_identity",
        "2b_cultural_accuracy",
        "2c_internalized_heritage",
    ],
    weights: [0.35, 0.35, 0.30],
};

pub const NARRATIVE_IMPACT: CriterionSpec = CriterionSpec {
    name: "narrative_impact",
    keys: [
        "4a_plot_counterfactual",
        "4b_emotional_counterfactual",
        "4c_irreversible_decision",
    ],
    weights: [0.40, 0.35, 0.25],
};

pub const NARRATIVE_DIGNITY: CriterionSpec = CriterionSpec {
    name: "narrative_dignity",
    keys: [
        "5a_framing_dignity",
        "5b_peer_engagement",
        "5c_cultural_framing",
    ],
    weights: [0.40, 0.35, 0.25],
};

/// Compute one criterion score from a sub-score map.
///
/// Every key the spec lists must be present, finite, and inside
/// `SUB_SCORE_MIN..=SUB_SCORE_MAX`. Out-of-range values are rejected, never
/// clamped; silent repair would hide a broken critique generator.
pub fn criterion_score(
    spec: &CriterionSpec,
    sub_scores: &BTreeMap<String, f64>,
) -> Result<f64, ScoreError> {
    let mut total = 0.0;
    for (key, weight) in spec.keys.iter().zip(spec.weights.iter()) {
        let value = *sub_scores.get(*key).ok_or_else(|| {
            ScoreError::malformed(format!(
                "missing or non-numeric {} sub-score: {key}",
                spec.name
            ))
        })?;
        if !value.is_finite() || !(SUB_SCORE_MIN..=SUB_SCORE_MAX).contains(&value) {
            return Err(ScoreError::OutOfRangeInput {
                field: format!("{}.{key}", spec.name),
                value,
                min: SUB_SCORE_MIN,
                max: SUB_SCORE_MAX,
            });
        }
        total += value * weight;
    }
    Ok(round2(total))
}
