//! # Scoring Engine
//!
//! Deterministic pipeline from a parsed critique to a graded report:
//!
//! 1. Validate the critique against the active rubric profile.
//! 2. Resolve the three (or four, with dignity enabled) weighted criteria.
//! 3. Compute the pre-penalty baseline with the trope criterion at its
//!    ceiling.
//! 4. Run the trope penalty/bonus arithmetic against that baseline.
//! 5. Sum, clamp to the 0..=10 scale, and classify into a grade band.
//!
//! Every boundary value is rounded to two decimals, so identical input
//! always produces a bit-identical report. The engine is side-effect free;
//! callers that want logging or metrics wrap it.

pub mod criteria;
pub mod grade;
pub mod tropes;

use serde::{Deserialize, Serialize};

use crate::catalog::TropeCatalog;
use crate::critique::{CriterionFindings, Critique};
use crate::error::ScoreError;
use crate::rubric::RubricConfig;
use crate::score::criteria::CriterionSpec;
use crate::score::tropes::TropeBreakdown;

/// Upper bound of the overall scale.
pub const FINAL_SCORE_MAX: f64 = 10.0;

/// Round to two decimal places, half away from zero. Applied at every
/// arithmetic boundary so intermediate noise can never reach the output.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-criterion results on the 0..=2 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScores {
    pub individuality: f64,
    pub cultural_identity: f64,
    pub trope_interrogation: f64,
    pub narrative_impact: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_dignity: Option<f64>,
}

/// The complete output of one scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    /// Which rubric profile produced this report.
    pub rubric_version: String,
    pub criteria: CriterionScores,
    pub tropes: TropeBreakdown,
    /// Sum with the trope criterion at its ceiling, before penalties.
    pub base_score: f64,
    /// Penalised, clamped overall score on the 0..=10 scale.
    pub final_score: f64,
    pub grade: String,
    pub grade_label: String,
}

fn scored_section<'a>(
    section: &'a Option<CriterionFindings>,
    spec: &CriterionSpec,
) -> Result<&'a CriterionFindings, ScoreError> {
    section.as_ref().ok_or_else(|| {
        ScoreError::malformed(format!("missing criterion section: {}", spec.name))
    })
}

/// Score one critique under a rubric profile and trope catalog.
pub fn score_critique(
    critique: &Critique,
    rubric: &RubricConfig,
    catalog: &TropeCatalog,
) -> Result<ScoreReport, ScoreError> {
    critique.validate(rubric.dignity.enabled)?;

    let q1 = criteria::criterion_score(
        &criteria::INDIVIDUALITY,
        &scored_section(&critique.individuality, &criteria::INDIVIDUALITY)?.sub_scores,
    )?;
    let q2 = criteria::criterion_score(
        &criteria::CULTURAL_IDENTITY,
        &scored_section(&critique.cultural_identity, &criteria::CULTURAL_IDENTITY)?.sub_scores,
    )?;
    let q4 = criteria::criterion_score(
        &criteria::NARRATIVE_IMPACT,
        &scored_section(&critique.narrative_impact, &criteria::NARRATIVE_IMPACT)?.sub_scores,
    )?;
    let q5 = if rubric.dignity.enabled {
        Some(criteria::criterion_score(
            &criteria::NARRATIVE_DIGNITY,
            &scored_section(&critique.narrative_dignity, &criteria::NARRATIVE_DIGNITY)?.sub_scores,
        )?)
    } else {
        None
    };

    let occurrences = critique
        .trope_interrogation
        .as_ref()
        .and_then(|t| t.detected_tropes.as_deref())
        .ok_or_else(|| {
            ScoreError::malformed("missing trope interrogation: detected_tropes")
        })?;
    catalog.check_occurrences(occurrences)?;

    // Baseline takes the trope criterion at its ceiling so the penalty cap
    // reflects how strong the portrayal is before tropes are considered.
    let base_score = round2(q1 + q2 + tropes::TROPE_CEILING + q4 + q5.unwrap_or(0.0));

    let breakdown = tropes::evaluate(occurrences, base_score)?;

    let total = q1 + q2 + breakdown.adjusted_score + q4 + q5.unwrap_or(0.0);
    let final_score = round2(total.clamp(0.0, FINAL_SCORE_MAX));

    let (grade, label) = grade::classify(final_score, &rubric.bands);

    Ok(ScoreReport {
        rubric_version: rubric.version.clone(),
        criteria: CriterionScores {
            individuality: q1,
            cultural_identity: q2,
            trope_interrogation: breakdown.adjusted_score,
            narrative_impact: q4,
            narrative_dignity: q5,
        },
        tropes: breakdown,
        base_score,
        final_score,
        grade: grade.to_string(),
        grade_label: label.to_string(),
    })
}
