//! Caution and distinction list predicates.
//!
//! Pure threshold checks against the active rubric profile. Listing itself
//! (and any editorial veto) happens elsewhere; these only answer whether a
//! portrayal qualifies.

use crate::critique::{CastingFlag, TropeOccurrence, TropeSeverity};
use crate::rubric::RubricConfig;

/// A portrayal is caution-eligible when its final score falls below the
/// profile threshold, or when yellowface casting compounds a major trope
/// regardless of how well the writing scored.
pub fn caution_eligible(
    final_score: f64,
    casting: CastingFlag,
    occurrences: &[TropeOccurrence],
    rubric: &RubricConfig,
) -> bool {
    if final_score < rubric.eligibility.caution_below {
        return true;
    }
    casting == CastingFlag::Yellowface
        && occurrences
            .iter()
            .any(|occ| occ.severity == TropeSeverity::Major)
}

/// Distinction requires both a high final score and a track record of
/// analyses, so one generous critique cannot put a character on the list.
pub fn distinction_eligible(final_score: f64, analysis_count: u32, rubric: &RubricConfig) -> bool {
    final_score >= rubric.eligibility.distinction_min
        && analysis_count >= rubric.eligibility.distinction_min_analyses
}
