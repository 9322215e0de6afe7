//! Trope penalty arithmetic.
//!
//! The trope criterion starts at a fixed ceiling and loses points for
//! detected stereotype tropes. Two safety valves keep a long trope list
//! from nuking an otherwise strong portrayal:
//!
//! - the summed penalty is capped at a rate of the pre-penalty baseline,
//! - deliberate subversions earn a small bonus, itself capped.
//!
//! Duplicate occurrence ids are counted once; the first occurrence wins
//! and later duplicates contribute neither penalty nor bonus.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::critique::TropeOccurrence;
use crate::error::ScoreError;
use crate::score::round2;

/// Starting value of the trope criterion before penalties.
pub const TROPE_CEILING: f64 = 2.00;
/// The capped penalty never exceeds this share of the baseline score.
pub const PENALTY_CAP_RATE: f64 = 0.30;
/// Bonus credited per distinct subverted trope.
pub const SUBVERSION_BONUS_PER_INSTANCE: f64 = 0.10;
/// Ceiling on the total subversion bonus.
pub const MAX_SUBVERSION_BONUS: f64 = 0.25;

/// Every intermediate of the trope calculation, kept for display and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TropeBreakdown {
    /// Sum of per-occurrence penalties after dedup, before the cap.
    pub raw_penalty: f64,
    /// Penalty actually applied, `min(raw, cap_rate * baseline)`.
    pub capped_penalty: f64,
    /// Subversion credit, capped.
    pub subversion_bonus: f64,
    /// Final trope criterion value, floored at zero.
    pub adjusted_score: f64,
    /// Distinct occurrences that entered the sums.
    pub counted: usize,
    /// Distinct occurrences marked subverted.
    pub subversion_count: usize,
}

/// Run the full penalty/bonus pipeline against a deduplicated occurrence
/// list and a pre-penalty baseline.
pub fn evaluate(
    occurrences: &[TropeOccurrence],
    baseline_score: f64,
) -> Result<TropeBreakdown, ScoreError> {
    let mut seen = HashSet::new();
    let mut raw_penalty = 0.0;
    let mut counted = 0usize;
    let mut subversion_count = 0usize;

    for occ in occurrences {
        if !seen.insert(occ.id.as_str()) {
            continue;
        }
        if !occ.penalty.is_finite() || occ.penalty < 0.0 {
            return Err(ScoreError::OutOfRangeInput {
                field: format!("detected_tropes.{}.penalty", occ.id),
                value: occ.penalty,
                min: 0.0,
                max: f64::INFINITY,
            });
        }
        raw_penalty += occ.penalty;
        counted += 1;
        if occ.subverted {
            subversion_count += 1;
        }
    }

    let raw_penalty = round2(raw_penalty);
    let capped_penalty = round2(raw_penalty.min(PENALTY_CAP_RATE * baseline_score));
    let subversion_bonus = round2(
        (subversion_count as f64 * SUBVERSION_BONUS_PER_INSTANCE).min(MAX_SUBVERSION_BONUS),
    );
    let adjusted_score = round2((TROPE_CEILING - capped_penalty + subversion_bonus).max(0.0));

    Ok(TropeBreakdown {
        raw_penalty,
        capped_penalty,
        subversion_bonus,
        adjusted_score,
        counted,
        subversion_count,
    })
}
