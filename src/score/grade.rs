//! Grade band lookup.
//!
//! A grading table is an ordered list of `(min, grade, label)` rows. The
//! final score is matched against rows from the top; the first row whose
//! minimum the score meets (inclusive) wins. Tables are validated at load
//! so a lookup can never fall between bands.

use crate::error::ScoreError;
use crate::rubric::GradeBand;

/// Find the grade and label for a final score.
///
/// Assumes a validated table (strictly descending minimums, last row at
/// 0.0). The fallback arm exists so the function stays total even if an
/// unvalidated table sneaks in.
pub fn classify(final_score: f64, bands: &[GradeBand]) -> (&str, &str) {
    for band in bands {
        if final_score >= band.min {
            return (&band.grade, &band.label);
        }
    }
    bands
        .last()
        .map(|b| (b.grade.as_str(), b.label.as_str()))
        .unwrap_or(("F", "ungraded"))
}

/// Structural checks run when a rubric profile is loaded.
pub fn validate_bands(bands: &[GradeBand]) -> Result<(), ScoreError> {
    if bands.is_empty() {
        return Err(ScoreError::Configuration(
            "grading table has no bands".to_string(),
        ));
    }
    let mut prev: Option<f64> = None;
    for band in bands {
        if band.grade.is_empty() {
            return Err(ScoreError::Configuration(format!(
                "grading band at min {} has an empty grade",
                band.min
            )));
        }
        if !band.min.is_finite() || !(0.0..=10.0).contains(&band.min) {
            return Err(ScoreError::Configuration(format!(
                "grading band '{}' has min {} outside 0..=10",
                band.grade, band.min
            )));
        }
        if let Some(p) = prev {
            if band.min >= p {
                return Err(ScoreError::Configuration(format!(
                    "grading bands must strictly descend: {} then {}",
                    p, band.min
                )));
            }
        }
        prev = Some(band.min);
    }
    let last = bands.last().map(|b| b.min).unwrap_or(1.0);
    if last != 0.0 {
        return Err(ScoreError::Configuration(format!(
            "last grading band must start at 0.0, found {last}"
        )));
    }
    Ok(())
}
