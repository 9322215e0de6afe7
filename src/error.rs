// src/error.rs
//! Typed error taxonomy for the scoring engine.
//!
//! Three kinds, and callers branch on the kind rather than message text:
//! - `MalformedInput`: a required field is missing or unparseable. The
//!   upstream response should be regenerated; the engine never substitutes
//!   defaults for required values.
//! - `OutOfRangeInput`: numeric but outside its documented bound. Policy is
//!   strict rejection, never clamping.
//! - `Configuration`: rubric/catalog defect. Fatal; surfaces at startup
//!   validation where possible.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    /// One or more required fields are missing or unparseable. Carries the
    /// full issue list so a caller can report everything at once.
    #[error("malformed critique input: {}", .issues.join("; "))]
    MalformedInput { issues: Vec<String> },

    /// A numeric value is outside its documented bound.
    #[error("{field} out of range: {value} (allowed {min:.2}..={max:.2})")]
    OutOfRangeInput {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Rubric or catalog defect. Not a per-request condition.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ScoreError {
    /// Single-issue `MalformedInput` shorthand.
    pub fn malformed(issue: impl Into<String>) -> Self {
        Self::MalformedInput {
            issues: vec![issue.into()],
        }
    }

    /// Whether the caller can recover by regenerating the upstream payload.
    /// Configuration defects cannot be retried away.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }

    /// Stable kind tag, usable as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput { .. } => "malformed_input",
            Self::OutOfRangeInput { .. } => "out_of_range_input",
            Self::Configuration(_) => "configuration",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_joins_issues() {
        let err = ScoreError::MalformedInput {
            issues: vec!["missing a".into(), "missing b".into()],
        };
        let text = err.to_string();
        assert!(text.contains("missing a; missing b"), "got: {text}");
    }

    #[test]
    fn recoverability_follows_kind() {
        assert!(ScoreError::malformed("x").is_recoverable());
        assert!(ScoreError::OutOfRangeInput {
            field: "f".into(),
            value: 3.0,
            min: 0.0,
            max: 2.0,
        }
        .is_recoverable());
        assert!(!ScoreError::Configuration("bad bands".into()).is_recoverable());
    }

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(ScoreError::malformed("x").kind(), "malformed_input");
        assert_eq!(
            ScoreError::Configuration("x".into()).kind(),
            "configuration"
        );
    }
}
