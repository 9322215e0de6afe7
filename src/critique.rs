// src/critique.rs
//! Typed intake for the untrusted upstream critique payload.
//!
//! The payload comes from a language model and is treated as hostile input:
//! every section is optional at the parse stage so that `validate()` can
//! report the complete list of problems in one pass, instead of failing on
//! the first missing field. Numeric and enum leaves are typed, so a
//! non-numeric sub-score or an unknown severity/casting flag is rejected at
//! the JSON boundary with a `MalformedInput` error.
//!
//! Nothing here does arithmetic. Range checks are the engine's job and stay
//! strict there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::score::criteria::{self, CriterionSpec};

/// Severity of a detected trope, as cataloged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TropeSeverity {
    Minor,
    Moderate,
    Major,
}

/// Casting-authenticity flag attached to a critique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastingFlag {
    Authentic,
    Approximate,
    Yellowface,
    NotApplicable,
    #[default]
    Unknown,
}

/// One detected instance of a cataloged trope.
///
/// The occurrence list is the source of truth for `penalty`; the catalog is
/// consulted only to confirm the id exists. `register` is free-form text
/// from the model and never participates in arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TropeOccurrence {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub severity: TropeSeverity,
    pub penalty: f64,
    #[serde(default)]
    pub register: String,
    #[serde(default)]
    pub subverted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subversion_description: Option<String>,
}

/// Casting section: the flag plus optional reviewer notes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Casting {
    pub flag: CastingFlag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One weighted criterion's findings: named sub-scores plus justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionFindings {
    #[serde(default)]
    pub sub_scores: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// Trope-interrogation findings. `detected_tropes` stays `Option` so a
/// missing list is distinguishable from an empty one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TropeFindings {
    #[serde(default)]
    pub detected_tropes: Option<Vec<TropeOccurrence>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// The full critique payload as received from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Critique {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub casting: Option<Casting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub individuality: Option<CriterionFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cultural_identity: Option<CriterionFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trope_interrogation: Option<TropeFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_impact: Option<CriterionFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_dignity: Option<CriterionFindings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
}

impl Critique {
    /// Parse a raw JSON payload. Unparseable input (including non-numeric
    /// sub-scores and unknown enum values) is a `MalformedInput`.
    pub fn from_json(raw: &str) -> Result<Self, ScoreError> {
        serde_json::from_str(raw)
            .map_err(|e| ScoreError::malformed(format!("unparseable critique payload: {e}")))
    }

    /// Casting flag with the documented `unknown` default when the section
    /// is absent. The validator still reports the absence; this accessor is
    /// for callers that continue despite it.
    pub fn casting_flag(&self) -> CastingFlag {
        self.casting.as_ref().map(|c| c.flag).unwrap_or_default()
    }

    /// Detected occurrences, or an empty slice when the section is absent.
    pub fn detected_tropes(&self) -> &[TropeOccurrence] {
        self.trope_interrogation
            .as_ref()
            .and_then(|t| t.detected_tropes.as_deref())
            .unwrap_or(&[])
    }

    /// Check that every section the active rubric needs is present and
    /// complete. Collects every problem before failing, so the caller can
    /// surface the whole list at once.
    pub fn validate(&self, dignity_enabled: bool) -> Result<(), ScoreError> {
        let mut issues = Vec::new();

        if self.character_name.as_deref().map_or(true, str::is_empty) {
            issues.push("missing required field: character_name".to_string());
        }
        if self.media_title.as_deref().map_or(true, str::is_empty) {
            issues.push("missing required field: media_title".to_string());
        }
        if self.casting.is_none() {
            issues.push("missing required field: casting".to_string());
        }

        check_criterion(&mut issues, &criteria::INDIVIDUALITY, self.individuality.as_ref());
        check_criterion(
            &mut issues,
            &criteria::CULTURAL_IDENTITY,
            self.cultural_identity.as_ref(),
        );
        check_criterion(
            &mut issues,
            &criteria::NARRATIVE_IMPACT,
            self.narrative_impact.as_ref(),
        );
        if dignity_enabled {
            check_criterion(
                &mut issues,
                &criteria::NARRATIVE_DIGNITY,
                self.narrative_dignity.as_ref(),
            );
        }

        match self.trope_interrogation.as_ref() {
            None => issues.push("missing required section: trope_interrogation".to_string()),
            Some(findings) if findings.detected_tropes.is_none() => {
                issues.push("trope_interrogation.detected_tropes must be a list".to_string())
            }
            Some(_) => {}
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ScoreError::MalformedInput { issues })
        }
    }
}

fn check_criterion(
    issues: &mut Vec<String>,
    spec: &CriterionSpec,
    findings: Option<&CriterionFindings>,
) {
    let Some(findings) = findings else {
        issues.push(format!("missing required section: {}", spec.name));
        return;
    };
    for key in spec.keys {
        if !findings.sub_scores.contains_key(key) {
            issues.push(format!(
                "missing or non-numeric {} sub-score: {key}",
                spec.name
            ));
        }
    }
}
