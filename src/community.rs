//! # Community Confidence
//!
//! Readers vote agree / indifferent / disagree on four published rule
//! verdicts per character. Votes are partitioned into an audience and a
//! critic cohort and each cohort is scored separately on the same 0..=2
//! scale the criteria use. A cohort below the vote quorum reports no score
//! at all rather than a noisy one.
//!
//! Also home to the Bayesian shrinkage used for leaderboard ordering:
//! characters with few analyses are pulled toward the global mean so a
//! single enthusiastic critique cannot top the table.

use serde::{Deserialize, Serialize};

use crate::rubric::RubricConfig;
use crate::score::round2;

/// The four votable rule verdicts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum VoteRule {
    Individuality,
    CulturalIdentity,
    TropeInterrogation,
    NarrativeImpact,
}

impl VoteRule {
    pub const ALL: [VoteRule; 4] = [
        VoteRule::Individuality,
        VoteRule::CulturalIdentity,
        VoteRule::TropeInterrogation,
        VoteRule::NarrativeImpact,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteRule::Individuality => "individuality",
            VoteRule::CulturalIdentity => "cultural_identity",
            VoteRule::TropeInterrogation => "trope_interrogation",
            VoteRule::NarrativeImpact => "narrative_impact",
        }
    }
}

/// A single reader's stance on one rule verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteValue {
    Agree,
    Indifferent,
    Disagree,
}

impl VoteValue {
    pub fn signed(&self) -> i32 {
        match self {
            VoteValue::Agree => 1,
            VoteValue::Indifferent => 0,
            VoteValue::Disagree => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    Audience,
    Critic,
}

/// Scored cohorts for one rule. `None` means the cohort has not reached
/// quorum; counts are reported either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleScores {
    pub audience_score: Option<f64>,
    pub critic_score: Option<f64>,
    pub audience_votes: usize,
    pub critic_votes: usize,
}

/// Map one cohort's votes onto the 0..=2 scale.
///
/// Each vote contributes `signed * weight` against a maximum of
/// `len * weight`; the ratio in -1..=1 is then rescaled. The weight cancels
/// within a single cohort; it matters only if cohorts are ever pooled.
pub fn weighted_cohort_score(votes: &[VoteValue], weight: f64) -> f64 {
    if votes.is_empty() {
        return 0.0;
    }
    let total: f64 = votes.iter().map(|v| f64::from(v.signed()) * weight).sum();
    let max_possible = votes.len() as f64 * weight;
    round2(((total / max_possible + 1.0) / 2.0) * 2.0)
}

/// Partition votes by cohort and score each, applying the quorum gate.
pub fn rule_scores(votes: &[(Cohort, VoteValue)], rubric: &RubricConfig) -> RuleScores {
    let audience: Vec<VoteValue> = votes
        .iter()
        .filter(|(c, _)| *c == Cohort::Audience)
        .map(|(_, v)| *v)
        .collect();
    let critics: Vec<VoteValue> = votes
        .iter()
        .filter(|(c, _)| *c == Cohort::Critic)
        .map(|(_, v)| *v)
        .collect();

    let quorum = rubric.confidence.min_cohort_votes as usize;
    let critic_weight = rubric.confidence.critic_weight;

    RuleScores {
        audience_score: (audience.len() >= quorum)
            .then(|| weighted_cohort_score(&audience, 1.0)),
        critic_score: (critics.len() >= quorum)
            .then(|| weighted_cohort_score(&critics, critic_weight)),
        audience_votes: audience.len(),
        critic_votes: critics.len(),
    }
}

/// Bayesian shrinkage of a per-character mean toward the global mean.
///
/// With `v` analyses, mean `R`, global mean `C`, and pseudo-count `m`:
/// `(v*R + m*C) / (v + m)`. Zero analyses report the global mean directly.
pub fn shrink_toward_global(
    item_mean: f64,
    sample_count: u32,
    global_mean: f64,
    rubric: &RubricConfig,
) -> f64 {
    let m = rubric.confidence.bayesian_m;
    if sample_count == 0 {
        return round2(global_mean);
    }
    let v = f64::from(sample_count);
    round2((v * item_mean + m * global_mean) / (v + m))
}
