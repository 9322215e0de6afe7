//! # Character Roster
//!
//! In-memory state for everything keyed by character: recorded analyses
//! and community vote ledgers, plus the derived views (per-character
//! summary, shrinkage-weighted leaderboard). The scoring engine stays
//! pure; logging and metrics live in this layer.
//!
//! Scoring happens before the map lock is taken; the critical section is
//! a single insert.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::TropeCatalog;
use crate::community::{self, Cohort, RuleScores, VoteRule, VoteValue};
use crate::critique::{CastingFlag, Critique, TropeOccurrence};
use crate::eligibility;
use crate::error::ScoreError;
use crate::history::{ScoreEvent, ScoreHistory};
use crate::keys::character_key;
use crate::ledger::{anon_voter_id, VoteLedger};
use crate::metrics;
use crate::rubric::RubricConfig;
use crate::score::{self, round2, ScoreReport};

const HISTORY_CAP: usize = 512;

/// One stored scoring run, with the inputs the eligibility predicates need
/// to re-evaluate later.
#[derive(Debug, Clone)]
pub struct AnalysisRecord {
    pub report: ScoreReport,
    pub casting_flag: CastingFlag,
    pub occurrences: Vec<TropeOccurrence>,
    pub recorded_at: DateTime<Utc>,
}

/// Everything the roster holds about one character.
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub key: String,
    pub character_name: String,
    pub media_title: String,
    pub analyses: Vec<AnalysisRecord>,
    pub ledger: VoteLedger,
}

impl RosterEntry {
    pub fn analysis_count(&self) -> u32 {
        self.analyses.len() as u32
    }

    /// Mean of recorded final scores, on the usual two-decimal grid.
    pub fn mean_final(&self) -> f64 {
        if self.analyses.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.analyses.iter().map(|a| a.report.final_score).sum();
        round2(sum / self.analyses.len() as f64)
    }

    pub fn latest(&self) -> Option<&AnalysisRecord> {
        self.analyses.last()
    }
}

/// Serializable per-character view.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterSummary {
    pub key: String,
    pub character_name: String,
    pub media_title: String,
    pub analysis_count: u32,
    pub mean_score: f64,
    /// Mean after Bayesian shrinkage toward the roster-wide mean.
    pub weighted_score: f64,
    pub latest_final: f64,
    pub latest_grade: String,
    pub caution_listed: bool,
    pub distinction_listed: bool,
    pub community: BTreeMap<VoteRule, RuleScores>,
}

/// One leaderboard row, ordered by `weighted_score`.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardRow {
    pub key: String,
    pub character_name: String,
    pub media_title: String,
    pub analysis_count: u32,
    pub mean_score: f64,
    pub weighted_score: f64,
}

/// The roster itself. Cheap to share behind an `Arc`.
#[derive(Debug)]
pub struct Roster {
    inner: Mutex<BTreeMap<String, RosterEntry>>,
    history: ScoreHistory,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
            history: ScoreHistory::with_capacity(HISTORY_CAP),
        }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a critique and, on success, record the analysis under the
    /// character's normalized key.
    pub fn record_analysis(
        &self,
        character_name: &str,
        media_title: &str,
        critique: &Critique,
        rubric: &RubricConfig,
        catalog: &TropeCatalog,
    ) -> Result<ScoreReport, ScoreError> {
        let key = character_key(character_name, media_title);

        let report = match score::score_critique(critique, rubric, catalog) {
            Ok(report) => report,
            Err(err) => {
                metrics::record_score_failure(&err);
                warn!(target: "roster", %key, error = %err, "scoring rejected");
                return Err(err);
            }
        };

        let record = AnalysisRecord {
            report: report.clone(),
            casting_flag: critique.casting_flag(),
            occurrences: critique.detected_tropes().to_vec(),
            recorded_at: Utc::now(),
        };

        let mut map = self.inner.lock().expect("roster mutex poisoned");
        let entry = map.entry(key.clone()).or_insert_with(|| RosterEntry {
            key: key.clone(),
            character_name: character_name.to_string(),
            media_title: media_title.to_string(),
            analyses: Vec::new(),
            ledger: VoteLedger::new(),
        });
        entry.analyses.push(record);
        let analysis_count = entry.analysis_count();
        drop(map);

        self.history.push(&key, &report);
        metrics::record_scored(&report);
        info!(
            target: "roster",
            %key,
            final_score = report.final_score,
            grade = %report.grade,
            analysis_count,
            "analysis recorded"
        );

        Ok(report)
    }

    /// Record or replace a community vote. `false` when the character key
    /// is unknown, so callers can distinguish "no such character" without
    /// the ledger growing phantom entries.
    pub fn record_vote(
        &self,
        key: &str,
        voter_identity: &str,
        rule: VoteRule,
        value: VoteValue,
        cohort: Cohort,
    ) -> bool {
        let voter = anon_voter_id(voter_identity);
        let mut map = self.inner.lock().expect("roster mutex poisoned");
        let Some(entry) = map.get_mut(key) else {
            return false;
        };
        let replaced = entry.ledger.upsert(&voter, rule, value, cohort);
        drop(map);

        metrics::record_vote();
        info!(
            target: "roster",
            %key,
            rule = rule.as_str(),
            replaced,
            "vote recorded"
        );
        true
    }

    /// Withdraw a voter's vote on one rule. `false` when nothing matched.
    pub fn withdraw_vote(&self, key: &str, voter_identity: &str, rule: VoteRule) -> bool {
        let voter = anon_voter_id(voter_identity);
        let mut map = self.inner.lock().expect("roster mutex poisoned");
        map.get_mut(key)
            .map(|entry| entry.ledger.withdraw(&voter, rule))
            .unwrap_or(false)
    }

    /// Full serializable view of one character, or `None` for an unknown
    /// key. Eligibility reflects the latest analysis; the weighted score
    /// shrinks toward the current roster-wide mean.
    pub fn summary(&self, key: &str, rubric: &RubricConfig) -> Option<CharacterSummary> {
        let map = self.inner.lock().expect("roster mutex poisoned");
        let entry = map.get(key)?;
        let latest = entry.latest()?;

        let global_mean = roster_mean(&map);
        let mean_score = entry.mean_final();
        let weighted_score = community::shrink_toward_global(
            mean_score,
            entry.analysis_count(),
            global_mean,
            rubric,
        );

        let community = VoteRule::ALL
            .iter()
            .map(|rule| {
                let votes = entry.ledger.votes_for(*rule);
                (*rule, community::rule_scores(&votes, rubric))
            })
            .collect();

        Some(CharacterSummary {
            key: entry.key.clone(),
            character_name: entry.character_name.clone(),
            media_title: entry.media_title.clone(),
            analysis_count: entry.analysis_count(),
            mean_score,
            weighted_score,
            latest_final: latest.report.final_score,
            latest_grade: latest.report.grade.clone(),
            caution_listed: eligibility::caution_eligible(
                latest.report.final_score,
                latest.casting_flag,
                &latest.occurrences,
                rubric,
            ),
            distinction_listed: eligibility::distinction_eligible(
                latest.report.final_score,
                entry.analysis_count(),
                rubric,
            ),
            community,
        })
    }

    /// Top characters by shrinkage-weighted mean. Ties break on key so the
    /// ordering is reproducible.
    pub fn leaderboard(&self, limit: usize, rubric: &RubricConfig) -> Vec<LeaderboardRow> {
        let map = self.inner.lock().expect("roster mutex poisoned");
        if map.is_empty() {
            return Vec::new();
        }
        let global_mean = roster_mean(&map);

        let mut rows: Vec<LeaderboardRow> = map
            .values()
            .map(|entry| {
                let mean_score = entry.mean_final();
                LeaderboardRow {
                    key: entry.key.clone(),
                    character_name: entry.character_name.clone(),
                    media_title: entry.media_title.clone(),
                    analysis_count: entry.analysis_count(),
                    mean_score,
                    weighted_score: community::shrink_toward_global(
                        mean_score,
                        entry.analysis_count(),
                        global_mean,
                        rubric,
                    ),
                }
            })
            .collect();

        rows.sort_by(|a, b| {
            b.weighted_score
                .total_cmp(&a.weighted_score)
                .then_with(|| a.key.cmp(&b.key))
        });
        rows.truncate(limit);
        rows
    }

    /// The most recent scoring events, oldest first.
    pub fn recent_activity(&self, n: usize) -> Vec<ScoreEvent> {
        self.history.snapshot_last_n(n)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("roster mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mean of per-character mean finals across the whole roster.
fn roster_mean(map: &BTreeMap<String, RosterEntry>) -> f64 {
    if map.is_empty() {
        return 0.0;
    }
    let sum: f64 = map.values().map(RosterEntry::mean_final).sum();
    round2(sum / map.len() as f64)
}
