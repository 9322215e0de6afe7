//! Metric names and emission helpers.
//!
//! The engine itself never touches metrics; the roster layer calls these
//! around scoring and voting. Names are centralized here so dashboards and
//! tests reference one set of constants.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;

use crate::error::ScoreError;
use crate::score::ScoreReport;

pub const SCORES_TOTAL: &str = "portrayal_scores_total";
pub const SCORE_FAILURES_TOTAL: &str = "portrayal_score_failures_total";
pub const VOTES_RECORDED_TOTAL: &str = "portrayal_votes_recorded_total";
pub const FINAL_SCORE_HISTOGRAM: &str = "portrayal_final_score";

/// One-time metrics registration (so series show up in the exposition).
pub fn describe_all() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(SCORES_TOTAL, "Critiques scored successfully.");
        describe_counter!(
            SCORE_FAILURES_TOTAL,
            "Scoring attempts rejected, labeled by error kind."
        );
        describe_counter!(VOTES_RECORDED_TOTAL, "Community votes recorded.");
        describe_histogram!(FINAL_SCORE_HISTOGRAM, "Final scores on the 0-10 scale.");
    });
}

pub fn record_scored(report: &ScoreReport) {
    describe_all();
    counter!(SCORES_TOTAL).increment(1);
    histogram!(FINAL_SCORE_HISTOGRAM).record(report.final_score);
}

pub fn record_score_failure(err: &ScoreError) {
    describe_all();
    counter!(SCORE_FAILURES_TOTAL, "kind" => err.kind()).increment(1);
}

pub fn record_vote() {
    describe_all();
    counter!(VOTES_RECORDED_TOTAL).increment(1);
}
