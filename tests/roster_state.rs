// tests/roster_state.rs
//
// Roster-level state: leaderboard ordering under Bayesian shrinkage
// (with reproducible tie-breaks) and list eligibility in the summary view.

use serde_json::{json, Value};

use portrayal_scorer::{Critique, Roster, RubricConfig, TropeCatalog};

fn criterion(keys: [&str; 3], value: f64) -> Value {
    json!({ "sub_scores": { keys[0]: value, keys[1]: value, keys[2]: value } })
}

fn payload(name: &str, media: &str, value: f64) -> Value {
    json!({
        "character_name": name,
        "media_title": media,
        "casting": { "flag": "authentic" },
        "individuality": criterion(
            ["1a_goal_independence", "1b_moral_complexity", "1c_emotional_interiority"], value),
        "cultural_identity": criterion(
            ["2a_explicit_identity", "2b_cultural_accuracy", "2c_internalized_heritage"], value),
        "trope_interrogation": { "detected_tropes": [] },
        "narrative_impact": criterion(
            ["4a_plot_counterfactual", "4b_emotional_counterfactual", "4c_irreversible_decision"], value),
    })
}

fn record(roster: &Roster, rubric: &RubricConfig, name: &str, media: &str, value: f64) {
    let critique = Critique::from_json(&payload(name, media, value).to_string()).unwrap();
    roster
        .record_analysis(name, media, &critique, rubric, &TropeCatalog::seed())
        .unwrap();
}

#[test]
fn leaderboard_rewards_track_record_over_single_hits() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    // One-hit wonder at 8.00, a weak entry at 5.00, and a character with
    // five analyses at 8.00. Roster-wide mean lands at 7.00.
    record(&roster, &rubric, "Aang", "Avatar", 2.0);
    record(&roster, &rubric, "Zhao", "Avatar", 1.0);
    for _ in 0..5 {
        record(&roster, &rubric, "Katara", "Avatar", 2.0);
    }

    let rows = roster.leaderboard(10, &rubric);
    assert_eq!(rows.len(), 3);

    // (5*8 + 5*7) / 10
    assert_eq!(rows[0].character_name, "Katara");
    assert!((rows[0].weighted_score - 7.50).abs() < 1e-9);
    // (1*8 + 5*7) / 6
    assert_eq!(rows[1].character_name, "Aang");
    assert!((rows[1].weighted_score - 7.17).abs() < 1e-9);
    // (1*5 + 5*7) / 6
    assert_eq!(rows[2].character_name, "Zhao");
    assert!((rows[2].weighted_score - 6.67).abs() < 1e-9);

    // Raw means are reported untouched next to the weighted column.
    assert!((rows[0].mean_score - 8.00).abs() < 1e-9);
    assert!((rows[2].mean_score - 5.00).abs() < 1e-9);
}

#[test]
fn leaderboard_ties_break_on_key() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    record(&roster, &rubric, "Zuko", "Avatar", 2.0);
    record(&roster, &rubric, "Aang", "Avatar", 2.0);

    let rows = roster.leaderboard(10, &rubric);
    assert!((rows[0].weighted_score - rows[1].weighted_score).abs() < 1e-9);
    assert_eq!(rows[0].key, "aang|avatar");
    assert_eq!(rows[1].key, "zuko|avatar");
}

#[test]
fn leaderboard_truncates_to_the_requested_size() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    for name in ["A", "B", "C", "D"] {
        record(&roster, &rubric, name, "Show", 2.0);
    }
    assert_eq!(roster.leaderboard(2, &rubric).len(), 2);
    assert!(roster.leaderboard(0, &rubric).is_empty());
}

#[test]
fn empty_roster_has_an_empty_leaderboard() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();
    assert!(roster.leaderboard(10, &rubric).is_empty());
}

#[test]
fn low_finals_are_caution_listed() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    record(&roster, &rubric, "Extra", "Background Show", 0.0);

    let summary = roster.summary("extra|background_show", &rubric).unwrap();
    assert!((summary.latest_final - 2.00).abs() < 1e-9);
    assert!(summary.caution_listed);
    assert!(!summary.distinction_listed);
}

#[test]
fn yellowface_with_a_major_trope_is_caution_listed_despite_the_score() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    let mut value = payload("Mentor", "Old Serial", 2.0);
    value["casting"] = json!({ "flag": "yellowface" });
    value["trope_interrogation"]["detected_tropes"] = json!([
        { "id": "dragon_lady", "severity": "major", "penalty": 0.25 }
    ]);
    let critique = Critique::from_json(&value.to_string()).unwrap();
    roster
        .record_analysis("Mentor", "Old Serial", &critique, &rubric, &TropeCatalog::seed())
        .unwrap();

    let summary = roster.summary("mentor|old_serial", &rubric).unwrap();
    assert!((summary.latest_final - 7.75).abs() < 1e-9);
    assert!(summary.caution_listed);
}

#[test]
fn distinction_needs_repeat_analyses_under_the_refined_profile() {
    let roster = Roster::new();
    let rubric = RubricConfig::refined();

    let mut value = payload("Mulan", "Mulan (1998)", 2.0);
    value["narrative_dignity"] = criterion(
        ["5a_framing_dignity", "5b_peer_engagement", "5c_cultural_framing"],
        2.0,
    );
    let critique = Critique::from_json(&value.to_string()).unwrap();

    for run in 1..=5u32 {
        roster
            .record_analysis("Mulan", "Mulan (1998)", &critique, &rubric, &TropeCatalog::seed())
            .unwrap();
        let summary = roster.summary("mulan|mulan_1998", &rubric).unwrap();
        assert_eq!(summary.analysis_count, run);
        assert_eq!(summary.distinction_listed, run >= 5, "after run {run}");
    }
}

#[test]
fn summary_weighted_score_shrinks_toward_the_roster_mean() {
    let roster = Roster::new();
    let rubric = RubricConfig::classic();

    record(&roster, &rubric, "Star", "Show", 2.0);
    record(&roster, &rubric, "Extra", "Show", 1.0);

    // Means 8.00 and 5.00, roster mean 6.50.
    let star = roster.summary("star|show", &rubric).unwrap();
    assert!((star.mean_score - 8.00).abs() < 1e-9);
    // (1*8 + 5*6.5) / 6
    assert!((star.weighted_score - 6.75).abs() < 1e-9);
    assert!(star.weighted_score < star.mean_score);

    let extra = roster.summary("extra|show", &rubric).unwrap();
    // (1*5 + 5*6.5) / 6
    assert!((extra.weighted_score - 6.25).abs() < 1e-9);
    assert!(extra.weighted_score > extra.mean_score);
}
