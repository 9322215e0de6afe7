// tests/metrics_exposition.rs
//
// One test on purpose: the Prometheus recorder installs once per process,
// so all series assertions share a single exposition snapshot.

use metrics_exporter_prometheus::PrometheusBuilder;
use serde_json::json;

use portrayal_scorer::{Cohort, Critique, Roster, RubricConfig, TropeCatalog, VoteRule, VoteValue};

fn complete_payload() -> String {
    let criterion = |keys: [&str; 3]| {
        json!({ "sub_scores": { keys[0]: 2.0, keys[1]: 2.0, keys[2]: 2.0 } })
    };
    json!({
        "character_name": "Mr. Miyagi",
        "media_title": "The Karate Kid (1984)",
        "casting": { "flag": "authentic" },
        "individuality": criterion(
            ["1a_goal_independence", "1b_moral_complexity", "1c_emotional_interiority"]),
        "cultural_identity": criterion(
            ["2a_explicit_identity", "2b_cultural_accuracy", "2c_internalized_heritage"]),
        "trope_interrogation": { "detected_tropes": [] },
        "narrative_impact": criterion(
            ["4a_plot_counterfactual", "4b_emotional_counterfactual", "4c_irreversible_decision"]),
    })
    .to_string()
}

#[test]
fn exposition_contains_expected_series() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("install prometheus recorder");

    portrayal_scorer::metrics::describe_all();

    let roster = Roster::new();
    let rubric = RubricConfig::classic();
    let catalog = TropeCatalog::seed();

    // One success, one rejection, one vote.
    let critique = Critique::from_json(&complete_payload()).unwrap();
    roster
        .record_analysis("Mr. Miyagi", "The Karate Kid (1984)", &critique, &rubric, &catalog)
        .expect("valid critique scores");

    let broken = Critique::from_json("{}").unwrap();
    roster
        .record_analysis("Nobody", "Nothing", &broken, &rubric, &catalog)
        .expect_err("empty critique is rejected");

    roster.record_vote(
        "mr_miyagi|the_karate_kid_1984",
        "reader@example.com",
        VoteRule::Individuality,
        VoteValue::Agree,
        Cohort::Audience,
    );

    let text = handle.render();
    for needle in [
        "portrayal_scores_total",
        "portrayal_score_failures_total",
        "kind=\"malformed_input\"",
        "portrayal_votes_recorded_total",
        "portrayal_final_score",
    ] {
        assert!(
            text.contains(needle),
            "metrics exposition missing '{needle}'\n---\n{text}"
        );
    }
}
