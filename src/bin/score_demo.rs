//! Demo that scores critique files from the command line and prints the
//! graded reports as pretty JSON.
//!
//! ```text
//! cargo run --bin score_demo -- demos/strong_portrayal.json
//! RUBRIC_CONFIG_PATH=config/rubric_refined.toml cargo run --bin score_demo -- critique.json
//! ```

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use portrayal_scorer::eligibility;
use portrayal_scorer::{Critique, Roster, RubricConfig, TropeCatalog};

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: score_demo <critique.json> [more.json ...]");
    }

    let rubric = RubricConfig::load_active().context("loading rubric profile")?;
    let catalog = TropeCatalog::load_active().context("loading trope catalog")?;
    let roster = Roster::new();

    for path in &paths {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
        let critique = Critique::from_json(&raw).with_context(|| format!("parsing {path}"))?;

        let name = critique.character_name.clone().unwrap_or_default();
        let media = critique.media_title.clone().unwrap_or_default();

        let report = roster
            .record_analysis(&name, &media, &critique, &rubric, &catalog)
            .with_context(|| format!("scoring {path}"))?;

        let caution = eligibility::caution_eligible(
            report.final_score,
            critique.casting_flag(),
            critique.detected_tropes(),
            &rubric,
        );

        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "source": path,
                "character": name,
                "media": media,
                "report": report,
                "caution_eligible": caution,
            }))?
        );
    }

    println!("scored {} critique(s) under {}", paths.len(), rubric.version);
    Ok(())
}
