use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use mlb_watchability::config::{arg_value, has_flag};
use mlb_watchability::digest::{build_digest, render_digest_table};
use mlb_watchability::model::{Snapshot, standing_facts};
use mlb_watchability::scorer::{ScoringConfig, score_games};
use mlb_watchability::season::SeasonPhase;

// Scores one saved standings + schedule snapshot and prints the result. No network, no
// database: meant for checking scoring changes against a fixed day.
fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let path = arg_value(&args, "--snapshot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/snapshot.json"));

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&raw).context("invalid snapshot json")?;

    let phase = match arg_value(&args, "--phase") {
        Some(raw) => SeasonPhase::parse(&raw).context("--phase must be early or late")?,
        None => SeasonPhase::for_date(snapshot.date),
    };
    let cfg = ScoringConfig::for_phase(phase);
    let facts = standing_facts(&snapshot.standings);
    let scored = score_games(&facts, &snapshot.schedule, &cfg);

    if scored.is_empty() {
        println!("No games on {}", snapshot.date);
        return Ok(());
    }

    println!("Snapshot {} ({} phase)", snapshot.date, phase.label());
    println!();
    print!("{}", render_digest_table(&build_digest(&scored)));

    if has_flag(&args, "--json") {
        println!();
        println!("{}", serde_json::to_string_pretty(&scored)?);
    }
    Ok(())
}
