use anyhow::{Context, Result};
use chrono::Datelike;
use rusqlite::Connection;
use tracing::{error, info, warn};

use mlb_watchability::config::PipelineConfig;
use mlb_watchability::digest::{build_digest, render_digest_table};
use mlb_watchability::fake_feed::synthetic_snapshot;
use mlb_watchability::model::standing_facts;
use mlb_watchability::scorer::{build_scoring_pool, score_games, with_scoring_pool};
use mlb_watchability::store::{self, RunStatus};
use mlb_watchability::{logging, mlb_fetch};

const OFFLINE_SEED: u64 = 2025;

enum Outcome {
    Scored(usize),
    NoGames,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let cfg = PipelineConfig::from_env_and_args(&args)?;
    let _log_guard = logging::init_logging(&cfg.log_dir);

    info!(
        date = %cfg.date,
        phase = cfg.phase.label(),
        db = %cfg.db_path.display(),
        offline = cfg.offline,
        "watchability refresh starting"
    );

    let mut conn = store::open_db(&cfg.db_path)?;
    if let Some((status, games)) = store::last_run_status(&conn)? {
        info!(status = %status, games, "previous run");
    }
    let run_id = store::begin_run(&conn, cfg.date, cfg.phase)?;

    match run_pipeline(&mut conn, &cfg) {
        Ok(Outcome::Scored(games)) => {
            store::finish_run(&conn, run_id, games, RunStatus::Completed, None)?;
            info!(games, "watchability refresh complete");
            Ok(())
        }
        Ok(Outcome::NoGames) => {
            store::finish_run(&conn, run_id, 0, RunStatus::Skipped, None)?;
            Ok(())
        }
        Err(err) => {
            error!("watchability refresh failed: {err:#}");
            let message = format!("{err:#}");
            store::finish_run(&conn, run_id, 0, RunStatus::Failed, Some(&message))?;
            Err(err)
        }
    }
}

fn run_pipeline(conn: &mut Connection, cfg: &PipelineConfig) -> Result<Outcome> {
    if cfg.offline {
        let snapshot = synthetic_snapshot(cfg.date, OFFLINE_SEED);
        store::replace_standings(conn, &snapshot.standings)?;
        store::replace_schedule(conn, &snapshot.schedule)?;
    } else {
        refresh_inputs(conn, cfg)?;
    }

    let standings = store::load_standings(conn)?;
    let schedule = store::load_schedule_for_date(conn, cfg.date)?;
    if schedule.is_empty() {
        warn!(date = %cfg.date, "no games found, skipping watchability refresh");
        return Ok(Outcome::NoGames);
    }

    let facts = standing_facts(&standings);
    let scoring = cfg.scoring_config();
    let pool = build_scoring_pool(cfg.scoring_threads);
    let scored = with_scoring_pool(&pool, || score_games(&facts, &schedule, &scoring));

    let written = store::replace_watchability_silver(conn, &scored)?;
    info!(rows = written, "watchability_silver updated");

    let digest = build_digest(&scored);
    let written = store::replace_watchability_gold(conn, &digest)?;
    info!(rows = written, "watchability_gold updated");

    println!("MLB Watchability Digest {}", cfg.date);
    println!();
    print!("{}", render_digest_table(&digest));

    Ok(Outcome::Scored(scored.len()))
}

fn refresh_inputs(conn: &mut Connection, cfg: &PipelineConfig) -> Result<()> {
    let teams = mlb_fetch::fetch_teams(&cfg.api_base)?;
    let n = store::replace_teams(conn, &teams).context("write teams_silver")?;
    info!(rows = n, "teams_silver updated");

    let standings = mlb_fetch::fetch_standings(&cfg.api_base, cfg.date.year())?;
    let n = store::replace_standings(conn, &standings).context("write standings_silver")?;
    info!(rows = n, "standings_silver updated");

    let schedule = mlb_fetch::fetch_schedule(&cfg.api_base, cfg.date)?;
    let n = store::replace_schedule(conn, &schedule).context("write schedule_silver")?;
    info!(rows = n, "schedule_silver updated");
    Ok(())
}
