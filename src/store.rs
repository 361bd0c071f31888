use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, params};

use crate::digest::DigestRow;
use crate::http_cache::app_cache_dir;
use crate::mlb_fetch::TeamInfo;
use crate::model::{ScheduledGame, ScoredGame, StandingRow};
use crate::season::SeasonPhase;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    Skipped,
    Failed,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Skipped => "skipped",
            RunStatus::Failed => "failed",
        }
    }
}

pub fn default_db_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join("mlb_data.sqlite"))
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    conn.execute_batch("PRAGMA journal_mode = WAL;")
        .context("enable wal")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS teams_silver (
            team_id INTEGER PRIMARY KEY,
            team_name TEXT NOT NULL,
            team_abbr TEXT NOT NULL,
            division_name TEXT NULL,
            league_name TEXT NULL,
            location_name TEXT NULL,
            first_year TEXT NULL,
            last_updated TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS standings_silver (
            team_id INTEGER PRIMARY KEY,
            team_name TEXT NOT NULL,
            division_id INTEGER NOT NULL,
            wins INTEGER NOT NULL,
            losses INTEGER NOT NULL,
            games_back TEXT NULL,
            wc_games_back TEXT NULL,
            last_updated TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS schedule_silver (
            game_pk INTEGER PRIMARY KEY,
            official_date TEXT NOT NULL,
            game_datetime_utc TEXT NULL,
            home_team_id INTEGER NOT NULL,
            away_team_id INTEGER NOT NULL,
            status TEXT NULL,
            last_updated TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_schedule_date ON schedule_silver(official_date);

        CREATE TABLE IF NOT EXISTS watchability_silver (
            game_pk INTEGER PRIMARY KEY,
            game_date TEXT NOT NULL,
            game_time TEXT NOT NULL,
            home_team TEXT NULL,
            away_team TEXT NULL,
            playoff_pts_home REAL NOT NULL,
            playoff_pts_away REAL NOT NULL,
            both_alive_bonus REAL NOT NULL,
            head2head_bonus REAL NOT NULL,
            playoff_pts_final REAL NOT NULL,
            quality_pts REAL NOT NULL,
            score INTEGER NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS watchability_gold (
            rank INTEGER PRIMARY KEY,
            game_date TEXT NOT NULL,
            game_time TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_team TEXT NOT NULL,
            total_points INTEGER NOT NULL,
            playoff_pts INTEGER NOT NULL,
            quality_pts INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS pipeline_runs (
            run_id INTEGER PRIMARY KEY AUTOINCREMENT,
            started_at TEXT NOT NULL,
            finished_at TEXT NULL,
            scoring_date TEXT NOT NULL,
            season_phase TEXT NOT NULL,
            games_scored INTEGER NOT NULL,
            status TEXT NOT NULL,
            error TEXT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

pub fn replace_teams(conn: &mut Connection, teams: &[TeamInfo]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin teams transaction")?;
    tx.execute("DELETE FROM teams_silver", [])
        .context("clear teams_silver")?;
    for t in teams {
        tx.execute(
            "INSERT OR REPLACE INTO teams_silver
             (team_id, team_name, team_abbr, division_name, league_name, location_name, first_year, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                t.team_id as i64,
                t.team_name,
                t.team_abbr,
                t.division_name,
                t.league_name,
                t.location_name,
                t.first_year,
                now
            ],
        )
        .context("insert team")?;
    }
    tx.commit().context("commit teams")?;
    Ok(teams.len())
}

pub fn replace_standings(conn: &mut Connection, rows: &[StandingRow]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin standings transaction")?;
    tx.execute("DELETE FROM standings_silver", [])
        .context("clear standings_silver")?;
    for r in rows {
        tx.execute(
            "INSERT OR REPLACE INTO standings_silver
             (team_id, team_name, division_id, wins, losses, games_back, wc_games_back, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                r.team_id as i64,
                r.team_name,
                r.division_id as i64,
                r.wins as i64,
                r.losses as i64,
                r.games_back,
                r.wild_card_games_back,
                now
            ],
        )
        .context("insert standing")?;
    }
    tx.commit().context("commit standings")?;
    Ok(rows.len())
}

pub fn replace_schedule(conn: &mut Connection, games: &[ScheduledGame]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin schedule transaction")?;
    tx.execute("DELETE FROM schedule_silver", [])
        .context("clear schedule_silver")?;
    for g in games {
        tx.execute(
            "INSERT OR REPLACE INTO schedule_silver
             (game_pk, official_date, game_datetime_utc, home_team_id, away_team_id, status, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                g.game_pk as i64,
                g.official_date.format(DATE_FORMAT).to_string(),
                g.game_datetime_utc.map(|dt| dt.to_rfc3339()),
                g.home_team_id as i64,
                g.away_team_id as i64,
                g.status,
                now
            ],
        )
        .context("insert scheduled game")?;
    }
    tx.commit().context("commit schedule")?;
    Ok(games.len())
}

pub fn load_standings(conn: &Connection) -> Result<Vec<StandingRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT team_id, team_name, division_id, wins, losses, games_back, wc_games_back
             FROM standings_silver
             ORDER BY team_id ASC",
        )
        .context("prepare load standings query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StandingRow {
                team_id: row.get::<_, u32>(0)?,
                team_name: row.get(1)?,
                division_id: row.get::<_, u32>(2)?,
                wins: row.get::<_, u32>(3)?,
                losses: row.get::<_, u32>(4)?,
                games_back: row.get(5)?,
                wild_card_games_back: row.get(6)?,
            })
        })
        .context("query load standings")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode standings row")?);
    }
    Ok(out)
}

pub fn load_schedule_for_date(conn: &Connection, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
    let mut stmt = conn
        .prepare(
            "SELECT game_pk, official_date, game_datetime_utc, home_team_id, away_team_id, status
             FROM schedule_silver
             WHERE official_date = ?1
             ORDER BY game_datetime_utc ASC, game_pk ASC",
        )
        .context("prepare load schedule query")?;
    let rows = stmt
        .query_map(params![date.format(DATE_FORMAT).to_string()], |row| {
            Ok((
                row.get::<_, u64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, u32>(3)?,
                row.get::<_, u32>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })
        .context("query load schedule")?;

    let mut out = Vec::new();
    for row in rows {
        let (game_pk, official_date, start, home_team_id, away_team_id, status) =
            row.context("decode schedule row")?;
        let official_date = NaiveDate::parse_from_str(&official_date, DATE_FORMAT)
            .with_context(|| format!("bad official_date for game {game_pk}"))?;
        let game_datetime_utc = start
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));
        out.push(ScheduledGame {
            game_pk,
            official_date,
            game_datetime_utc,
            home_team_id,
            away_team_id,
            status,
        });
    }
    Ok(out)
}

pub fn replace_watchability_silver(conn: &mut Connection, rows: &[ScoredGame]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin watchability transaction")?;
    tx.execute("DELETE FROM watchability_silver", [])
        .context("clear watchability_silver")?;
    for r in rows {
        tx.execute(
            "INSERT OR REPLACE INTO watchability_silver
             (game_pk, game_date, game_time, home_team, away_team,
              playoff_pts_home, playoff_pts_away, both_alive_bonus, head2head_bonus,
              playoff_pts_final, quality_pts, score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                r.game_pk as i64,
                r.game_date.format(DATE_FORMAT).to_string(),
                r.game_time,
                r.home_team,
                r.away_team,
                r.playoff_pts_home,
                r.playoff_pts_away,
                r.both_alive_bonus,
                r.head_to_head_bonus,
                r.playoff_pts_final,
                r.quality_pts,
                r.score,
                now
            ],
        )
        .context("insert watchability row")?;
    }
    tx.commit().context("commit watchability_silver")?;
    Ok(rows.len())
}

pub fn replace_watchability_gold(conn: &mut Connection, rows: &[DigestRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin digest transaction")?;
    tx.execute("DELETE FROM watchability_gold", [])
        .context("clear watchability_gold")?;
    for (idx, r) in rows.iter().enumerate() {
        tx.execute(
            "INSERT INTO watchability_gold
             (rank, game_date, game_time, away_team, home_team, total_points, playoff_pts, quality_pts)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                (idx + 1) as i64,
                r.game_date,
                r.game_time,
                r.away_team,
                r.home_team,
                r.total_points,
                r.playoff_pts,
                r.quality_pts
            ],
        )
        .context("insert digest row")?;
    }
    tx.commit().context("commit watchability_gold")?;
    Ok(rows.len())
}

pub fn load_watchability_gold(conn: &Connection) -> Result<Vec<DigestRow>> {
    let mut stmt = conn
        .prepare(
            "SELECT game_date, game_time, away_team, home_team, total_points, playoff_pts, quality_pts
             FROM watchability_gold
             ORDER BY rank ASC",
        )
        .context("prepare load digest query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(DigestRow {
                game_date: row.get(0)?,
                game_time: row.get(1)?,
                away_team: row.get(2)?,
                home_team: row.get(3)?,
                total_points: row.get(4)?,
                playoff_pts: row.get(5)?,
                quality_pts: row.get(6)?,
            })
        })
        .context("query load digest")?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode digest row")?);
    }
    Ok(out)
}

pub fn begin_run(conn: &Connection, date: NaiveDate, phase: SeasonPhase) -> Result<i64> {
    conn.execute(
        "INSERT INTO pipeline_runs(started_at, finished_at, scoring_date, season_phase, games_scored, status, error)
         VALUES (?1, NULL, ?2, ?3, 0, 'running', NULL)",
        params![
            Utc::now().to_rfc3339(),
            date.format(DATE_FORMAT).to_string(),
            phase.label()
        ],
    )
    .context("insert pipeline run")?;
    Ok(conn.last_insert_rowid())
}

pub fn finish_run(
    conn: &Connection,
    run_id: i64,
    games_scored: usize,
    status: RunStatus,
    error: Option<&str>,
) -> Result<()> {
    conn.execute(
        "UPDATE pipeline_runs
         SET finished_at = ?1, games_scored = ?2, status = ?3, error = ?4
         WHERE run_id = ?5",
        params![
            Utc::now().to_rfc3339(),
            games_scored as i64,
            status.as_str(),
            error,
            run_id
        ],
    )
    .context("update pipeline run")?;
    Ok(())
}

/// Status of the most recent pipeline run, if any.
pub fn last_run_status(conn: &Connection) -> Result<Option<(String, i64)>> {
    let mut stmt = conn
        .prepare("SELECT status, games_scored FROM pipeline_runs ORDER BY run_id DESC LIMIT 1")
        .context("prepare last run query")?;
    let mut rows = stmt.query([]).context("query last run")?;
    match rows.next().context("read last run")? {
        Some(row) => Ok(Some((row.get(0)?, row.get(1)?))),
        None => Ok(None),
    }
}
