use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::http_cache::fetch_json_cached;
use crate::http_client::http_client;
use crate::model::{ScheduledGame, StandingRow};

pub const DEFAULT_API_BASE: &str = "https://statsapi.mlb.com/api/v1";

/// Sport id of Major League Baseball in the stats API.
const MLB_SPORT_ID: u64 = 1;
/// American League, National League.
const MLB_LEAGUE_IDS: &str = "103,104";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: u32,
    pub team_name: String,
    pub team_abbr: String,
    pub division_name: Option<String>,
    pub league_name: Option<String>,
    pub location_name: Option<String>,
    pub first_year: Option<String>,
}

pub fn fetch_teams(api_base: &str) -> Result<Vec<TeamInfo>> {
    let url = format!("{api_base}/teams?sportId={MLB_SPORT_ID}");
    let body = fetch(&url).context("fetch teams failed")?;
    let teams = parse_teams_json(&body)?;
    info!(teams = teams.len(), "fetched teams");
    Ok(teams)
}

pub fn fetch_standings(api_base: &str, season: i32) -> Result<Vec<StandingRow>> {
    let url = format!(
        "{api_base}/standings?leagueId={MLB_LEAGUE_IDS}&season={season}&standingsTypes=regularSeason&hydrate=team"
    );
    let body = fetch(&url).context("fetch standings failed")?;
    let rows = parse_standings_json(&body)?;
    info!(teams = rows.len(), season, "fetched standings");
    Ok(rows)
}

pub fn fetch_schedule(api_base: &str, date: NaiveDate) -> Result<Vec<ScheduledGame>> {
    let url = format!(
        "{api_base}/schedule?sportId={MLB_SPORT_ID}&date={}",
        date.format("%Y-%m-%d")
    );
    let body = fetch(&url).context("fetch schedule failed")?;
    let games = parse_schedule_json(&body)?;
    info!(games = games.len(), %date, "fetched schedule");
    Ok(games)
}

fn fetch(url: &str) -> Result<String> {
    let client = http_client()?;
    fetch_json_cached(client, url)
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<ApiTeam>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiTeam {
    id: u32,
    name: String,
    #[serde(default)]
    abbreviation: Option<String>,
    #[serde(default)]
    location_name: Option<String>,
    #[serde(default)]
    first_year_of_play: Option<String>,
    #[serde(default)]
    sport: Option<ApiRef>,
    #[serde(default)]
    division: Option<ApiRef>,
    #[serde(default)]
    league: Option<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

/// Major league clubs only; minor-league affiliates in the same payload are dropped.
pub fn parse_teams_json(raw: &str) -> Result<Vec<TeamInfo>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: TeamsResponse = serde_json::from_str(trimmed).context("invalid teams json")?;
    let teams = data
        .teams
        .into_iter()
        .filter(|t| t.sport.as_ref().and_then(|s| s.id) == Some(MLB_SPORT_ID))
        .map(|t| TeamInfo {
            team_id: t.id,
            team_abbr: t.abbreviation.unwrap_or_default(),
            team_name: t.name,
            division_name: t.division.and_then(|d| d.name),
            league_name: t.league.and_then(|l| l.name),
            location_name: t.location_name,
            first_year: t.first_year_of_play,
        })
        .collect();
    Ok(teams)
}

pub fn parse_standings_json(raw: &str) -> Result<Vec<StandingRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid standings json")?;

    let mut out = Vec::new();
    let records = root
        .get("records")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for record in records {
        let Some(division_id) = record
            .get("division")
            .and_then(|d| d.get("id"))
            .and_then(as_u32_any)
        else {
            debug!("standings record without division id skipped");
            continue;
        };
        let teams = record
            .get("teamRecords")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for team in teams {
            if let Some(row) = parse_standing_row(team, division_id) {
                out.push(row);
            }
        }
    }
    Ok(out)
}

fn parse_standing_row(v: &Value, division_id: u32) -> Option<StandingRow> {
    let team = v.get("team")?;
    let team_id = as_u32_any(team.get("id")?)?;
    let team_name = team.get("name")?.as_str()?.to_string();
    let wins = v.get("wins").and_then(as_u32_any)?;
    let losses = v.get("losses").and_then(as_u32_any)?;
    Some(StandingRow {
        team_id,
        team_name,
        division_id,
        wins,
        losses,
        games_back: v.get("gamesBack").and_then(as_text_any),
        wild_card_games_back: v.get("wildCardGamesBack").and_then(as_text_any),
    })
}

pub fn parse_schedule_json(raw: &str) -> Result<Vec<ScheduledGame>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid schedule json")?;

    let mut out = Vec::new();
    let dates = root
        .get("dates")
        .and_then(|v| v.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for date in dates {
        let fallback_date = date
            .get("date")
            .and_then(|d| d.as_str())
            .and_then(parse_iso_date);
        let games = date
            .get("games")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default();
        for game in games {
            match parse_scheduled_game(game, fallback_date) {
                Some(row) => out.push(row),
                None => debug!("schedule entry without teams or date skipped"),
            }
        }
    }
    Ok(out)
}

fn parse_scheduled_game(v: &Value, fallback_date: Option<NaiveDate>) -> Option<ScheduledGame> {
    let game_pk = as_u64_any(v.get("gamePk")?)?;
    let official_date = v
        .get("officialDate")
        .and_then(|d| d.as_str())
        .and_then(parse_iso_date)
        .or(fallback_date)?;
    let game_datetime_utc = v
        .get("gameDate")
        .and_then(|d| d.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc));
    let teams = v.get("teams")?;
    let home_team_id = as_u32_any(teams.get("home")?.get("team")?.get("id")?)?;
    let away_team_id = as_u32_any(teams.get("away")?.get("team")?.get("id")?)?;
    let status = v
        .get("status")
        .and_then(|s| s.get("detailedState"))
        .and_then(|s| s.as_str())
        .map(|s| s.to_string());

    Some(ScheduledGame {
        game_pk,
        official_date,
        game_datetime_utc,
        home_team_id,
        away_team_id,
        status,
    })
}

fn parse_iso_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn as_u64_any(v: &Value) -> Option<u64> {
    if let Some(n) = v.as_u64() {
        return Some(n);
    }
    v.as_str()?.trim().parse::<u64>().ok()
}

fn as_u32_any(v: &Value) -> Option<u32> {
    let n = as_u64_any(v)?;
    u32::try_from(n).ok()
}

// Games back arrives as text ("-", "+1.5") but older payloads carry bare numbers.
fn as_text_any(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
