use std::fs;
use std::path::PathBuf;

use chrono::{NaiveDate, TimeZone, Utc};
use mlb_watchability::distance::GamesBack;
use mlb_watchability::mlb_fetch::{parse_schedule_json, parse_standings_json, parse_teams_json};
use mlb_watchability::model::standing_facts;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_standings_fixture() {
    let raw = read_fixture("standings.json");
    let rows = parse_standings_json(&raw).expect("fixture should parse");
    let ids = rows.iter().map(|r| r.team_id).collect::<Vec<_>>();
    assert_eq!(ids, vec![147, 141, 110, 158]);

    let yankees = &rows[0];
    assert_eq!(yankees.team_name, "New York Yankees");
    assert_eq!(yankees.division_id, 201);
    assert_eq!((yankees.wins, yankees.losses), (84, 62));
    assert_eq!(yankees.games_back.as_deref(), Some("-"));

    assert_eq!(rows[1].wild_card_games_back.as_deref(), Some("+4.0"));
    assert_eq!(rows[2].games_back.as_deref(), Some("18"));
    assert_eq!(rows[3].division_id, 205);
    assert_eq!((rows[3].wins, rows[3].losses), (90, 56));
    assert_eq!(rows[3].wild_card_games_back, None);
}

#[test]
fn standings_fixture_normalizes_games_back() {
    let raw = read_fixture("standings.json");
    let facts = standing_facts(&parse_standings_json(&raw).expect("fixture should parse"));
    assert_eq!(facts[0].games_back, GamesBack::Leading);
    assert_eq!(facts[1].games_back, GamesBack::Behind(2.0));
    // Signed wild-card lead is read by magnitude.
    assert_eq!(facts[1].wild_card_games_back, GamesBack::Behind(4.0));
    assert_eq!(facts[2].games_back, GamesBack::Behind(18.0));
    assert_eq!(facts[3].wild_card_games_back, GamesBack::Leading);
}

#[test]
fn parses_schedule_fixture() {
    let raw = read_fixture("schedule.json");
    let games = parse_schedule_json(&raw).expect("fixture should parse");
    let pks = games.iter().map(|g| g.game_pk).collect::<Vec<_>>();
    assert_eq!(pks, vec![776510, 776511, 776513]);

    let first = &games[0];
    assert_eq!(first.home_team_id, 147);
    assert_eq!(first.away_team_id, 141);
    assert_eq!(
        first.game_datetime_utc,
        Some(Utc.with_ymd_and_hms(2025, 9, 11, 23, 5, 0).unwrap())
    );
    assert_eq!(first.status.as_deref(), Some("Scheduled"));

    let postponed = &games[1];
    assert_eq!(
        postponed.official_date,
        NaiveDate::from_ymd_opt(2025, 9, 11).unwrap()
    );
    assert_eq!(postponed.game_datetime_utc, None);
    assert_eq!(postponed.status.as_deref(), Some("Postponed"));

    assert_eq!(
        games[2].official_date,
        NaiveDate::from_ymd_opt(2025, 9, 12).unwrap()
    );
}

#[test]
fn parses_teams_fixture_major_league_only() {
    let raw = read_fixture("teams.json");
    let teams = parse_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 2);
    assert_eq!(teams[0].team_id, 147);
    assert_eq!(teams[0].team_abbr, "NYY");
    assert_eq!(teams[0].division_name.as_deref(), Some("American League East"));
    assert_eq!(teams[1].league_name.as_deref(), Some("National League"));
    assert_eq!(teams[1].first_year.as_deref(), Some("1968"));
}

#[test]
fn malformed_payloads_are_errors() {
    assert!(parse_standings_json("{ records: ").is_err());
    assert!(parse_teams_json("[1, 2").is_err());
    assert!(parse_standings_json("{}").expect("empty object").is_empty());
}
