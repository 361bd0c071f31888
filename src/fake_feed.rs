use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::model::{ScheduledGame, Snapshot, StandingRow};

const AL_EAST: u32 = 201;
const AL_CENTRAL: u32 = 202;
const AL_WEST: u32 = 200;
const NL_EAST: u32 = 204;
const NL_CENTRAL: u32 = 205;
const NL_WEST: u32 = 203;

const AL_DIVISIONS: [u32; 3] = [AL_EAST, AL_CENTRAL, AL_WEST];
const NL_DIVISIONS: [u32; 3] = [NL_EAST, NL_CENTRAL, NL_WEST];
const WILD_CARD_SPOTS: usize = 3;

const SEED_TEAMS: &[(u32, &str, u32)] = &[
    (110, "Baltimore Orioles", AL_EAST),
    (111, "Boston Red Sox", AL_EAST),
    (147, "New York Yankees", AL_EAST),
    (139, "Tampa Bay Rays", AL_EAST),
    (141, "Toronto Blue Jays", AL_EAST),
    (145, "Chicago White Sox", AL_CENTRAL),
    (114, "Cleveland Guardians", AL_CENTRAL),
    (116, "Detroit Tigers", AL_CENTRAL),
    (118, "Kansas City Royals", AL_CENTRAL),
    (142, "Minnesota Twins", AL_CENTRAL),
    (117, "Houston Astros", AL_WEST),
    (108, "Los Angeles Angels", AL_WEST),
    (133, "Athletics", AL_WEST),
    (136, "Seattle Mariners", AL_WEST),
    (140, "Texas Rangers", AL_WEST),
    (144, "Atlanta Braves", NL_EAST),
    (146, "Miami Marlins", NL_EAST),
    (121, "New York Mets", NL_EAST),
    (143, "Philadelphia Phillies", NL_EAST),
    (120, "Washington Nationals", NL_EAST),
    (112, "Chicago Cubs", NL_CENTRAL),
    (113, "Cincinnati Reds", NL_CENTRAL),
    (158, "Milwaukee Brewers", NL_CENTRAL),
    (134, "Pittsburgh Pirates", NL_CENTRAL),
    (138, "St. Louis Cardinals", NL_CENTRAL),
    (109, "Arizona Diamondbacks", NL_WEST),
    (115, "Colorado Rockies", NL_WEST),
    (119, "Los Angeles Dodgers", NL_WEST),
    (135, "San Diego Padres", NL_WEST),
    (137, "San Francisco Giants", NL_WEST),
];

/// Deterministic league snapshot for offline runs and benchmarks: a full 30-team standings
/// table with division and wild-card games back, and a 15-game slate on `date`.
pub fn synthetic_snapshot(date: NaiveDate, seed: u64) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let played = games_played_by(date);

    let mut standings = SEED_TEAMS
        .iter()
        .map(|&(team_id, name, division_id)| {
            let strength = rng.gen_range(0.38..0.64);
            let wins = ((played as f64) * strength).round() as u32;
            StandingRow {
                team_id,
                team_name: name.to_string(),
                division_id,
                wins,
                losses: played - wins.min(played),
                games_back: None,
                wild_card_games_back: None,
            }
        })
        .collect::<Vec<_>>();
    fill_games_back(&mut standings, &AL_DIVISIONS);
    fill_games_back(&mut standings, &NL_DIVISIONS);

    let mut ids = SEED_TEAMS.iter().map(|t| t.0).collect::<Vec<_>>();
    ids.shuffle(&mut rng);
    let first_pitch = date
        .and_hms_opt(17, 5, 0)
        .map(|start| Utc.from_utc_datetime(&start));
    let schedule = ids
        .chunks_exact(2)
        .enumerate()
        .map(|(idx, pair)| ScheduledGame {
            game_pk: 700_000 + u64::from(date.ordinal()) * 100 + idx as u64,
            official_date: date,
            game_datetime_utc: first_pitch
                .map(|start| start + ChronoDuration::minutes(35 * idx as i64)),
            home_team_id: pair[0],
            away_team_id: pair[1],
            status: Some("Scheduled".to_string()),
        })
        .collect();

    Snapshot {
        date,
        standings,
        schedule,
    }
}

// Regular season runs late March to late September, 162 games.
fn games_played_by(date: NaiveDate) -> u32 {
    let opening = NaiveDate::from_ymd_opt(date.year(), 3, 27).unwrap_or(date);
    let days = (date - opening).num_days().clamp(0, 184) as f64;
    ((days / 184.0) * 162.0).round().max(1.0) as u32
}

fn games_behind(leader: &StandingRow, team: &StandingRow) -> f64 {
    let wins = f64::from(leader.wins) - f64::from(team.wins);
    let losses = f64::from(team.losses) - f64::from(leader.losses);
    (wins + losses) / 2.0
}

fn format_gb(games: f64, signed: bool) -> String {
    if games == 0.0 {
        "-".to_string()
    } else if signed && games < 0.0 {
        format!("+{:.1}", -games)
    } else {
        format!("{games:.1}")
    }
}

fn by_record(a: &StandingRow, b: &StandingRow) -> std::cmp::Ordering {
    let pct = |r: &StandingRow| {
        let played = (u64::from(r.wins) + u64::from(r.losses)).max(1);
        f64::from(r.wins) / played as f64
    };
    pct(b).total_cmp(&pct(a)).then(a.team_id.cmp(&b.team_id))
}

fn fill_games_back(standings: &mut [StandingRow], divisions: &[u32]) {
    let mut leaders = Vec::new();
    for division in divisions {
        let mut members = standings
            .iter()
            .filter(|r| r.division_id == *division)
            .cloned()
            .collect::<Vec<_>>();
        members.sort_by(by_record);
        let Some(leader) = members.first().cloned() else {
            continue;
        };
        leaders.push(leader.team_id);
        for row in standings.iter_mut().filter(|r| r.division_id == *division) {
            row.games_back = Some(format_gb(games_behind(&leader, row), false));
        }
    }

    let mut chasers = standings
        .iter()
        .filter(|r| divisions.contains(&r.division_id) && !leaders.contains(&r.team_id))
        .cloned()
        .collect::<Vec<_>>();
    chasers.sort_by(by_record);
    let Some(cutoff) = chasers.get(WILD_CARD_SPOTS - 1).cloned() else {
        return;
    };
    for row in standings
        .iter_mut()
        .filter(|r| divisions.contains(&r.division_id))
    {
        row.wild_card_games_back = if leaders.contains(&row.team_id) {
            Some("-".to_string())
        } else {
            Some(format_gb(games_behind(&cutoff, row), true))
        };
    }
}
