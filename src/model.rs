use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::distance::GamesBack;

/// One team's standings line as the stats feed reports it. Games-back columns stay raw
/// text here and are normalized by [`StandingRow::to_fact`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub team_id: u32,
    pub team_name: String,
    pub division_id: u32,
    pub wins: u32,
    pub losses: u32,
    #[serde(default)]
    pub games_back: Option<String>,
    #[serde(default)]
    pub wild_card_games_back: Option<String>,
}

impl StandingRow {
    pub fn to_fact(&self) -> TeamStandingFact {
        TeamStandingFact {
            team_id: self.team_id,
            team_name: self.team_name.clone(),
            division_id: self.division_id,
            wins: self.wins,
            losses: self.losses,
            games_back: GamesBack::parse(self.games_back.as_deref()),
            wild_card_games_back: GamesBack::parse(self.wild_card_games_back.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamStandingFact {
    pub team_id: u32,
    pub team_name: String,
    pub division_id: u32,
    pub wins: u32,
    pub losses: u32,
    pub games_back: GamesBack,
    pub wild_card_games_back: GamesBack,
}

impl TeamStandingFact {
    /// Wins over games played, 0 before any game is played.
    pub fn win_pct(&self) -> f64 {
        let played = u64::from(self.wins) + u64::from(self.losses);
        if played == 0 {
            return 0.0;
        }
        f64::from(self.wins) / played as f64
    }
}

pub fn standing_facts(rows: &[StandingRow]) -> Vec<TeamStandingFact> {
    rows.iter().map(StandingRow::to_fact).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_pk: u64,
    pub official_date: NaiveDate,
    #[serde(default)]
    pub game_datetime_utc: Option<DateTime<Utc>>,
    pub home_team_id: u32,
    pub away_team_id: u32,
    #[serde(default)]
    pub status: Option<String>,
}

/// Per-game score breakdown. Team names are `None` when the team is missing from standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGame {
    pub game_pk: u64,
    pub game_date: NaiveDate,
    pub game_time: String,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub playoff_pts_home: f64,
    pub playoff_pts_away: f64,
    pub both_alive_bonus: f64,
    pub head_to_head_bonus: f64,
    pub playoff_pts_final: f64,
    pub quality_pts: f64,
    pub score: i64,
}

/// Standings and schedule captured together, as read by the offline scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: NaiveDate,
    pub standings: Vec<StandingRow>,
    pub schedule: Vec<ScheduledGame>,
}
