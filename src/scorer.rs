use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::bonus::{BonusRules, combine_playoff_points};
use crate::eligibility::{TeamPlayoffAssessment, WIN_PCT_FLOOR, assess_team};
use crate::model::{ScheduledGame, ScoredGame, TeamStandingFact};
use crate::proximity::ProximityCurve;
use crate::quality::{QUALITY_POINTS, quality_points};
use crate::season::SeasonPhase;

const TIME_TBD: &str = "TBD";

/// Everything that parameterizes one scoring run. The scorer never looks at the clock or the
/// environment; build one of these per run.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub phase: SeasonPhase,
    pub curve: ProximityCurve,
    pub win_pct_floor: f64,
    pub bonus: BonusRules,
    pub quality_points: f64,
    pub display_tz: Tz,
    pub tz_label: String,
}

impl ScoringConfig {
    pub fn for_phase(phase: SeasonPhase) -> Self {
        Self {
            phase,
            curve: ProximityCurve::STRICT,
            win_pct_floor: WIN_PCT_FLOOR,
            bonus: BonusRules::default(),
            quality_points: QUALITY_POINTS,
            display_tz: chrono_tz::America::New_York,
            tz_label: "ET".to_string(),
        }
    }
}

/// Read-only lookup of standings by team id. First row wins on duplicate ids.
pub struct StandingsIndex<'a> {
    by_id: HashMap<u32, &'a TeamStandingFact>,
}

impl<'a> StandingsIndex<'a> {
    pub fn new(facts: &'a [TeamStandingFact]) -> Self {
        let mut by_id = HashMap::with_capacity(facts.len());
        for fact in facts {
            by_id.entry(fact.team_id).or_insert(fact);
        }
        Self { by_id }
    }

    pub fn get(&self, team_id: u32) -> Option<&'a TeamStandingFact> {
        self.by_id.get(&team_id).copied()
    }
}

pub fn score_game(
    game: &ScheduledGame,
    standings: &StandingsIndex<'_>,
    cfg: &ScoringConfig,
) -> ScoredGame {
    let home_fact = lookup(standings, game.home_team_id, game.game_pk);
    let away_fact = lookup(standings, game.away_team_id, game.game_pk);

    let home = home_fact.map(|f| assess(f, cfg));
    let away = away_fact.map(|f| assess(f, cfg));

    let playoff = combine_playoff_points(
        home.as_ref(),
        away.as_ref(),
        cfg.phase.synergy_ceiling(),
        &cfg.bonus,
    );
    let quality_pts = quality_points(
        playoff.final_points,
        home.map(|a| a.win_pct),
        away.map(|a| a.win_pct),
        cfg.phase.quality_floor(),
        cfg.quality_points,
    );

    ScoredGame {
        game_pk: game.game_pk,
        game_date: game.official_date,
        game_time: format_game_time(game.game_datetime_utc, cfg.display_tz, &cfg.tz_label),
        home_team: home_fact.map(|f| f.team_name.clone()),
        away_team: away_fact.map(|f| f.team_name.clone()),
        playoff_pts_home: playoff.home_points,
        playoff_pts_away: playoff.away_points,
        both_alive_bonus: playoff.both_alive_bonus,
        head_to_head_bonus: playoff.head_to_head_bonus,
        playoff_pts_final: playoff.final_points,
        quality_pts,
        score: round_score(playoff.final_points + quality_pts),
    }
}

/// Score every scheduled game against one standings snapshot. Output order follows the
/// schedule. Games are independent, so the work fans out over the current rayon pool.
pub fn score_games(
    standings: &[TeamStandingFact],
    schedule: &[ScheduledGame],
    cfg: &ScoringConfig,
) -> Vec<ScoredGame> {
    if schedule.is_empty() {
        info!("empty schedule, nothing to score");
        return Vec::new();
    }

    let index = StandingsIndex::new(standings);
    let rows = schedule
        .par_iter()
        .map(|game| score_game(game, &index, cfg))
        .collect::<Vec<_>>();
    debug!(
        games = rows.len(),
        phase = cfg.phase.label(),
        "scored schedule"
    );
    rows
}

/// Round half away from zero, so 45.5 scores 46.
pub fn round_score(total: f64) -> i64 {
    total.round() as i64
}

/// `7:05 PM ET` style start time in the display zone, `TBD` when the start is unknown.
pub fn format_game_time(start: Option<DateTime<Utc>>, tz: Tz, label: &str) -> String {
    let Some(start) = start else {
        return TIME_TBD.to_string();
    };
    let local = start.with_timezone(&tz);
    format!("{} {label}", local.format("%-I:%M %p"))
}

pub fn build_scoring_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

pub fn with_scoring_pool<T>(
    pool: &Option<rayon::ThreadPool>,
    action: impl FnOnce() -> T + Send,
) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}

fn lookup<'a>(
    standings: &StandingsIndex<'a>,
    team_id: u32,
    game_pk: u64,
) -> Option<&'a TeamStandingFact> {
    let fact = standings.get(team_id);
    if fact.is_none() {
        debug!(team_id, game_pk, "team missing from standings, scoring as eliminated");
    }
    fact
}

fn assess(fact: &TeamStandingFact, cfg: &ScoringConfig) -> TeamPlayoffAssessment {
    assess_team(fact, &cfg.curve, cfg.win_pct_floor)
}
