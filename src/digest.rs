use std::cmp::Reverse;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::model::ScoredGame;
use crate::scorer::round_score;

const UNKNOWN_TEAM: &str = "TBD";

/// One line of the daily digest, with integer points ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestRow {
    pub game_date: String,
    pub game_time: String,
    pub away_team: String,
    pub home_team: String,
    pub total_points: i64,
    pub playoff_pts: i64,
    pub quality_pts: i64,
}

/// Rank scored games for the digest: best score first, ties broken by game id.
pub fn build_digest(games: &[ScoredGame]) -> Vec<DigestRow> {
    let mut ranked = games.iter().collect::<Vec<_>>();
    ranked.sort_by_key(|g| (Reverse(g.score), g.game_pk));
    ranked
        .into_iter()
        .map(|g| DigestRow {
            game_date: g.game_date.format("%m-%d").to_string(),
            game_time: g.game_time.clone(),
            away_team: g.away_team.clone().unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
            home_team: g.home_team.clone().unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
            total_points: g.score,
            playoff_pts: round_score(g.playoff_pts_final),
            quality_pts: round_score(g.quality_pts),
        })
        .collect()
}

/// Fixed-width console rendering of the digest.
pub fn render_digest_table(rows: &[DigestRow]) -> String {
    let headers = ["Date", "Time", "Away", "Home", "Total", "Playoff", "Quality"];
    let cells = rows
        .iter()
        .map(|r| {
            [
                r.game_date.clone(),
                r.game_time.clone(),
                r.away_team.clone(),
                r.home_team.clone(),
                r.total_points.to_string(),
                r.playoff_pts.to_string(),
                r.quality_pts.to_string(),
            ]
        })
        .collect::<Vec<_>>();

    let mut widths = headers.map(str::len);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &headers.map(str::to_string), &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (cell, &w))| {
            // Point columns are right-aligned.
            if idx >= 4 {
                format!("{cell:>w$}")
            } else {
                format!("{cell:<w$}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}
