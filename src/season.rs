use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const CUTOFF_MONTH: u32 = 7;
const CUTOFF_DAY: u32 = 1;

/// Which half of the regular season a scoring run falls in. Parameterizes the quality
/// floor and the synergy ceiling for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonPhase {
    Early,
    Late,
}

impl SeasonPhase {
    /// Early before July 1 of the date's year, late from then on.
    pub fn for_date(date: NaiveDate) -> Self {
        match NaiveDate::from_ymd_opt(date.year(), CUTOFF_MONTH, CUTOFF_DAY) {
            Some(cutoff) if date < cutoff => SeasonPhase::Early,
            _ => SeasonPhase::Late,
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "early" => Some(SeasonPhase::Early),
            "late" => Some(SeasonPhase::Late),
            _ => None,
        }
    }

    /// Minimum win percentage both teams need for the quality bonus.
    pub fn quality_floor(self) -> f64 {
        match self {
            SeasonPhase::Early => 0.520,
            SeasonPhase::Late => 0.530,
        }
    }

    pub fn synergy_ceiling(self) -> f64 {
        match self {
            SeasonPhase::Early => 10.0,
            SeasonPhase::Late => 15.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SeasonPhase::Early => "early",
            SeasonPhase::Late => "late",
        }
    }
}
