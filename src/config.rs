use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::mlb_fetch::DEFAULT_API_BASE;
use crate::proximity::ProximityCurve;
use crate::scorer::ScoringConfig;
use crate::season::SeasonPhase;
use crate::store::default_db_path;

const DEFAULT_TZ: Tz = chrono_tz::America::New_York;
const DEFAULT_TZ_LABEL: &str = "ET";
const DEFAULT_LOG_DIR: &str = "logs";

/// Settings for one pipeline run, from environment variables overridden by CLI flags.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub db_path: PathBuf,
    pub api_base: String,
    pub date: NaiveDate,
    pub phase: SeasonPhase,
    pub curve: ProximityCurve,
    pub display_tz: Tz,
    pub tz_label: String,
    pub scoring_threads: usize,
    pub log_dir: PathBuf,
    pub offline: bool,
}

impl PipelineConfig {
    pub fn from_env_and_args(args: &[String]) -> Result<Self> {
        let display_tz = match env_non_empty("WATCHABILITY_TZ") {
            Some(raw) => raw
                .parse::<Tz>()
                .map_err(|err| anyhow!("invalid WATCHABILITY_TZ {raw:?}: {err}"))?,
            None => DEFAULT_TZ,
        };
        let tz_label =
            env_non_empty("WATCHABILITY_TZ_LABEL").unwrap_or_else(|| DEFAULT_TZ_LABEL.to_string());

        let date = match arg_value(args, "--date").or_else(|| env_non_empty("WATCHABILITY_DATE")) {
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid scoring date {raw:?}, expected YYYY-MM-DD"))?,
            None => Utc::now().with_timezone(&display_tz).date_naive(),
        };

        let phase = match arg_value(args, "--phase")
            .or_else(|| env_non_empty("WATCHABILITY_SEASON_PHASE"))
        {
            Some(raw) => SeasonPhase::parse(&raw)
                .ok_or_else(|| anyhow!("invalid season phase {raw:?}, expected early or late"))?,
            None => SeasonPhase::for_date(date),
        };

        let curve = match env_non_empty("WATCHABILITY_CURVE") {
            Some(raw) => ProximityCurve::named(&raw)
                .ok_or_else(|| anyhow!("invalid WATCHABILITY_CURVE {raw:?}, expected strict or wide"))?,
            None => ProximityCurve::STRICT,
        };

        let db_path = arg_value(args, "--db")
            .or_else(|| env_non_empty("MLB_DB_PATH"))
            .map(PathBuf::from)
            .or_else(default_db_path)
            .context("unable to resolve sqlite path")?;

        let api_base = env_non_empty("MLB_API_BASE")
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let scoring_threads = env::var("SCORING_PARALLELISM")
            .ok()
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(4)
            .clamp(1, 32);

        let log_dir = env_non_empty("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        Ok(Self {
            db_path,
            api_base,
            date,
            phase,
            curve,
            display_tz,
            tz_label,
            scoring_threads,
            log_dir,
            offline: has_flag(args, "--offline"),
        })
    }

    pub fn scoring_config(&self) -> ScoringConfig {
        ScoringConfig {
            curve: self.curve,
            display_tz: self.display_tz,
            tz_label: self.tz_label.clone(),
            ..ScoringConfig::for_phase(self.phase)
        }
    }
}

/// Value of `--name=value` or `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(raw) = arg.strip_prefix(&prefix) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|arg| arg == name)
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn arg_value_supports_both_forms() {
        let a = args(&["--date=2025-09-11", "--db", "/tmp/x.sqlite", "--offline"]);
        assert_eq!(arg_value(&a, "--date").as_deref(), Some("2025-09-11"));
        assert_eq!(arg_value(&a, "--db").as_deref(), Some("/tmp/x.sqlite"));
        assert_eq!(arg_value(&a, "--phase"), None);
        assert!(has_flag(&a, "--offline"));
    }

    #[test]
    fn flag_value_is_not_taken_from_next_flag() {
        let a = args(&["--db", "--offline"]);
        assert_eq!(arg_value(&a, "--db"), None);
    }

    #[test]
    fn cli_date_and_phase_override_environment() {
        let a = args(&[
            "--date",
            "2025-05-01",
            "--phase=late",
            "--db=/tmp/watch.sqlite",
        ]);
        let cfg = PipelineConfig::from_env_and_args(&a).unwrap();
        assert_eq!(cfg.date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(cfg.phase, SeasonPhase::Late);
        assert_eq!(cfg.db_path, PathBuf::from("/tmp/watch.sqlite"));
        assert_eq!(cfg.scoring_config().phase, SeasonPhase::Late);
    }

    #[test]
    fn bad_date_is_an_error() {
        let a = args(&["--date=09/11/2025", "--db=/tmp/watch.sqlite"]);
        assert!(PipelineConfig::from_env_and_args(&a).is_err());
    }
}
