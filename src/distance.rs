use tracing::debug;

/// Distance reported for teams whose games-back value could not be read. Far outside any
/// scoring curve, so the team earns nothing through that path.
pub const UNKNOWN_DISTANCE: f64 = 999.0;

const LEADING_MARKERS: &[&str] = &["", "-", "--", "\u{2013}", "\u{2014}", "E"];

/// Games back from a division lead or wild-card cutoff, normalized once at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GamesBack {
    Leading,
    Behind(f64),
    Unknown,
}

impl GamesBack {
    /// Parse the raw text the stats feed reports (`"-"`, `"+1.5"`, `"3.0"`, null).
    ///
    /// The sign is dropped: a wild-card `"+2.0"` is treated as two games from the cutoff.
    /// Anything that is not a finite non-negative number after stripping one sign
    /// becomes [`GamesBack::Unknown`].
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return GamesBack::Leading;
        };
        let trimmed = raw.trim();
        if LEADING_MARKERS.contains(&trimmed) {
            return GamesBack::Leading;
        }

        let unsigned = trimmed.strip_prefix(['+', '-']).unwrap_or(trimmed).trim();
        match unsigned.parse::<f64>() {
            Ok(games) if games.is_finite() && games >= 0.0 => GamesBack::from_games(games),
            _ => {
                debug!(raw = trimmed, "unparsable games-back value, treating as unknown");
                GamesBack::Unknown
            }
        }
    }

    pub fn from_games(games: f64) -> Self {
        if games <= 0.0 {
            GamesBack::Leading
        } else {
            GamesBack::Behind(games)
        }
    }

    pub fn distance(self) -> f64 {
        match self {
            GamesBack::Leading => 0.0,
            GamesBack::Behind(games) => games,
            GamesBack::Unknown => UNKNOWN_DISTANCE,
        }
    }

    pub fn is_within(self, games: f64) -> bool {
        self.distance() <= games
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_markers_and_null_are_zero() {
        assert_eq!(GamesBack::parse(None), GamesBack::Leading);
        assert_eq!(GamesBack::parse(Some("-")), GamesBack::Leading);
        assert_eq!(GamesBack::parse(Some("  ")), GamesBack::Leading);
        assert_eq!(GamesBack::parse(Some("+0.0")), GamesBack::Leading);
        assert_eq!(GamesBack::parse(Some("0")), GamesBack::Leading);
    }

    #[test]
    fn sign_is_ignored() {
        assert_eq!(GamesBack::parse(Some("+2.5")), GamesBack::Behind(2.5));
        assert_eq!(GamesBack::parse(Some("-2.5")), GamesBack::Behind(2.5));
        assert_eq!(GamesBack::parse(Some("4")), GamesBack::Behind(4.0));
    }

    #[test]
    fn garbage_is_unknown_and_far_away() {
        let gb = GamesBack::parse(Some("n/a"));
        assert_eq!(gb, GamesBack::Unknown);
        assert_eq!(gb.distance(), UNKNOWN_DISTANCE);
        assert!(!gb.is_within(3.0));
        assert_eq!(GamesBack::parse(Some("NaN")), GamesBack::Unknown);
        assert_eq!(GamesBack::parse(Some("--3")), GamesBack::Unknown);
    }
}
