/// Flat bonus for a game between two good teams with something at stake.
pub const QUALITY_POINTS: f64 = 20.0;

/// All-or-nothing: both teams must be known and at or above `floor`, and the game must carry
/// a positive playoff total.
pub fn quality_points(
    playoff_total: f64,
    home_win_pct: Option<f64>,
    away_win_pct: Option<f64>,
    floor: f64,
    points: f64,
) -> f64 {
    let (Some(home), Some(away)) = (home_win_pct, away_win_pct) else {
        return 0.0;
    };
    if playoff_total > 0.0 && home >= floor && away >= floor {
        points
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_is_inclusive() {
        let floor = 0.520;
        assert_eq!(
            quality_points(10.0, Some(52.0 / 100.0), Some(0.6), floor, QUALITY_POINTS),
            20.0
        );
        assert_eq!(
            quality_points(10.0, Some(519.0 / 1000.0), Some(0.6), floor, QUALITY_POINTS),
            0.0
        );
    }

    #[test]
    fn needs_playoff_stakes_and_both_teams() {
        assert_eq!(quality_points(0.0, Some(0.6), Some(0.6), 0.53, QUALITY_POINTS), 0.0);
        assert_eq!(quality_points(25.0, None, Some(0.6), 0.53, QUALITY_POINTS), 0.0);
    }
}
