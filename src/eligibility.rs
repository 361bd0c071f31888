use crate::distance::GamesBack;
use crate::model::TeamStandingFact;
use crate::proximity::ProximityCurve;

/// Teams under .500 get no playoff credit no matter how close they are.
pub const WIN_PCT_FLOOR: f64 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamPlayoffAssessment {
    pub division_id: u32,
    pub win_pct: f64,
    pub division_distance: GamesBack,
    pub wild_card_distance: GamesBack,
    pub playoff_points: f64,
}

/// Credit a team through whichever race (division or wild card) treats it better.
pub fn assess_team(
    fact: &TeamStandingFact,
    curve: &ProximityCurve,
    win_pct_floor: f64,
) -> TeamPlayoffAssessment {
    let win_pct = fact.win_pct();
    let playoff_points = if win_pct < win_pct_floor {
        0.0
    } else {
        [fact.games_back, fact.wild_card_games_back]
            .into_iter()
            .map(|gb| curve.points(gb))
            .fold(0.0, f64::max)
    };

    TeamPlayoffAssessment {
        division_id: fact.division_id,
        win_pct,
        division_distance: fact.games_back,
        wild_card_distance: fact.wild_card_games_back,
        playoff_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(wins: u32, losses: u32, gb: GamesBack, wc: GamesBack) -> TeamStandingFact {
        TeamStandingFact {
            team_id: 7,
            team_name: "Seven".to_string(),
            division_id: 201,
            wins,
            losses,
            games_back: gb,
            wild_card_games_back: wc,
        }
    }

    #[test]
    fn floor_overrides_proximity() {
        let f = fact(499, 501, GamesBack::Leading, GamesBack::Leading);
        let a = assess_team(&f, &ProximityCurve::STRICT, WIN_PCT_FLOOR);
        assert_eq!(a.playoff_points, 0.0);
    }

    #[test]
    fn better_path_wins() {
        let f = fact(80, 70, GamesBack::Behind(6.0), GamesBack::Behind(1.0));
        let a = assess_team(&f, &ProximityCurve::STRICT, WIN_PCT_FLOOR);
        assert_eq!(a.playoff_points, 22.5);

        let f = fact(80, 70, GamesBack::Behind(3.0), GamesBack::Unknown);
        let a = assess_team(&f, &ProximityCurve::STRICT, WIN_PCT_FLOOR);
        assert_eq!(a.playoff_points, 7.5);
    }

    #[test]
    fn exactly_five_hundred_is_eligible() {
        let f = fact(75, 75, GamesBack::Leading, GamesBack::Unknown);
        let a = assess_team(&f, &ProximityCurve::STRICT, WIN_PCT_FLOOR);
        assert_eq!(a.playoff_points, 30.0);
        assert_eq!(a.win_pct, 0.5);
    }
}
