use proptest::prelude::*;

use mlb_watchability::distance::GamesBack;
use mlb_watchability::proximity::ProximityCurve;

fn curves() -> impl Strategy<Value = ProximityCurve> {
    prop_oneof![Just(ProximityCurve::STRICT), Just(ProximityCurve::WIDE)]
}

proptest! {
    #[test]
    fn curve_is_bounded(curve in curves(), d in -10.0f64..100.0) {
        let p = curve.points_at(d);
        prop_assert!((0.0..=curve.max_points).contains(&p));
    }

    #[test]
    fn curve_never_increases(curve in curves(), a in 0.0f64..10.0, step in 0.0f64..10.0) {
        prop_assert!(curve.points_at(a + step) <= curve.points_at(a));
    }

    #[test]
    fn curve_has_no_jumps(curve in curves(), d in 0.0f64..8.0) {
        let eps = 1e-6;
        let slope = curve.max_points / 2.0 / curve.half_at.min(curve.zero_at - curve.half_at);
        prop_assert!((curve.points_at(d) - curve.points_at(d + eps)).abs() <= slope * eps + 1e-9);
    }

    #[test]
    fn games_back_parser_never_panics(raw in ".{0,12}") {
        let gb = GamesBack::parse(Some(&raw));
        prop_assert!(gb.distance() >= 0.0);
        let points = ProximityCurve::STRICT.points(gb);
        prop_assert!((0.0..=30.0).contains(&points));
    }

    #[test]
    fn numeric_games_back_round_trips(games in 0.5f64..40.0) {
        let text = format!("{games:.1}");
        let expected: f64 = text.parse().unwrap();
        prop_assert_eq!(GamesBack::parse(Some(&text)), GamesBack::Behind(expected));
        prop_assert_eq!(GamesBack::parse(Some(&format!("+{text}"))), GamesBack::Behind(expected));
    }
}
