use crate::eligibility::TeamPlayoffAssessment;

/// Point sizes and windows for the head-to-head and both-alive bonuses.
#[derive(Debug, Clone, PartialEq)]
pub struct BonusRules {
    pub head_to_head_points: f64,
    /// Both teams within this many games of the wild-card cutoff count as a head-to-head race.
    pub wild_card_window: f64,
    /// `(min points for both teams, bonus)`, strongest tier first.
    pub synergy_tiers: Vec<(f64, f64)>,
    /// Ceiling on the per-game playoff total when only one side is alive.
    pub mismatch_cap: f64,
}

impl Default for BonusRules {
    fn default() -> Self {
        Self {
            head_to_head_points: 10.0,
            wild_card_window: 3.0,
            synergy_tiers: vec![(20.0, 15.0), (15.0, 10.0), (10.0, 5.0)],
            mismatch_cap: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayoffBreakdown {
    pub home_points: f64,
    pub away_points: f64,
    pub both_alive_bonus: f64,
    pub head_to_head_bonus: f64,
    pub final_points: f64,
}

/// Flat bonus when two teams meet in the same division or in a tight wild-card race.
/// Playoff points play no part; only a team missing from standings blocks it. The two
/// conditions do not stack.
pub fn head_to_head_bonus(
    home: Option<&TeamPlayoffAssessment>,
    away: Option<&TeamPlayoffAssessment>,
    rules: &BonusRules,
) -> f64 {
    let (Some(home), Some(away)) = (home, away) else {
        return 0.0;
    };
    let same_division = home.division_id == away.division_id;
    let wild_card_race = home.wild_card_distance.is_within(rules.wild_card_window)
        && away.wild_card_distance.is_within(rules.wild_card_window);
    if same_division || wild_card_race {
        rules.head_to_head_points
    } else {
        0.0
    }
}

/// Tiered bonus by the weaker side's playoff points, clamped to the phase ceiling.
pub fn synergy_bonus(home_points: f64, away_points: f64, ceiling: f64, rules: &BonusRules) -> f64 {
    if home_points <= 0.0 || away_points <= 0.0 {
        return 0.0;
    }
    let weaker = home_points.min(away_points);
    rules
        .synergy_tiers
        .iter()
        .find(|(threshold, _)| weaker >= *threshold)
        .map_or(0.0, |(_, bonus)| bonus.min(ceiling))
}

/// The stronger side's points, capped when exactly one side is alive.
pub fn mismatch_capped(home_points: f64, away_points: f64, cap: f64) -> f64 {
    let best = home_points.max(away_points);
    let one_sided = (home_points > 0.0 && away_points == 0.0)
        || (away_points > 0.0 && home_points == 0.0);
    if one_sided { best.min(cap) } else { best }
}

/// Combine both teams into the game's playoff total.
///
/// The cap sees only the per-team maximum; both bonuses are decided from the uncapped
/// per-team values and added afterwards without re-clamping.
pub fn combine_playoff_points(
    home: Option<&TeamPlayoffAssessment>,
    away: Option<&TeamPlayoffAssessment>,
    synergy_ceiling: f64,
    rules: &BonusRules,
) -> PlayoffBreakdown {
    let home_points = home.map_or(0.0, |a| a.playoff_points);
    let away_points = away.map_or(0.0, |a| a.playoff_points);

    let mut final_points = mismatch_capped(home_points, away_points, rules.mismatch_cap);
    let both_alive_bonus = synergy_bonus(home_points, away_points, synergy_ceiling, rules);
    final_points += both_alive_bonus;
    let head_to_head_bonus = head_to_head_bonus(home, away, rules);
    final_points += head_to_head_bonus;

    PlayoffBreakdown {
        home_points,
        away_points,
        both_alive_bonus,
        head_to_head_bonus,
        final_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::GamesBack;

    fn team(division_id: u32, points: f64, wc: GamesBack) -> TeamPlayoffAssessment {
        TeamPlayoffAssessment {
            division_id,
            win_pct: 0.55,
            division_distance: GamesBack::Behind(5.0),
            wild_card_distance: wc,
            playoff_points: points,
        }
    }

    #[test]
    fn synergy_tiers_and_ceiling() {
        let rules = BonusRules::default();
        assert_eq!(synergy_bonus(22.0, 21.0, 15.0, &rules), 15.0);
        assert_eq!(synergy_bonus(22.0, 21.0, 10.0, &rules), 10.0);
        assert_eq!(synergy_bonus(30.0, 15.0, 15.0, &rules), 10.0);
        assert_eq!(synergy_bonus(12.0, 30.0, 15.0, &rules), 5.0);
        assert_eq!(synergy_bonus(9.9, 30.0, 15.0, &rules), 0.0);
        assert_eq!(synergy_bonus(30.0, 0.0, 15.0, &rules), 0.0);
    }

    #[test]
    fn head_to_head_same_division_or_wild_card() {
        let rules = BonusRules::default();
        let a = team(201, 20.0, GamesBack::Behind(8.0));
        let b = team(201, 10.0, GamesBack::Behind(9.0));
        assert_eq!(head_to_head_bonus(Some(&a), Some(&b), &rules), 10.0);

        let c = team(202, 20.0, GamesBack::Behind(3.0));
        let d = team(205, 10.0, GamesBack::Leading);
        assert_eq!(head_to_head_bonus(Some(&c), Some(&d), &rules), 10.0);

        let e = team(203, 10.0, GamesBack::Behind(3.5));
        assert_eq!(head_to_head_bonus(Some(&c), Some(&e), &rules), 0.0);
        assert_eq!(head_to_head_bonus(Some(&c), None, &rules), 0.0);
    }

    #[test]
    fn head_to_head_does_not_stack() {
        let rules = BonusRules::default();
        let a = team(201, 20.0, GamesBack::Behind(1.0));
        let b = team(201, 20.0, GamesBack::Behind(2.0));
        assert_eq!(head_to_head_bonus(Some(&a), Some(&b), &rules), 10.0);
    }

    #[test]
    fn head_to_head_ignores_playoff_points() {
        let rules = BonusRules::default();
        let a = team(201, 20.0, GamesBack::Leading);
        let b = team(201, 0.0, GamesBack::Behind(15.0));
        assert_eq!(head_to_head_bonus(Some(&a), Some(&b), &rules), 10.0);

        let c = team(202, 0.0, GamesBack::Behind(1.0));
        let d = team(203, 0.0, GamesBack::Behind(2.5));
        assert_eq!(head_to_head_bonus(Some(&c), Some(&d), &rules), 10.0);
    }

    #[test]
    fn mismatch_cap_clamps_one_sided_games() {
        assert_eq!(mismatch_capped(40.0, 0.0, 30.0), 30.0);
        assert_eq!(mismatch_capped(0.0, 40.0, 30.0), 30.0);
        assert_eq!(mismatch_capped(40.0, 5.0, 30.0), 40.0);
        assert_eq!(mismatch_capped(0.0, 0.0, 30.0), 0.0);
    }

    #[test]
    fn bonuses_are_added_after_the_cap() {
        let rules = BonusRules::default();
        let a = team(201, 30.0, GamesBack::Leading);
        let b = team(201, 22.5, GamesBack::Behind(1.0));
        let out = combine_playoff_points(Some(&a), Some(&b), 15.0, &rules);
        assert_eq!(out.both_alive_bonus, 15.0);
        assert_eq!(out.head_to_head_bonus, 10.0);
        assert_eq!(out.final_points, 55.0);
    }

    #[test]
    fn inflated_one_sided_total_is_capped_before_head_to_head() {
        let rules = BonusRules::default();
        let hot = team(201, 40.0, GamesBack::Leading);
        let dead = team(201, 0.0, GamesBack::Leading);
        let out = combine_playoff_points(Some(&hot), Some(&dead), 15.0, &rules);
        assert_eq!(out.both_alive_bonus, 0.0);
        assert_eq!(out.head_to_head_bonus, 10.0);
        assert_eq!(out.final_points, 40.0);
    }
}
