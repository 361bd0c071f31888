use crate::distance::GamesBack;

/// Piecewise-linear playoff proximity curve.
///
/// Full points at zero games back, half points at `half_at`, nothing from `zero_at` on,
/// linear in between. Non-increasing and continuous at every breakpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityCurve {
    pub max_points: f64,
    pub half_at: f64,
    pub zero_at: f64,
}

impl ProximityCurve {
    /// 0 / 2 / 4 games back. Used by the watchability scorer.
    pub const STRICT: Self = Self {
        max_points: 30.0,
        half_at: 2.0,
        zero_at: 4.0,
    };

    /// 0 / 3 / 6 games back, for looser races.
    pub const WIDE: Self = Self {
        max_points: 30.0,
        half_at: 3.0,
        zero_at: 6.0,
    };

    /// `strict` or `wide`.
    pub fn named(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Some(Self::STRICT),
            "wide" => Some(Self::WIDE),
            _ => None,
        }
    }

    pub fn points(&self, gb: GamesBack) -> f64 {
        match gb {
            GamesBack::Leading => self.max_points,
            GamesBack::Behind(games) => self.points_at(games),
            GamesBack::Unknown => 0.0,
        }
    }

    pub fn points_at(&self, distance: f64) -> f64 {
        if distance.is_nan() {
            return 0.0;
        }
        let half = self.max_points / 2.0;
        if distance <= 0.0 {
            self.max_points
        } else if distance >= self.zero_at {
            0.0
        } else if distance <= self.half_at {
            self.max_points - (distance / self.half_at) * half
        } else {
            half - ((distance - self.half_at) / (self.zero_at - self.half_at)) * half
        }
    }
}

impl Default for ProximityCurve {
    fn default() -> Self {
        Self::STRICT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_curve_breakpoints() {
        let c = ProximityCurve::STRICT;
        assert_eq!(c.points_at(0.0), 30.0);
        assert_eq!(c.points_at(1.0), 22.5);
        assert_eq!(c.points_at(2.0), 15.0);
        assert_eq!(c.points_at(3.0), 7.5);
        assert_eq!(c.points_at(4.0), 0.0);
        assert_eq!(c.points_at(12.0), 0.0);
    }

    #[test]
    fn wide_curve_shares_the_shape() {
        let c = ProximityCurve::WIDE;
        assert_eq!(c.points_at(0.0), 30.0);
        assert_eq!(c.points_at(3.0), 15.0);
        assert_eq!(c.points_at(4.5), 7.5);
        assert_eq!(c.points_at(6.0), 0.0);
        assert_eq!(ProximityCurve::named(" Wide "), Some(ProximityCurve::WIDE));
        assert_eq!(ProximityCurve::named("steep"), None);
    }

    #[test]
    fn tagged_distances() {
        let c = ProximityCurve::STRICT;
        assert_eq!(c.points(GamesBack::Leading), 30.0);
        assert_eq!(c.points(GamesBack::Behind(1.0)), 22.5);
        assert_eq!(c.points(GamesBack::Unknown), 0.0);
        assert_eq!(c.points_at(f64::NAN), 0.0);
    }
}
