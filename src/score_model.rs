use serde::{Deserialize, Serialize};

use crate::constants::{MATCH_NOISE, PICK_LIST_NOISE};
use crate::random::RandomSource;
use crate::team::TeamRating;

/// Stochastic single-match score model.
///
/// Each phase rate is scaled by `1 + noise * z` with `z` an independent
/// standard normal draw per team per phase. Each team's subtotal is floored at
/// zero before the alliance sum.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    pub noise: f64,
    pub include_endgame: bool,
}

impl ScoreModel {
    /// Full match model: all three phases, 20% noise.
    pub const MATCH: ScoreModel = ScoreModel {
        noise: MATCH_NOISE,
        include_endgame: true,
    };

    /// Quick pick-list model: auto and teleop only, 15% noise.
    pub const PICK_LIST: ScoreModel = ScoreModel {
        noise: PICK_LIST_NOISE,
        include_endgame: false,
    };

    /// One simulated contribution from a single team, never negative.
    pub fn team_score<R: RandomSource + ?Sized>(&self, team: &TeamRating, rng: &mut R) -> f64 {
        let mut total = team.auto_rate * (1.0 + rng.gaussian() * self.noise)
            + team.teleop_rate * (1.0 + rng.gaussian() * self.noise);
        if self.include_endgame {
            total += team.endgame_rate * (1.0 + rng.gaussian() * self.noise);
        }
        total.max(0.0)
    }

    /// One simulated score for an alliance of any size.
    pub fn alliance_score<R: RandomSource + ?Sized>(&self, teams: &[&TeamRating], rng: &mut R) -> f64 {
        teams.iter().map(|t| self.team_score(t, rng)).sum()
    }

    /// One simulated score for a two-team alliance.
    pub fn pair_score<R: RandomSource + ?Sized>(&self, a: &TeamRating, b: &TeamRating, rng: &mut R) -> f64 {
        self.team_score(a, rng) + self.team_score(b, rng)
    }

    /// Noise-free score of a team under this model.
    pub fn expected_team_score(&self, team: &TeamRating) -> f64 {
        let base = team.auto_rate + team.teleop_rate;
        if self.include_endgame {
            base + team.endgame_rate
        } else {
            base
        }
    }
}

impl Default for ScoreModel {
    fn default() -> Self {
        ScoreModel::MATCH
    }
}
