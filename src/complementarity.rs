//! How well a candidate's strengths cover a base team's weaknesses.
//!
//! Scored out of 100: up to 40 for autonomous, up to 40 for teleop, and up to
//! 20 for being strong in both. Thresholds are fixed.

use crate::constants::{COMPLEMENTARY_MAX, COMPLEMENTARY_MIN_AGGREGATE};
use crate::team::TeamRating;

/// Gap tiers and floors for one match phase.
struct PhaseRule {
    /// Candidate must reach this rate to earn anything
    candidate_floor: f64,
    /// Below this, your team counts as weak in the phase
    weak_below: f64,
    /// (minimum gap, points) when you are weak, checked in order
    weak_tiers: [(f64, f64); 3],
    /// Points when you are weak and the gap misses every tier
    weak_base: f64,
    /// (minimum gap, points) when you are already adequate
    adequate_tiers: [(f64, f64); 2],
}

const AUTO_RULE: PhaseRule = PhaseRule {
    candidate_floor: 20.0,
    weak_below: 20.0,
    weak_tiers: [(30.0, 40.0), (20.0, 30.0), (10.0, 20.0)],
    weak_base: 10.0,
    adequate_tiers: [(20.0, 15.0), (10.0, 8.0)],
};

const TELEOP_RULE: PhaseRule = PhaseRule {
    candidate_floor: 35.0,
    weak_below: 40.0,
    weak_tiers: [(40.0, 40.0), (25.0, 30.0), (15.0, 20.0)],
    weak_base: 10.0,
    adequate_tiers: [(30.0, 15.0), (15.0, 8.0)],
};

/// Well-rounded bonus: candidate needs this much auto and teleop
const ROUNDED_AUTO_FLOOR: f64 = 25.0;
const ROUNDED_TELEOP_FLOOR: f64 = 40.0;

/// (auto gap, teleop gap, points) when the candidate beats you in both phases
const ROUNDED_TIERS: [(f64, f64, f64); 3] = [(15.0, 20.0, 20.0), (10.0, 15.0, 15.0), (5.0, 10.0, 10.0)];

/// Strong in both phases without beating you in both
const ROUNDED_FLAT_BONUS: f64 = 5.0;

impl PhaseRule {
    fn score(&self, yours: f64, theirs: f64) -> f64 {
        let gap = theirs - yours;
        if gap <= 0.0 || theirs < self.candidate_floor {
            return 0.0;
        }

        if yours < self.weak_below {
            self.weak_tiers
                .iter()
                .find(|(min_gap, _)| gap >= *min_gap)
                .map_or(self.weak_base, |&(_, points)| points)
        } else {
            self.adequate_tiers
                .iter()
                .find(|(min_gap, _)| gap >= *min_gap)
                .map_or(0.0, |&(_, points)| points)
        }
    }
}

fn well_rounded_bonus(your_auto: f64, your_teleop: f64, their_auto: f64, their_teleop: f64) -> f64 {
    if their_auto < ROUNDED_AUTO_FLOOR || their_teleop < ROUNDED_TELEOP_FLOOR {
        return 0.0;
    }

    let auto_gap = their_auto - your_auto;
    let teleop_gap = their_teleop - your_teleop;

    if auto_gap > 0.0 && teleop_gap > 0.0 {
        ROUNDED_TIERS
            .iter()
            .find(|(a, t, _)| auto_gap >= *a && teleop_gap >= *t)
            .map_or(0.0, |&(_, _, points)| points)
    } else {
        ROUNDED_FLAT_BONUS
    }
}

/// Complementarity of `candidate` for `your_team`, in `[0, 100]`.
///
/// Returns 0 when either rating is absent or the candidate's aggregate rating
/// is below 30.
pub fn complementary_score(your_team: Option<&TeamRating>, candidate: Option<&TeamRating>) -> f64 {
    let (yours, theirs) = match (your_team, candidate) {
        (Some(y), Some(t)) => (y, t),
        _ => return 0.0,
    };

    if theirs.aggregate_rate == 0.0 || theirs.aggregate_rate < COMPLEMENTARY_MIN_AGGREGATE {
        return 0.0;
    }

    let score = AUTO_RULE.score(yours.auto_rate, theirs.auto_rate)
        + TELEOP_RULE.score(yours.teleop_rate, theirs.teleop_rate)
        + well_rounded_bonus(yours.auto_rate, yours.teleop_rate, theirs.auto_rate, theirs.teleop_rate);

    score.min(COMPLEMENTARY_MAX)
}
