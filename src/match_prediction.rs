//! Two-alliance match prediction.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use crate::distribution::{head_to_head, sample_pair, ScoreDistribution};
use crate::random::RandomSource;
use crate::score_model::ScoreModel;
use crate::team::TeamRating;

/// Expected-score gap under which a match is called close
const CLOSE_MATCH_MARGIN: f64 = 10.0;

/// Summed auto rating lead needed before auto is called out
const AUTO_EDGE_MARGIN: f64 = 5.0;

const FAVORABLE_ODDS: f64 = 70.0;
const UNDERDOG_ODDS: f64 = 30.0;

/// A strategic observation about a predicted match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Insight {
    CloseMatch { differential: f64 },
    ScoreAdvantage { differential: f64 },
    ScoreDeficit { differential: f64 },
    ConsistencyAdvantage { yours: f64, theirs: f64 },
    ConsistencyChallenge { yours: f64, theirs: f64 },
    AutoAdvantage { margin: f64 },
    TeleopCritical { margin: f64 },
    FavorableOdds,
    UnderdogPosition,
    TossUp,
}

impl Insight {
    pub fn title(&self) -> &'static str {
        match self {
            Insight::CloseMatch { .. } => "Close Match",
            Insight::ScoreAdvantage { .. } => "Score Advantage",
            Insight::ScoreDeficit { .. } => "Score Deficit",
            Insight::ConsistencyAdvantage { .. } => "Consistency Advantage",
            Insight::ConsistencyChallenge { .. } => "Consistency Challenge",
            Insight::AutoAdvantage { .. } => "Auto Advantage",
            Insight::TeleopCritical { .. } => "TeleOp Critical",
            Insight::FavorableOdds => "Favorable Odds",
            Insight::UnderdogPosition => "Underdog Position",
            Insight::TossUp => "Toss-Up Match",
        }
    }
}

/// Outcome estimate for one alliance against another.
#[cfg_attr(feature = "python", pyclass(frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchPrediction {
    #[cfg_attr(feature = "python", pyo3(get))]
    pub your_distribution: ScoreDistribution,
    #[cfg_attr(feature = "python", pyo3(get))]
    pub opponent_distribution: ScoreDistribution,
    /// Trial-aligned win percentage for your alliance
    #[cfg_attr(feature = "python", pyo3(get))]
    pub your_win_probability: f64,
    /// Complement of `your_win_probability`; ties are credited here
    #[cfg_attr(feature = "python", pyo3(get))]
    pub opponent_win_probability: f64,
    /// Your mean minus the opponent mean
    #[cfg_attr(feature = "python", pyo3(get))]
    pub expected_differential: f64,
    /// Normal approximation of the same win percentage, from means and spreads
    #[cfg_attr(feature = "python", pyo3(get))]
    pub analytic_win_probability: f64,
    pub insights: Vec<Insight>,
}

/// Simulate both alliances with the same iteration count and compare them
/// trial by trial.
pub fn predict_match<R: RandomSource + ?Sized>(
    model: &ScoreModel,
    yours: (&TeamRating, &TeamRating),
    opponents: (&TeamRating, &TeamRating),
    iterations: usize,
    rng: &mut R,
) -> MatchPrediction {
    let your_distribution = sample_pair(model, yours.0, yours.1, iterations, rng);
    let opponent_distribution = sample_pair(model, opponents.0, opponents.1, iterations, rng);

    let your_win_probability = head_to_head(&your_distribution, &opponent_distribution);
    let expected_differential = your_distribution.mean - opponent_distribution.mean;
    let analytic_win_probability = analytic_win_probability(&your_distribution, &opponent_distribution);

    let your_auto = yours.0.auto_rate + yours.1.auto_rate;
    let their_auto = opponents.0.auto_rate + opponents.1.auto_rate;

    let insights = build_insights(
        expected_differential,
        your_distribution.std_dev,
        opponent_distribution.std_dev,
        your_auto - their_auto,
        your_win_probability,
    );

    tracing::info!(
        yours = ?(yours.0.id, yours.1.id),
        opponents = ?(opponents.0.id, opponents.1.id),
        win_pct = your_win_probability,
        differential = expected_differential,
        "predicted match"
    );

    MatchPrediction {
        your_distribution,
        opponent_distribution,
        your_win_probability,
        opponent_win_probability: 100.0 - your_win_probability,
        expected_differential,
        analytic_win_probability,
        insights,
    }
}

/// `P(X > Y) * 100` for independent normals fitted to the two distributions.
pub fn analytic_win_probability(ours: &ScoreDistribution, theirs: &ScoreDistribution) -> f64 {
    let diff = ours.mean - theirs.mean;
    let spread = (ours.std_dev.powi(2) + theirs.std_dev.powi(2)).sqrt();

    if spread == 0.0 {
        return if diff > 0.0 {
            100.0
        } else if diff < 0.0 {
            0.0
        } else {
            50.0
        };
    }

    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(diff / spread) * 100.0,
        Err(_) => 50.0,
    }
}

fn build_insights(
    differential: f64,
    your_spread: f64,
    their_spread: f64,
    auto_margin: f64,
    win_probability: f64,
) -> Vec<Insight> {
    let mut insights = Vec::with_capacity(4);

    insights.push(if differential.abs() < CLOSE_MATCH_MARGIN {
        Insight::CloseMatch { differential }
    } else if differential > 0.0 {
        Insight::ScoreAdvantage { differential }
    } else {
        Insight::ScoreDeficit { differential }
    });

    insights.push(if your_spread < their_spread {
        Insight::ConsistencyAdvantage {
            yours: your_spread,
            theirs: their_spread,
        }
    } else {
        Insight::ConsistencyChallenge {
            yours: your_spread,
            theirs: their_spread,
        }
    });

    if auto_margin > AUTO_EDGE_MARGIN {
        insights.push(Insight::AutoAdvantage { margin: auto_margin });
    } else if auto_margin < -AUTO_EDGE_MARGIN {
        insights.push(Insight::TeleopCritical { margin: -auto_margin });
    }

    insights.push(if win_probability > FAVORABLE_ODDS {
        Insight::FavorableOdds
    } else if win_probability < UNDERDOG_ODDS {
        Insight::UnderdogPosition
    } else {
        Insight::TossUp
    });

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::seeded_rng;
    use crate::random::testing::ZeroNoise;
    use crate::team::PhaseRates;

    fn team(id: u32, aggregate: f64) -> TeamRating {
        TeamRating::from_aggregate(id, format!("T{}", id), aggregate, PhaseRates::default(), 10.0)
    }

    #[test]
    fn test_equal_alliances_near_even() {
        let (a, b, c, d) = (team(1, 60.0), team(2, 50.0), team(3, 60.0), team(4, 50.0));
        let mut rng = seeded_rng(Some(5));
        let p = predict_match(&ScoreModel::MATCH, (&a, &b), (&c, &d), 10_000, &mut rng);
        assert!((p.your_win_probability - 50.0).abs() < 3.0, "got {}", p.your_win_probability);
        assert!((p.analytic_win_probability - 50.0).abs() < 3.0);
        assert!((p.your_win_probability + p.opponent_win_probability - 100.0).abs() < 1e-10);
        assert_eq!(p.your_distribution.len(), 10_000);
        assert_eq!(p.opponent_distribution.len(), 10_000);
    }

    #[test]
    fn test_stronger_alliance_favored() {
        let (a, b, c, d) = (team(1, 120.0), team(2, 100.0), team(3, 50.0), team(4, 40.0));
        let mut rng = seeded_rng(Some(9));
        let p = predict_match(&ScoreModel::MATCH, (&a, &b), (&c, &d), 2_000, &mut rng);
        assert!(p.your_win_probability > 99.0);
        assert!(p.expected_differential > 100.0);
        assert!(matches!(p.insights[0], Insight::ScoreAdvantage { .. }));
        assert!(p.insights.contains(&Insight::FavorableOdds));
        assert!(p.insights.iter().any(|i| matches!(i, Insight::AutoAdvantage { .. })));
    }

    #[test]
    fn test_identical_zero_noise_is_a_wash() {
        let (a, b) = (team(1, 60.0), team(2, 50.0));
        let p = predict_match(&ScoreModel::MATCH, (&a, &b), (&a, &b), 100, &mut ZeroNoise);
        // every trial ties, and ties are not wins
        assert_eq!(p.your_win_probability, 0.0);
        assert_eq!(p.analytic_win_probability, 50.0);
        assert!(matches!(p.insights[0], Insight::CloseMatch { .. }));
        assert!(matches!(p.insights[1], Insight::ConsistencyChallenge { .. }));
        assert_eq!(p.insights.last(), Some(&Insight::UnderdogPosition));
    }

    #[test]
    fn test_insight_rules() {
        let insights = build_insights(-25.0, 10.0, 12.0, -8.0, 45.0);
        assert_eq!(
            insights,
            vec![
                Insight::ScoreDeficit { differential: -25.0 },
                Insight::ConsistencyAdvantage { yours: 10.0, theirs: 12.0 },
                Insight::TeleopCritical { margin: 8.0 },
                Insight::TossUp,
            ]
        );

        let insights = build_insights(3.0, 12.0, 10.0, 2.0, 20.0);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[2].title(), "Underdog Position");
    }
}
