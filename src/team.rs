#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AUTO_FRACTION, CONSISTENCY_BASE, CONSISTENCY_FLOOR, CONSISTENCY_JITTER, CONSISTENCY_SLOPE,
    ENDGAME_FRACTION, TELEOP_FRACTION,
};
use crate::random::RandomSource;

/// A team's per-match point contributions, split by match phase.
///
/// Rates are in the rating system's native units (points per match).
/// Constructed once per team per query and never mutated afterwards.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamRating {
    pub id: u32,
    pub display_name: String,

    /// Autonomous-period contribution
    pub auto_rate: f64,

    /// Driver-controlled contribution
    pub teleop_rate: f64,

    /// Endgame contribution
    pub endgame_rate: f64,

    /// Externally supplied composite rating
    pub aggregate_rate: f64,

    /// Dispersion proxy, lower is better
    pub consistency: f64,
}

/// Optional phase components as reported by a provider.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PhaseRates {
    pub auto: Option<f64>,
    pub teleop: Option<f64>,
    pub endgame: Option<f64>,
}

impl TeamRating {
    /// Build a rating with every component given explicitly.
    pub fn new(
        id: u32,
        display_name: impl Into<String>,
        auto_rate: f64,
        teleop_rate: f64,
        endgame_rate: f64,
        aggregate_rate: f64,
        consistency: f64,
    ) -> Self {
        TeamRating {
            id,
            display_name: display_name.into(),
            auto_rate: auto_rate.max(0.0),
            teleop_rate: teleop_rate.max(0.0),
            endgame_rate: endgame_rate.max(0.0),
            aggregate_rate: aggregate_rate.max(0.0),
            consistency: consistency.max(0.0),
        }
    }

    /// Build a rating from an aggregate, deriving any missing phase component
    /// as a fixed share of the aggregate.
    ///
    /// A reported value of zero counts as missing.
    pub fn from_aggregate(
        id: u32,
        display_name: impl Into<String>,
        aggregate_rate: f64,
        phases: PhaseRates,
        consistency: f64,
    ) -> Self {
        let pick = |value: Option<f64>, fraction: f64| match value {
            Some(v) if v != 0.0 => v,
            _ => aggregate_rate * fraction,
        };
        TeamRating::new(
            id,
            display_name,
            pick(phases.auto, AUTO_FRACTION),
            pick(phases.teleop, TELEOP_FRACTION),
            pick(phases.endgame, ENDGAME_FRACTION),
            aggregate_rate,
            consistency,
        )
    }

    /// Sum of the three phase components.
    pub fn phase_total(&self) -> f64 {
        self.auto_rate + self.teleop_rate + self.endgame_rate
    }

    /// Share of the aggregate rating earned in autonomous, or `None` for an unrated team.
    pub fn auto_share(&self) -> Option<f64> {
        (self.aggregate_rate > 0.0).then(|| self.auto_rate / self.aggregate_rate)
    }

    /// Share of the aggregate rating earned in teleop, or `None` for an unrated team.
    pub fn teleop_share(&self) -> Option<f64> {
        (self.aggregate_rate > 0.0).then(|| self.teleop_rate / self.aggregate_rate)
    }
}

/// Stand-in dispersion for teams without measured variance: stronger teams are
/// assumed steadier, with a little jitter so ties break.
pub fn synthetic_consistency<R: RandomSource + ?Sized>(aggregate_rate: f64, rng: &mut R) -> f64 {
    let jitter = rng.next_f64() * CONSISTENCY_JITTER;
    (CONSISTENCY_BASE - aggregate_rate * CONSISTENCY_SLOPE + jitter).max(CONSISTENCY_FLOOR)
}

#[cfg(feature = "python")]
#[pymethods]
impl TeamRating {
    #[new]
    #[pyo3(signature = (id, display_name, auto_rate, teleop_rate, endgame_rate, aggregate_rate, consistency = 15.0))]
    fn py_new(
        id: u32,
        display_name: String,
        auto_rate: f64,
        teleop_rate: f64,
        endgame_rate: f64,
        aggregate_rate: f64,
        consistency: f64,
    ) -> Self {
        TeamRating::new(
            id,
            display_name,
            auto_rate,
            teleop_rate,
            endgame_rate,
            aggregate_rate,
            consistency,
        )
    }

    fn __str__(&self) -> String {
        format!(
            "{} ({}): {} | {} | {} | {}",
            self.display_name, self.id, self.auto_rate, self.teleop_rate, self.endgame_rate, self.aggregate_rate
        )
    }

    fn __repr__(&self) -> String {
        format!(
            "TeamRating({}, {:?}, {}, {}, {}, {})",
            self.id, self.display_name, self.auto_rate, self.teleop_rate, self.endgame_rate, self.aggregate_rate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::testing::Scripted;

    #[test]
    fn test_derived_components_sum_to_aggregate() {
        let team = TeamRating::from_aggregate(1, "A", 80.0, PhaseRates::default(), 10.0);
        assert!((team.auto_rate - 20.0).abs() < 1e-10);
        assert!((team.teleop_rate - 44.0).abs() < 1e-10);
        assert!((team.endgame_rate - 16.0).abs() < 1e-10);
        assert!((team.phase_total() - 80.0).abs() < 1e-10);
    }

    #[test]
    fn test_reported_components_kept() {
        let phases = PhaseRates {
            auto: Some(30.0),
            teleop: None,
            endgame: Some(0.0),
        };
        let team = TeamRating::from_aggregate(2, "B", 100.0, phases, 10.0);
        assert_eq!(team.auto_rate, 30.0);
        assert!((team.teleop_rate - 55.0).abs() < 1e-10);
        // zero is treated as unreported
        assert!((team.endgame_rate - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_negative_inputs_clamped() {
        let team = TeamRating::new(3, "C", -1.0, 5.0, -2.0, 3.0, -4.0);
        assert_eq!(team.auto_rate, 0.0);
        assert_eq!(team.endgame_rate, 0.0);
        assert_eq!(team.consistency, 0.0);
    }

    #[test]
    fn test_synthetic_consistency_floor() {
        let mut src = Scripted::new(vec![0.0]);
        assert_eq!(synthetic_consistency(500.0, &mut src), 5.0);

        let mut src = Scripted::new(vec![0.5]);
        let c = synthetic_consistency(50.0, &mut src);
        assert!((c - 17.5).abs() < 1e-10);
    }

    #[test]
    fn test_shares_guard_zero_aggregate() {
        let team = TeamRating::new(4, "D", 10.0, 10.0, 0.0, 0.0, 10.0);
        assert_eq!(team.auto_share(), None);
        assert_eq!(team.teleop_share(), None);
    }
}
