//! Python bindings.

use pyo3::exceptions::{PyLookupError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::complementarity::complementary_score;
use crate::config::{SimulationConfig, WinModel};
use crate::constants::{ALLIANCE_TARGET, MATCH_ITERATIONS, PICK_LIST_TARGET};
use crate::distribution::{simulate_alliance, AllianceSimulation, HistogramBin, ScoreDistribution};
use crate::error::{ExportError, PipelineError, RatingError};
use crate::export::to_csv_string;
use crate::match_prediction::{predict_match, MatchPrediction};
use crate::pick_list::{pick_tier, rank_candidates, AllianceCandidate, PickList, PickListFilter, StrengthFilter};
use crate::random::seeded_rng;
use crate::rating_source::InMemoryProvider;
use crate::request::{run_pick_list, PickListRequest};
use crate::score_model::ScoreModel;
use crate::team::TeamRating;

fn pipeline_err(e: PipelineError) -> PyErr {
    match e {
        PipelineError::Validation(e) => PyValueError::new_err(e.to_string()),
        PipelineError::Config(e) => PyValueError::new_err(e.to_string()),
        PipelineError::Rating(e) if e.is_not_found() => PyLookupError::new_err(e.to_string()),
        PipelineError::Rating(e) => PyRuntimeError::new_err(e.to_string()),
    }
}

fn export_err(e: ExportError) -> PyErr {
    PyRuntimeError::new_err(e.to_string())
}

fn parse_win_model(name: &str) -> PyResult<WinModel> {
    match name {
        "pairwise" => Ok(WinModel::Pairwise),
        "target" => Ok(WinModel::Target),
        other => Err(PyValueError::new_err(format!("Unknown win model: {}", other))),
    }
}

fn parse_strength(name: &str) -> PyResult<StrengthFilter> {
    match name {
        "any" => Ok(StrengthFilter::Any),
        "auto" => Ok(StrengthFilter::Auto),
        "teleop" => Ok(StrengthFilter::Teleop),
        "consistent" => Ok(StrengthFilter::Consistent),
        other => Err(PyValueError::new_err(format!("Unknown strength filter: {}", other))),
    }
}

#[pymethods]
impl MatchPrediction {
    /// Insight headings in display order.
    fn insight_titles(&self) -> Vec<&'static str> {
        self.insights.iter().map(|i| i.title()).collect()
    }

    fn insights_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.insights).map_err(|e| PyRuntimeError::new_err(e.to_string()))
    }
}

#[pymethods]
impl PickList {
    #[pyo3(signature = (min_rating = 0.0, strength = "any"))]
    fn filter(&self, min_rating: f64, strength: &str) -> PyResult<Vec<AllianceCandidate>> {
        let filter = PickListFilter {
            min_rating,
            strength: parse_strength(strength)?,
        };
        Ok(self.filtered(&filter))
    }

    fn to_csv(&self) -> PyResult<String> {
        to_csv_string(&self.candidates).map_err(export_err)
    }

    fn __len__(&self) -> usize {
        self.len()
    }
}

/// Complementarity of `candidate` for `your_team` (0-100).
#[pyfunction]
fn py_complementary_score(your_team: &TeamRating, candidate: &TeamRating) -> f64 {
    complementary_score(Some(your_team), Some(candidate))
}

#[pyfunction]
fn py_pick_tier(pick_score: f64) -> String {
    format!("{:?}", pick_tier(pick_score))
}

/// Simulate one alliance against a target score.
#[pyfunction]
#[pyo3(signature = (a, b, target_score = ALLIANCE_TARGET, iterations = MATCH_ITERATIONS, seed = None))]
fn py_simulate_alliance(
    py: Python<'_>,
    a: TeamRating,
    b: TeamRating,
    target_score: f64,
    iterations: usize,
    seed: Option<u64>,
) -> AllianceSimulation {
    py.allow_threads(|| {
        let mut rng = seeded_rng(seed);
        simulate_alliance(&ScoreModel::MATCH, &a, &b, target_score, iterations, &mut rng)
    })
}

/// Predict `your` alliance against `opponent`.
#[pyfunction]
#[pyo3(signature = (your, opponent, iterations = MATCH_ITERATIONS, seed = None))]
fn py_predict_match(
    py: Python<'_>,
    your: (TeamRating, TeamRating),
    opponent: (TeamRating, TeamRating),
    iterations: usize,
    seed: Option<u64>,
) -> MatchPrediction {
    py.allow_threads(|| {
        let mut rng = seeded_rng(seed);
        predict_match(
            &ScoreModel::MATCH,
            (&your.0, &your.1),
            (&opponent.0, &opponent.1),
            iterations,
            &mut rng,
        )
    })
}

/// Rank every team in `pool` as a partner for `your_team`.
///
/// # Arguments
/// * `your_team` - The picking team
/// * `pool` - Rated teams at the event (may include `your_team`)
/// * `target_score` - Score an alliance must reach to count a win
/// * `win_model` - "pairwise" or "target"
/// * `seed` - Fixed seed for reproducible rankings
#[pyfunction]
#[pyo3(signature = (your_team, pool, target_score = PICK_LIST_TARGET, win_model = "pairwise", seed = None))]
fn py_rank_candidates(
    py: Python<'_>,
    your_team: TeamRating,
    pool: Vec<TeamRating>,
    target_score: f64,
    win_model: &str,
    seed: Option<u64>,
) -> PyResult<Vec<AllianceCandidate>> {
    let config = SimulationConfig {
        target_score,
        win_model: parse_win_model(win_model)?,
        seed,
        ..SimulationConfig::default()
    };
    Ok(py.allow_threads(|| {
        let mut rng = seeded_rng(config.seed);
        rank_candidates(&your_team, &pool, &config, &mut rng)
    }))
}

/// Build a pick list from a JSON ratings snapshot.
#[pyfunction]
#[pyo3(signature = (snapshot_json, event_code, your_team, seed = None))]
fn py_pick_list_from_snapshot(
    py: Python<'_>,
    snapshot_json: &str,
    event_code: String,
    your_team: String,
    seed: Option<u64>,
) -> PyResult<PickList> {
    let provider = InMemoryProvider::from_json(snapshot_json)
        .map_err(|e: RatingError| PyValueError::new_err(e.to_string()))?;
    let request = PickListRequest { event_code, your_team };
    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    py.allow_threads(|| run_pick_list(&provider, &request, &config))
        .map_err(pipeline_err)
}

#[pyfunction]
fn py_pick_list_csv(candidates: Vec<AllianceCandidate>) -> PyResult<String> {
    to_csv_string(&candidates).map_err(export_err)
}

/// Python module definition
#[pymodule]
fn alliance_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Classes
    m.add_class::<TeamRating>()?;
    m.add_class::<HistogramBin>()?;
    m.add_class::<ScoreDistribution>()?;
    m.add_class::<AllianceSimulation>()?;
    m.add_class::<MatchPrediction>()?;
    m.add_class::<AllianceCandidate>()?;
    m.add_class::<PickList>()?;

    // Functions
    m.add_function(wrap_pyfunction!(py_complementary_score, m)?)?;
    m.add_function(wrap_pyfunction!(py_pick_tier, m)?)?;
    m.add_function(wrap_pyfunction!(py_simulate_alliance, m)?)?;
    m.add_function(wrap_pyfunction!(py_predict_match, m)?)?;
    m.add_function(wrap_pyfunction!(py_rank_candidates, m)?)?;
    m.add_function(wrap_pyfunction!(py_pick_list_from_snapshot, m)?)?;
    m.add_function(wrap_pyfunction!(py_pick_list_csv, m)?)?;

    // Constants
    m.add("ALLIANCE_TARGET", ALLIANCE_TARGET)?;
    m.add("PICK_LIST_TARGET", PICK_LIST_TARGET)?;
    m.add("MATCH_ITERATIONS", MATCH_ITERATIONS)?;

    Ok(())
}
