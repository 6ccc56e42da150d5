//! Empirical score distributions built from repeated score-model trials.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::constants::HISTOGRAM_BINS;
use crate::random::RandomSource;
use crate::score_model::ScoreModel;
use crate::team::TeamRating;

#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Rounded bounds, e.g. `"112-118"`
    pub range_label: String,
    pub count: usize,
    /// Share of all samples in this bin, 0-100
    pub percentage: f64,
}

/// Summary of `samples.len()` simulated alliance scores.
///
/// `samples` keeps trial order so two distributions of equal length can be
/// compared trial by trial.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreDistribution {
    pub samples: Vec<f64>,
    pub mean: f64,
    /// Population standard deviation (divides by the sample count)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Lower median: element `n / 2` of the sorted samples
    pub median: f64,
    pub histogram: Vec<HistogramBin>,
}

impl ScoreDistribution {
    /// Summarize an existing sample sequence.
    pub fn from_samples(samples: Vec<f64>) -> Self {
        if samples.is_empty() {
            return ScoreDistribution {
                samples,
                mean: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                median: 0.0,
                histogram: build_histogram(&[], 0.0, 0.0),
            };
        }

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().mean();
        let std_dev = if min == max {
            0.0
        } else {
            samples.iter().population_std_dev()
        };

        let mut sorted = samples.clone();
        sorted.sort_by(f64::total_cmp);
        let median = sorted[sorted.len() / 2];

        let histogram = build_histogram(&samples, min, max);

        ScoreDistribution {
            samples,
            mean,
            std_dev,
            min,
            max,
            median,
            histogram,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Percentage of trials scoring at least `target`.
    pub fn win_probability(&self, target: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let wins = self.samples.iter().filter(|&&s| s >= target).count();
        wins as f64 / self.samples.len() as f64 * 100.0
    }
}

fn build_histogram(samples: &[f64], min: f64, max: f64) -> Vec<HistogramBin> {
    let width = (max - min) / HISTOGRAM_BINS as f64;
    let mut counts = [0usize; HISTOGRAM_BINS];

    for &s in samples {
        let bin = if width > 0.0 {
            (((s - min) / width).floor() as usize).min(HISTOGRAM_BINS - 1)
        } else {
            0
        };
        counts[bin] += 1;
    }

    let total = samples.len();
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| HistogramBin {
            range_label: format!(
                "{}-{}",
                (min + i as f64 * width).round(),
                (min + (i + 1) as f64 * width).round()
            ),
            count,
            percentage: if total == 0 {
                0.0
            } else {
                count as f64 / total as f64 * 100.0
            },
        })
        .collect()
}

/// Run `iterations` trials of the alliance `a + b`.
pub fn sample_pair<R: RandomSource + ?Sized>(
    model: &ScoreModel,
    a: &TeamRating,
    b: &TeamRating,
    iterations: usize,
    rng: &mut R,
) -> ScoreDistribution {
    let samples = (0..iterations).map(|_| model.pair_score(a, b, rng)).collect();
    ScoreDistribution::from_samples(samples)
}

/// Percentage of aligned trials in which `ours` strictly beats `theirs`.
///
/// Trials are compared by index, never resampled. Ties count for neither side.
/// Only the common prefix is compared when lengths differ.
pub fn head_to_head(ours: &ScoreDistribution, theirs: &ScoreDistribution) -> f64 {
    let n = ours.len().min(theirs.len());
    if n == 0 {
        return 0.0;
    }
    let wins = ours
        .samples
        .iter()
        .zip(&theirs.samples)
        .filter(|(a, b)| a > b)
        .count();
    wins as f64 / n as f64 * 100.0
}

/// A two-team alliance's score distribution measured against a target.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllianceSimulation {
    pub distribution: ScoreDistribution,
    pub target_score: f64,
    pub target_win_probability: f64,
}

pub fn simulate_alliance<R: RandomSource + ?Sized>(
    model: &ScoreModel,
    a: &TeamRating,
    b: &TeamRating,
    target_score: f64,
    iterations: usize,
    rng: &mut R,
) -> AllianceSimulation {
    let distribution = sample_pair(model, a, b, iterations, rng);
    let target_win_probability = distribution.win_probability(target_score);
    tracing::debug!(
        teams = ?(a.id, b.id),
        mean = distribution.mean,
        std_dev = distribution.std_dev,
        target = target_score,
        win_pct = target_win_probability,
        "simulated alliance"
    );
    AllianceSimulation {
        distribution,
        target_score,
        target_win_probability,
    }
}
