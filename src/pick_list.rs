//! Ranking prospective alliance partners.

#[cfg(feature = "python")]
use pyo3::prelude::*;
use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::complementarity::complementary_score;
use crate::config::{SimulationConfig, WinModel};
use crate::constants::{
    CONSISTENCY_OFFSET, WEIGHT_AGGREGATE, WEIGHT_COMPLEMENTARY, WEIGHT_CONSISTENCY, WEIGHT_WIN_PROB,
};
use crate::random::{child_seeds, seeded_rng};
use crate::rating_source::EventRoster;
use crate::score_model::ScoreModel;
use crate::team::TeamRating;
use crate::tournament::TournamentSimulator;
use crate::win_prob::{estimate_pairwise_win, target_win_probability};

/// Combine a candidate's metrics into one ranking scalar.
///
/// Unnormalized and only meaningful relative to other candidates scored the
/// same way.
pub fn pick_score(aggregate_rate: f64, win_prob: f64, complementary: f64, consistency: f64) -> f64 {
    WEIGHT_AGGREGATE * aggregate_rate
        + WEIGHT_WIN_PROB * win_prob
        + WEIGHT_COMPLEMENTARY * complementary
        + WEIGHT_CONSISTENCY * (CONSISTENCY_OFFSET - consistency)
}

/// A ranked prospective partner.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AllianceCandidate {
    pub team: TeamRating,
    /// Chance (0-100) of beating a rival pair while reaching the target
    pub win_prob: f64,
    /// Complementarity with your team (0-100)
    pub complementary: f64,
    pub pick_score: f64,
    /// Chance (0-100) of winning a full bracket together; not part of `pick_score`
    pub event_win_percent: f64,
    /// 1-based rank by `pick_score`
    pub pick_order: usize,
}

/// Immutable result of one ranking run.
#[cfg_attr(feature = "python", pyclass(get_all, frozen))]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PickList {
    pub event_name: String,
    pub event_code: String,
    pub your_team: TeamRating,
    /// Sorted by `pick_order`
    pub candidates: Vec<AllianceCandidate>,
    /// Roster entries left out for lack of ratings
    pub unrated: Vec<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthFilter {
    #[default]
    Any,
    /// Over 40% of rating from auto, and auto of at least 25
    Auto,
    /// Over 60% of rating from teleop, and teleop of at least 40
    Teleop,
    /// Consistency under 15 with a rating of at least 30
    Consistent,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PickListFilter {
    pub min_rating: f64,
    pub strength: StrengthFilter,
}

impl PickListFilter {
    pub fn accepts(&self, team: &TeamRating) -> bool {
        if team.aggregate_rate < self.min_rating {
            return false;
        }
        match self.strength {
            StrengthFilter::Any => true,
            StrengthFilter::Auto => team.auto_share().is_some_and(|s| s > 0.4) && team.auto_rate >= 25.0,
            StrengthFilter::Teleop => team.teleop_share().is_some_and(|s| s > 0.6) && team.teleop_rate >= 40.0,
            StrengthFilter::Consistent => team.consistency < 15.0 && team.aggregate_rate >= 30.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    PickScore,
    Aggregate,
    Auto,
    Teleop,
    /// Ascending: steadier teams first
    Consistency,
    WinProb,
    Complementary,
}

impl SortKey {
    fn compare(&self, a: &AllianceCandidate, b: &AllianceCandidate) -> Ordering {
        match self {
            SortKey::PickScore => b.pick_score.total_cmp(&a.pick_score),
            SortKey::Aggregate => b.team.aggregate_rate.total_cmp(&a.team.aggregate_rate),
            SortKey::Auto => b.team.auto_rate.total_cmp(&a.team.auto_rate),
            SortKey::Teleop => b.team.teleop_rate.total_cmp(&a.team.teleop_rate),
            SortKey::Consistency => a.team.consistency.total_cmp(&b.team.consistency),
            SortKey::WinProb => b.win_prob.total_cmp(&a.win_prob),
            SortKey::Complementary => b.complementary.total_cmp(&a.complementary),
        }
    }
}

/// Stable sort; equal keys keep their current order.
pub fn sort_candidates(candidates: &mut [AllianceCandidate], sort: SortKey) {
    candidates.sort_by(|a, b| sort.compare(a, b));
}

/// Display tier for a score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    S,
    A,
    B,
    C,
}

pub fn pick_tier(pick_score: f64) -> Tier {
    if pick_score > 75.0 {
        Tier::S
    } else if pick_score > 60.0 {
        Tier::A
    } else if pick_score > 45.0 {
        Tier::B
    } else {
        Tier::C
    }
}

pub fn complementary_tier(complementary: f64) -> Tier {
    if complementary >= 60.0 {
        Tier::S
    } else if complementary >= 40.0 {
        Tier::A
    } else if complementary >= 20.0 {
        Tier::B
    } else {
        Tier::C
    }
}

impl PickList {
    /// Candidates passing `filter`, in rank order. Ranks are left as assigned.
    pub fn filtered(&self, filter: &PickListFilter) -> Vec<AllianceCandidate> {
        self.candidates
            .iter()
            .filter(|c| filter.accepts(&c.team))
            .cloned()
            .collect()
    }

    /// Candidates passing `filter`, ordered by `sort`.
    pub fn view(&self, filter: &PickListFilter, sort: SortKey) -> Vec<AllianceCandidate> {
        let mut view = self.filtered(filter);
        sort_candidates(&mut view, sort);
        view
    }

    pub fn get(&self, team: u32) -> Option<&AllianceCandidate> {
        self.candidates.iter().find(|c| c.team.id == team)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Score and rank every team in `pool` other than `your_team`.
///
/// Candidates are evaluated in parallel, each with its own generator seeded
/// from `rng`, so a seeded `rng` gives the same ranking every run.
pub fn rank_candidates<R: Rng>(
    your_team: &TeamRating,
    pool: &[TeamRating],
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<AllianceCandidate> {
    let others: Vec<&TeamRating> = pool.iter().filter(|t| t.id != your_team.id).collect();
    let seeds = child_seeds(rng, others.len());
    let model = ScoreModel::PICK_LIST;
    let tournament = TournamentSimulator::new(model, config.tournament_trials);

    let mut candidates: Vec<AllianceCandidate> = others
        .par_iter()
        .zip(seeds.par_iter())
        .map(|(&team, &seed)| {
            let mut rng = seeded_rng(Some(seed));

            let win_prob = match config.win_model {
                WinModel::Pairwise => estimate_pairwise_win(
                    &model,
                    your_team,
                    team,
                    pool,
                    config.target_score,
                    config.pairwise_iterations,
                    &mut rng,
                ),
                WinModel::Target => target_win_probability(
                    &model,
                    your_team,
                    team,
                    config.target_score,
                    config.quick_iterations,
                    &mut rng,
                ),
            };
            let complementary = complementary_score(Some(your_team), Some(team));
            let event_win_percent = tournament.simulate_event_win(your_team, team, pool, &mut rng);
            let score = pick_score(team.aggregate_rate, win_prob, complementary, team.consistency);

            tracing::debug!(
                team = team.id,
                win_prob,
                complementary,
                event_win_percent,
                pick_score = score,
                "scored candidate"
            );

            AllianceCandidate {
                team: team.clone(),
                win_prob,
                complementary,
                pick_score: score,
                event_win_percent,
                pick_order: 0,
            }
        })
        .collect();

    sort_candidates(&mut candidates, SortKey::PickScore);
    for (i, candidate) in candidates.iter_mut().enumerate() {
        candidate.pick_order = i + 1;
    }
    candidates
}

/// Rank the rated roster of an event for `your_team`.
pub fn build_pick_list<R: Rng>(
    roster: &EventRoster,
    your_team: &TeamRating,
    config: &SimulationConfig,
    rng: &mut R,
) -> PickList {
    let candidates = rank_candidates(your_team, &roster.teams, config, rng);

    tracing::info!(
        event = %roster.code,
        your_team = your_team.id,
        candidates = candidates.len(),
        "built pick list"
    );

    PickList {
        event_name: roster.name.clone(),
        event_code: roster.code.clone(),
        your_team: your_team.clone(),
        candidates,
        unrated: roster.unrated.clone(),
    }
}
