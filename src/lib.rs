//! Alliance Core - Monte Carlo alliance scoring and partner ranking.
//!
//! Simulates robotics alliance scores from per-phase team ratings, predicts
//! head-to-head matches, estimates event win chances through simulated
//! brackets, and ranks prospective partners into a pick list. Optional Python
//! bindings via PyO3 (`python` feature).

pub mod complementarity;
pub mod config;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod export;
pub mod match_prediction;
pub mod pick_list;
pub mod random;
pub mod rating_source;
pub mod request;
pub mod score_model;
pub mod team;
pub mod tournament;
pub mod win_prob;

#[cfg(feature = "python")]
mod python;

pub use complementarity::complementary_score;
pub use config::{load_config, SimulationConfig, WinModel};
pub use distribution::{head_to_head, sample_pair, simulate_alliance, AllianceSimulation, HistogramBin, ScoreDistribution};
pub use error::{ConfigError, ExportError, PipelineError, RatingError, ValidationError};
pub use export::{read_ranks, write_csv};
pub use match_prediction::{predict_match, Insight, MatchPrediction};
pub use pick_list::{
    build_pick_list, pick_score, rank_candidates, AllianceCandidate, PickList, PickListFilter, SortKey,
    StrengthFilter, Tier,
};
pub use random::{seeded_rng, RandomSource};
pub use rating_source::{EventRoster, InMemoryProvider, RatingProvider};
pub use request::{
    run_alliance_simulation, run_match_prediction, run_pick_list, MatchRequest, PickListRequest, SimulationRequest,
};
pub use score_model::ScoreModel;
pub use team::{PhaseRates, TeamRating};
pub use tournament::TournamentSimulator;
pub use win_prob::{estimate_pairwise_win, target_win_probability};
