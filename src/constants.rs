/// Share of the aggregate rating attributed to autonomous when not reported
pub const AUTO_FRACTION: f64 = 0.25;

/// Share of the aggregate rating attributed to driver-controlled play
pub const TELEOP_FRACTION: f64 = 0.55;

/// Share of the aggregate rating attributed to endgame
pub const ENDGAME_FRACTION: f64 = 0.20;

/// Noise scale used by full match simulations (all three phases)
pub const MATCH_NOISE: f64 = 0.20;

/// Noise scale used by the quick pick-list checks (auto + teleop only)
pub const PICK_LIST_NOISE: f64 = 0.15;

/// Default trial counts per call site
pub const MATCH_ITERATIONS: usize = 10_000;
pub const QUICK_ITERATIONS: usize = 2_000;
pub const PAIRWISE_ITERATIONS: usize = 500;
pub const TOURNAMENT_TRIALS: usize = 100;

/// Default score an alliance needs to reach in pick-list win checks
pub const PICK_LIST_TARGET: f64 = 150.0;

/// Default target for a standalone two-team simulation
pub const ALLIANCE_TARGET: f64 = 200.0;

/// Default season queried from the rating provider
pub const DEFAULT_SEASON: u16 = 2025;

/// Histogram resolution for score distributions
pub const HISTOGRAM_BINS: usize = 20;

/// Synthetic consistency: `max(FLOOR, BASE - SLOPE * aggregate + JITTER * u)`
pub const CONSISTENCY_FLOOR: f64 = 5.0;
pub const CONSISTENCY_BASE: f64 = 20.0;
pub const CONSISTENCY_SLOPE: f64 = 0.1;
pub const CONSISTENCY_JITTER: f64 = 5.0;

/// Pick score weights
pub const WEIGHT_AGGREGATE: f64 = 0.3;
pub const WEIGHT_WIN_PROB: f64 = 0.4;
pub const WEIGHT_COMPLEMENTARY: f64 = 0.2;
pub const WEIGHT_CONSISTENCY: f64 = 0.5;

/// Consistency values are scored as `CONSISTENCY_OFFSET - consistency`
pub const CONSISTENCY_OFFSET: f64 = 25.0;

/// Candidates below this aggregate rating never score as complementary
pub const COMPLEMENTARY_MIN_AGGREGATE: f64 = 30.0;

/// Upper bound on the complementarity score
pub const COMPLEMENTARY_MAX: f64 = 100.0;
