use crate::random::RandomSource;
use crate::score_model::ScoreModel;
use crate::team::TeamRating;
use crate::tournament::all_alliances;

/// Calculate the probability that `your_team + candidate` beats a rival alliance.
///
/// Every unordered pair from `pool` (minus your team and the candidate) is a
/// rival. Each rival pair gets `iterations` independent trials; a trial is won
/// when your alliance scores at least as much as the rival AND reaches
/// `target_score`. Wins are pooled over all pairs and trials.
///
/// This models beating one random rival, not winning a bracket.
///
/// # Returns
/// Win percentage (0.0-100.0); 0.0 when the pool yields no rival pairs (logged at warn)
pub fn estimate_pairwise_win<R: RandomSource + ?Sized>(
    model: &ScoreModel,
    your_team: &TeamRating,
    candidate: &TeamRating,
    pool: &[TeamRating],
    target_score: f64,
    iterations: usize,
    rng: &mut R,
) -> f64 {
    let rivals: Vec<&TeamRating> = pool
        .iter()
        .filter(|t| t.id != your_team.id && t.id != candidate.id)
        .collect();
    let pairs = all_alliances(&rivals);

    let total = pairs.len() * iterations;
    if total == 0 {
        tracing::warn!(
            candidate = candidate.id,
            rivals = rivals.len(),
            "no rival pairs to estimate against"
        );
        return 0.0;
    }

    let mut wins = 0usize;
    for rival in &pairs {
        for _ in 0..iterations {
            let ours = model.pair_score(your_team, candidate, rng);
            let theirs = model.pair_score(rival.first, rival.second, rng);
            if ours >= theirs && ours >= target_score {
                wins += 1;
            }
        }
    }

    wins as f64 / total as f64 * 100.0
}

/// Quick check: percentage of trials in which the alliance reaches `target_score`.
pub fn target_win_probability<R: RandomSource + ?Sized>(
    model: &ScoreModel,
    a: &TeamRating,
    b: &TeamRating,
    target_score: f64,
    iterations: usize,
    rng: &mut R,
) -> f64 {
    if iterations == 0 {
        return 0.0;
    }
    let wins = (0..iterations)
        .filter(|_| model.pair_score(a, b, rng) >= target_score)
        .count();
    wins as f64 / iterations as f64 * 100.0
}
