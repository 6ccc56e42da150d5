use serde::{Deserialize, Serialize};

use crate::constants::TOURNAMENT_TRIALS;
use crate::random::RandomSource;
use crate::score_model::ScoreModel;
use crate::team::TeamRating;

/// Two teams playing together. Member order carries no meaning.
#[derive(Clone, Copy, Debug)]
pub struct Alliance<'a> {
    pub first: &'a TeamRating,
    pub second: &'a TeamRating,
}

impl<'a> Alliance<'a> {
    pub fn new(first: &'a TeamRating, second: &'a TeamRating) -> Self {
        Alliance { first, second }
    }

    pub fn contains(&self, team: u32) -> bool {
        self.first.id == team || self.second.id == team
    }

    pub fn ids(&self) -> (u32, u32) {
        (self.first.id, self.second.id)
    }

    /// One simulated match score for this alliance.
    pub fn score<R: RandomSource + ?Sized>(&self, model: &ScoreModel, rng: &mut R) -> f64 {
        model.pair_score(self.first, self.second, rng)
    }
}

/// Every unordered pair of `teams`, in index order.
pub fn all_alliances<'a>(teams: &[&'a TeamRating]) -> Vec<Alliance<'a>> {
    let mut alliances = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1) / 2);
    for (i, &first) in teams.iter().enumerate() {
        for &second in &teams[i + 1..] {
            alliances.push(Alliance::new(first, second));
        }
    }
    alliances
}

/// Every pair from `pool` without your team, followed by your alliance with
/// `candidate` as the last entry.
pub(crate) fn field<'a>(your_team: &'a TeamRating, candidate: &'a TeamRating, pool: &'a [TeamRating]) -> Vec<Alliance<'a>> {
    let teams: Vec<&TeamRating> = pool.iter().collect();
    let mut alliances: Vec<Alliance<'a>> = all_alliances(&teams)
        .into_iter()
        .filter(|a| !a.contains(your_team.id))
        .collect();
    alliances.push(Alliance::new(your_team, candidate));
    alliances
}

/// Single-elimination bracket state: slots index into an alliance list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bracket {
    slots: Vec<usize>,
}

impl Bracket {
    pub fn new(slots: Vec<usize>) -> Self {
        Bracket { slots }
    }

    pub fn slots(&self) -> &[usize] {
        &self.slots
    }

    pub fn is_decided(&self) -> bool {
        self.slots.len() <= 1
    }

    pub fn winner(&self) -> Option<usize> {
        match self.slots.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Pair adjacent slots and keep each matchup's higher scorer. A trailing
    /// unpaired slot advances without playing. Ties go to the earlier slot.
    pub fn play_round<R: RandomSource + ?Sized>(&mut self, alliances: &[Alliance<'_>], model: &ScoreModel, rng: &mut R) {
        let mut next = Vec::with_capacity((self.slots.len() + 1) / 2);

        for pair in self.slots.chunks(2) {
            match *pair {
                [a, b] => {
                    let score_a = alliances[a].score(model, rng);
                    let score_b = alliances[b].score(model, rng);
                    next.push(if score_a >= score_b { a } else { b });
                }
                [bye] => next.push(bye),
                _ => {}
            }
        }

        self.slots = next;
    }

    /// Play rounds until one slot remains; returns it.
    pub fn run<R: RandomSource + ?Sized>(&mut self, alliances: &[Alliance<'_>], model: &ScoreModel, rng: &mut R) -> Option<usize> {
        while !self.is_decided() {
            self.play_round(alliances, model, rng);
        }
        self.winner()
    }
}

/// Monte Carlo estimate of an alliance winning a whole event.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentSimulator {
    pub model: ScoreModel,
    pub trials: usize,
}

impl Default for TournamentSimulator {
    fn default() -> Self {
        TournamentSimulator {
            model: ScoreModel::PICK_LIST,
            trials: TOURNAMENT_TRIALS,
        }
    }
}

impl TournamentSimulator {
    pub fn new(model: ScoreModel, trials: usize) -> Self {
        TournamentSimulator { model, trials }
    }

    /// Percentage of randomly seeded brackets won by `your_team + candidate`.
    ///
    /// The field is every pair from `pool` that does not include your team;
    /// pairs containing the candidate stay in. Each trial shuffles the field,
    /// drops the candidate alliance in at a uniform position, and plays the
    /// bracket out. Zero trials gives 0.0; an empty field gives 100.0.
    pub fn simulate_event_win<R: RandomSource + ?Sized>(
        &self,
        your_team: &TeamRating,
        candidate: &TeamRating,
        pool: &[TeamRating],
        rng: &mut R,
    ) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }

        let alliances = field(your_team, candidate, pool);
        let ours = alliances.len() - 1;

        let mut wins = 0usize;
        for _ in 0..self.trials {
            let mut slots: Vec<usize> = (0..ours).collect();
            rng.shuffle(&mut slots);
            let at = rng.index(ours + 1);
            slots.insert(at, ours);

            let mut bracket = Bracket::new(slots);
            if bracket.run(&alliances, &self.model, rng) == Some(ours) {
                wins += 1;
            }
        }

        let pct = wins as f64 / self.trials as f64 * 100.0;
        tracing::debug!(
            candidate = candidate.id,
            field = ours,
            trials = self.trials,
            win_pct = pct,
            "simulated event brackets"
        );
        pct
    }
}
