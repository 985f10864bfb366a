//! Simulated-annealing search for a maximal zero-penalty core

use log;

use crate::cluster::score::{Score, Scorer};
use crate::config::SigCluConfig;
use crate::ensemble::{NodeId, NodeSet};
use crate::rng::RandomSource;

/// Cooling and repetition schedule for one annealing run
#[derive(Debug, Clone, Copy)]
pub struct AnnealSchedule {
    /// Starting temperature
    pub temp_init: f64,

    /// Exponential cooling factor, strictly between 0 and 1
    pub cooling_rate: f64,

    /// Flip trials per sweep, as a multiple of the available node count
    pub rep_scalar: usize,

    /// Hard cap on the number of sweeps
    pub max_sweeps: usize,

    /// Start from the full available set instead of a random subset
    pub initialize_all: bool,
}

impl From<&SigCluConfig> for AnnealSchedule {
    fn from(config: &SigCluConfig) -> Self {
        Self {
            temp_init: config.temp_init,
            cooling_rate: config.cooling_rate,
            rep_scalar: config.rep_scalar,
            max_sweeps: config.max_sweeps,
            initialize_all: config.initialize_all,
        }
    }
}

/// Single-core annealing search over a fixed available-node pool
pub struct Annealer<'a> {
    scorer: &'a Scorer<'a>,
    schedule: AnnealSchedule,
}

impl<'a> Annealer<'a> {
    /// Create an annealer over the given scorer and schedule
    pub fn new(scorer: &'a Scorer<'a>, schedule: AnnealSchedule) -> Self {
        Self { scorer, schedule }
    }

    /// Run one full annealing search and return the final state and score
    ///
    /// Node sampling works off the sorted reference order, so the result
    /// is exactly reproducible for a fixed generator state.
    pub fn find_core<R: RandomSource>(&self, avail: &NodeSet, rng: &mut R) -> (NodeSet, Score) {
        // Fixed for this invocation
        let pen_weighting = self.scorer.penalty_weight(avail);
        let ordered = avail.to_sorted();
        let n = ordered.len();

        let mut state = self.initial_state(avail, &ordered, rng);
        let mut score = self.scorer.score(&state, pen_weighting);

        let num_repetitions = self.schedule.rep_scalar * n;
        let mut temp = self.schedule.temp_init;

        for t in 0..self.schedule.max_sweeps {
            let mut did_accept = false;

            for _ in 0..num_repetitions {
                // Flip one uniformly drawn node and score the trial state
                let node = ordered[rng.index(n)];
                let trial = state.toggled(node);
                let trial_score = self.scorer.score(&trial, pen_weighting);

                // Metropolis acceptance on size - penalty
                let delta = trial_score.objective() - score.objective();
                if delta >= 0.0 || rng.next_uniform() < (delta / temp).exp() {
                    state = trial;
                    score = trial_score;
                    did_accept = true;
                }
            }

            if !did_accept {
                // Local optimum under the current temperature
                log::debug!(
                    "Annealing converged after {} sweeps (size {}, penalty {})",
                    t + 1,
                    score.size,
                    score.penalty
                );
                break;
            }

            // Recomputed from t rather than multiplied incrementally to
            // avoid accumulation drift
            temp = self.schedule.temp_init * self.schedule.cooling_rate.powi(t as i32 + 1);
        }

        self.riffle(&mut state, &mut score, &ordered, pen_weighting, rng);

        (state, score)
    }

    /// Initial candidate: the full pool, or a random non-empty proper subset
    fn initial_state<R: RandomSource>(
        &self,
        avail: &NodeSet,
        ordered: &[NodeId],
        rng: &mut R,
    ) -> NodeSet {
        let n = ordered.len();

        if self.schedule.initialize_all || n <= 1 {
            return avail.clone();
        }

        // Subset size drawn uniformly from [1, n - 1]
        let mut pool = ordered.to_vec();
        rng.shuffle_nodes(&mut pool);
        let size = 1 + rng.index(n - 1);
        pool.truncate(size);
        pool.into_iter().collect()
    }

    /// Greedily add back any left-out node whose addition keeps the
    /// penalty at exactly zero
    fn riffle<R: RandomSource>(
        &self,
        state: &mut NodeSet,
        score: &mut Score,
        ordered: &[NodeId],
        pen_weighting: f64,
        rng: &mut R,
    ) {
        let mut leftovers: Vec<NodeId> = ordered
            .iter()
            .copied()
            .filter(|&node| !state.contains(node))
            .collect();
        rng.shuffle_nodes(&mut leftovers);

        for node in leftovers {
            let trial = state.with(node);
            let trial_score = self.scorer.score(&trial, pen_weighting);
            if trial_score.penalty == 0.0 {
                *state = trial;
                *score = trial_score;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::{Ensemble, Partition};
    use crate::rng::StdRandom;

    fn set(nodes: &[NodeId]) -> NodeSet {
        nodes.iter().copied().collect()
    }

    fn identical_ensemble(modules: &[&[NodeId]], copies: usize) -> Ensemble {
        Ensemble::new(
            (0..copies)
                .map(|_| {
                    Partition::new(modules.iter().map(|m| m.iter().copied().collect()).collect())
                })
                .collect(),
        )
    }

    fn schedule() -> AnnealSchedule {
        AnnealSchedule::from(&SigCluConfig::default())
    }

    #[test]
    fn finds_a_maximal_zero_penalty_core() {
        let ensemble = identical_ensemble(&[&[0, 1, 2], &[3, 4]], 5);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();
        let annealer = Annealer::new(&scorer, schedule());

        let avail = ensemble.node_universe();
        let mut rng = StdRandom::seeded(3);
        let (state, score) = annealer.find_core(&avail, &mut rng);

        // The only riffle-stable zero-penalty states are the two modules
        assert_eq!(score.penalty, 0.0);
        let found = state.to_sorted();
        assert!(found == vec![0, 1, 2] || found == vec![3, 4], "got {:?}", found);
    }

    #[test]
    fn riffle_leaves_no_free_additions() {
        let ensemble = identical_ensemble(&[&[0, 1, 2, 3], &[4, 5]], 4);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();
        let annealer = Annealer::new(&scorer, schedule());

        let avail = ensemble.node_universe();
        let pen_weighting = scorer.penalty_weight(&avail);
        let mut rng = StdRandom::seeded(11);
        let (state, _) = annealer.find_core(&avail, &mut rng);

        // Any node still outside must break the zero penalty when added
        for node in avail.to_sorted() {
            if !state.contains(node) {
                let grown = state.with(node);
                assert!(scorer.score(&grown, pen_weighting).penalty > 0.0);
            }
        }
    }

    #[test]
    fn same_seed_yields_same_state() {
        let ensemble = identical_ensemble(&[&[0, 1, 2], &[3, 4, 5]], 6);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();
        let annealer = Annealer::new(&scorer, schedule());
        let avail = ensemble.node_universe();

        let mut first = StdRandom::seeded(99);
        let mut second = StdRandom::seeded(99);

        let (state_a, score_a) = annealer.find_core(&avail, &mut first);
        let (state_b, score_b) = annealer.find_core(&avail, &mut second);

        assert_eq!(state_a.to_sorted(), state_b.to_sorted());
        assert_eq!(score_a, score_b);
    }

    #[test]
    fn acceptance_follows_the_metropolis_rule() {
        use crate::rng::testing::ScriptedRandom;

        // Two replicates of [{0, 1}, {2}]: from the full pool, dropping
        // node 2 is the only improving move
        let ensemble = identical_ensemble(&[&[0, 1], &[2]], 2);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        let mut sched = schedule();
        sched.max_sweeps = 1;
        let annealer = Annealer::new(&scorer, sched);

        // Sweep of three flips: toggle 2 improves (accepted without a
        // uniform draw), then two worsening toggles of node 0 are both
        // rejected because 0.95 >= exp(-1 / 10)
        let mut rng = ScriptedRandom::scripted(vec![0.95, 0.95], vec![2, 0, 0]);
        let (state, score) = annealer.find_core(&ensemble.node_universe(), &mut rng);

        // The riffle cannot re-add node 2 without breaking the penalty
        assert_eq!(state.to_sorted(), vec![0, 1]);
        assert_eq!(score.size, 2);
        assert_eq!(score.penalty, 0.0);
    }

    #[test]
    fn random_init_draws_a_proper_subset() {
        let ensemble = identical_ensemble(&[&[0, 1, 2, 3, 4, 5]], 3);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        let mut sched = schedule();
        sched.initialize_all = false;
        sched.max_sweeps = 1;
        let annealer = Annealer::new(&scorer, sched);

        // With a single fully agreeing module, the riffle immediately
        // restores the full set whatever the initial subset was
        let avail = ensemble.node_universe();
        let mut rng = StdRandom::seeded(5);
        let (state, score) = annealer.find_core(&avail, &mut rng);
        assert_eq!(state.to_sorted(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(score.penalty, 0.0);
    }
}
