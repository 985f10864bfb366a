//! Candidate scoring against the partition ensemble

use itertools::Itertools;

use crate::ensemble::{Ensemble, NodeSet};
use crate::error::SigCluError;

/// Score of a candidate node set
///
/// Higher size and lower penalty are both good; the search maximizes
/// `size - penalty`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Cardinality of the candidate
    pub size: usize,

    /// Weighted mismatch sum over the best-fitting replicates
    pub penalty: f64,
}

impl Score {
    /// The quantity the annealer maximizes
    pub fn objective(&self) -> f64 {
        self.size as f64 - self.penalty
    }
}

/// Computes `(size, penalty)` scores for candidate cores
///
/// Binds to one ensemble for the lifetime of a run. `n_pen` — the number
/// of best-fitting replicates counted toward the penalty — is derived from
/// the significance level once at construction and cached.
pub struct Scorer<'a> {
    ensemble: &'a Ensemble,
    n_pen: usize,
    pen_scalar: f64,
}

impl<'a> Scorer<'a> {
    /// Bind a scorer to an ensemble
    ///
    /// An empty ensemble leaves `n_pen` undefined and is rejected.
    pub fn new(ensemble: &'a Ensemble, sig: f64, pen_scalar: f64) -> Result<Self, SigCluError> {
        if ensemble.is_empty() {
            return Err(SigCluError::EmptyEnsemble);
        }

        let n_pen = (ensemble.len() as f64 * (1.0 - sig)).ceil() as usize;

        Ok(Self {
            ensemble,
            n_pen,
            pen_scalar,
        })
    }

    /// Number of replicates counted toward the penalty
    pub fn n_pen(&self) -> usize {
        self.n_pen
    }

    /// True iff a set this small is a core without any search
    pub fn is_trivial(nodes: &NodeSet) -> bool {
        nodes.len() <= 1
    }

    /// Score a candidate against the full ensemble
    ///
    /// Per replicate, the mismatch is the smallest number of candidate
    /// nodes absent from any single module. Only the `n_pen` smallest
    /// mismatches count, so up to `len - n_pen` replicates may disagree
    /// without raising the penalty.
    pub fn score(&self, nodes: &NodeSet, pen_weighting: f64) -> Score {
        let size = nodes.len();

        let counted: usize = self
            .ensemble
            .partitions()
            .iter()
            .map(|p| p.min_mismatch(nodes))
            .sorted_unstable()
            .take(self.n_pen)
            .sum();

        Score {
            size,
            penalty: counted as f64 * pen_weighting,
        }
    }

    /// Penalty weighting for one annealing invocation over `nodes`
    ///
    /// Scales penalty magnitude to be comparable to typical size deltas
    /// between annealing states. Fixed for the whole invocation.
    pub fn penalty_weight(&self, nodes: &NodeSet) -> f64 {
        self.pen_scalar * nodes.len() as f64 / self.n_pen as f64
    }

    /// True iff every counted replicate has a module containing all of `nodes`
    pub fn all_nodes_form_core(&self, nodes: &NodeSet) -> bool {
        self.score(nodes, 1.0).penalty == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ensemble::{NodeId, Partition};

    fn set(nodes: &[NodeId]) -> NodeSet {
        nodes.iter().copied().collect()
    }

    fn partition(modules: &[&[NodeId]]) -> Partition {
        Partition::new(modules.iter().map(|m| m.iter().copied().collect()).collect())
    }

    fn identical_ensemble(modules: &[&[NodeId]], copies: usize) -> Ensemble {
        Ensemble::new((0..copies).map(|_| partition(modules)).collect())
    }

    #[test]
    fn empty_ensemble_is_rejected() {
        let ensemble = Ensemble::new(Vec::new());
        assert!(matches!(
            Scorer::new(&ensemble, 0.05, 20.0),
            Err(SigCluError::EmptyEnsemble)
        ));
    }

    #[test]
    fn n_pen_rounds_up() {
        let ensemble = identical_ensemble(&[&[0, 1]], 10);

        // ceil(10 * 0.95) = 10: no slack from rounding
        let strict = Scorer::new(&ensemble, 0.05, 20.0).unwrap();
        assert_eq!(strict.n_pen(), 10);

        // ceil(10 * 0.8) = 8: two replicates may disagree
        let loose = Scorer::new(&ensemble, 0.2, 20.0).unwrap();
        assert_eq!(loose.n_pen(), 8);
    }

    #[test]
    fn perfect_candidate_has_zero_penalty() {
        let ensemble = identical_ensemble(&[&[0, 1, 2], &[3, 4]], 5);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        let score = scorer.score(&set(&[0, 1, 2]), 1.0);
        assert_eq!(score.size, 3);
        assert_eq!(score.penalty, 0.0);
        assert!(scorer.all_nodes_form_core(&set(&[0, 1, 2])));
        assert!(scorer.all_nodes_form_core(&set(&[3, 4])));
    }

    #[test]
    fn mismatch_takes_best_module_per_replicate() {
        let ensemble = identical_ensemble(&[&[0, 1, 2], &[3, 4]], 4);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        // {0, 1, 3} misses one node from {0, 1, 2} in every replicate
        let score = scorer.score(&set(&[0, 1, 3]), 1.0);
        assert_eq!(score.penalty, 4.0);
        assert!(!scorer.all_nodes_form_core(&set(&[0, 1, 3])));
    }

    #[test]
    fn penalty_sums_only_best_fitting_replicates() {
        // Nine replicates agree on {0, 1, 2, 9}; one splits 9 off
        let mut partitions: Vec<Partition> = (0..9).map(|_| partition(&[&[0, 1, 2, 9]])).collect();
        partitions.push(partition(&[&[0, 1, 2], &[9]]));
        let ensemble = Ensemble::new(partitions);

        let candidate = set(&[0, 1, 2, 9]);

        // All ten counted: the dissenter contributes its mismatch
        let strict = Scorer::new(&ensemble, 0.05, 20.0).unwrap();
        assert_eq!(strict.score(&candidate, 1.0).penalty, 1.0);

        // Best eight counted: the dissenter is dropped
        let loose = Scorer::new(&ensemble, 0.2, 20.0).unwrap();
        assert_eq!(loose.score(&candidate, 1.0).penalty, 0.0);
        assert!(loose.all_nodes_form_core(&candidate));
    }

    #[test]
    fn weighting_scales_penalty() {
        let ensemble = identical_ensemble(&[&[0, 1, 2]], 4);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        let candidate = set(&[0, 1, 3]);
        let unweighted = scorer.score(&candidate, 1.0).penalty;
        let weighted = scorer.score(&candidate, 2.5).penalty;
        assert_eq!(weighted, unweighted * 2.5);
    }

    #[test]
    fn penalty_weight_follows_candidate_size() {
        let ensemble = identical_ensemble(&[&[0, 1, 2, 3]], 8);
        let scorer = Scorer::new(&ensemble, 0.05, 20.0).unwrap();

        // pen_scalar * |nodes| / n_pen
        assert_eq!(scorer.penalty_weight(&set(&[0, 1, 2, 3])), 20.0 * 4.0 / 8.0);
        assert_eq!(scorer.penalty_weight(&set(&[0])), 20.0 / 8.0);
    }

    #[test]
    fn objective_trades_size_against_penalty() {
        let a = Score { size: 5, penalty: 0.0 };
        let b = Score { size: 8, penalty: 4.0 };
        assert_eq!(a.objective(), 5.0);
        assert_eq!(b.objective(), 4.0);
        assert!(a.objective() > b.objective());
    }

    #[test]
    fn trivial_sets_are_size_one_or_less() {
        assert!(Scorer::is_trivial(&set(&[])));
        assert!(Scorer::is_trivial(&set(&[3])));
        assert!(!Scorer::is_trivial(&set(&[3, 4])));
    }
}
