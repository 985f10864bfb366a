//! Greedy core extraction driving repeated annealing searches

use log;
use rayon::prelude::*;

use crate::cluster::anneal::{AnnealSchedule, Annealer};
use crate::cluster::score::{Score, Scorer};
use crate::cluster::Core;
use crate::config::SigCluConfig;
use crate::ensemble::{Ensemble, NodeSet};
use crate::error::SigCluError;
use crate::rng::{RandomSource, StdRandom};

/// Peels statistically robust cores off the ensemble's node universe,
/// one extraction pass at a time
///
/// Owns the working node pool and the growing core list for the lifetime
/// of one [`CoreExtractor::run`] call; the finished result stays behind a
/// completion gate so export paths cannot observe a half-built state.
pub struct CoreExtractor<'a> {
    ensemble: &'a Ensemble,
    scorer: Scorer<'a>,
    config: SigCluConfig,
    cores: Option<Vec<Core>>,
}

impl<'a> CoreExtractor<'a> {
    /// Bind an extractor to an ensemble, failing fast on bad configuration
    pub fn new(ensemble: &'a Ensemble, config: SigCluConfig) -> Result<Self, SigCluError> {
        config.validate()?;
        let scorer = Scorer::new(ensemble, config.sig, config.pen_scalar)?;

        Ok(Self {
            ensemble,
            scorer,
            config,
            cores: None,
        })
    }

    /// Discovered cores, available once `run()` has completed
    pub fn cores(&self) -> Result<&[Core], SigCluError> {
        self.cores.as_deref().ok_or(SigCluError::MissingResult)
    }

    /// Extract cores until the remaining pool is too small or a search
    /// comes up empty
    ///
    /// Returns the final core list, sorted by descending size.
    pub fn run(&mut self) -> Result<&[Core], SigCluError> {
        let mut rng = StdRandom::seeded(self.config.seed);

        let mut avail = self.ensemble.node_universe();
        let mut found: Vec<NodeSet> = Vec::new();

        log::info!(
            "Extracting cores from {} nodes across {} replicates",
            avail.len(),
            self.ensemble.len()
        );

        while avail.len() >= self.config.min_core_size {
            let (core, score) = match self.find_core_sanitized(&avail, &mut rng, true) {
                Some(hit) => hit,
                None => {
                    log::info!("No further core found among {} remaining nodes", avail.len());
                    break;
                }
            };

            log::debug!("Accepted core of size {} (penalty {})", score.size, score.penalty);

            // A node belongs to at most one core from here on
            avail.remove_all(&core);

            merge_or_append(&mut found, core, &self.scorer);

            // Keep largest-first so merge checks prefer the biggest host
            found.sort_by(|a, b| b.len().cmp(&a.len()));
        }

        let cores: Vec<Core> = found
            .iter()
            .enumerate()
            .map(|(id, nodes)| Core::from_nodes(id as u32, nodes))
            .collect();

        log::info!(
            "Found {} cores covering {} of {} nodes",
            cores.len(),
            cores.iter().map(|c| c.size).sum::<usize>(),
            self.ensemble.node_universe().len()
        );

        self.cores = Some(cores);
        Ok(self.cores.as_deref().unwrap())
    }

    /// One sanitized search attempt over the current pool
    ///
    /// Trivial pools and pools that already form a core come back as-is
    /// without touching the annealer. An undersized best triggers the
    /// bounded exhaustion retry; recursion is disabled one level down.
    fn find_core_sanitized<R: RandomSource>(
        &self,
        avail: &NodeSet,
        rng: &mut R,
        exhaustion_search: bool,
    ) -> Option<(NodeSet, Score)> {
        if Scorer::is_trivial(avail) || self.scorer.all_nodes_form_core(avail) {
            return Some((avail.clone(), self.scorer.score(avail, 1.0)));
        }

        match self.best_annealed(avail, rng) {
            Some((state, score)) if score.size >= self.config.min_core_size => {
                Some((state, score))
            }
            _ => {
                if exhaustion_search {
                    for attempt in 0..self.config.num_exhaustion_loops {
                        if let Some(found) = self.find_core_sanitized(avail, rng, false) {
                            log::debug!("Exhaustion search succeeded on attempt {}", attempt + 1);
                            return Some(found);
                        }
                    }
                }
                None
            }
        }
    }

    /// Best zero-penalty result over `num_trials` independent annealing runs
    ///
    /// Per-trial seeds are drawn sequentially from the master generator
    /// before the fan-out, and the merge walks results in trial order under
    /// a strict size comparison, so the winner is identical for any worker
    /// thread count.
    fn best_annealed<R: RandomSource>(
        &self,
        avail: &NodeSet,
        rng: &mut R,
    ) -> Option<(NodeSet, Score)> {
        let annealer = Annealer::new(&self.scorer, AnnealSchedule::from(&self.config));

        let seeds: Vec<u64> = (0..self.config.num_trials).map(|_| rng.next_seed()).collect();

        let results: Vec<(NodeSet, Score)> = seeds
            .into_par_iter()
            .map(|seed| {
                let mut trial_rng = StdRandom::seeded(seed);
                annealer.find_core(avail, &mut trial_rng)
            })
            .collect();

        let mut best: Option<(NodeSet, Score)> = None;
        for (trial, (state, score)) in results.into_iter().enumerate() {
            // Only exact zero-penalty candidates are acceptable
            if score.penalty != 0.0 {
                continue;
            }

            log::debug!(
                "Trial {}: zero-penalty core of size {} (penalty {})",
                trial + 1,
                score.size,
                score.penalty
            );

            // Strict comparison: ties go to the earlier trial
            if best.as_ref().map_or(true, |(_, b)| score.size > b.size) {
                best = Some((state, score));
            }
        }

        best
    }
}

/// Fold a freshly found core into the first existing core whose union still
/// forms a zero-penalty core, or append it as a new entry
fn merge_or_append(cores: &mut Vec<NodeSet>, core: NodeSet, scorer: &Scorer<'_>) {
    for existing in cores.iter_mut() {
        let union = existing.union(&core);
        if scorer.all_nodes_form_core(&union) {
            *existing = union;
            return;
        }
    }

    cores.push(core);
}
