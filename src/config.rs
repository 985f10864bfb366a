//! Configuration management for significance clustering runs

use crate::error::SigCluError;
use crate::rng::DEFAULT_SEED;

/// Tunable options for a full extraction run
///
/// All defaults match the reference schedule; `validate` rejects illegal
/// values outright rather than clamping them.
#[derive(Debug, Clone)]
pub struct SigCluConfig {
    /// Seed for the master random generator
    pub seed: u64,

    /// Significance level: fraction of replicates allowed to disagree
    pub sig: f64,

    /// Initial annealing temperature
    pub temp_init: f64,

    /// Exponential cooling factor, strictly between 0 and 1
    pub cooling_rate: f64,

    /// Penalty scale factor
    pub pen_scalar: f64,

    /// Flip trials per sweep, as a multiple of the available node count
    pub rep_scalar: usize,

    /// Smallest acceptable core size
    pub min_core_size: usize,

    /// Independent annealing attempts per extraction pass
    pub num_trials: usize,

    /// Retries of the sanitized search when the best core is undersized
    pub num_exhaustion_loops: usize,

    /// Hard cap on annealing sweeps
    pub max_sweeps: usize,

    /// Start each annealing run from the full available set instead of a
    /// random subset
    pub initialize_all: bool,
}

impl Default for SigCluConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            sig: 0.05,
            temp_init: 10.0,
            cooling_rate: 0.99,
            pen_scalar: 20.0,
            rep_scalar: 1,
            min_core_size: 6,
            num_trials: 10,
            num_exhaustion_loops: 40,
            max_sweeps: 1000,
            initialize_all: true,
        }
    }
}

impl SigCluConfig {
    /// Create config with a custom seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create config with a custom significance level
    pub fn with_sig(mut self, sig: f64) -> Self {
        self.sig = sig;
        self
    }

    /// Create config with a custom minimum core size
    pub fn with_min_core_size(mut self, min_core_size: usize) -> Self {
        self.min_core_size = min_core_size;
        self
    }

    /// Create config with a custom number of annealing attempts per pass
    pub fn with_num_trials(mut self, num_trials: usize) -> Self {
        self.num_trials = num_trials;
        self
    }

    /// Create config with a custom exhaustion retry count
    pub fn with_num_exhaustion_loops(mut self, num_exhaustion_loops: usize) -> Self {
        self.num_exhaustion_loops = num_exhaustion_loops;
        self
    }

    /// Create config with a custom sweep cap
    pub fn with_max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Check every option against its legal range
    pub fn validate(&self) -> Result<(), SigCluError> {
        if !(0.0..1.0).contains(&self.sig) {
            return Err(SigCluError::InvalidConfig(format!(
                "sig must be in [0, 1), got {}",
                self.sig
            )));
        }

        if self.cooling_rate <= 0.0 || self.cooling_rate >= 1.0 {
            return Err(SigCluError::InvalidConfig(format!(
                "cooling_rate must be in (0, 1), got {}",
                self.cooling_rate
            )));
        }

        if self.temp_init <= 0.0 {
            return Err(SigCluError::InvalidConfig(format!(
                "temp_init must be positive, got {}",
                self.temp_init
            )));
        }

        if self.min_core_size < 1 {
            return Err(SigCluError::InvalidConfig(
                "min_core_size must be at least 1".to_string(),
            ));
        }

        if self.rep_scalar < 1 {
            return Err(SigCluError::InvalidConfig(
                "rep_scalar must be at least 1".to_string(),
            ));
        }

        if self.num_trials < 1 {
            return Err(SigCluError::InvalidConfig(
                "num_trials must be at least 1".to_string(),
            ));
        }

        if self.max_sweeps < 1 {
            return Err(SigCluError::InvalidConfig(
                "max_sweeps must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
