//! Banding and clustering parameters.
//!
//! The banding operating point is `(r, l)`: each signature is split into `l`
//! bands of `r` positions, and two documents become mining candidates when
//! they agree on all `r` positions of at least one band. The probability of
//! that event for true Jaccard similarity `s` is `1 - (1 - s^r)^l`, the
//! classic LSH S-curve. Raising `r` sharpens precision, raising `l` restores
//! recall; [`s2l`] is the closed-form choice of `l` for a target similarity.

use serde::{Deserialize, Serialize};

use crate::error::{MineError, Result};

/// How many bands to mine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BandCount {
    /// Fixed number of bands `l`.
    Fixed(usize),
    /// Derive `l` from a target similarity `s*` via [`s2l`].
    TargetSimilarity(f64),
}

/// Parameters for a Sampled MinHash run.
///
/// All parameters are caller-supplied; nothing is derived from the data.
/// [`MinerParams::validate`] runs before any computation starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinerParams {
    /// Band width: number of signature positions per band.
    pub r: usize,
    /// Band count, fixed or derived from a target similarity.
    pub bands: BandCount,
    /// Minimum distinct documents for a candidate group to survive pruning.
    pub cutoff: Option<usize>,
    /// Jaccard threshold for linking two candidate groups, in `(0, 1]`.
    pub thres: f64,
    /// Minimum distinct documents in a final cluster.
    pub min_cluster_size: usize,
    /// Seed for the hash-function family; fixed seed, reproducible run.
    pub seed: u64,
    /// Upper bound on mined candidate groups before clustering.
    pub max_candidate_groups: Option<usize>,
}

impl Default for MinerParams {
    fn default() -> Self {
        Self {
            r: 3,
            bands: BandCount::TargetSimilarity(0.2),
            cutoff: None,
            thres: 0.7,
            min_cluster_size: 3,
            seed: 42,
            max_candidate_groups: None,
        }
    }
}

impl MinerParams {
    /// Create parameters for a `(r, bands)` operating point; everything else
    /// takes the defaults.
    pub fn new(r: usize, bands: BandCount) -> Self {
        Self {
            r,
            bands,
            ..Self::default()
        }
    }

    /// Prune candidate groups smaller than `cutoff` distinct documents.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: usize) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Set the linkage similarity threshold.
    #[must_use]
    pub fn with_thres(mut self, thres: f64) -> Self {
        self.thres = thres;
        self
    }

    /// Set the minimum final cluster size.
    #[must_use]
    pub fn with_min_cluster_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }

    /// Set the hash-family seed. Repeated runs with the same seed and corpus
    /// produce identical output.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Bound the number of mined candidate groups; exceeding it aborts the
    /// run with [`MineError::CandidateBudget`].
    #[must_use]
    pub fn with_candidate_budget(mut self, budget: usize) -> Self {
        self.max_candidate_groups = Some(budget);
        self
    }

    /// Resolved band count `l`.
    pub fn band_count(&self) -> usize {
        match self.bands {
            BandCount::Fixed(l) => l,
            BandCount::TargetSimilarity(s) => s2l(s, self.r),
        }
    }

    /// Total number of hash functions, `k = r * l`.
    pub fn num_hashes(&self) -> usize {
        self.r * self.band_count()
    }

    /// Probability that two documents with true Jaccard similarity `s`
    /// collide in at least one band: `1 - (1 - s^r)^l`.
    pub fn candidate_probability(&self, s: f64) -> f64 {
        let r = self.r as f64;
        let l = self.band_count() as f64;
        1.0 - (1.0 - s.powf(r)).powf(l)
    }

    /// Reject invalid parameters before any computation starts.
    pub fn validate(&self) -> Result<()> {
        if self.r == 0 {
            return Err(MineError::InvalidConfig(
                "band width r must be at least 1".into(),
            ));
        }
        match self.bands {
            BandCount::Fixed(l) if l == 0 => {
                return Err(MineError::InvalidConfig(
                    "band count l must be at least 1".into(),
                ));
            }
            BandCount::TargetSimilarity(s) if !(s > 0.0 && s <= 1.0) => {
                return Err(MineError::InvalidConfig(format!(
                    "target similarity s* must be in (0, 1], got {s}"
                )));
            }
            _ => {}
        }
        if !(self.thres > 0.0 && self.thres <= 1.0) {
            return Err(MineError::InvalidConfig(format!(
                "similarity threshold thres must be in (0, 1], got {}",
                self.thres
            )));
        }
        if self.min_cluster_size == 0 {
            return Err(MineError::InvalidConfig(
                "min_cluster_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Number of bands needed so that two documents with true Jaccard similarity
/// `s` collide in at least one band with probability >= 0.5, for band width
/// `r`: `l = ceil(ln 0.5 / ln(1 - s^r))`, at least 1.
pub fn s2l(s: f64, r: usize) -> usize {
    let miss = 1.0 - s.powf(r as f64);
    if miss <= 0.0 {
        // s = 1: a single band already collides with certainty.
        return 1;
    }
    let l = (0.5_f64.ln() / miss.ln()).ceil();
    (l as usize).max(1)
}
