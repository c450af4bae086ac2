//! End-to-end Sampled MinHash pipeline.
//!
//! Stage order: sign -> mine -> cutoff -> mhlink -> centroids -> assign.
//! The feature matrix is borrowed immutably for the whole run, so one corpus
//! can be fitted under several `(r, l)` operating points without copying.

use serde::{Deserialize, Serialize};

use crate::centroid;
use crate::cluster;
use crate::config::MinerParams;
use crate::corpus::SparseMatrix;
use crate::error::{MineError, Result};
use crate::mining::{self, DocSet};
use crate::signature::HashFamily;

/// Stage sizes for one mining run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiningStats {
    /// Documents excluded from mining for having no features.
    pub empty_docs: usize,
    /// Raw candidate groups out of banded mining.
    pub groups_mined: usize,
    /// Candidate groups surviving the cutoff filter.
    pub groups_after_cutoff: usize,
    /// Final clusters out of threshold linkage.
    pub clusters: usize,
}

/// Output of a full mining run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    /// Final clusters as docsets; clusters may overlap.
    pub clusters: Vec<DocSet>,
    /// One centroid per cluster, each of corpus feature width.
    pub centroids: Vec<Vec<f32>>,
    /// Nearest-centroid label for every corpus document.
    pub labels: Vec<usize>,
    /// Stage sizes.
    pub stats: MiningStats,
}

/// Sampled MinHash miner and clusterer.
///
/// Construction validates the parameters and fixes the hash-function family
/// for the run; [`fit`](Self::fit) is then read-only over the corpus and can
/// be called repeatedly.
#[derive(Debug, Clone)]
pub struct SampledMinHash {
    params: MinerParams,
    family: HashFamily,
}

impl SampledMinHash {
    /// Validate `params` and fix the seeded hash family.
    pub fn new(params: MinerParams) -> Result<Self> {
        params.validate()?;
        let family = HashFamily::new(params.num_hashes(), params.seed);
        Ok(Self { params, family })
    }

    /// The validated parameters of this run.
    pub fn params(&self) -> &MinerParams {
        &self.params
    }

    /// Mine, cluster, and label a corpus.
    pub fn fit(&self, matrix: &SparseMatrix) -> Result<Clustering> {
        let signed = self.family.sign(matrix);

        let mut groups = mining::mine(&signed, &self.params)?;
        let groups_mined = groups.len();
        tracing::info!(groups = groups_mined, "mined candidate groups");

        if let Some(min) = self.params.cutoff {
            groups = cluster::cutoff(groups, min);
            tracing::info!(groups = groups.len(), cutoff = min, "cut off candidate groups");
        }
        let groups_after_cutoff = groups.len();

        let clusters =
            cluster::mhlink(&groups, self.params.thres, self.params.min_cluster_size)?;
        tracing::info!(clusters = clusters.len(), "linked clusters");
        if clusters.is_empty() {
            return Err(MineError::NoClusters {
                min_cluster_size: self.params.min_cluster_size,
            });
        }

        let centroids = centroid::centroids(&clusters, matrix)?;
        let labels = centroid::assign(matrix, &centroids)?;

        let stats = MiningStats {
            empty_docs: signed.empty_docs.len(),
            groups_mined,
            groups_after_cutoff,
            clusters: clusters.len(),
        };

        Ok(Clustering {
            clusters,
            centroids,
            labels,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BandCount;

    fn block_corpus(sizes: &[usize]) -> SparseMatrix {
        // One block of identical documents per size; blocks are disjoint in
        // feature space, five features each.
        let mut rows = Vec::new();
        for (block, &size) in sizes.iter().enumerate() {
            let base = (block * 5) as u32;
            for _ in 0..size {
                rows.push((0..5).map(|f| (base + f, 1.0)).collect());
            }
        }
        SparseMatrix::from_rows(rows, sizes.len() * 5).unwrap()
    }

    #[test]
    fn invalid_params_fail_before_any_work() {
        let params = MinerParams::new(0, BandCount::Fixed(2));
        assert!(matches!(
            SampledMinHash::new(params),
            Err(MineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn fit_clusters_identical_blocks() {
        let matrix = block_corpus(&[4, 6]);
        let smh = SampledMinHash::new(MinerParams::new(2, BandCount::Fixed(3))).unwrap();
        let out = smh.fit(&matrix).unwrap();

        assert_eq!(out.clusters.len(), 2);
        assert_eq!(out.centroids.len(), 2);
        assert_eq!(out.labels.len(), 10);
        assert_eq!(out.stats.clusters, 2);
        assert_eq!(out.stats.empty_docs, 0);

        let first = &out.clusters[0];
        let second = &out.clusters[1];
        assert_eq!(first.distinct_count() + second.distinct_count(), 10);
        // Labels agree within a block.
        assert!(out.labels[..4].iter().all(|&l| l == out.labels[0]));
        assert!(out.labels[4..].iter().all(|&l| l == out.labels[4]));
        assert_ne!(out.labels[0], out.labels[4]);
    }

    #[test]
    fn cutoff_starvation_is_an_error() {
        let matrix = block_corpus(&[4, 4]);
        let params = MinerParams::new(2, BandCount::Fixed(3)).with_cutoff(5);
        let smh = SampledMinHash::new(params).unwrap();
        assert!(matches!(smh.fit(&matrix), Err(MineError::NoCandidates)));
    }

    #[test]
    fn fixed_seed_reproduces_the_run() {
        let matrix = block_corpus(&[5, 7]);
        let params = MinerParams::new(2, BandCount::Fixed(4)).with_seed(99);
        let a = SampledMinHash::new(params.clone()).unwrap().fit(&matrix).unwrap();
        let b = SampledMinHash::new(params).unwrap().fit(&matrix).unwrap();
        assert_eq!(a, b);
    }
}
