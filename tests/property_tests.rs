//! Property-based tests for the mining pipeline.
//!
//! Invariants that must hold for any corpus and any valid parameters:
//! - final clusters respect the minimum size
//! - centroids have corpus width and stay non-negative
//! - labels cover the whole corpus
//! - a fixed seed reproduces the run exactly

use lode::{BandCount, MineError, MinerParams, SampledMinHash, SparseMatrix};
use proptest::prelude::*;

prop_compose! {
    fn arb_corpus()
        (cols in 5usize..20, n_docs in 2usize..20)
        (rows in prop::collection::vec(
            prop::collection::vec(prop::bool::weighted(0.3), cols..=cols),
            n_docs..=n_docs,
        )) -> Vec<Vec<f32>> {
        rows.into_iter()
            .map(|row| row.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect())
            .collect()
    }
}

prop_compose! {
    fn arb_params()
        (r in 1usize..4, l in 1usize..6, thres in 0.3f64..1.0,
         min_cluster_size in 1usize..4, seed in any::<u64>()) -> MinerParams {
        MinerParams::new(r, BandCount::Fixed(l))
            .with_thres(thres)
            .with_min_cluster_size(min_cluster_size)
            .with_seed(seed)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fit_output_respects_invariants(rows in arb_corpus(), params in arb_params()) {
        let cols = rows[0].len();
        let n_docs = rows.len();
        let matrix = SparseMatrix::from_dense(&rows).unwrap();
        let min_cluster_size = params.min_cluster_size;

        match SampledMinHash::new(params).unwrap().fit(&matrix) {
            Ok(out) => {
                prop_assert_eq!(out.labels.len(), n_docs);
                prop_assert_eq!(out.clusters.len(), out.centroids.len());
                prop_assert_eq!(out.stats.clusters, out.clusters.len());
                prop_assert!(out.stats.groups_after_cutoff <= out.stats.groups_mined);

                for cluster in &out.clusters {
                    prop_assert!(cluster.distinct_count() >= min_cluster_size);
                }
                for centroid in &out.centroids {
                    prop_assert_eq!(centroid.len(), cols);
                    for &x in centroid {
                        prop_assert!(x.is_finite() && x >= 0.0);
                    }
                }
                for &label in &out.labels {
                    prop_assert!(label < out.clusters.len());
                }
            }
            // Sparse random corpora may legitimately mine nothing.
            Err(MineError::NoCandidates | MineError::NoClusters { .. }) => {}
            Err(other) => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        }
    }

    #[test]
    fn fixed_seed_reproduces_the_clustering(rows in arb_corpus(), params in arb_params()) {
        let matrix = SparseMatrix::from_dense(&rows).unwrap();
        let a = SampledMinHash::new(params.clone()).unwrap().fit(&matrix);
        let b = SampledMinHash::new(params).unwrap().fit(&matrix);
        match (a, b) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a, b),
            (a, b) => return Err(TestCaseError::fail(format!("diverged: {a:?} vs {b:?}"))),
        }
    }

    #[test]
    fn centroid_pipeline_is_idempotent(rows in arb_corpus(), params in arb_params()) {
        let matrix = SparseMatrix::from_dense(&rows).unwrap();
        if let Ok(out) = SampledMinHash::new(params).unwrap().fit(&matrix) {
            let again = lode::centroid::centroids(&out.clusters, &matrix).unwrap();
            prop_assert_eq!(&again, &out.centroids);
            let labels = lode::centroid::assign(&matrix, &again).unwrap();
            prop_assert_eq!(labels, out.labels);
        }
    }
}
