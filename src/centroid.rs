//! Centroid construction and nearest-centroid assignment.
//!
//! A cluster's centroid is the membership-weighted mean of its documents:
//! every `(document, cluster)` membership contributes one copy of the
//! document's feature vector, and the sum is divided by the total membership
//! count, not the distinct-document count. A document that reached the
//! cluster through several candidate groups pulls the centroid harder.
//!
//! Assignment then labels *every* document of the corpus, including those
//! mining never touched, with the index of the nearest centroid under
//! Euclidean distance. This is the only step that produces a total,
//! exclusive labeling; everything upstream works with overlapping docsets.
//!
//! Both steps are pure functions of their inputs: re-running them yields
//! identical output.

use crate::corpus::SparseMatrix;
use crate::error::{MineError, Result};
use crate::mining::DocSet;

/// Build one centroid per cluster as the membership-weighted mean of member
/// rows.
///
/// Each centroid has exactly `matrix.n_cols()` entries. A cluster with zero
/// total membership weight violates the `min_cluster_size >= 1` invariant
/// upstream and fails fast as [`MineError::DegenerateCluster`] rather than
/// dividing by zero.
pub fn centroids(clusters: &[DocSet], matrix: &SparseMatrix) -> Result<Vec<Vec<f32>>> {
    clusters
        .iter()
        .enumerate()
        .map(|(ci, cluster)| {
            let weight = cluster.len();
            if weight == 0 {
                return Err(MineError::DegenerateCluster {
                    cluster: ci,
                    members: cluster.distinct_count(),
                });
            }

            let mut sum = vec![0.0_f32; matrix.n_cols()];
            for &doc in &cluster.docs {
                let row = matrix.row(doc as usize);
                for (&col, &val) in row.indices.iter().zip(row.values) {
                    sum[col as usize] += val;
                }
            }
            for x in &mut sum {
                *x /= weight as f32;
            }
            Ok(sum)
        })
        .collect()
}

/// Assign every document to its nearest centroid under Euclidean distance.
///
/// Ties break toward the lowest cluster index. Returns one label per corpus
/// row, so documents never captured by mining still get a cluster.
pub fn assign(matrix: &SparseMatrix, centroids: &[Vec<f32>]) -> Result<Vec<usize>> {
    if centroids.is_empty() {
        return Err(MineError::InvalidConfig(
            "no centroids to assign documents to".into(),
        ));
    }
    for centroid in centroids {
        if centroid.len() != matrix.n_cols() {
            return Err(MineError::DimensionMismatch {
                expected: matrix.n_cols(),
                actual: centroid.len(),
            });
        }
    }

    let labels = (0..matrix.n_rows())
        .map(|doc| {
            let row = matrix.row(doc);
            let mut best = 0;
            let mut best_dist = f32::INFINITY;
            for (label, centroid) in centroids.iter().enumerate() {
                let dist = row.l2_distance_dense(centroid);
                if dist < best_dist {
                    best_dist = dist;
                    best = label;
                }
            }
            best
        })
        .collect();
    Ok(labels)
}
