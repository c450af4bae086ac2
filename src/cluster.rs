//! Size filtering and threshold-linkage clustering of candidate groups.
//!
//! `mhlink` treats every candidate group as a node and links two nodes when
//! the Jaccard similarity of their distinct document sets reaches the
//! threshold. Connected components are the final clusters: any chain of
//! above-threshold links merges transitively, exactly as in single-linkage
//! hierarchical clustering, but over pre-bucketed candidates instead of raw
//! pairs.
//!
//! Naive all-pairs comparison over groups is the dominant cost at corpus
//! scale, so comparisons are bounded by co-membership: an inverted index
//! from document id to the groups containing it yields only pairs that share
//! at least one document. Two groups sharing no document have Jaccard 0 and
//! can never link directly.

use std::collections::{HashMap, HashSet};

use crate::error::{MineError, Result};
use crate::mining::DocSet;

/// Drop candidate groups with fewer than `min` distinct documents.
///
/// Pure filter, no merging. Raising `min` shrinks the candidate population
/// before the costlier linkage step.
pub fn cutoff(groups: Vec<DocSet>, min: usize) -> Vec<DocSet> {
    let before = groups.len();
    let kept: Vec<DocSet> = groups
        .into_iter()
        .filter(|g| g.distinct_count() >= min)
        .collect();
    tracing::debug!(before, after = kept.len(), min, "cutoff filter");
    kept
}

/// Threshold-linkage clustering of candidate groups.
///
/// Links groups whose distinct-document Jaccard similarity is `>= thres`,
/// merges connected components, and keeps components with at least
/// `min_cluster_size` distinct documents. The merged cluster is the
/// *multiset* union of its groups: a document contributes once per group it
/// appeared in, and that multiplicity is its centroid membership weight.
///
/// Clusters may overlap: a document mined into groups that land in
/// different components belongs to several clusters. The output is therefore
/// a docset collection, not a label array; exclusive labels only appear at
/// nearest-centroid assignment.
///
/// An empty input is reported as [`MineError::NoCandidates`], never as a
/// silent empty result.
pub fn mhlink(groups: &[DocSet], thres: f64, min_cluster_size: usize) -> Result<Vec<DocSet>> {
    if groups.is_empty() {
        return Err(MineError::NoCandidates);
    }

    let distinct: Vec<Vec<u32>> = groups.iter().map(DocSet::distinct).collect();

    // doc -> groups containing it. Only co-member pairs get compared.
    let mut by_doc: HashMap<u32, Vec<usize>> = HashMap::new();
    for (g, docs) in distinct.iter().enumerate() {
        for &doc in docs {
            by_doc.entry(doc).or_default().push(g);
        }
    }

    // Component merging is the one shared-mutable-state step of the
    // pipeline, so it stays single-threaded.
    let mut uf = UnionFind::new(groups.len());
    let mut compared: HashSet<(usize, usize)> = HashSet::new();
    let mut links = 0_usize;
    for members in by_doc.values() {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                if !compared.insert((a, b)) {
                    continue;
                }
                if uf.find(a) == uf.find(b) {
                    continue;
                }
                if jaccard(&distinct[a], &distinct[b]) >= thres {
                    uf.union(a, b);
                    links += 1;
                }
            }
        }
    }

    // Multiset union per component, in first-group order.
    let mut order: Vec<usize> = Vec::new();
    let mut merged: HashMap<usize, Vec<u32>> = HashMap::new();
    for (g, group) in groups.iter().enumerate() {
        let root = uf.find(g);
        merged
            .entry(root)
            .or_insert_with(|| {
                order.push(root);
                Vec::new()
            })
            .extend_from_slice(&group.docs);
    }

    let clusters: Vec<DocSet> = order
        .into_iter()
        .filter_map(|root| merged.remove(&root))
        .map(|docs| DocSet { docs })
        .filter(|c| c.distinct_count() >= min_cluster_size)
        .collect();

    tracing::debug!(
        groups = groups.len(),
        links,
        clusters = clusters.len(),
        "threshold linkage done"
    );
    Ok(clusters)
}

/// Jaccard similarity of two sorted, deduplicated id slices.
fn jaccard(a: &[u32], b: &[u32]) -> f64 {
    let mut i = 0;
    let mut j = 0;
    let mut inter = 0_usize;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                inter += 1;
                i += 1;
                j += 1;
            }
        }
    }
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}

/// Disjoint-set forest with path halving and union by size.
#[derive(Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets of `a` and `b`; returns false when already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        true
    }
}
