//! Banded candidate mining.
//!
//! Each signature is partitioned into `l` bands of `r` contiguous positions.
//! Within one band, documents with identical band values land in the same
//! bucket; every multi-document bucket becomes a candidate group (a "mined
//! topic"). Bands are independent, so bucketing runs in parallel per band
//! with a sequential merge at the end. Bucket maps live only for the
//! duration of their band and are discarded after extraction.
//!
//! Duplicate groups across bands are expected and intentional: a group mined
//! by several bands carries more evidence, and that multiplicity feeds the
//! centroid weighting downstream.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

use crate::config::MinerParams;
use crate::error::{MineError, Result};
use crate::signature::SignedCorpus;

/// The `r` signature values a document shows in one band.
type BandKey = SmallVec<[u64; 4]>;

/// A set of document indices: a candidate group or, after linkage, a final
/// cluster.
///
/// `docs` may contain repeats once groups are merged: a document occurring
/// in several constituent groups occurs that many times, and that count is
/// its membership weight for centroid construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocSet {
    /// Document indices, with multiplicity.
    pub docs: Vec<u32>,
}

impl DocSet {
    /// Total membership count, counting repeats.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// True when the set holds no members.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Distinct document indices, sorted.
    pub fn distinct(&self) -> Vec<u32> {
        let mut docs = self.docs.clone();
        docs.sort_unstable();
        docs.dedup();
        docs
    }

    /// Number of distinct documents.
    pub fn distinct_count(&self) -> usize {
        self.distinct().len()
    }
}

/// Mine candidate groups from signed documents.
///
/// Empty documents (no signature) never enter a bucket. Buckets holding a
/// single document are not emitted: one document is no similarity evidence.
/// Group order is made deterministic by sorting each band's groups, so a
/// fixed seed reproduces the run exactly.
pub fn mine(signed: &SignedCorpus, params: &MinerParams) -> Result<Vec<DocSet>> {
    let r = params.r;
    let l = params.band_count();

    let per_band: Vec<Vec<DocSet>> = (0..l)
        .into_par_iter()
        .map(|band| band_groups(signed, band * r, r))
        .collect();

    let mut groups: Vec<DocSet> = per_band.into_iter().flatten().collect();

    if let Some(budget) = params.max_candidate_groups {
        if groups.len() > budget {
            return Err(MineError::CandidateBudget {
                groups: groups.len(),
                budget,
            });
        }
    }

    tracing::debug!(bands = l, groups = groups.len(), "banded mining done");
    groups.shrink_to_fit();
    Ok(groups)
}

/// Bucket one band: group documents by their `r` signature values starting
/// at `offset`.
fn band_groups(signed: &SignedCorpus, offset: usize, r: usize) -> Vec<DocSet> {
    let mut buckets: HashMap<BandKey, Vec<u32>> = HashMap::new();
    for (doc, sig) in signed.signatures.iter().enumerate() {
        let Some(sig) = sig else { continue };
        let key: BandKey = sig.values[offset..offset + r].iter().copied().collect();
        buckets.entry(key).or_default().push(doc as u32);
    }

    let mut groups: Vec<DocSet> = buckets
        .into_values()
        .filter(|docs| docs.len() >= 2)
        .map(|docs| DocSet { docs })
        .collect();
    // Bucket maps iterate in arbitrary order; sort for a reproducible run.
    groups.sort_unstable_by(|a, b| a.docs.cmp(&b.docs));
    groups
}
