//! MinHash signature generation.
//!
//! For a family of `k` independent hash functions, a document's signature is
//! the minimum hash value over its feature ids, per function. Two documents
//! with Jaccard similarity `s` agree on each signature position with
//! probability `s` (Broder 1997), so signatures turn set similarity into
//! cheap positional agreement.
//!
//! Signing is pure per document and runs in parallel across the corpus; the
//! hash family is constructed once per run and shared read-only.

use std::hash::{Hash, Hasher};

use rayon::prelude::*;

use crate::corpus::SparseMatrix;

/// A family of `k` seeded hash functions, fixed for a run.
///
/// Seeds are spawned from a single `u64` seed with an LCG, so the family
/// (and therefore the whole mining run) is reproducible given the seed.
#[derive(Debug, Clone)]
pub struct HashFamily {
    seeds: Vec<u64>,
}

impl HashFamily {
    /// Create `k` hash functions from one seed.
    pub fn new(k: usize, seed: u64) -> Self {
        let mut seeds = Vec::with_capacity(k);
        let mut state = seed;
        for _ in 0..k {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            seeds.push(state);
        }
        Self { seeds }
    }

    /// Number of hash functions (signature length).
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    /// True when the family holds no hash functions.
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    /// MinHash signature of a feature set.
    ///
    /// Returns `None` for an empty feature set: an empty document has no
    /// minimum and must not be hashed into a fictitious match.
    pub fn signature<I>(&self, features: I) -> Option<Signature>
    where
        I: IntoIterator<Item = u32>,
    {
        let mut mins = vec![u64::MAX; self.seeds.len()];
        let mut seen_any = false;
        for feature in features {
            seen_any = true;
            for (slot, &seed) in mins.iter_mut().zip(&self.seeds) {
                let h = hash_feature(seed, feature);
                if h < *slot {
                    *slot = h;
                }
            }
        }
        seen_any.then_some(Signature { values: mins })
    }

    /// Sign every document of a corpus, in parallel.
    ///
    /// Documents with empty feature sets are excluded from mining, counted,
    /// and reported at warn level; they are never silently dropped.
    pub fn sign(&self, matrix: &SparseMatrix) -> SignedCorpus {
        let signatures: Vec<Option<Signature>> = (0..matrix.n_rows())
            .into_par_iter()
            .map(|doc| self.signature(matrix.row(doc).indices.iter().copied()))
            .collect();

        let empty_docs: Vec<u32> = signatures
            .iter()
            .enumerate()
            .filter(|(_, sig)| sig.is_none())
            .map(|(doc, _)| doc as u32)
            .collect();
        if !empty_docs.is_empty() {
            tracing::warn!(
                count = empty_docs.len(),
                "documents with empty feature sets excluded from mining"
            );
        }

        SignedCorpus {
            signatures,
            empty_docs,
        }
    }
}

fn hash_feature(seed: u64, feature: u32) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    feature.hash(&mut hasher);
    hasher.finish()
}

/// A MinHash signature: one minimum hash value per hash function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Minimum hash values, indexed by hash function.
    pub values: Vec<u64>,
}

impl Signature {
    /// Estimate Jaccard similarity as the fraction of agreeing positions.
    ///
    /// Returns 0.0 for signatures of different lengths.
    pub fn jaccard(&self, other: &Signature) -> f64 {
        if self.values.len() != other.values.len() || self.values.is_empty() {
            return 0.0;
        }
        let matches = self
            .values
            .iter()
            .zip(&other.values)
            .filter(|(a, b)| a == b)
            .count();
        matches as f64 / self.values.len() as f64
    }

    /// Signature length.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the signature has no positions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Signatures for a whole corpus, aligned with document indices.
#[derive(Debug, Clone)]
pub struct SignedCorpus {
    /// One entry per document; `None` for empty documents.
    pub signatures: Vec<Option<Signature>>,
    /// Documents excluded from mining for having no features.
    pub empty_docs: Vec<u32>,
}

impl SignedCorpus {
    /// Number of documents, including empty ones.
    pub fn n_docs(&self) -> usize {
        self.signatures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_get_identical_signatures() {
        let family = HashFamily::new(64, 7);
        let a = family.signature([1, 5, 9]).unwrap();
        let b = family.signature([1, 5, 9]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.jaccard(&b), 1.0);
    }

    #[test]
    fn disjoint_sets_rarely_agree() {
        let family = HashFamily::new(128, 7);
        let a = family.signature(0..50).unwrap();
        let b = family.signature(1000..1050).unwrap();
        assert!(a.jaccard(&b) < 0.2);
    }

    #[test]
    fn overlapping_sets_estimate_jaccard() {
        let family = HashFamily::new(256, 42);
        // True Jaccard = 50 / 150.
        let a = family.signature(0..100).unwrap();
        let b = family.signature(50..150).unwrap();
        let estimated = a.jaccard(&b);
        assert!((estimated - 1.0 / 3.0).abs() < 0.15, "estimate {estimated}");
    }

    #[test]
    fn empty_feature_set_has_no_signature() {
        let family = HashFamily::new(16, 0);
        assert!(family.signature(std::iter::empty()).is_none());
    }

    #[test]
    fn sign_reports_empty_documents() {
        let matrix = SparseMatrix::from_rows(
            vec![vec![(0, 1.0)], vec![], vec![(1, 1.0)], vec![]],
            2,
        )
        .unwrap();
        let signed = HashFamily::new(8, 3).sign(&matrix);
        assert_eq!(signed.n_docs(), 4);
        assert_eq!(signed.empty_docs, vec![1, 3]);
        assert!(signed.signatures[0].is_some());
        assert!(signed.signatures[1].is_none());
    }

    #[test]
    fn different_seeds_give_different_families() {
        let a = HashFamily::new(32, 1).signature([1, 2, 3]).unwrap();
        let b = HashFamily::new(32, 2).signature([1, 2, 3]).unwrap();
        assert_ne!(a, b);
    }
}
