//! lode: Sampled MinHash topic mining and threshold-linkage clustering.
//!
//! Clusters large collections of sparse binary/count feature vectors
//! (documents over a vocabulary) without exact pairwise comparison:
//!
//! 1. **Sign**: a MinHash signature per document ([`signature`])
//! 2. **Mine**: banded bucketing into candidate groups, the "mined topics"
//!    ([`mining`])
//! 3. **Prune**: drop groups below a size cutoff ([`cluster::cutoff`])
//! 4. **Link**: merge groups transitively when their document-set Jaccard
//!    reaches a threshold ([`cluster::mhlink`])
//! 5. **Represent**: membership-weighted centroid per cluster
//!    ([`centroid::centroids`])
//! 6. **Assign**: nearest-centroid label for every document
//!    ([`centroid::assign`])
//!
//! ## Why banding works
//!
//! Two documents with Jaccard similarity `s` agree on one MinHash position
//! with probability `s`, on a whole band of `r` positions with probability
//! `s^r`, and in at least one of `l` bands with probability
//! `1 - (1 - s^r)^l`, an S-curve that is steep around the operating point.
//! Raising `r` buys precision, raising `l` buys recall back;
//! [`s2l`](config::s2l) picks the smallest `l` that catches pairs with
//! similarity `>= s*` at probability one half or better.
//!
//! Candidate groups are *evidence*, not clusters: the same group can be
//! mined by several bands, groups overlap, and a document may end up in
//! more than one final cluster. Everything up to assignment works with
//! explicit docsets; only the nearest-centroid step produces a total,
//! exclusive labeling.
//!
//! ## Example
//!
//! ```rust
//! use lode::{BandCount, MinerParams, SampledMinHash, SparseMatrix};
//!
//! // Six copies of the same three-feature document.
//! let rows = vec![vec![(0, 1.0), (3, 1.0), (7, 1.0)]; 6];
//! let matrix = SparseMatrix::from_rows(rows, 8).unwrap();
//!
//! let params = MinerParams::new(2, BandCount::Fixed(4));
//! let smh = SampledMinHash::new(params).unwrap();
//! let out = smh.fit(&matrix).unwrap();
//!
//! assert_eq!(out.clusters.len(), 1);
//! assert_eq!(out.labels, vec![0; 6]);
//! ```
//!
//! ## References
//!
//! - Broder (1997). "On the resemblance and containment of documents."
//! - Leskovec, Rajaraman & Ullman. "Mining of Massive Datasets", ch. 3.
//! - Fuentes-Pineda & Meza-Ruiz (2019). "Topic discovery in massive text
//!   corpora based on Min-Hashing."

pub mod centroid;
pub mod cluster;
pub mod config;
pub mod corpus;
pub mod error;
pub mod mining;
pub mod pipeline;
pub mod signature;

pub use config::{s2l, BandCount, MinerParams};
pub use corpus::{SparseMatrix, SparseRow};
pub use error::{MineError, Result};
pub use mining::DocSet;
pub use pipeline::{Clustering, MiningStats, SampledMinHash};
pub use signature::{HashFamily, Signature, SignedCorpus};
