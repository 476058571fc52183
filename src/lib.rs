//! Fuzzy graph clustering for word sense induction.
//!
//! Given an undirected weighted graph whose vertices are ambiguous items
//! and whose edges encode pairwise similarity, this crate partitions each
//! item into one or more latent senses and clusters those senses, yielding
//! overlapping clusters over the original items.
//!
//! Two algorithms do the heavy lifting:
//! - [`MaxMax`], a deterministic single-pass clusterer that rewrites the
//!   graph into a directed maximal-neighbor graph and extracts clusters
//!   with a root-reachability sweep;
//! - [`Watset`], a local-global meta-algorithm that induces per-node senses
//!   with a pluggable local clusterer, disambiguates their contexts,
//!   assembles a weighted sense graph, and clusters it with a pluggable
//!   global clusterer.
//!
//! Both implement the [`GraphClusterer`] capability, as does the trivial
//! [`TogetherClustering`] baseline. Custom local and global stages plug in
//! through [`ClustererFactory`].

pub mod clustering;
pub mod error;
pub mod graph;
pub mod induction;
pub mod logger;
pub mod maximizer;
pub mod maxmax;
pub mod sense;
pub mod similarity;
pub mod watset;

pub use clustering::{ClustererFactory, GraphClusterer, TogetherClustering};
pub use error::{ClusterError, Result};
pub use graph::{neighborhood, validate, DiGraph, EdgeId, WeightedGraph};
pub use induction::SenseInduction;
pub use maximizer::{argmax, argmax_filtered, argmax_random};
pub use maxmax::MaxMax;
pub use sense::{disambiguate, Sense, SenseContexts, SenseInventory};
pub use similarity::{Context, ContextSimilarity, CosineSimilarity};
pub use watset::{Watset, WatsetBuilder, DEFAULT_CONTEXT_WEIGHT};
