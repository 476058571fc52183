use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use crate::error::{ClusterError, Result};
use crate::graph::WeightedGraph;

/// The capability shared by every clustering algorithm in this crate.
///
/// Instances own the graph they were built for and are used once: `fit`
/// computes the clusters, `clusters` returns them. A single instance is not
/// meant for concurrent use.
pub trait GraphClusterer<V> {
    /// Compute the clustering of the graph.
    fn fit(&mut self) -> Result<()>;

    /// The clusters found by [`fit`](GraphClusterer::fit).
    fn clusters(&self) -> Result<&[HashSet<V>]>;
}

/// A pure factory that sets up a clusterer for a graph. The local and
/// global stages of Watset construct one instance per call through this.
pub type ClustererFactory<V> =
    Arc<dyn Fn(WeightedGraph<V>) -> Box<dyn GraphClusterer<V>> + Send + Sync>;

/// A trivial clusterer that puts every vertex together in a single cluster.
pub struct TogetherClustering<V> {
    graph: WeightedGraph<V>,
    clusters: Option<Vec<HashSet<V>>>,
}

impl<V: Clone + Eq + Hash> TogetherClustering<V> {
    pub fn new(graph: WeightedGraph<V>) -> Self {
        TogetherClustering {
            graph,
            clusters: None,
        }
    }

    /// A factory for use as a local or global stage.
    pub fn provider() -> ClustererFactory<V>
    where
        V: Send + Sync + 'static,
    {
        Arc::new(|graph| Box::new(TogetherClustering::new(graph)) as Box<dyn GraphClusterer<V>>)
    }
}

impl<V: Clone + Eq + Hash> GraphClusterer<V> for TogetherClustering<V> {
    fn fit(&mut self) -> Result<()> {
        let everyone: HashSet<V> = self.graph.vertex_set().iter().cloned().collect();
        self.clusters = Some(vec![everyone]);
        Ok(())
    }

    fn clusters(&self) -> Result<&[HashSet<V>]> {
        self.clusters.as_deref().ok_or(ClusterError::NotYetFitted)
    }
}

#[cfg(test)]
mod test_clustering {
    use super::*;

    #[test]
    fn test_together_single_cluster() {
        let mut graph = WeightedGraph::new();
        graph.add_edge("a", "b", 1.0);
        graph.add_vertex("c");

        let mut together = TogetherClustering::new(graph);
        together.fit().unwrap();
        let clusters = together.clusters().unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0], ["a", "b", "c"].into_iter().collect());
    }

    #[test]
    fn test_clusters_before_fit() {
        let together = TogetherClustering::<&str>::new(WeightedGraph::new());
        assert!(matches!(
            together.clusters(),
            Err(ClusterError::NotYetFitted)
        ));
    }

    #[test]
    fn test_together_empty_graph() {
        let mut together = TogetherClustering::<&str>::new(WeightedGraph::new());
        together.fit().unwrap();
        let clusters = together.clusters().unwrap();
        assert_eq!(clusters.len(), 1);
        assert!(clusters[0].is_empty());
    }
}
