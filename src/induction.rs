use std::hash::Hash;

use crate::clustering::ClustererFactory;
use crate::error::Result;
use crate::graph::{neighborhood, WeightedGraph};
use crate::similarity::Context;

/// Node sense induction: cluster the ego network of a target node with the
/// local clusterer and turn each cluster into a context weight map.
pub struct SenseInduction<V> {
    local: ClustererFactory<V>,
}

impl<V: Clone + Eq + Hash> SenseInduction<V> {
    pub fn new(local: ClustererFactory<V>) -> Self {
        SenseInduction { local }
    }

    /// The contexts of the senses of `target`, one per cluster of its ego
    /// network, in the clusterer's order. A node without neighbors has no
    /// contexts.
    pub fn contexts(&self, graph: &WeightedGraph<V>, target: &V) -> Result<Vec<Context<V>>> {
        let ego = neighborhood(graph, target);
        if ego.vertex_count() == 0 {
            return Ok(Vec::new());
        }

        let mut clusterer = (self.local.as_ref())(ego);
        clusterer.fit()?;
        let clusters = clusterer.clusters()?;

        let mut contexts = Vec::with_capacity(clusters.len());
        for cluster in clusters {
            let mut context = Context::with_capacity(cluster.len());
            for item in cluster {
                if let Some(weight) = graph.weight_between(target, item) {
                    context.insert(item.clone(), weight);
                }
            }
            contexts.push(context);
        }
        Ok(contexts)
    }
}
