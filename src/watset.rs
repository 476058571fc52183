use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use log::info;
use rayon::prelude::*;

use crate::clustering::{ClustererFactory, GraphClusterer};
use crate::error::{ClusterError, Result};
use crate::graph::{validate, WeightedGraph};
use crate::induction::SenseInduction;
use crate::sense::{disambiguate, Sense, SenseContexts, SenseInventory};
use crate::similarity::{ContextSimilarity, CosineSimilarity};

/// The weight of the target node inserted into its own context during
/// disambiguation.
pub const DEFAULT_CONTEXT_WEIGHT: f64 = 1.0;

/// Watset, a local-global meta-algorithm for fuzzy graph clustering.
///
/// Watset induces the senses of every node with the local clusterer, builds
/// an intermediate sense graph out of the disambiguated sense contexts, and
/// clusters that graph with the global clusterer. Projecting the sense
/// clusters back to the original items yields overlapping clusters.
pub struct Watset<V> {
    graph: WeightedGraph<V>,
    inducer: SenseInduction<V>,
    global: ClustererFactory<Sense<V>>,
    similarity: Arc<dyn ContextSimilarity<V>>,
    self_weight: f64,
    inventory: Option<SenseInventory<V>>,
    contexts: Option<SenseContexts<V>>,
    sense_graph: Option<WeightedGraph<Sense<V>>>,
    sense_clusters: Option<Vec<HashSet<Sense<V>>>>,
    clusters: Option<Vec<HashSet<V>>>,
}

/// Configures and builds a [`Watset`] instance.
pub struct WatsetBuilder<V> {
    local: ClustererFactory<V>,
    global: ClustererFactory<Sense<V>>,
    similarity: Arc<dyn ContextSimilarity<V>>,
    self_weight: f64,
}

impl<V> WatsetBuilder<V>
where
    V: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    pub fn new(local: ClustererFactory<V>, global: ClustererFactory<Sense<V>>) -> Self {
        WatsetBuilder {
            local,
            global,
            similarity: Arc::new(CosineSimilarity),
            self_weight: DEFAULT_CONTEXT_WEIGHT,
        }
    }

    /// Replace the default cosine context similarity.
    pub fn similarity(mut self, similarity: Arc<dyn ContextSimilarity<V>>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Override the self-weight a target node gets in its own context.
    pub fn self_weight(mut self, self_weight: f64) -> Self {
        self.self_weight = self_weight;
        self
    }

    pub fn build(self, graph: WeightedGraph<V>) -> Watset<V> {
        Watset {
            graph,
            inducer: SenseInduction::new(self.local),
            global: self.global,
            similarity: self.similarity,
            self_weight: self.self_weight,
            inventory: None,
            contexts: None,
            sense_graph: None,
            sense_clusters: None,
            clusters: None,
        }
    }
}

impl<V> Watset<V>
where
    V: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    pub fn builder(
        local: ClustererFactory<V>,
        global: ClustererFactory<Sense<V>>,
    ) -> WatsetBuilder<V> {
        WatsetBuilder::new(local, global)
    }

    pub fn graph(&self) -> &WeightedGraph<V> {
        &self.graph
    }

    /// The sense inventory built during `fit`.
    pub fn inventory(&self) -> Result<&SenseInventory<V>> {
        self.inventory.as_ref().ok_or(ClusterError::NotYetFitted)
    }

    /// The disambiguated contexts built during `fit`.
    pub fn contexts(&self) -> Result<&SenseContexts<V>> {
        self.contexts.as_ref().ok_or(ClusterError::NotYetFitted)
    }

    /// The intermediate sense graph built during `fit`.
    pub fn sense_graph(&self) -> Result<&WeightedGraph<Sense<V>>> {
        self.sense_graph.as_ref().ok_or(ClusterError::NotYetFitted)
    }

    /// The clusters of the sense graph found by the global clusterer.
    pub fn sense_clusters(&self) -> Result<&[HashSet<Sense<V>>]> {
        self.sense_clusters
            .as_deref()
            .ok_or(ClusterError::NotYetFitted)
    }
}

impl<V> GraphClusterer<V> for Watset<V>
where
    V: Clone + Eq + Hash + Debug + Send + Sync + 'static,
{
    fn fit(&mut self) -> Result<()> {
        self.inventory = None;
        self.contexts = None;
        self.sense_graph = None;
        self.sense_clusters = None;
        self.clusters = None;

        validate(&self.graph)?;

        info!("Watset started.");

        // Sense induction fans out over the vertices; every vertex writes
        // only its own inventory entry.
        let inventory: DashMap<V, HashMap<Sense<V>, HashMap<V, f64>>> = DashMap::new();
        self.graph
            .vertex_set()
            .par_iter()
            .try_for_each(|node| -> Result<()> {
                let contexts = self.inducer.contexts(&self.graph, node)?;
                let mut senses = HashMap::with_capacity(contexts.len());
                for (index, context) in contexts.into_iter().enumerate() {
                    senses.insert(Sense::new(node.clone(), index), context);
                }
                inventory.insert(node.clone(), senses);
                Ok(())
            })?;

        // Freeze the inventory before any cross-key reads.
        let inventory: SenseInventory<V> = inventory.into_iter().collect();
        let sense_count: usize = inventory.values().map(HashMap::len).sum();

        info!(
            "Watset: sense inventory constructed including {} senses.",
            sense_count
        );

        // Disambiguation fans out over the items; the inventory is
        // read-only from here on.
        let contexts: DashMap<Sense<V>, HashMap<Sense<V>, f64>> =
            DashMap::with_capacity(sense_count);
        inventory
            .par_iter()
            .try_for_each(|(node, senses)| -> Result<()> {
                if senses.is_empty() {
                    // A node without neighbors still gets one sense with an
                    // empty context, so it survives into the clustering.
                    contexts.insert(Sense::new(node.clone(), 0), HashMap::new());
                    return Ok(());
                }
                let exclude: HashSet<V> = std::iter::once(node.clone()).collect();
                for (sense, context) in senses {
                    let mut expanded = context.clone();
                    expanded.insert(node.clone(), self.self_weight);
                    let resolved = disambiguate(
                        &inventory,
                        self.similarity.as_ref(),
                        &expanded,
                        &exclude,
                    )?;
                    contexts.insert(sense.clone(), resolved);
                }
                Ok(())
            })?;
        let contexts: SenseContexts<V> = contexts.into_iter().collect();

        info!("Watset: contexts constructed.");

        // Sense graph assembly. Adding an edge that already exists
        // overwrites its weight; the last write wins.
        let mut sense_graph = WeightedGraph::new();
        for sense in contexts.keys() {
            sense_graph.add_vertex(sense.clone());
        }
        for (source, context) in &contexts {
            for (target, weight) in context {
                sense_graph.add_edge(source.clone(), target.clone(), *weight);
            }
        }

        if sense_graph.edge_count() < self.graph.edge_count() {
            return Err(ClusterError::CorruptSenseGraph {
                expected: self.graph.edge_count(),
                actual: sense_graph.edge_count(),
            });
        }

        info!(
            "Watset: sense graph constructed with {} senses and {} edges.",
            sense_graph.vertex_count(),
            sense_graph.edge_count()
        );

        let mut global = (self.global.as_ref())(sense_graph.clone());
        global.fit()?;
        let sense_clusters = global.clusters()?.to_vec();

        let clusters = sense_clusters
            .iter()
            .map(|cluster| cluster.iter().map(|sense| sense.item().clone()).collect())
            .collect();

        self.inventory = Some(inventory);
        self.contexts = Some(contexts);
        self.sense_graph = Some(sense_graph);
        self.sense_clusters = Some(sense_clusters);
        self.clusters = Some(clusters);

        info!("Watset finished.");

        Ok(())
    }

    fn clusters(&self) -> Result<&[HashSet<V>]> {
        self.clusters.as_deref().ok_or(ClusterError::NotYetFitted)
    }
}

#[cfg(test)]
mod test_watset {
    use crate::clustering::TogetherClustering;
    use crate::maxmax::MaxMax;

    use super::*;

    fn two_sense_graph() -> WeightedGraph<&'static str> {
        let mut graph = WeightedGraph::new();
        graph.add_edge("bank", "river", 1.0);
        graph.add_edge("bank", "water", 1.0);
        graph.add_edge("bank", "money", 1.0);
        graph.add_edge("bank", "loan", 1.0);
        graph.add_edge("river", "water", 1.0);
        graph.add_edge("money", "loan", 1.0);
        graph
    }

    #[test]
    fn test_together_collapses_to_single_cluster() {
        let mut watset = Watset::builder(
            TogetherClustering::provider(),
            TogetherClustering::provider(),
        )
        .build(two_sense_graph());
        watset.fit().unwrap();

        let clusters = watset.clusters().unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(
            clusters[0],
            ["bank", "river", "water", "money", "loan"]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn test_two_senses_of_bank() {
        let mut watset =
            Watset::builder(MaxMax::provider(), MaxMax::provider()).build(two_sense_graph());
        watset.fit().unwrap();

        // The local stage splits the neighborhood of "bank" in two.
        let inventory = watset.inventory().unwrap();
        assert_eq!(inventory[&"bank"].len(), 2);
        let indices: HashSet<usize> = inventory[&"bank"].keys().map(Sense::index).collect();
        assert_eq!(indices, [0, 1].into_iter().collect());

        // The sense graph keeps every input edge.
        let sense_graph = watset.sense_graph().unwrap();
        assert_eq!(sense_graph.vertex_count(), 6);
        assert!(sense_graph.edge_count() >= watset.graph().edge_count());

        // Both meanings of "bank" come back as separate clusters.
        let clusters = watset.clusters().unwrap();
        let with_bank: Vec<_> = clusters
            .iter()
            .filter(|cluster| cluster.contains(&"bank"))
            .collect();
        assert_eq!(with_bank.len(), 2);
        assert!(clusters.contains(&["bank", "river", "water"].into_iter().collect()));
        assert!(clusters.contains(&["bank", "money", "loan"].into_iter().collect()));
    }

    #[test]
    fn test_isolated_item_survives() {
        let mut graph = two_sense_graph();
        graph.add_vertex("hermit");
        let mut watset = Watset::builder(
            TogetherClustering::provider(),
            TogetherClustering::provider(),
        )
        .build(graph);
        watset.fit().unwrap();

        let contexts = watset.contexts().unwrap();
        let hermit = Sense::new("hermit", 0);
        assert!(contexts[&hermit].is_empty());

        let clusters = watset.clusters().unwrap();
        assert!(clusters.iter().any(|cluster| cluster.contains(&"hermit")));
    }

    #[test]
    fn test_accessors_before_fit() {
        let watset = Watset::builder(
            TogetherClustering::<&str>::provider(),
            TogetherClustering::provider(),
        )
        .build(WeightedGraph::new());

        assert!(matches!(watset.clusters(), Err(ClusterError::NotYetFitted)));
        assert!(matches!(
            watset.inventory(),
            Err(ClusterError::NotYetFitted)
        ));
        assert!(matches!(watset.contexts(), Err(ClusterError::NotYetFitted)));
        assert!(matches!(
            watset.sense_graph(),
            Err(ClusterError::NotYetFitted)
        ));
    }

    #[test]
    fn test_self_weight_knob() {
        let mut watset = Watset::builder(
            TogetherClustering::provider(),
            TogetherClustering::provider(),
        )
        .self_weight(0.5)
        .build(two_sense_graph());
        watset.fit().unwrap();
        // The self weight only participates during disambiguation; the
        // disambiguated contexts never contain the target itself.
        let contexts = watset.contexts().unwrap();
        for (sense, context) in contexts {
            assert!(context.keys().all(|other| other.item() != sense.item()));
        }
    }
}
