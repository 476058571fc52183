use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use log::debug;

use crate::clustering::{ClustererFactory, GraphClusterer};
use crate::error::{ClusterError, Result};
use crate::graph::{validate, DiGraph, WeightedGraph};

/// The MaxMax soft clustering algorithm.
///
/// MaxMax rewrites the undirected weighted input graph into a directed
/// unweighted graph whose edges point from each maximal neighbor towards
/// the vertex that considers it maximal, then demotes every vertex reached
/// from an earlier root. The remaining roots and their reachable sets are
/// the clusters, which may overlap.
pub struct MaxMax<V> {
    graph: WeightedGraph<V>,
    digraph: DiGraph<V>,
    maximals: HashMap<V, HashSet<V>>,
    root: HashMap<V, bool>,
    clusters: Option<Vec<HashSet<V>>>,
}

impl<V: Clone + Eq + Hash> MaxMax<V> {
    pub fn new(graph: WeightedGraph<V>) -> Self {
        let mut digraph = DiGraph::new();
        let mut maximals = HashMap::with_capacity(graph.vertex_count());
        let mut root = HashMap::with_capacity(graph.vertex_count());
        for v in graph.vertex_set() {
            digraph.add_vertex(v.clone());
            maximals.insert(v.clone(), HashSet::new());
            root.insert(v.clone(), true);
        }
        MaxMax {
            graph,
            digraph,
            maximals,
            root,
            clusters: None,
        }
    }

    /// A factory for use as a local or global stage.
    pub fn provider() -> ClustererFactory<V>
    where
        V: Send + Sync + 'static,
    {
        Arc::new(|graph| Box::new(MaxMax::new(graph)) as Box<dyn GraphClusterer<V>>)
    }

    pub fn graph(&self) -> &WeightedGraph<V> {
        &self.graph
    }

    /// The directed maximal-neighbor graph derived by `fit`.
    pub fn digraph(&self) -> &DiGraph<V> {
        &self.digraph
    }

    /// The maximal neighbors of every vertex.
    pub fn maximals(&self) -> &HashMap<V, HashSet<V>> {
        &self.maximals
    }

    /// The root flag of every vertex.
    pub fn roots(&self) -> &HashMap<V, bool> {
        &self.root
    }
}

impl<V: Clone + Eq + Hash> GraphClusterer<V> for MaxMax<V> {
    fn fit(&mut self) -> Result<()> {
        validate(&self.graph)?;

        // Derived state is rebuilt from scratch on every fit.
        let mut digraph = DiGraph::new();
        for v in self.graph.vertex_set() {
            digraph.add_vertex(v.clone());
            self.maximals.insert(v.clone(), HashSet::new());
            self.root.insert(v.clone(), true);
        }

        // Preparation: the maximal neighbors of every vertex. An isolated
        // vertex keeps an empty set.
        for u in self.graph.vertex_set() {
            let mut max = -1.0f64;
            for &e in self.graph.edges_of(u) {
                max = max.max(self.graph.edge_weight(e));
            }
            let maximal: HashSet<V> = self
                .graph
                .edges_of(u)
                .iter()
                .filter(|&&e| self.graph.edge_weight(e) == max)
                .map(|&e| self.graph.opposite(e, u).clone())
                .collect();
            if !maximal.is_empty() {
                self.maximals.insert(u.clone(), maximal);
            }
        }

        // Graph transformation: orient every undirected edge from the
        // maximal neighbor towards the vertex that considers it maximal.
        // Both branches may fire; the digraph dedupes the ordered pairs.
        for e in self.graph.edge_ids() {
            let (u, v) = self.graph.edge_endpoints(e);
            if self.maximals[u].contains(v) {
                digraph.add_edge(v.clone(), u.clone());
            }
            if self.maximals[v].contains(u) {
                digraph.add_edge(u.clone(), v.clone());
            }
        }

        debug!(
            "MaxMax transformed {} undirected edges into {} directed edges.",
            self.graph.edge_count(),
            digraph.edge_count()
        );

        // Root demotion: one visited set shared across the whole sweep, so
        // a vertex already swept as a root is never demoted by a later one.
        // Vertices are visited in insertion order.
        let mut visited: HashSet<V> = HashSet::with_capacity(self.graph.vertex_count());
        for v in self.graph.vertex_set() {
            if !self.root[v] {
                continue;
            }
            let mut queue: VecDeque<V> = digraph.successors(v).cloned().collect();
            visited.insert(v.clone());
            while let Some(u) = queue.pop_front() {
                if visited.contains(&u) {
                    continue;
                }
                self.root.insert(u.clone(), false);
                queue.extend(digraph.successors(&u).cloned());
                visited.insert(u);
            }
        }

        // Clusters: everything reachable from each remaining root.
        let mut clusters = Vec::new();
        for v in self.graph.vertex_set() {
            if !self.root[v] {
                continue;
            }
            let mut members: HashSet<V> = HashSet::new();
            let mut queue: VecDeque<V> = VecDeque::new();
            queue.push_back(v.clone());
            while let Some(u) = queue.pop_front() {
                if members.contains(&u) {
                    continue;
                }
                queue.extend(digraph.successors(&u).cloned());
                members.insert(u);
            }
            clusters.push(members);
        }

        debug!("MaxMax found {} clusters.", clusters.len());

        self.digraph = digraph;
        self.clusters = Some(clusters);
        Ok(())
    }

    fn clusters(&self) -> Result<&[HashSet<V>]> {
        self.clusters.as_deref().ok_or(ClusterError::NotYetFitted)
    }
}
