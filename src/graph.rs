use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use crate::error::{ClusterError, Result};

/// Index of an edge inside a [`WeightedGraph`], stable for its lifetime.
pub type EdgeId = usize;

#[derive(Debug, Clone)]
struct Edge {
    source: usize,
    target: usize,
    weight: f64,
}

/// A simple undirected weighted graph over vertices of type `V`.
///
/// Vertices are interned in insertion order, so iteration over the vertex
/// set is deterministic. At most one edge exists per vertex pair; inserting
/// an edge that already exists overwrites its weight (last write wins).
#[derive(Debug, Clone)]
pub struct WeightedGraph<V> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    edges: Vec<Edge>,
    incidence: Vec<Vec<EdgeId>>,
    pair_index: HashMap<(usize, usize), EdgeId>,
}

impl<V: Clone + Eq + Hash> WeightedGraph<V> {
    pub fn new() -> Self {
        WeightedGraph {
            vertices: Vec::new(),
            index: HashMap::new(),
            edges: Vec::new(),
            incidence: Vec::new(),
            pair_index: HashMap::new(),
        }
    }

    /// Insert a vertex, deduplicating on equality.
    pub fn add_vertex(&mut self, vertex: V) -> usize {
        if let Some(&i) = self.index.get(&vertex) {
            return i;
        }
        let i = self.vertices.len();
        self.index.insert(vertex.clone(), i);
        self.vertices.push(vertex);
        self.incidence.push(Vec::new());
        i
    }

    /// Insert an undirected edge, creating missing endpoints.
    ///
    /// If the pair is already connected, the weight is overwritten.
    pub fn add_edge(&mut self, u: V, v: V, weight: f64) {
        let i = self.add_vertex(u);
        let j = self.add_vertex(v);
        let key = if i <= j { (i, j) } else { (j, i) };
        match self.pair_index.get(&key) {
            Some(&e) => {
                self.edges[e].weight = weight;
            }
            None => {
                let e = self.edges.len();
                self.edges.push(Edge { source: i, target: j, weight });
                self.incidence[i].push(e);
                if i != j {
                    self.incidence[j].push(e);
                }
                self.pair_index.insert(key, e);
            }
        }
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.index.contains_key(vertex)
    }

    /// The vertices in insertion order.
    pub fn vertex_set(&self) -> &[V] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The identifiers of all edges, in insertion order.
    pub fn edge_ids(&self) -> std::ops::Range<EdgeId> {
        0..self.edges.len()
    }

    /// The edges incident to a vertex, in insertion order.
    pub fn edges_of(&self, vertex: &V) -> &[EdgeId] {
        match self.index.get(vertex) {
            Some(&i) => &self.incidence[i],
            None => &[],
        }
    }

    pub fn edge_source(&self, edge: EdgeId) -> &V {
        &self.vertices[self.edges[edge].source]
    }

    pub fn edge_target(&self, edge: EdgeId) -> &V {
        &self.vertices[self.edges[edge].target]
    }

    pub fn edge_endpoints(&self, edge: EdgeId) -> (&V, &V) {
        let e = &self.edges[edge];
        (&self.vertices[e.source], &self.vertices[e.target])
    }

    pub fn edge_weight(&self, edge: EdgeId) -> f64 {
        self.edges[edge].weight
    }

    /// The endpoint of `edge` that is not `vertex`.
    pub fn opposite(&self, edge: EdgeId, vertex: &V) -> &V {
        let e = &self.edges[edge];
        if &self.vertices[e.source] == vertex {
            &self.vertices[e.target]
        } else {
            &self.vertices[e.source]
        }
    }

    /// The weight of the edge between two vertices, if any.
    pub fn weight_between(&self, u: &V, v: &V) -> Option<f64> {
        let i = *self.index.get(u)?;
        let j = *self.index.get(v)?;
        let key = if i <= j { (i, j) } else { (j, i) };
        self.pair_index.get(&key).map(|&e| self.edges[e].weight)
    }

    /// Iterate over the neighbors of a vertex, in edge insertion order.
    pub fn neighbors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = &'a V> + 'a {
        let at = self.index.get(vertex).copied();
        at.into_iter().flat_map(move |i| {
            self.incidence[i].iter().map(move |&e| {
                let edge = &self.edges[e];
                if edge.source == i {
                    &self.vertices[edge.target]
                } else {
                    &self.vertices[edge.source]
                }
            })
        })
    }
}

/// Build the ego network of a node: the subgraph induced by its neighbors,
/// with the node itself excluded and all edges among neighbors preserved.
pub fn neighborhood<V: Clone + Eq + Hash>(graph: &WeightedGraph<V>, node: &V) -> WeightedGraph<V> {
    let members: Vec<&V> = graph.neighbors(node).collect();
    let inside: HashSet<&V> = members.iter().copied().collect();

    let mut ego = WeightedGraph::new();
    for member in &members {
        ego.add_vertex((*member).clone());
    }
    for member in &members {
        for &e in graph.edges_of(member) {
            let (source, target) = graph.edge_endpoints(e);
            if inside.contains(source) && inside.contains(target) {
                ego.add_edge(source.clone(), target.clone(), graph.edge_weight(e));
            }
        }
    }
    ego
}

/// Reject graphs the algorithms do not accept: NaN weights, negative
/// weights, and self-loops.
pub fn validate<V: Clone + Eq + Hash>(graph: &WeightedGraph<V>) -> Result<()> {
    for e in graph.edge_ids() {
        let weight = graph.edge_weight(e);
        if weight.is_nan() {
            return Err(ClusterError::InvalidGraph("edge weight is NaN"));
        }
        if weight < 0.0 {
            return Err(ClusterError::InvalidGraph("negative edge weight"));
        }
        let (source, target) = graph.edge_endpoints(e);
        if source == target {
            return Err(ClusterError::InvalidGraph("self-loop edge"));
        }
    }
    Ok(())
}

/// A directed unweighted graph over vertices of type `V`.
///
/// At most one edge exists per ordered pair. Successors are kept in the
/// order vertices were interned, so traversals are deterministic.
#[derive(Debug, Clone)]
pub struct DiGraph<V> {
    vertices: Vec<V>,
    index: HashMap<V, usize>,
    succ: Vec<BTreeSet<usize>>,
    edge_count: usize,
}

impl<V: Clone + Eq + Hash> DiGraph<V> {
    pub fn new() -> Self {
        DiGraph {
            vertices: Vec::new(),
            index: HashMap::new(),
            succ: Vec::new(),
            edge_count: 0,
        }
    }

    pub fn add_vertex(&mut self, vertex: V) -> usize {
        if let Some(&i) = self.index.get(&vertex) {
            return i;
        }
        let i = self.vertices.len();
        self.index.insert(vertex.clone(), i);
        self.vertices.push(vertex);
        self.succ.push(BTreeSet::new());
        i
    }

    /// Insert a directed edge, deduplicating per ordered pair.
    pub fn add_edge(&mut self, from: V, to: V) {
        let i = self.add_vertex(from);
        let j = self.add_vertex(to);
        if self.succ[i].insert(j) {
            self.edge_count += 1;
        }
    }

    pub fn contains_edge(&self, from: &V, to: &V) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(&i), Some(&j)) => self.succ[i].contains(&j),
            _ => false,
        }
    }

    pub fn vertex_set(&self) -> &[V] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn successors<'a>(&'a self, vertex: &V) -> impl Iterator<Item = &'a V> + 'a {
        let at = self.index.get(vertex).copied();
        at.into_iter()
            .flat_map(move |i| self.succ[i].iter().map(move |&j| &self.vertices[j]))
    }
}

#[cfg(test)]
mod test_graph {
    use super::*;

    fn triangle() -> WeightedGraph<&'static str> {
        let mut g = WeightedGraph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "c", 2.0);
        g.add_edge("a", "c", 3.0);
        g
    }

    #[test]
    fn test_vertex_dedup() {
        let mut g = WeightedGraph::new();
        g.add_vertex("a");
        g.add_vertex("a");
        g.add_edge("a", "b", 1.0);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.vertex_set(), &["a", "b"]);
    }

    #[test]
    fn test_edge_weight_overwrite() {
        let mut g = WeightedGraph::new();
        g.add_edge("a", "b", 1.0);
        g.add_edge("b", "a", 7.0);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.weight_between(&"a", &"b"), Some(7.0));
    }

    #[test]
    fn test_neighbors_and_opposite() {
        let g = triangle();
        let neighbors: Vec<_> = g.neighbors(&"a").cloned().collect();
        assert_eq!(neighbors, vec!["b", "c"]);
        for &e in g.edges_of(&"a") {
            assert_ne!(g.opposite(e, &"a"), &"a");
        }
        assert!(g.neighbors(&"zzz").next().is_none());
    }

    #[test]
    fn test_neighborhood_excludes_node() {
        let mut g = triangle();
        g.add_edge("c", "d", 1.0);
        let ego = neighborhood(&g, &"c");
        assert!(!ego.contains_vertex(&"c"));
        assert_eq!(ego.vertex_count(), 3);
        // Only a-b survives among c's neighbors.
        assert_eq!(ego.edge_count(), 1);
        assert_eq!(ego.weight_between(&"a", &"b"), Some(1.0));
    }

    #[test]
    fn test_validate_rejects_bad_graphs() {
        let mut negative = WeightedGraph::new();
        negative.add_edge("a", "b", -1.0);
        assert!(matches!(validate(&negative), Err(ClusterError::InvalidGraph(_))));

        let mut nan = WeightedGraph::new();
        nan.add_edge("a", "b", f64::NAN);
        assert!(matches!(validate(&nan), Err(ClusterError::InvalidGraph(_))));

        let mut loopy = WeightedGraph::new();
        loopy.add_edge("a", "a", 1.0);
        assert!(matches!(validate(&loopy), Err(ClusterError::InvalidGraph(_))));

        assert!(validate(&triangle()).is_ok());
    }

    #[test]
    fn test_digraph_dedup() {
        let mut d = DiGraph::new();
        d.add_edge("a", "b");
        d.add_edge("a", "b");
        d.add_edge("b", "a");
        assert_eq!(d.edge_count(), 2);
        assert!(d.contains_edge(&"a", &"b"));
        assert!(d.contains_edge(&"b", &"a"));
        assert!(!d.contains_edge(&"a", &"c"));
        let succ: Vec<_> = d.successors(&"a").cloned().collect();
        assert_eq!(succ, vec!["b"]);
    }
}
