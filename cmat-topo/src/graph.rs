use std::collections::{BTreeMap, BTreeSet};

/// Read access to an undirected graph.
pub trait Undirected {
    /// All node IDs, in a deterministic order.
    fn node_ids(&self) -> Vec<i64>;

    /// IDs of the nodes adjacent to `id`, in a deterministic order.
    ///
    /// A node with a self loop lists itself. An unknown node has no neighbours.
    fn neighbors(&self, id: i64) -> Vec<i64>;
}

/// An undirected graph with at most one edge between any two nodes.
///
/// Node IDs may be sparse or negative. Nodes and neighbours are visited in
/// ascending ID order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimpleGraph {
    adjacency: BTreeMap<i64, BTreeSet<i64>>,
}

impl SimpleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with no edges. Adding an existing node is a no-op.
    pub fn add_node(&mut self, id: i64) {
        self.adjacency.entry(id).or_default();
    }

    /// Add the edge `u -- v`, adding either endpoint if missing.
    pub fn set_edge(&mut self, u: i64, v: i64) {
        self.adjacency.entry(u).or_default().insert(v);
        self.adjacency.entry(v).or_default().insert(u);
    }

    pub fn has_node(&self, id: i64) -> bool {
        self.adjacency.contains_key(&id)
    }

    pub fn has_edge(&self, u: i64, v: i64) -> bool {
        self.adjacency.get(&u).is_some_and(|adj| adj.contains(&v))
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }
}

impl Undirected for SimpleGraph {
    fn node_ids(&self) -> Vec<i64> {
        self.adjacency.keys().copied().collect()
    }

    fn neighbors(&self, id: i64) -> Vec<i64> {
        self.adjacency
            .get(&id)
            .map(|adj| adj.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_edge_adds_endpoints() {
        let mut g = SimpleGraph::new();
        g.set_edge(3, -7);
        assert!(g.has_node(3) && g.has_node(-7));
        assert!(g.has_edge(3, -7) && g.has_edge(-7, 3));
        assert!(!g.has_edge(3, 3));
        assert_eq!(g.node_count(), 2);
        assert_eq!(g.node_ids(), vec![-7, 3]);
    }

    #[test]
    fn test_self_loop() {
        let mut g = SimpleGraph::new();
        g.set_edge(1, 1);
        assert!(g.has_edge(1, 1));
        assert_eq!(g.neighbors(1), vec![1]);
        assert_eq!(g.node_count(), 1);
    }

    #[test]
    fn test_isolated_node() {
        let mut g = SimpleGraph::new();
        g.add_node(5);
        g.add_node(5);
        assert_eq!(g.node_count(), 1);
        assert!(g.neighbors(5).is_empty());
        assert!(g.neighbors(6).is_empty());
    }
}
