//! Paton's cycle basis algorithm.
//!
//! K. Paton, "An algorithm for finding a fundamental set of cycles for an
//! undirected linear graph", Comm. ACM 12(9), 1969.

use crate::graph::Undirected;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Find a fundamental set of cycles of `g`.
///
/// Each connected component is covered by a spanning tree grown from its
/// lowest-ordered node; every non-tree edge closes exactly one cycle. Cycles
/// are returned closed: the first node is repeated at the end. A self loop on
/// `u` yields `[u, u]`.
///
/// The cycles found depend on node and neighbour order; use
/// [`canonical_cycles_in`] to compare results.
pub fn undirected_cycles_in<G>(g: &G) -> Vec<Vec<i64>>
where
    G: Undirected + ?Sized,
{
    let mut cycles = Vec::new();
    let mut done = HashSet::new();
    let mut tree = Vec::new();

    for root in g.node_ids() {
        if !done.insert(root) {
            continue;
        }
        tree.clear();
        tree.push(root);
        // used[v]: nodes whose edge to v has already been examined
        let mut used: HashMap<i64, HashSet<i64>> = HashMap::from([(root, HashSet::new())]);
        let mut parent: HashMap<i64, i64> = HashMap::from([(root, root)]);

        while let Some(u) = tree.pop() {
            for v in g.neighbors(u) {
                if u == v {
                    cycles.push(vec![u, u]);
                } else if !used.contains_key(&v) {
                    done.insert(v);
                    parent.insert(v, u);
                    used.insert(v, HashSet::from([u]));
                    tree.push(v);
                } else if !used.get(&u).is_some_and(|seen| seen.contains(&v)) {
                    trace!(u, v, "back edge");
                    let adj = &used[&v];
                    let mut cycle = vec![v, u];
                    let mut p = parent[&u];
                    while !adj.contains(&p) {
                        cycle.push(p);
                        p = parent[&p];
                    }
                    cycle.push(p);
                    cycle.push(v);
                    cycles.push(cycle);
                    used.entry(v).or_default().insert(u);
                }
            }
        }
    }

    debug!(cycles = cycles.len(), "cycle enumeration finished");
    cycles
}

/// Rotate an open cycle to start at its minimum ID, then orient it so the
/// second node is the smaller of the minimum's two neighbours.
pub fn canonicalise(cycle: &[i64]) -> Vec<i64> {
    let mut c = cycle.to_vec();
    if c.len() < 2 {
        return c;
    }
    let start = c
        .iter()
        .enumerate()
        .min_by_key(|&(_, id)| *id)
        .map_or(0, |(i, _)| i);
    c.rotate_left(start);
    if c[c.len() - 1] < c[1] {
        c[1..].reverse();
    }
    c
}

/// [`undirected_cycles_in`] with every cycle canonicalised and closed, sorted
/// lexicographically.
pub fn canonical_cycles_in<G>(g: &G) -> Vec<Vec<i64>>
where
    G: Undirected + ?Sized,
{
    let mut cycles: Vec<Vec<i64>> = undirected_cycles_in(g)
        .into_iter()
        .map(|closed| {
            let mut c = canonicalise(&closed[..closed.len() - 1]);
            c.push(c[0]);
            c
        })
        .collect();
    cycles.sort();
    cycles
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SimpleGraph;

    #[test]
    fn test_canonicalise() {
        assert_eq!(canonicalise(&[5, 7, 2, 4, 8]), vec![2, 4, 8, 5, 7]);
        assert_eq!(canonicalise(&[2, 1, 9]), vec![1, 2, 9]);
        assert_eq!(canonicalise(&[4]), vec![4]);
        assert!(canonicalise(&[]).is_empty());
    }

    #[test]
    fn test_triangle() {
        let mut g = SimpleGraph::new();
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(2, 0);
        let cycles = undirected_cycles_in(&g);
        assert_eq!(cycles.len(), 1);
        let c = &cycles[0];
        assert_eq!(c.first(), c.last());
        assert_eq!(canonical_cycles_in(&g), vec![vec![0, 1, 2, 0]]);
    }

    #[test]
    fn test_forest_has_no_cycles() {
        let mut g = SimpleGraph::new();
        g.set_edge(0, 1);
        g.set_edge(1, 2);
        g.set_edge(10, 11);
        g.add_node(-3);
        assert!(undirected_cycles_in(&g).is_empty());
    }

    #[test]
    fn test_self_loop() {
        let mut g = SimpleGraph::new();
        g.set_edge(4, 4);
        g.set_edge(4, 5);
        assert_eq!(canonical_cycles_in(&g), vec![vec![4, 4]]);
    }
}
