use std::cmp::Ordering;
use std::collections::HashMap;

use crate::graph::{Edge, Graph};

/// Compute a minimum spanning tree with Kruskal's algorithm.
///
/// Edges are scanned in ascending weight order; the sort is stable, so equal
/// weights fall back to insertion order and repeated runs over the same graph
/// pick the same tree. Connected graphs yield |V| - 1 edges, disconnected
/// graphs a spanning forest. Descriptive analytics only; routing never
/// consults the tree.
pub fn find_mst(graph: &Graph) -> Vec<Edge> {
    let ids = graph.vertex_ids();
    if ids.is_empty() {
        return Vec::new();
    }

    let positions: HashMap<&str, usize> = ids
        .iter()
        .enumerate()
        .map(|(index, id)| (id.as_str(), index))
        .collect();

    let mut ordered: Vec<&Edge> = graph.edges().iter().collect();
    ordered.sort_by(|a, b| a.weight.total_cmp(&b.weight));

    let mut sets = DisjointSet::new(ids.len());
    let mut tree = Vec::new();
    let target = ids.len() - 1;

    for edge in ordered {
        let (Some(&u), Some(&v)) = (
            positions.get(edge.u.as_str()),
            positions.get(edge.v.as_str()),
        ) else {
            continue;
        };
        if sets.union(u, v) {
            tree.push(edge.clone());
            if tree.len() == target {
                break;
            }
        }
    }

    tree
}

/// Sum of edge weights in a spanning tree or forest.
pub fn mst_total_weight(tree: &[Edge]) -> f64 {
    tree.iter().map(|edge| edge.weight).sum()
}

/// Union-find with path halving and union by rank.
#[derive(Debug)]
struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, mut node: usize) -> usize {
        while self.parent[node] != node {
            self.parent[node] = self.parent[self.parent[node]];
            node = self.parent[node];
        }
        node
    }

    /// Merge the sets containing the two nodes. Returns `false` when they
    /// already share a root, which is exactly the cycle check Kruskal needs.
    fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}
