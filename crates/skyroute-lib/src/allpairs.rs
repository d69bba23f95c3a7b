//! Dense all-pairs shortest-path index built with Floyd–Warshall.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};

/// Precomputed unconstrained distances between every pair of vertices.
///
/// The build is O(V³) time and O(V²) memory; queries are constant-time
/// distance lookups plus a successor walk for path reconstruction. The index
/// snapshots the graph revision it was built from, so callers holding a
/// detached index can detect that the graph has moved on. Battery limits are
/// deliberately ignored here.
#[derive(Debug, Clone)]
pub struct AllPairsIndex {
    ids: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
    dist: Vec<f64>,
    next: Vec<Option<usize>>,
    revision: u64,
}

impl AllPairsIndex {
    /// Build the index from the current graph state. Vertex ids are ordered
    /// lexicographically so rebuilds of an unchanged graph are identical.
    pub fn build(graph: &Graph) -> Self {
        let ids = graph.vertex_ids();
        let n = ids.len();
        let positions: HashMap<VertexId, usize> = ids
            .iter()
            .enumerate()
            .map(|(index, id)| (id.clone(), index))
            .collect();

        let mut dist = vec![f64::INFINITY; n * n];
        let mut next: Vec<Option<usize>> = vec![None; n * n];
        for i in 0..n {
            dist[i * n + i] = 0.0;
            next[i * n + i] = Some(i);
        }

        for edge in graph.edges() {
            let (Some(&u), Some(&v)) = (positions.get(&edge.u), positions.get(&edge.v)) else {
                continue;
            };
            if edge.weight < dist[u * n + v] {
                dist[u * n + v] = edge.weight;
                dist[v * n + u] = edge.weight;
                next[u * n + v] = Some(v);
                next[v * n + u] = Some(u);
            }
        }

        for k in 0..n {
            for i in 0..n {
                let through_k = dist[i * n + k];
                if !through_k.is_finite() {
                    continue;
                }
                for j in 0..n {
                    let candidate = through_k + dist[k * n + j];
                    if candidate < dist[i * n + j] {
                        dist[i * n + j] = candidate;
                        next[i * n + j] = next[i * n + k];
                    }
                }
            }
        }

        Self {
            ids,
            positions,
            dist,
            next,
            revision: graph.revision(),
        }
    }

    /// Reconstruct the cheapest unconstrained path between two vertices by
    /// walking the successor matrix.
    pub fn get_path(&self, start: &str, end: &str) -> Result<(Vec<VertexId>, f64)> {
        let &u = self
            .positions
            .get(start)
            .ok_or_else(|| Error::NodeNotFound {
                id: start.to_string(),
            })?;
        let &v = self.positions.get(end).ok_or_else(|| Error::NodeNotFound {
            id: end.to_string(),
        })?;

        let n = self.ids.len();
        let total = self.dist[u * n + v];
        if !total.is_finite() {
            return Err(Error::RouteNotFound {
                origin: start.to_string(),
                destination: end.to_string(),
            });
        }

        let mut path = vec![self.ids[u].clone()];
        let mut current = u;
        while current != v {
            match self.next[current * n + v] {
                Some(step) => {
                    current = step;
                    path.push(self.ids[current].clone());
                }
                None => {
                    return Err(Error::RouteNotFound {
                        origin: start.to_string(),
                        destination: end.to_string(),
                    });
                }
            }
        }

        Ok((path, total))
    }

    /// Distance between two vertices, or `None` when either id is unknown or
    /// the pair is disconnected.
    pub fn distance(&self, start: &str, end: &str) -> Option<f64> {
        let &u = self.positions.get(start)?;
        let &v = self.positions.get(end)?;
        let d = self.dist[u * self.ids.len() + v];
        d.is_finite().then_some(d)
    }

    /// Graph revision this index was built from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the index still matches the graph it was built from.
    pub fn is_current(&self, graph: &Graph) -> bool {
        self.revision == graph.revision()
    }

    /// Fail with a stale-index error when the graph has mutated since the
    /// build.
    pub fn verify_current(&self, graph: &Graph) -> Result<()> {
        if self.is_current(graph) {
            return Ok(());
        }
        Err(Error::StaleIndex {
            index_revision: self.revision,
            graph_revision: graph.revision(),
        })
    }
}
