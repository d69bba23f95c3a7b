use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier for a vertex in the delivery network.
pub type VertexId = String;

/// Role a vertex plays in the delivery network. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexRole {
    Storage,
    Recharge,
    Client,
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexRole::Storage => write!(f, "storage"),
            VertexRole::Recharge => write!(f, "recharge"),
            VertexRole::Client => write!(f, "client"),
        }
    }
}

/// Geographic position attached to generated vertices. Presentation data
/// only; routing never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

/// Vertex of the delivery network. Adjacency lives on the graph, not here,
/// so edge symmetry cannot be broken from outside.
#[derive(Debug, Clone, Serialize)]
pub struct Vertex {
    pub id: VertexId,
    pub role: VertexRole,
    pub position: Option<GeoPoint>,
}

/// Neighbour entry in a vertex adjacency list.
#[derive(Debug, Clone)]
pub struct Neighbour {
    pub target: VertexId,
    pub weight: f64,
}

/// Undirected edge, stored once per unordered pair in insertion order.
/// Insertion order is the deterministic tiebreak for equal-weight edges.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub u: VertexId,
    pub v: VertexId,
    pub weight: f64,
}

/// Undirected weighted graph backing every routing and analytics query.
///
/// Every effective mutation bumps a revision counter so precomputed indexes
/// can detect that they are stale.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    vertices: HashMap<VertexId, Vertex>,
    adjacency: HashMap<VertexId, Vec<Neighbour>>,
    edges: Vec<Edge>,
    revision: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex with the given role. Re-adding an existing id is a
    /// no-op that keeps the original role and position.
    pub fn add_vertex(&mut self, id: impl Into<VertexId>, role: VertexRole) -> &Vertex {
        self.insert_vertex(id.into(), role, None)
    }

    /// Insert a vertex carrying a position. Used by the network generator.
    pub fn add_vertex_at(
        &mut self,
        id: impl Into<VertexId>,
        role: VertexRole,
        position: GeoPoint,
    ) -> &Vertex {
        self.insert_vertex(id.into(), role, Some(position))
    }

    fn insert_vertex(
        &mut self,
        id: VertexId,
        role: VertexRole,
        position: Option<GeoPoint>,
    ) -> &Vertex {
        if !self.vertices.contains_key(&id) {
            self.adjacency.entry(id.clone()).or_default();
            self.revision += 1;
        }
        self.vertices.entry(id).or_insert_with_key(|id| Vertex {
            id: id.clone(),
            role,
            position,
        })
    }

    /// Insert an undirected edge between two existing vertices.
    ///
    /// Duplicate edges (either orientation) and self-edges are accepted as
    /// no-ops; the graph stays simple. Weights must be positive and finite.
    pub fn add_edge(&mut self, u: &str, v: &str, weight: f64) -> Result<()> {
        if !self.vertices.contains_key(u) {
            return Err(Error::EndpointNotFound { id: u.to_string() });
        }
        if !self.vertices.contains_key(v) {
            return Err(Error::EndpointNotFound { id: v.to_string() });
        }
        if !weight.is_finite() || weight <= 0.0 {
            return Err(Error::InvalidWeight { weight });
        }
        if u == v || self.has_edge(u, v) {
            return Ok(());
        }

        self.adjacency
            .entry(u.to_string())
            .or_default()
            .push(Neighbour {
                target: v.to_string(),
                weight,
            });
        self.adjacency
            .entry(v.to_string())
            .or_default()
            .push(Neighbour {
                target: u.to_string(),
                weight,
            });
        self.edges.push(Edge {
            u: u.to_string(),
            v: v.to_string(),
            weight,
        });
        self.revision += 1;
        Ok(())
    }

    pub fn get_vertex(&self, id: &str) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn contains_vertex(&self, id: &str) -> bool {
        self.vertices.contains_key(id)
    }

    /// Whether an edge exists between the two ids, in either orientation.
    pub fn has_edge(&self, u: &str, v: &str) -> bool {
        self.neighbours(u).iter().any(|n| n.target == v)
    }

    /// Return the neighbours for a given vertex identifier, in the order
    /// their edges were added.
    pub fn neighbours(&self, id: &str) -> &[Neighbour] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All vertices with the given role, sorted by id.
    pub fn vertices_by_role(&self, role: VertexRole) -> Vec<&Vertex> {
        let mut found: Vec<&Vertex> = self.vertices.values().filter(|v| v.role == role).collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// All vertex ids, sorted lexicographically.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self.vertices.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Every stored edge, in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Current mutation revision. Bumped once per effective change.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
