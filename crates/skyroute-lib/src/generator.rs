//! Random delivery network builder.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{GeoPoint, Graph, VertexId, VertexRole};
use crate::order::OrderId;
use crate::sim::Simulation;

/// Parameters for the random network builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of vertices to create, named "N1".."Nn".
    pub nodes: usize,
    /// Requested number of edges. Clamped between the spanning minimum and
    /// the complete-graph maximum.
    pub edges: usize,
    /// Fraction of vertices assigned the storage role, at least one.
    pub storage_ratio: f64,
    /// Fraction of vertices assigned the recharge role, at least one.
    /// Whatever remains becomes clients.
    pub recharge_ratio: f64,
    /// Inclusive bounds for edge weights.
    pub weight_min: f64,
    pub weight_max: f64,
    /// Centre of the generated coverage area.
    pub center: GeoPoint,
    /// Maximum jitter around the centre, in degrees.
    pub spread: f64,
    /// Seed for reproducible networks. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            nodes: 10,
            edges: 15,
            storage_ratio: 0.2,
            recharge_ratio: 0.2,
            weight_min: 5.0,
            weight_max: 30.0,
            center: GeoPoint {
                lat: -38.7359,
                lon: -72.5904,
            },
            spread: 0.05,
            seed: None,
        }
    }
}

impl NetworkConfig {
    /// Convenience constructor for a seeded network of the given size.
    pub fn seeded(nodes: usize, edges: usize, seed: u64) -> Self {
        Self {
            nodes,
            edges,
            seed: Some(seed),
            ..Self::default()
        }
    }
}

/// Generate a connected random network.
///
/// Vertices receive shuffled roles per the configured ratios and jittered
/// positions around the centre. A spanning chain over a shuffled vertex
/// order guarantees connectivity before random extra edges fill in the rest,
/// so every generated network reaches every vertex from every other.
pub fn generate(config: &NetworkConfig) -> Result<Graph> {
    if !config.weight_min.is_finite() || config.weight_min <= 0.0 {
        return Err(Error::InvalidWeight {
            weight: config.weight_min,
        });
    }
    if !config.weight_max.is_finite() || config.weight_max < config.weight_min {
        return Err(Error::InvalidWeight {
            weight: config.weight_max,
        });
    }

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let nodes = config.nodes;
    let storage_count = ((nodes as f64 * config.storage_ratio).floor() as usize)
        .max(1)
        .min(nodes);
    let recharge_count = ((nodes as f64 * config.recharge_ratio).floor() as usize)
        .max(1)
        .min(nodes.saturating_sub(storage_count));
    let client_count = nodes - storage_count - recharge_count;

    let mut roles = Vec::with_capacity(nodes);
    roles.extend(std::iter::repeat(VertexRole::Storage).take(storage_count));
    roles.extend(std::iter::repeat(VertexRole::Recharge).take(recharge_count));
    roles.extend(std::iter::repeat(VertexRole::Client).take(client_count));
    roles.shuffle(&mut rng);

    let ids: Vec<VertexId> = (1..=nodes).map(|i| format!("N{i}")).collect();

    let mut graph = Graph::new();
    for (id, role) in ids.iter().zip(&roles) {
        let position = GeoPoint {
            lat: config.center.lat + rng.gen_range(-config.spread..=config.spread),
            lon: config.center.lon + rng.gen_range(-config.spread..=config.spread),
        };
        graph.add_vertex_at(id.clone(), *role, position);
    }

    // Connectivity first: a spanning chain over a shuffled vertex order.
    let mut chain: Vec<usize> = (0..nodes).collect();
    chain.shuffle(&mut rng);
    for pair in chain.windows(2) {
        let weight = rng.gen_range(config.weight_min..=config.weight_max);
        graph.add_edge(&ids[pair[0]], &ids[pair[1]], weight)?;
    }

    let max_edges = nodes * nodes.saturating_sub(1) / 2;
    let target = config.edges.clamp(nodes.saturating_sub(1), max_edges);
    if target != config.edges {
        warn!(
            requested = config.edges,
            effective = target,
            "edge count clamped to keep the network connected and simple"
        );
    }

    while graph.edge_count() < target {
        let u = rng.gen_range(0..nodes);
        let v = rng.gen_range(0..nodes);
        if u == v || graph.has_edge(&ids[u], &ids[v]) {
            continue;
        }
        let weight = rng.gen_range(config.weight_min..=config.weight_max);
        graph.add_edge(&ids[u], &ids[v], weight)?;
    }

    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        storages = storage_count,
        recharges = recharge_count,
        clients = client_count,
        "generated delivery network"
    );
    Ok(graph)
}

/// Seed a simulation with random orders.
///
/// Each order ships from a random storage vertex to a random client, who is
/// also the recipient. Networks without storages or without clients yield no
/// orders.
pub fn place_random_orders<R: Rng>(
    sim: &mut Simulation,
    count: usize,
    rng: &mut R,
) -> Result<Vec<OrderId>> {
    let storages: Vec<VertexId> = sim
        .graph()
        .vertices_by_role(VertexRole::Storage)
        .iter()
        .map(|vertex| vertex.id.clone())
        .collect();
    let clients: Vec<VertexId> = sim
        .graph()
        .vertices_by_role(VertexRole::Client)
        .iter()
        .map(|vertex| vertex.id.clone())
        .collect();

    if storages.is_empty() || clients.is_empty() {
        return Ok(Vec::new());
    }

    let mut placed = Vec::with_capacity(count);
    for _ in 0..count {
        let (Some(origin), Some(client)) = (storages.choose(rng), clients.choose(rng)) else {
            break;
        };
        placed.push(sim.place_order(client, origin, client)?);
    }
    Ok(placed)
}
