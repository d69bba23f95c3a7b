use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId, VertexRole};

/// Find the cheapest battery-feasible path between two vertices.
///
/// The search runs Dijkstra over (vertex, remaining battery) states. An edge
/// is traversable only while its weight fits in the remaining budget, and
/// arriving at a recharge vertex restores the full budget. States are pruned
/// per vertex with a Pareto frontier: a candidate is dropped only when some
/// recorded state at that vertex is at least as cheap and at least as full.
/// Keying on the vertex alone would discard detours through a recharge
/// station that make the rest of the route feasible.
///
/// Returns the path and its exact edge-weight sum.
pub fn find_path(
    graph: &Graph,
    start: &str,
    end: &str,
    battery_limit: f64,
) -> Result<(Vec<VertexId>, f64)> {
    if !graph.contains_vertex(start) {
        return Err(Error::NodeNotFound {
            id: start.to_string(),
        });
    }
    if !graph.contains_vertex(end) {
        return Err(Error::NodeNotFound { id: end.to_string() });
    }
    if start == end {
        return Ok((vec![start.to_string()], 0.0));
    }
    // Every edge weight is positive, so a non-positive budget cannot move.
    if !battery_limit.is_finite() || battery_limit <= 0.0 {
        return Err(Error::RouteNotFound {
            origin: start.to_string(),
            destination: end.to_string(),
        });
    }

    let mut states: Vec<SearchState> = Vec::new();
    let mut frontiers: HashMap<VertexId, Vec<ParetoPoint>> = HashMap::new();
    let mut queue = BinaryHeap::new();
    let mut sequence: u64 = 0;

    states.push(SearchState {
        vertex: start.to_string(),
        cost: 0.0,
        remaining: battery_limit,
        parent: None,
    });
    frontiers.insert(
        start.to_string(),
        vec![ParetoPoint {
            cost: 0.0,
            remaining: battery_limit,
        }],
    );
    queue.push(StateEntry::new(0, 0.0, sequence));

    while let Some(entry) = queue.pop() {
        let state = states[entry.state].clone();

        if state.vertex == end {
            return Ok((reconstruct_states(&states, entry.state), state.cost));
        }

        // Entries whose frontier point was superseded are dead weight.
        let on_frontier = frontiers
            .get(&state.vertex)
            .map(|points| {
                points
                    .iter()
                    .any(|p| p.cost == state.cost && p.remaining == state.remaining)
            })
            .unwrap_or(false);
        if !on_frontier {
            continue;
        }

        for neighbour in graph.neighbours(&state.vertex) {
            if neighbour.weight > state.remaining {
                continue;
            }

            let next_cost = state.cost + neighbour.weight;
            let next_remaining = if is_recharge(graph, &neighbour.target) {
                battery_limit
            } else {
                state.remaining - neighbour.weight
            };

            let frontier = frontiers.entry(neighbour.target.clone()).or_default();
            if dominated(frontier, next_cost, next_remaining) {
                continue;
            }
            insert_point(frontier, next_cost, next_remaining);

            states.push(SearchState {
                vertex: neighbour.target.clone(),
                cost: next_cost,
                remaining: next_remaining,
                parent: Some(entry.state),
            });
            sequence += 1;
            queue.push(StateEntry::new(states.len() - 1, next_cost, sequence));
        }
    }

    Err(Error::RouteNotFound {
        origin: start.to_string(),
        destination: end.to_string(),
    })
}

/// Run Dijkstra's algorithm without the battery constraint.
///
/// Used as the per-query fallback when the graph is too large for the
/// all-pairs index, and by tests to cross-check the constrained search.
pub fn shortest_path(graph: &Graph, start: &str, end: &str) -> Result<(Vec<VertexId>, f64)> {
    if !graph.contains_vertex(start) {
        return Err(Error::NodeNotFound {
            id: start.to_string(),
        });
    }
    if !graph.contains_vertex(end) {
        return Err(Error::NodeNotFound { id: end.to_string() });
    }
    if start == end {
        return Ok((vec![start.to_string()], 0.0));
    }

    let mut distances: HashMap<VertexId, f64> = HashMap::new();
    let mut parents: HashMap<VertexId, Option<VertexId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start.to_string(), 0.0);
    parents.insert(start.to_string(), None);
    queue.push(QueueEntry::new(start.to_string(), 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if (*distance - entry.cost.0).abs() < f64::EPSILON => *distance,
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == end {
            return Ok((reconstruct_path(&parents, start, end), current_distance));
        }

        for neighbour in graph.neighbours(&entry.node) {
            let next_cost = current_distance + neighbour.weight;
            if next_cost < *distances.get(&neighbour.target).unwrap_or(&f64::INFINITY) {
                distances.insert(neighbour.target.clone(), next_cost);
                parents.insert(neighbour.target.clone(), Some(entry.node.clone()));
                queue.push(QueueEntry::new(neighbour.target.clone(), next_cost));
            }
        }
    }

    Err(Error::RouteNotFound {
        origin: start.to_string(),
        destination: end.to_string(),
    })
}

fn is_recharge(graph: &Graph, id: &str) -> bool {
    graph
        .get_vertex(id)
        .map(|vertex| vertex.role == VertexRole::Recharge)
        .unwrap_or(false)
}

fn dominated(frontier: &[ParetoPoint], cost: f64, remaining: f64) -> bool {
    frontier
        .iter()
        .any(|p| p.cost <= cost && p.remaining >= remaining)
}

fn insert_point(frontier: &mut Vec<ParetoPoint>, cost: f64, remaining: f64) {
    frontier.retain(|p| !(cost <= p.cost && remaining >= p.remaining));
    frontier.push(ParetoPoint { cost, remaining });
}

fn reconstruct_states(states: &[SearchState], goal: usize) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = goal;
    loop {
        let state = &states[current];
        path.push(state.vertex.clone());
        match state.parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

fn reconstruct_path(
    parents: &HashMap<VertexId, Option<VertexId>>,
    start: &str,
    goal: &str,
) -> Vec<VertexId> {
    let mut path = Vec::new();
    let mut current = Some(goal.to_string());
    while let Some(node) = current {
        path.push(node.clone());
        if node == start {
            break;
        }
        current = parents.get(&node).cloned().flatten();
    }
    path.reverse();
    path
}

/// Search state in the battery-constrained expansion. The same vertex can
/// appear under several battery levels, so parents index the state arena
/// rather than a vertex map.
#[derive(Clone, Debug)]
struct SearchState {
    vertex: VertexId,
    cost: f64,
    remaining: f64,
    parent: Option<usize>,
}

#[derive(Copy, Clone, Debug)]
struct ParetoPoint {
    cost: f64,
    remaining: f64,
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct StateEntry {
    state: usize,
    cost: FloatOrd,
    sequence: u64,
}

impl StateEntry {
    fn new(state: usize, cost: f64, sequence: u64) -> Self {
        Self {
            state,
            cost: FloatOrd(cost),
            sequence,
        }
    }
}

impl Ord for StateEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost; equal
        // costs pop in insertion order.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for StateEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: VertexId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: VertexId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
