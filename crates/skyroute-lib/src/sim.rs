//! Delivery simulation tying the network together.
//!
//! [`Simulation`] owns the graph, the precomputed index, the route ledger,
//! and the order book, and is the only writer to any of them. Callers that
//! need shared access wrap the whole simulation behind their own lock; the
//! core stays free of interior locking.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::allpairs::AllPairsIndex;
use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, VertexId, VertexRole};
use crate::ledger::{route_key, RouteLedger};
use crate::mst::find_mst;
use crate::order::{Client, Order, OrderId, OrderStatus};
use crate::path;

/// Strategy used to answer a route query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStrategy {
    /// Battery-aware search over the live graph.
    #[default]
    Constrained,
    /// Unconstrained answer from the all-pairs index.
    Precomputed,
}

impl fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RouteStrategy::Constrained => "constrained",
            RouteStrategy::Precomputed => "precomputed",
        };
        f.write_str(value)
    }
}

/// Planned route returned by the simulation.
#[derive(Debug, Clone, Serialize)]
pub struct RoutePlan {
    pub strategy: RouteStrategy,
    pub origin: VertexId,
    pub destination: VertexId,
    pub steps: Vec<VertexId>,
    pub cost: f64,
    /// Recharge stops strictly between the endpoints.
    pub recharges: usize,
}

impl RoutePlan {
    /// Number of hops in the route.
    pub fn hop_count(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}

/// Tuning knobs for the simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Battery budget applied to constrained searches.
    pub battery_limit: f64,
    /// Largest vertex count for which the all-pairs index is built. Bigger
    /// graphs answer precomputed queries with a per-query search, trading
    /// the O(V³) build for predictable latency.
    pub max_indexed_vertices: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            battery_limit: 50.0,
            max_indexed_vertices: 512,
        }
    }
}

/// Aggregate counters over the network and order book.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationSummary {
    pub vertices: usize,
    pub edges: usize,
    pub clients: usize,
    pub orders_total: usize,
    pub orders_pending: usize,
    pub orders_delivered: usize,
    pub orders_cancelled: usize,
    pub distinct_routes: usize,
}

/// The delivery network simulation.
#[derive(Debug)]
pub struct Simulation {
    graph: Graph,
    config: SimulationConfig,
    index: Option<AllPairsIndex>,
    ledger: RouteLedger,
    orders: Vec<Order>,
    clients: BTreeMap<VertexId, Client>,
    next_order_id: OrderId,
}

impl Simulation {
    /// Wrap a graph in a fresh simulation. Every client-role vertex is
    /// registered as a recipient, and the all-pairs index is built eagerly
    /// when the graph is small enough.
    pub fn new(graph: Graph, config: SimulationConfig) -> Self {
        let clients: BTreeMap<VertexId, Client> = graph
            .vertices_by_role(VertexRole::Client)
            .into_iter()
            .map(|vertex| (vertex.id.clone(), Client::new(vertex.id.clone())))
            .collect();

        let mut sim = Self {
            graph,
            config,
            index: None,
            ledger: RouteLedger::new(),
            orders: Vec::new(),
            clients,
            next_order_id: 1,
        };
        sim.index = sim.build_index();
        sim
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Add a vertex to the network. Client vertices are registered as
    /// recipients immediately.
    pub fn add_vertex(&mut self, id: impl Into<VertexId>, role: VertexRole) {
        let id = id.into();
        let before = self.graph.revision();
        self.graph.add_vertex(id.clone(), role);
        if role == VertexRole::Client {
            self.clients
                .entry(id.clone())
                .or_insert_with(|| Client::new(id));
        }
        if self.graph.revision() != before {
            self.invalidate_index();
        }
    }

    /// Add an edge to the network, dropping the index when the graph
    /// actually changed.
    pub fn add_edge(&mut self, u: &str, v: &str, weight: f64) -> Result<()> {
        let before = self.graph.revision();
        self.graph.add_edge(u, v, weight)?;
        if self.graph.revision() != before {
            self.invalidate_index();
        }
        Ok(())
    }

    /// Plan a route with the requested strategy without touching any order.
    pub fn find_path(
        &mut self,
        origin: &str,
        destination: &str,
        strategy: RouteStrategy,
    ) -> Result<RoutePlan> {
        let (steps, cost) = match strategy {
            RouteStrategy::Constrained => path::find_path(
                &self.graph,
                origin,
                destination,
                self.config.battery_limit,
            )?,
            RouteStrategy::Precomputed => self.precomputed_path(origin, destination)?,
        };

        let recharges = self.count_recharges(&steps);
        Ok(RoutePlan {
            strategy,
            origin: origin.to_string(),
            destination: destination.to_string(),
            steps,
            cost,
            recharges,
        })
    }

    /// Register a pending order for a client. The endpoints must exist and
    /// the client must be a registered recipient.
    pub fn place_order(
        &mut self,
        client_id: &str,
        origin: &str,
        destination: &str,
    ) -> Result<OrderId> {
        if !self.clients.contains_key(client_id) {
            return Err(Error::NodeNotFound {
                id: client_id.to_string(),
            });
        }
        if !self.graph.contains_vertex(origin) {
            return Err(Error::NodeNotFound {
                id: origin.to_string(),
            });
        }
        if !self.graph.contains_vertex(destination) {
            return Err(Error::NodeNotFound {
                id: destination.to_string(),
            });
        }

        let id = self.next_order_id;
        self.next_order_id += 1;
        self.orders.push(Order::new(
            id,
            client_id.to_string(),
            origin.to_string(),
            destination.to_string(),
        ));
        debug!(order = id, client = client_id, origin, destination, "order placed");
        Ok(id)
    }

    /// Deliver an order: plan its route, then commit the delivery.
    ///
    /// The search runs before any state changes, so a failed search leaves
    /// the order pending and the ledger and client tallies untouched.
    pub fn complete_order(&mut self, id: OrderId, strategy: RouteStrategy) -> Result<RoutePlan> {
        let (client_id, origin, destination) = {
            let order = self.order(id).ok_or(Error::OrderNotFound { id })?;
            if order.status() != OrderStatus::Pending {
                return Err(Error::InvalidStateTransition {
                    order: id,
                    from: order.status(),
                    to: OrderStatus::Delivered,
                });
            }
            (
                order.client_id().to_string(),
                order.origin().to_string(),
                order.destination().to_string(),
            )
        };

        let plan = self.find_path(&origin, &destination, strategy)?;

        let Some(order) = self.order_mut(id) else {
            return Err(Error::OrderNotFound { id });
        };
        order.deliver(plan.cost)?;
        self.ledger.record(route_key(&plan.steps));
        if let Some(client) = self.clients.get_mut(&client_id) {
            client.record_delivery();
        }

        info!(
            order = id,
            cost = plan.cost,
            hops = plan.hop_count(),
            recharges = plan.recharges,
            "order delivered"
        );
        Ok(plan)
    }

    /// Cancel a pending order.
    pub fn cancel_order(&mut self, id: OrderId) -> Result<()> {
        let Some(order) = self.order_mut(id) else {
            return Err(Error::OrderNotFound { id });
        };
        order.cancel()?;
        debug!(order = id, "order cancelled");
        Ok(())
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        let index = id.checked_sub(1)?;
        self.orders.get(usize::try_from(index).ok()?)
    }

    /// Every order placed so far, in id order.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    /// Registered recipients, in id order.
    pub fn clients(&self) -> Vec<&Client> {
        self.clients.values().collect()
    }

    /// Routes ranked by delivery frequency, most used first.
    pub fn frequent_routes(&self) -> Vec<(String, u64)> {
        self.ledger.frequent_routes()
    }

    /// Minimum spanning tree of the current network.
    pub fn mst(&self) -> Vec<Edge> {
        find_mst(&self.graph)
    }

    /// Aggregate counters over the network and order book.
    pub fn summary(&self) -> SimulationSummary {
        let mut pending = 0;
        let mut delivered = 0;
        let mut cancelled = 0;
        for order in &self.orders {
            match order.status() {
                OrderStatus::Pending => pending += 1,
                OrderStatus::Delivered => delivered += 1,
                OrderStatus::Cancelled => cancelled += 1,
            }
        }

        SimulationSummary {
            vertices: self.graph.vertex_count(),
            edges: self.graph.edge_count(),
            clients: self.clients.len(),
            orders_total: self.orders.len(),
            orders_pending: pending,
            orders_delivered: delivered,
            orders_cancelled: cancelled,
            distinct_routes: self.ledger.len(),
        }
    }

    /// Destinations of delivered orders ranked by visits, optionally
    /// filtered by role. Ties keep id order.
    pub fn delivered_destination_ranking(&self, role: Option<VertexRole>) -> Vec<(VertexId, u64)> {
        self.delivery_ranking(role, |order| order.destination())
    }

    /// Origins of delivered orders ranked by visits, optionally filtered by
    /// role.
    pub fn delivered_origin_ranking(&self, role: Option<VertexRole>) -> Vec<(VertexId, u64)> {
        self.delivery_ranking(role, |order| order.origin())
    }

    /// Rebuild the all-pairs index from the current graph, subject to the
    /// vertex-count threshold.
    pub fn rebuild_index(&mut self) {
        self.index = self.build_index();
    }

    /// Drop the index after a graph mutation; the next precomputed query
    /// rebuilds it.
    fn invalidate_index(&mut self) {
        self.index = None;
    }

    /// Whether an all-pairs index is currently held.
    pub fn has_index(&self) -> bool {
        self.index.is_some()
    }

    fn delivery_ranking(
        &self,
        role: Option<VertexRole>,
        pick: impl Fn(&Order) -> &str,
    ) -> Vec<(VertexId, u64)> {
        let mut counts: BTreeMap<VertexId, u64> = BTreeMap::new();
        for order in self
            .orders
            .iter()
            .filter(|order| order.status() == OrderStatus::Delivered)
        {
            let id = pick(order);
            let role_matches = match role {
                None => true,
                Some(role) => self
                    .graph
                    .get_vertex(id)
                    .map(|vertex| vertex.role == role)
                    .unwrap_or(false),
            };
            if role_matches {
                *counts.entry(id.to_string()).or_default() += 1;
            }
        }

        let mut ranked: Vec<(VertexId, u64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    fn precomputed_path(&mut self, origin: &str, destination: &str) -> Result<(Vec<VertexId>, f64)> {
        if self.graph.vertex_count() > self.config.max_indexed_vertices {
            return path::shortest_path(&self.graph, origin, destination);
        }

        let stale = match &self.index {
            Some(index) => !index.is_current(&self.graph),
            None => true,
        };
        if stale {
            debug!(
                vertices = self.graph.vertex_count(),
                revision = self.graph.revision(),
                "rebuilding the all-pairs index"
            );
            self.index = Some(AllPairsIndex::build(&self.graph));
        }

        match &self.index {
            Some(index) => index.get_path(origin, destination),
            None => path::shortest_path(&self.graph, origin, destination),
        }
    }

    fn build_index(&self) -> Option<AllPairsIndex> {
        if self.graph.vertex_count() > self.config.max_indexed_vertices {
            debug!(
                vertices = self.graph.vertex_count(),
                threshold = self.config.max_indexed_vertices,
                "graph too large for the all-pairs index, using per-query searches"
            );
            return None;
        }
        Some(AllPairsIndex::build(&self.graph))
    }

    fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        let index = id.checked_sub(1)?;
        self.orders.get_mut(usize::try_from(index).ok()?)
    }

    fn count_recharges(&self, steps: &[VertexId]) -> usize {
        if steps.len() < 3 {
            return 0;
        }
        steps[1..steps.len() - 1]
            .iter()
            .filter(|id| {
                self.graph
                    .get_vertex(id)
                    .map(|vertex| vertex.role == VertexRole::Recharge)
                    .unwrap_or(false)
            })
            .count()
    }
}
