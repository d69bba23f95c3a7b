//! Skyroute library entry points.
//!
//! This crate models an autonomous drone delivery network: a role-typed
//! weighted graph, a battery-constrained shortest-path search, an all-pairs
//! distance index, a minimum-spanning-tree analyzer, a route usage ledger,
//! and the order lifecycle simulation that drives them. Higher-level
//! consumers (CLI, HTTP service) should only depend on the items exported
//! here instead of reimplementing behavior.

#![deny(warnings)]

pub mod allpairs;
pub mod error;
pub mod generator;
pub mod graph;
pub mod ledger;
pub mod mst;
pub mod order;
pub mod output;
pub mod path;
pub mod sim;

pub use allpairs::AllPairsIndex;
pub use error::{Error, Result};
pub use generator::{generate, place_random_orders, NetworkConfig};
pub use graph::{Edge, GeoPoint, Graph, Vertex, VertexId, VertexRole};
pub use ledger::{route_key, RouteLedger};
pub use mst::{find_mst, mst_total_weight};
pub use order::{Client, Order, OrderId, OrderStatus};
pub use path::{find_path, shortest_path};
pub use sim::{RoutePlan, RouteStrategy, Simulation, SimulationConfig, SimulationSummary};
