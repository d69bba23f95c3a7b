use thiserror::Error;

use crate::order::{OrderId, OrderStatus};

/// Convenient result alias for the skyroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a vertex id referenced by a query does not exist.
    #[error("unknown node: {id}")]
    NodeNotFound { id: String },

    /// Raised when an edge endpoint does not exist in the graph.
    #[error("edge endpoint does not exist: {id}")]
    EndpointNotFound { id: String },

    /// Raised when an edge weight is not a positive finite number.
    #[error("invalid edge weight: {weight}")]
    InvalidWeight { weight: f64 },

    /// Raised when no feasible route exists between two nodes.
    #[error("no route found between {origin} and {destination}")]
    RouteNotFound { origin: String, destination: String },

    /// Raised when an order id is not known to the simulation.
    #[error("unknown order: {id}")]
    OrderNotFound { id: OrderId },

    /// Raised when an order transition leaves a terminal state.
    #[error("order {order} cannot move from {from} to {to}")]
    InvalidStateTransition {
        order: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Raised when a precomputed index is queried after the graph changed.
    #[error("all-pairs index is stale: built at revision {index_revision}, graph is at {graph_revision}")]
    StaleIndex {
        index_revision: u64,
        graph_revision: u64,
    },
}
