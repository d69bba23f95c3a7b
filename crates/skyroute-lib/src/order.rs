use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::VertexId;

/// Identifier for an order, assigned sequentially by the simulation.
pub type OrderId = u64;

/// Lifecycle state of a delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A delivery order moving goods from an origin vertex to a client.
///
/// Orders are single-shot: `Pending` transitions exactly once, to
/// `Delivered` or `Cancelled`, and terminal orders reject every further
/// transition. State only changes through the simulation, so a failed
/// route search cannot leave an order half-delivered.
#[derive(Debug, Clone)]
pub struct Order {
    id: OrderId,
    client_id: VertexId,
    origin: VertexId,
    destination: VertexId,
    status: OrderStatus,
    cost: Option<f64>,
    created_at: DateTime<Utc>,
    delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    pub(crate) fn new(
        id: OrderId,
        client_id: VertexId,
        origin: VertexId,
        destination: VertexId,
    ) -> Self {
        Self {
            id,
            client_id,
            origin,
            destination,
            status: OrderStatus::Pending,
            cost: None,
            created_at: Utc::now(),
            delivered_at: None,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Route cost at delivery time. `None` until the order is delivered.
    pub fn cost(&self) -> Option<f64> {
        self.cost
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn delivered_at(&self) -> Option<DateTime<Utc>> {
        self.delivered_at
    }

    pub(crate) fn deliver(&mut self, cost: f64) -> Result<()> {
        self.transition(OrderStatus::Delivered)?;
        self.cost = Some(cost);
        self.delivered_at = Some(Utc::now());
        Ok(())
    }

    pub(crate) fn cancel(&mut self) -> Result<()> {
        self.transition(OrderStatus::Cancelled)
    }

    fn transition(&mut self, to: OrderStatus) -> Result<()> {
        if self.status != OrderStatus::Pending {
            return Err(Error::InvalidStateTransition {
                order: self.id,
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

/// Recipient registered at a client vertex, with its delivery tally.
#[derive(Debug, Clone)]
pub struct Client {
    id: VertexId,
    orders_delivered: u64,
}

impl Client {
    pub(crate) fn new(id: VertexId) -> Self {
        Self {
            id,
            orders_delivered: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn orders_delivered(&self) -> u64 {
        self.orders_delivered
    }

    pub(crate) fn record_delivery(&mut self) {
        self.orders_delivered += 1;
    }
}
