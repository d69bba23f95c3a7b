use std::fmt::Write;

use crate::graph::Edge;
use crate::mst::mst_total_weight;
use crate::order::Order;
use crate::sim::{RoutePlan, SimulationSummary};

/// Render a planned route as numbered plain text.
pub fn render_plan(plan: &RoutePlan) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Route: {} -> {} (cost {:.1}, {} hops, {} recharge stops, strategy: {})",
        plan.origin,
        plan.destination,
        plan.cost,
        plan.hop_count(),
        plan.recharges,
        plan.strategy
    );
    for (index, step) in plan.steps.iter().enumerate() {
        let _ = writeln!(buffer, "{index:>3}: {step}");
    }
    buffer
}

/// Render the delivery frequency ranking, most used routes first.
pub fn render_frequent_routes(routes: &[(String, u64)]) -> String {
    let mut buffer = String::new();
    if routes.is_empty() {
        let _ = writeln!(buffer, "No routes recorded yet.");
        return buffer;
    }
    let _ = writeln!(buffer, "Most frequent routes:");
    for (index, (key, count)) in routes.iter().enumerate() {
        let _ = writeln!(buffer, "{:>3}: {} ({} deliveries)", index + 1, key, count);
    }
    buffer
}

/// Render a spanning tree or forest with its total weight.
pub fn render_mst(tree: &[Edge]) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Minimum spanning tree ({} edges, total weight {:.1}):",
        tree.len(),
        mst_total_weight(tree)
    );
    for edge in tree {
        let _ = writeln!(buffer, "  {} -- {} ({:.1})", edge.u, edge.v, edge.weight);
    }
    buffer
}

/// Render the aggregate simulation counters.
pub fn render_summary(summary: &SimulationSummary) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Network: {} vertices, {} edges, {} clients",
        summary.vertices, summary.edges, summary.clients
    );
    let _ = writeln!(
        buffer,
        "Orders: {} total ({} pending, {} delivered, {} cancelled)",
        summary.orders_total,
        summary.orders_pending,
        summary.orders_delivered,
        summary.orders_cancelled
    );
    let _ = writeln!(
        buffer,
        "Distinct routes delivered: {}",
        summary.distinct_routes
    );
    buffer
}

/// Render the order book, one order per line.
pub fn render_orders(orders: &[Order]) -> String {
    let mut buffer = String::new();
    if orders.is_empty() {
        let _ = writeln!(buffer, "No orders placed.");
        return buffer;
    }
    for order in orders {
        let cost = order
            .cost()
            .map(|cost| format!(" cost {cost:.1}"))
            .unwrap_or_default();
        let _ = writeln!(
            buffer,
            "#{:<4} {} -> {} for {} [{}]{}",
            order.id(),
            order.origin(),
            order.destination(),
            order.client_id(),
            order.status(),
            cost
        );
    }
    buffer
}
