//! Drone delivery network HTTP service.
//!
//! Wraps a [`Simulation`] behind a REST API. The whole simulation sits
//! behind one async mutex, so each logical operation (route search plus
//! order commit) is atomic at the service boundary.
//!
//! # Endpoints
//!
//! - `POST /api/v1/simulation` - Generate a network and seed random orders
//! - `GET  /api/v1/summary` - Aggregate network and order counters
//! - `POST /api/v1/route` - Plan a route between two vertices
//! - `GET  /api/v1/orders` - List the order book
//! - `GET  /api/v1/orders/{id}` - Fetch one order
//! - `POST /api/v1/orders/{id}/complete` - Deliver an order
//! - `POST /api/v1/orders/{id}/cancel` - Cancel an order
//! - `GET  /api/v1/clients` - Registered recipients and their tallies
//! - `GET  /api/v1/clients/{id}` - Fetch one recipient
//! - `GET  /api/v1/routes/frequent` - Delivery frequency ranking
//! - `GET  /api/v1/reports/visits` - Delivered origin/destination rankings
//! - `GET  /api/v1/mst` - Minimum spanning tree of the network
//! - `GET  /health/live`, `GET /health/ready` - Kubernetes probes
//!
//! # Configuration
//!
//! - `RUST_LOG` - Log level (default: info)
//! - `SERVICE_PORT` - HTTP port (default: 8080)

#![deny(warnings)]

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use skyroute_lib::{
    generate, mst_total_weight, place_random_orders, Client, Edge, Error as LibError,
    NetworkConfig, Order, OrderId, OrderStatus, RoutePlan, RouteStrategy, Simulation,
    SimulationConfig, SimulationSummary, VertexRole,
};

/// Shared service state. Empty until a simulation is generated.
#[derive(Clone, Default)]
pub struct AppState {
    sim: Arc<Mutex<Option<Simulation>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Build the service router over the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/simulation", post(create_simulation))
        .route("/api/v1/summary", get(get_summary))
        .route("/api/v1/route", post(plan_route))
        .route("/api/v1/orders", get(list_orders))
        .route("/api/v1/orders/{id}", get(get_order))
        .route("/api/v1/orders/{id}/complete", post(complete_order))
        .route("/api/v1/orders/{id}/cancel", post(cancel_order))
        .route("/api/v1/clients", get(list_clients))
        .route("/api/v1/clients/{id}", get(get_client))
        .route("/api/v1/routes/frequent", get(frequent_routes))
        .route("/api/v1/reports/visits", get(visit_reports))
        .route("/api/v1/mst", get(get_mst))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request body for `POST /api/v1/simulation`.
#[derive(Debug, Clone, Deserialize)]
struct CreateSimulationRequest {
    /// Number of vertices to generate.
    #[serde(default = "default_nodes")]
    nodes: usize,
    /// Requested number of edges.
    #[serde(default = "default_edges")]
    edges: usize,
    /// Number of random orders to seed.
    #[serde(default = "default_orders")]
    orders: usize,
    /// Seed for a reproducible network.
    #[serde(default)]
    seed: Option<u64>,
}

fn default_nodes() -> usize {
    10
}

fn default_edges() -> usize {
    15
}

fn default_orders() -> usize {
    5
}

/// Request body for `POST /api/v1/route`.
#[derive(Debug, Deserialize)]
struct RouteRequest {
    origin: String,
    destination: String,
    #[serde(default)]
    strategy: Option<RouteStrategy>,
}

/// Optional request body for `POST /api/v1/orders/{id}/complete`.
#[derive(Debug, Default, Deserialize)]
struct CompleteOrderRequest {
    #[serde(default)]
    strategy: Option<RouteStrategy>,
}

/// Order as returned to API callers. Timestamps are rendered as UTC strings.
#[derive(Debug, Serialize)]
struct OrderDto {
    id: OrderId,
    client_id: String,
    origin: String,
    destination: String,
    status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    cost: Option<f64>,
    created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delivered_at: Option<String>,
}

impl From<&Order> for OrderDto {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            client_id: order.client_id().to_string(),
            origin: order.origin().to_string(),
            destination: order.destination().to_string(),
            status: order.status(),
            cost: order.cost(),
            created_at: format_timestamp(order.created_at()),
            delivered_at: order.delivered_at().map(format_timestamp),
        }
    }
}

fn format_timestamp(timestamp: chrono::DateTime<chrono::Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Debug, Serialize)]
struct ClientDto {
    id: String,
    orders_delivered: u64,
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id().to_string(),
            orders_delivered: client.orders_delivered(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FrequentRouteDto {
    route: String,
    deliveries: u64,
}

/// Query for `GET /api/v1/reports/visits`. An absent role keeps every
/// delivered endpoint in the rankings.
#[derive(Debug, Deserialize)]
struct VisitReportQuery {
    #[serde(default)]
    role: Option<VertexRole>,
}

#[derive(Debug, Serialize)]
struct VisitCountDto {
    vertex: String,
    deliveries: u64,
}

/// Delivered-order endpoint rankings, most visited first.
#[derive(Debug, Serialize)]
struct VisitReport {
    destinations: Vec<VisitCountDto>,
    origins: Vec<VisitCountDto>,
}

impl VisitReport {
    fn counts(ranking: Vec<(String, u64)>) -> Vec<VisitCountDto> {
        ranking
            .into_iter()
            .map(|(vertex, deliveries)| VisitCountDto { vertex, deliveries })
            .collect()
    }
}

#[derive(Debug, Serialize)]
struct MstResponse {
    edge_count: usize,
    total_weight: f64,
    edges: Vec<Edge>,
}

/// Health status payload for the Kubernetes probes.
#[derive(Debug, Serialize)]
struct HealthStatus {
    status: String,
    service: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    vertices: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders: Option<usize>,
}

impl HealthStatus {
    fn alive() -> Self {
        Self {
            status: "ok".to_string(),
            service: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            vertices: None,
            orders: None,
        }
    }

    fn ready(vertices: usize, orders: usize) -> Self {
        Self {
            vertices: Some(vertices),
            orders: Some(orders),
            ..Self::alive()
        }
    }

    fn not_ready(reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            ..Self::alive()
        }
    }
}

/// JSON error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
struct ApiError {
    error: String,
    message: String,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiError {
    fn no_simulation() -> Self {
        Self {
            error: "no_simulation".to_string(),
            message: "no simulation has been generated yet".to_string(),
            status: StatusCode::CONFLICT,
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            error: "internal_error".to_string(),
            message: message.into(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<LibError> for ApiError {
    fn from(error: LibError) -> Self {
        let (kind, status) = match &error {
            LibError::NodeNotFound { .. }
            | LibError::EndpointNotFound { .. }
            | LibError::OrderNotFound { .. } => ("not_found", StatusCode::NOT_FOUND),
            LibError::InvalidWeight { .. } => ("invalid_weight", StatusCode::BAD_REQUEST),
            LibError::RouteNotFound { .. } => {
                ("route_not_found", StatusCode::UNPROCESSABLE_ENTITY)
            }
            LibError::InvalidStateTransition { .. } => {
                ("invalid_state_transition", StatusCode::CONFLICT)
            }
            LibError::StaleIndex { .. } => ("stale_index", StatusCode::INTERNAL_SERVER_ERROR),
        };
        Self {
            error: kind.to_string(),
            message: error.to_string(),
            status,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Handle `POST /api/v1/simulation`.
///
/// Generates the network and seeds random orders off the request path, then
/// swaps the finished simulation in under the lock. Replaces any previous
/// simulation.
async fn create_simulation(
    State(state): State<AppState>,
    Json(request): Json<CreateSimulationRequest>,
) -> ApiResult<(StatusCode, Json<SimulationSummary>)> {
    let config = NetworkConfig {
        nodes: request.nodes,
        edges: request.edges,
        seed: request.seed,
        ..NetworkConfig::default()
    };
    let orders = request.orders;

    let sim = tokio::task::spawn_blocking(move || -> Result<Simulation, LibError> {
        let graph = generate(&config)?;
        let mut sim = Simulation::new(graph, SimulationConfig::default());
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        place_random_orders(&mut sim, orders, &mut rng)?;
        Ok(sim)
    })
    .await
    .map_err(|join_error| {
        error!(error = %join_error, "simulation build task failed");
        ApiError::internal("simulation build task failed")
    })??;

    let summary = sim.summary();
    *state.sim.lock().await = Some(sim);

    info!(
        vertices = summary.vertices,
        edges = summary.edges,
        orders = summary.orders_total,
        "simulation generated"
    );
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Handle `GET /api/v1/summary`.
async fn get_summary(State(state): State<AppState>) -> ApiResult<Json<SimulationSummary>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    Ok(Json(sim.summary()))
}

/// Handle `POST /api/v1/route`.
async fn plan_route(
    State(state): State<AppState>,
    Json(request): Json<RouteRequest>,
) -> ApiResult<Json<RoutePlan>> {
    let strategy = request.strategy.unwrap_or_default();
    let mut guard = state.sim.lock().await;
    let sim = guard.as_mut().ok_or_else(ApiError::no_simulation)?;
    let plan = sim.find_path(&request.origin, &request.destination, strategy)?;
    Ok(Json(plan))
}

/// Handle `GET /api/v1/orders`.
async fn list_orders(State(state): State<AppState>) -> ApiResult<Json<Vec<OrderDto>>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    Ok(Json(sim.orders().iter().map(OrderDto::from).collect()))
}

/// Handle `GET /api/v1/orders/{id}`.
async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<Json<OrderDto>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    let order = sim.order(id).ok_or(LibError::OrderNotFound { id })?;
    Ok(Json(OrderDto::from(order)))
}

/// Handle `POST /api/v1/orders/{id}/complete`.
async fn complete_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    body: Option<Json<CompleteOrderRequest>>,
) -> ApiResult<Json<RoutePlan>> {
    let strategy = body
        .and_then(|Json(request)| request.strategy)
        .unwrap_or_default();
    let mut guard = state.sim.lock().await;
    let sim = guard.as_mut().ok_or_else(ApiError::no_simulation)?;
    let plan = sim.complete_order(id, strategy)?;
    Ok(Json(plan))
}

/// Handle `POST /api/v1/orders/{id}/cancel`.
async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> ApiResult<Json<OrderDto>> {
    let mut guard = state.sim.lock().await;
    let sim = guard.as_mut().ok_or_else(ApiError::no_simulation)?;
    sim.cancel_order(id)?;
    let order = sim.order(id).ok_or(LibError::OrderNotFound { id })?;
    Ok(Json(OrderDto::from(order)))
}

/// Handle `GET /api/v1/clients`.
async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<ClientDto>>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    Ok(Json(
        sim.clients().into_iter().map(ClientDto::from).collect(),
    ))
}

/// Handle `GET /api/v1/clients/{id}`.
async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<ClientDto>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    let client = sim.client(&id).ok_or(LibError::NodeNotFound { id })?;
    Ok(Json(ClientDto::from(client)))
}

/// Handle `GET /api/v1/routes/frequent`.
async fn frequent_routes(State(state): State<AppState>) -> ApiResult<Json<Vec<FrequentRouteDto>>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    let ranking = sim
        .frequent_routes()
        .into_iter()
        .map(|(route, deliveries)| FrequentRouteDto { route, deliveries })
        .collect();
    Ok(Json(ranking))
}

/// Handle `GET /api/v1/reports/visits`.
async fn visit_reports(
    State(state): State<AppState>,
    Query(query): Query<VisitReportQuery>,
) -> ApiResult<Json<VisitReport>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    Ok(Json(VisitReport {
        destinations: VisitReport::counts(sim.delivered_destination_ranking(query.role)),
        origins: VisitReport::counts(sim.delivered_origin_ranking(query.role)),
    }))
}

/// Handle `GET /api/v1/mst`.
async fn get_mst(State(state): State<AppState>) -> ApiResult<Json<MstResponse>> {
    let guard = state.sim.lock().await;
    let sim = guard.as_ref().ok_or_else(ApiError::no_simulation)?;
    let edges = sim.mst();
    Ok(Json(MstResponse {
        edge_count: edges.len(),
        total_weight: mst_total_weight(&edges),
        edges,
    }))
}

/// Liveness probe. Returns 200 whenever the process is serving.
async fn health_live() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::alive()))
}

/// Readiness probe. Ready once a simulation has been generated.
async fn health_ready(State(state): State<AppState>) -> Response {
    let guard = state.sim.lock().await;
    match guard.as_ref() {
        Some(sim) => {
            let summary = sim.summary();
            let status = HealthStatus::ready(summary.vertices, summary.orders_total);
            (StatusCode::OK, Json(status)).into_response()
        }
        None => {
            let status = HealthStatus::not_ready("no simulation generated");
            (StatusCode::SERVICE_UNAVAILABLE, Json(status)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::{json, Value};

    fn server() -> TestServer {
        TestServer::new(build_router(AppState::new())).expect("test server starts")
    }

    /// 12 vertices with ratios 0.2/0.2 split into 2 storages, 2 recharge
    /// stops, and 8 clients; 4 seeded orders get ids 1 through 4.
    async fn server_with_simulation() -> TestServer {
        let server = server();
        let response = server
            .post("/api/v1/simulation")
            .json(&json!({"nodes": 12, "edges": 20, "orders": 4, "seed": 7}))
            .await;
        response.assert_status(StatusCode::CREATED);
        server
    }

    #[tokio::test]
    async fn test_ready_only_after_generation() {
        let server = server();

        server.get("/health/live").await.assert_status_ok();
        server
            .get("/health/ready")
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);

        let response = server
            .post("/api/v1/simulation")
            .json(&json!({"nodes": 10, "edges": 15, "orders": 2, "seed": 1}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        let body: Value = ready.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["vertices"], 10);
    }

    #[tokio::test]
    async fn test_create_simulation_returns_the_summary() {
        let server = server();
        let response = server
            .post("/api/v1/simulation")
            .json(&json!({"nodes": 12, "edges": 20, "orders": 4, "seed": 7}))
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["vertices"], 12);
        assert_eq!(body["edges"], 20);
        assert_eq!(body["clients"], 8);
        assert_eq!(body["orders_total"], 4);
        assert_eq!(body["orders_pending"], 4);
    }

    #[tokio::test]
    async fn test_queries_require_a_simulation() {
        let server = server();

        let response = server.get("/api/v1/summary").await;
        response.assert_status(StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], "no_simulation");

        server
            .post("/api/v1/route")
            .json(&json!({"origin": "N1", "destination": "N2"}))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_route_returns_a_plan() {
        let server = server_with_simulation().await;

        let response = server
            .post("/api/v1/route")
            .json(&json!({
                "origin": "N1",
                "destination": "N5",
                "strategy": "precomputed"
            }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["origin"], "N1");
        assert_eq!(body["destination"], "N5");
        assert_eq!(body["strategy"], "precomputed");
        assert_eq!(body["steps"][0], "N1");
        assert!(body["cost"].as_f64().expect("cost is a number") > 0.0);
    }

    #[tokio::test]
    async fn test_unknown_vertex_is_not_found() {
        let server = server_with_simulation().await;

        let response = server
            .post("/api/v1/route")
            .json(&json!({"origin": "N1", "destination": "Z9"}))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);

        let body: Value = response.json();
        assert_eq!(body["error"], "not_found");
        assert!(body["message"]
            .as_str()
            .expect("message is a string")
            .contains("Z9"));
    }

    #[tokio::test]
    async fn test_complete_twice_conflicts() {
        let server = server_with_simulation().await;

        let first = server
            .post("/api/v1/orders/1/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await;
        first.assert_status_ok();
        let plan: Value = first.json();
        assert!(plan["cost"].as_f64().expect("cost is a number") > 0.0);

        let second = server
            .post("/api/v1/orders/1/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await;
        second.assert_status(StatusCode::CONFLICT);
        let body: Value = second.json();
        assert_eq!(body["error"], "invalid_state_transition");
    }

    #[tokio::test]
    async fn test_cancelled_orders_reject_completion() {
        let server = server_with_simulation().await;

        let cancel = server.post("/api/v1/orders/2/cancel").await;
        cancel.assert_status_ok();
        let body: Value = cancel.json();
        assert_eq!(body["status"], "cancelled");

        server
            .post("/api/v1/orders/2/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_orders_are_not_found() {
        let server = server_with_simulation().await;

        server
            .get("/api/v1/orders/99")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .post("/api/v1/orders/99/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_orders_list_the_seeded_book() {
        let server = server_with_simulation().await;

        let response = server.get("/api/v1/orders").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let orders = body.as_array().expect("orders is an array");
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0]["id"], 1);
        assert_eq!(orders[0]["status"], "pending");
        assert!(orders[0]["created_at"].is_string());

        let one = server.get("/api/v1/orders/3").await;
        one.assert_status_ok();
        let order: Value = one.json();
        assert_eq!(order["id"], 3);
    }

    #[tokio::test]
    async fn test_delivery_feeds_the_frequency_ranking() {
        let server = server_with_simulation().await;

        server
            .post("/api/v1/orders/1/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await
            .assert_status_ok();

        let response = server.get("/api/v1/routes/frequent").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let routes = body.as_array().expect("ranking is an array");
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0]["deliveries"], 1);

        let summary: Value = server.get("/api/v1/summary").await.json();
        assert_eq!(summary["orders_delivered"], 1);
        assert_eq!(summary["distinct_routes"], 1);
    }

    #[tokio::test]
    async fn test_clients_report_their_tallies() {
        let server = server_with_simulation().await;

        let response = server.get("/api/v1/clients").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let clients = body.as_array().expect("clients is an array");
        assert_eq!(clients.len(), 8);
        assert_eq!(clients[0]["orders_delivered"], 0);
    }

    #[tokio::test]
    async fn test_client_lookup_reports_the_delivery_tally() {
        let server = server_with_simulation().await;

        server
            .post("/api/v1/orders/1/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await
            .assert_status_ok();

        let order: Value = server.get("/api/v1/orders/1").await.json();
        let client_id = order["client_id"]
            .as_str()
            .expect("client id is a string")
            .to_string();

        let response = server.get(&format!("/api/v1/clients/{client_id}")).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["id"], client_id.as_str());
        assert_eq!(body["orders_delivered"], 1);

        server
            .get("/api/v1/clients/Z9")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_visit_reports_rank_delivered_endpoints() {
        let server = server_with_simulation().await;

        server
            .post("/api/v1/orders/1/complete")
            .json(&json!({"strategy": "precomputed"}))
            .await
            .assert_status_ok();

        let response = server.get("/api/v1/reports/visits").await;
        response.assert_status_ok();
        let body: Value = response.json();
        let destinations = body["destinations"]
            .as_array()
            .expect("destinations is an array");
        assert_eq!(destinations.len(), 1);
        assert_eq!(destinations[0]["deliveries"], 1);
        let origins = body["origins"].as_array().expect("origins is an array");
        assert_eq!(origins.len(), 1);
        assert_eq!(origins[0]["deliveries"], 1);

        // Orders ship from storages to clients, so the role filter keeps
        // exactly one side of each ranking.
        let clients: Value = server
            .get("/api/v1/reports/visits?role=client")
            .await
            .json();
        assert_eq!(clients["destinations"], body["destinations"]);
        assert_eq!(clients["origins"], json!([]));

        let storages: Value = server
            .get("/api/v1/reports/visits?role=storage")
            .await
            .json();
        assert_eq!(storages["origins"], body["origins"]);
        assert_eq!(storages["destinations"], json!([]));
    }

    #[tokio::test]
    async fn test_mst_spans_the_network() {
        let server = server_with_simulation().await;

        let response = server.get("/api/v1/mst").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["edge_count"], 11);
        assert!(body["total_weight"].as_f64().expect("weight is a number") > 0.0);
        assert_eq!(
            body["edges"].as_array().expect("edges is an array").len(),
            11
        );
    }
}
