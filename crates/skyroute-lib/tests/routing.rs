use skyroute_lib::{
    find_path, generate, shortest_path, AllPairsIndex, Error, Graph, NetworkConfig, RouteStrategy,
    Simulation, SimulationConfig, VertexRole,
};

fn delivery_triangle() -> Graph {
    let mut graph = Graph::new();
    graph.add_vertex("A", VertexRole::Storage);
    graph.add_vertex("B", VertexRole::Recharge);
    graph.add_vertex("C", VertexRole::Client);
    graph.add_edge("A", "B", 30.0).expect("edge A-B");
    graph.add_edge("B", "C", 30.0).expect("edge B-C");
    graph
}

fn edge_weight(graph: &Graph, u: &str, v: &str) -> f64 {
    graph
        .neighbours(u)
        .iter()
        .find(|n| n.target == v)
        .map(|n| n.weight)
        .expect("step follows an existing edge")
}

#[test]
fn recharge_stop_unlocks_the_long_route() {
    let graph = delivery_triangle();

    let (steps, cost) = find_path(&graph, "A", "C", 50.0).expect("route exists");
    assert_eq!(steps, ["A", "B", "C"]);
    assert_eq!(cost, 60.0);
}

#[test]
fn battery_below_the_first_hop_finds_nothing() {
    let graph = delivery_triangle();

    let error = find_path(&graph, "A", "C", 29.0).expect_err("no feasible route");
    assert!(matches!(error, Error::RouteNotFound { .. }));
    assert!(format!("{error}").contains("no route found"));
}

#[test]
fn prefers_the_cheaper_route_when_battery_allows() {
    let mut graph = delivery_triangle();
    graph.add_edge("A", "C", 45.0).expect("edge A-C");

    let (steps, cost) = find_path(&graph, "A", "C", 50.0).expect("route exists");
    assert_eq!(steps, ["A", "C"]);
    assert_eq!(cost, 45.0);
}

#[test]
fn keeps_costlier_but_fuller_states_alive() {
    // The direct hop reaches X cheaply but too drained for the final leg;
    // only the costlier arrival through the recharge station can finish.
    let mut graph = Graph::new();
    graph.add_vertex("S", VertexRole::Storage);
    graph.add_vertex("X", VertexRole::Client);
    graph.add_vertex("R", VertexRole::Recharge);
    graph.add_vertex("T", VertexRole::Client);
    graph.add_edge("S", "X", 40.0).expect("edge S-X");
    graph.add_edge("X", "T", 30.0).expect("edge X-T");
    graph.add_edge("S", "R", 30.0).expect("edge S-R");
    graph.add_edge("R", "X", 20.0).expect("edge R-X");

    let (steps, cost) = find_path(&graph, "S", "T", 50.0).expect("route via the recharge stop");
    assert_eq!(steps, ["S", "R", "X", "T"]);
    assert_eq!(cost, 80.0);
}

#[test]
fn start_equals_end_is_a_zero_cost_route() {
    let graph = delivery_triangle();

    let (steps, cost) = find_path(&graph, "B", "B", 50.0).expect("trivial route");
    assert_eq!(steps, ["B"]);
    assert_eq!(cost, 0.0);
}

#[test]
fn unknown_endpoints_are_rejected() {
    let graph = delivery_triangle();

    assert!(matches!(
        find_path(&graph, "A", "Z", 50.0),
        Err(Error::NodeNotFound { .. })
    ));
    assert!(matches!(
        find_path(&graph, "Z", "C", 50.0),
        Err(Error::NodeNotFound { .. })
    ));
    assert!(matches!(
        shortest_path(&graph, "Z", "C"),
        Err(Error::NodeNotFound { .. })
    ));
}

#[test]
fn constrained_paths_respect_the_battery_between_recharges() {
    let graph = generate(&NetworkConfig::seeded(24, 40, 7)).expect("network generates");
    let ids = graph.vertex_ids();
    let battery = 45.0;

    let mut feasible = 0;
    for origin in &ids {
        for destination in &ids {
            let Ok((steps, cost)) = find_path(&graph, origin, destination, battery) else {
                continue;
            };

            let mut segment = 0.0;
            let mut total = 0.0;
            for pair in steps.windows(2) {
                let weight = edge_weight(&graph, &pair[0], &pair[1]);
                segment += weight;
                total += weight;
                assert!(
                    segment <= battery + 1e-9,
                    "recharge-free run {segment} exceeds the battery"
                );
                let arrived = graph.get_vertex(&pair[1]).expect("vertex exists");
                if arrived.role == VertexRole::Recharge {
                    segment = 0.0;
                }
            }
            assert!(
                (total - cost).abs() < 1e-9,
                "reported cost {cost} differs from the edge sum {total}"
            );
            feasible += 1;
        }
    }
    assert!(feasible > 0, "expected at least one feasible pair");
}

#[test]
fn ample_battery_matches_unconstrained_costs() {
    let graph = generate(&NetworkConfig::seeded(16, 30, 11)).expect("network generates");
    let index = AllPairsIndex::build(&graph);
    let ids = graph.vertex_ids();

    for origin in &ids {
        for destination in &ids {
            let (_, constrained) =
                find_path(&graph, origin, destination, f64::MAX).expect("connected network");
            let (_, per_query) =
                shortest_path(&graph, origin, destination).expect("connected network");
            let indexed = index
                .distance(origin, destination)
                .expect("connected network");

            assert!(
                (constrained - indexed).abs() < 1e-9,
                "{origin}->{destination}: constrained {constrained} vs indexed {indexed}"
            );
            assert!(
                (per_query - indexed).abs() < 1e-9,
                "{origin}->{destination}: per-query {per_query} vs indexed {indexed}"
            );
        }
    }
}

#[test]
fn large_graphs_skip_the_index_but_still_answer() {
    let graph = generate(&NetworkConfig::seeded(20, 30, 3)).expect("network generates");
    let config = SimulationConfig {
        max_indexed_vertices: 8,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(graph, config);

    assert!(!sim.has_index(), "graph sits above the index threshold");
    let plan = sim
        .find_path("N1", "N2", RouteStrategy::Precomputed)
        .expect("route exists");
    assert_eq!(plan.strategy, RouteStrategy::Precomputed);
    assert!(plan.hop_count() >= 1);
    assert!(
        !sim.has_index(),
        "per-query fallback must not build the index"
    );
}
