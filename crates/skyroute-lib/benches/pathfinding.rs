use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use skyroute_lib::{
    find_path, generate, shortest_path, AllPairsIndex, Graph, NetworkConfig, VertexId, VertexRole,
};
use std::hint::black_box;

static NETWORK: Lazy<Graph> =
    Lazy::new(|| generate(&NetworkConfig::seeded(60, 140, 7)).expect("network generates"));
static INDEX: Lazy<AllPairsIndex> = Lazy::new(|| AllPairsIndex::build(&NETWORK));
static ENDPOINTS: Lazy<(VertexId, VertexId)> = Lazy::new(|| {
    let origin = NETWORK
        .vertices_by_role(VertexRole::Storage)
        .first()
        .expect("generated networks hold a storage")
        .id
        .clone();
    let destination = NETWORK
        .vertices_by_role(VertexRole::Client)
        .last()
        .expect("generated networks hold a client")
        .id
        .clone();
    (origin, destination)
});

/// Corridor of alternating recharge stops with costly shortcut edges that
/// strand the battery, so the search has to keep competing partial routes
/// alive all the way down the chain.
fn corridor() -> Graph {
    let mut graph = Graph::new();
    for i in 0..48 {
        let role = if i % 2 == 0 {
            VertexRole::Recharge
        } else {
            VertexRole::Client
        };
        graph.add_vertex(format!("V{i}"), role);
    }
    for i in 0..47 {
        graph
            .add_edge(&format!("V{i}"), &format!("V{}", i + 1), 20.0)
            .expect("chain edge");
    }
    for i in (0..44).step_by(2) {
        graph
            .add_edge(&format!("V{i}"), &format!("V{}", i + 3), 35.0)
            .expect("shortcut edge");
    }
    graph
}

fn benchmark_pathfinding(c: &mut Criterion) {
    let network = &*NETWORK;
    let (origin, destination) = &*ENDPOINTS;
    // No simple route can drain this budget, so the search is never cut off.
    let generous: f64 = network.edges().iter().map(|edge| edge.weight).sum();

    c.bench_function("constrained_generated_60", |b| {
        b.iter(|| {
            let (steps, cost) =
                find_path(network, origin, destination, generous).expect("route exists");
            black_box((steps.len(), cost))
        });
    });

    c.bench_function("constrained_corridor_48", |b| {
        let graph = corridor();
        b.iter(|| {
            let (steps, cost) = find_path(&graph, "V1", "V45", 50.0).expect("route exists");
            black_box((steps.len(), cost))
        });
    });

    c.bench_function("dijkstra_generated_60", |b| {
        b.iter(|| {
            let (steps, cost) =
                shortest_path(network, origin, destination).expect("route exists");
            black_box((steps.len(), cost))
        });
    });

    c.bench_function("allpairs_build_60", |b| {
        b.iter(|| black_box(AllPairsIndex::build(network).revision()));
    });

    c.bench_function("allpairs_query_60", |b| {
        let index = &*INDEX;
        b.iter(|| {
            let (steps, cost) = index.get_path(origin, destination).expect("route exists");
            black_box((steps.len(), cost))
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
