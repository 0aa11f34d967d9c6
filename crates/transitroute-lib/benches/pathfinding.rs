use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use transitroute_lib::{plan_route, Graph, GraphBuilder, NodeId, RouteRequest, WeightFunction};

const GRID: usize = 40;

fn grid_id(r: usize, c: usize) -> NodeId {
    (r * 1_000 + c) as NodeId
}

static NETWORK: Lazy<Graph> = Lazy::new(|| {
    let mut builder = GraphBuilder::new();
    for r in 0..GRID {
        for c in 0..GRID {
            builder
                .add_node(grid_id(r, c), 1.30 + r as f64 * 0.001, 103.80 + c as f64 * 0.001)
                .expect("unique grid id");
        }
    }

    // ~111 m blocks; travel times at 40 km/h stay above the 50 km/h bound.
    for r in 0..GRID {
        for c in 0..GRID {
            let length = 112.0 + ((r * 31 + c * 17) % 9) as f64 * 4.0;
            let seconds = length / (40.0 / 3.6);
            if c + 1 < GRID {
                builder
                    .add_edge(grid_id(r, c), grid_id(r, c + 1), length, seconds)
                    .expect("valid edge");
                builder
                    .add_edge(grid_id(r, c + 1), grid_id(r, c), length, seconds)
                    .expect("valid edge");
            }
            if r + 1 < GRID {
                builder
                    .add_edge(grid_id(r, c), grid_id(r + 1, c), length, seconds)
                    .expect("valid edge");
                builder
                    .add_edge(grid_id(r + 1, c), grid_id(r, c), length, seconds)
                    .expect("valid edge");
            }
        }
    }
    builder.build()
});

static ASTAR_REQUEST: Lazy<RouteRequest> =
    Lazy::new(|| RouteRequest::a_star(grid_id(0, 0), grid_id(GRID - 1, GRID - 1)));
static DIJKSTRA_REQUEST: Lazy<RouteRequest> =
    Lazy::new(|| RouteRequest::dijkstra(grid_id(0, 0), grid_id(GRID - 1, GRID - 1)));
static YEN_REQUEST: Lazy<RouteRequest> = Lazy::new(|| {
    RouteRequest::a_star(grid_id(0, 0), grid_id(GRID / 2, GRID / 2))
        .with_weight(WeightFunction::CombinedWeight)
        .with_alternatives(5)
});

fn benchmark_pathfinding(c: &mut Criterion) {
    let mut graph = NETWORK.clone();

    c.bench_function("astar_grid_corner_to_corner", |b| {
        let request = &*ASTAR_REQUEST;
        b.iter(|| {
            let plan = plan_route(&mut graph, request).expect("route exists");
            black_box(plan.best().map(|route| route.cost))
        });
    });

    c.bench_function("dijkstra_grid_corner_to_corner", |b| {
        let request = &*DIJKSTRA_REQUEST;
        b.iter(|| {
            let plan = plan_route(&mut graph, request).expect("route exists");
            black_box(plan.best().map(|route| route.cost))
        });
    });

    c.bench_function("yen_grid_five_alternatives", |b| {
        let request = &*YEN_REQUEST;
        b.iter(|| {
            let plan = plan_route(&mut graph, request).expect("routes exist");
            black_box(plan.len())
        });
    });
}

criterion_group!(benches, benchmark_pathfinding);
criterion_main!(benches);
