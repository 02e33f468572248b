// Performance benchmarks for graph construction and shortest-path queries
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopgraph_core::{EdgeRecord, Graph, GraphConfig, NodeRecord, SimulationData};
use hopgraph_world::{World, WorldConfig};
use rand::prelude::*;

fn generate_records(nodes: usize, degree: usize, seed: u64) -> (Vec<NodeRecord>, Vec<EdgeRecord>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let node_records = (0..nodes).map(|i| NodeRecord::new(format!("n{}", i))).collect();
    let edge_records = (0..nodes * degree)
        .map(|i| {
            let record = EdgeRecord::new(
                format!("e{}", i),
                format!("n{}", i / degree),
                format!("n{}", rng.random_range(0..nodes)),
            )
            .with_distance(rng.random_range(1.0..100.0));
            if i % 2 == 0 {
                record.with_pdf(vec![10.0, 4.0])
            } else {
                record
            }
        })
        .collect();
    (node_records, edge_records)
}

fn build_graph(nodes: usize, degree: usize) -> Graph {
    let (node_records, edge_records) = generate_records(nodes, degree, 42);
    Graph::from_records(GraphConfig::default().with_seed(42), node_records, edge_records).unwrap()
}

fn benchmark_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");

    for size in [100, 1000, 10000].iter() {
        let (node_records, edge_records) = generate_records(*size, 4, 42);
        group.bench_with_input(BenchmarkId::new("from_records", size), size, |b, _| {
            b.iter(|| {
                let graph = Graph::from_records(
                    GraphConfig::default().with_seed(42),
                    node_records.clone(),
                    edge_records.clone(),
                )
                .unwrap();
                black_box(graph);
            });
        });
    }

    group.finish();
}

fn benchmark_shortest_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("shortest_path");

    for size in [100, 1000, 10000].iter() {
        let mut graph = build_graph(*size, 4);
        let src = graph.node_id("n0").unwrap();
        let dst = graph.node_id(&format!("n{}", size - 1)).unwrap();

        group.bench_with_input(BenchmarkId::new("as_list", size), size, |b, _| {
            b.iter(|| {
                let path = graph.shortest_path_as_list(black_box(src), black_box(dst)).unwrap();
                black_box(path);
            });
        });
    }

    group.finish();
}

fn benchmark_simulation_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulation_step");

    let graph = build_graph(1000, 4);
    let mut world = World::new(graph, WorldConfig::default());
    world.randomize_participants(50).unwrap();
    let mut data = SimulationData::new();

    group.bench_function("step_50_participants", |b| {
        b.iter(|| {
            let moved = world.step(&mut data).unwrap();
            black_box(moved);
        });
    });

    group.bench_function("random_node", |b| {
        b.iter(|| black_box(world.graph_mut().random_node().unwrap()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_construction, benchmark_shortest_path, benchmark_simulation_step);
criterion_main!(benches);
