use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use medusa::LayoutModel;
use medusa::algorithms::{FRConfig, FRLayout, IterativeLayout};
use medusa::graphlib::Graph;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct GraphSpec {
    node_count: usize,
    fanout: usize,
}

impl GraphSpec {
    fn build(&self) -> Graph {
        let mut g: Graph = Graph::default();

        // A spine to guarantee connectivity.
        for i in 0..self.node_count.saturating_sub(1) {
            g.set_edge(format!("n{i}"), format!("n{}", i + 1));
        }

        // Extra forward edges so the force passes have real work to do.
        for i in 0..self.node_count {
            for k in 2..=(self.fanout + 1) {
                let to = i.saturating_add(k);
                if to >= self.node_count {
                    break;
                }
                g.set_edge(format!("n{i}"), format!("n{to}"));
            }
        }

        g
    }
}

fn prepared_layout(spec: &GraphSpec, barnes_hut: bool) -> (LayoutModel, FRLayout) {
    let mut model = LayoutModel::new(Arc::new(spec.build()), 1000, 1000).unwrap();
    let mut layout = FRLayout::new(FRConfig {
        barnes_hut,
        seed: Some(42),
        ..FRConfig::default()
    });
    model.accept(&mut layout).unwrap();
    (model, layout)
}

fn bench_repulsion_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("fr_step");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("nodes_100_f3", 100usize, 3usize),
        ("nodes_500_f3", 500usize, 3usize),
        ("nodes_1000_f4", 1000usize, 4usize),
    ];

    for (name, node_count, fanout) in cases {
        let spec = GraphSpec { node_count, fanout };
        group.bench_with_input(BenchmarkId::new("brute_force", name), &spec, |b, spec| {
            b.iter_batched(
                || prepared_layout(spec, false),
                |(mut model, mut layout)| {
                    layout.step(black_box(&mut model)).unwrap();
                    black_box(model.locations().len());
                },
                BatchSize::LargeInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("barnes_hut", name), &spec, |b, spec| {
            b.iter_batched(
                || prepared_layout(spec, true),
                |(mut model, mut layout)| {
                    layout.step(black_box(&mut model)).unwrap();
                    black_box(model.locations().len());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_repulsion_pass);
criterion_main!(benches);
