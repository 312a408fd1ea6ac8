use std::sync::Arc;

use medusa::algorithms::{FRConfig, FRLayout, IterativeLayout};
use medusa::graphlib::Graph;
use medusa::{LayoutModel, Result};

fn model(g: Graph, width: u32, height: u32) -> LayoutModel {
    LayoutModel::new(Arc::new(g), width, height).unwrap()
}

/// Two tight clusters joined by one bridge node, eleven nodes total.
fn clustered_graph() -> Graph {
    let mut g: Graph = Graph::default();
    for i in 0..5 {
        for j in (i + 1)..5 {
            g.set_edge(format!("a{i}"), format!("a{j}"));
            g.set_edge(format!("b{i}"), format!("b{j}"));
        }
    }
    g.set_edge("bridge", "a0");
    g.set_edge("bridge", "b0");
    g
}

fn run_to_convergence(m: &mut LayoutModel, layout: &mut FRLayout) -> Result<usize> {
    m.accept(layout)?;
    let mut steps = 0;
    while !layout.done() {
        layout.step(m)?;
        steps += 1;
    }
    Ok(steps)
}

#[test]
fn converges_within_the_iteration_budget() {
    let mut m = model(clustered_graph(), 400, 400);
    let mut layout = FRLayout::new(FRConfig {
        seed: Some(7),
        ..FRConfig::default()
    });
    let steps = run_to_convergence(&mut m, &mut layout).unwrap();
    assert!(steps > 0);
    assert!(steps <= 701);
    assert!(layout.temperature() < 1.0 / 400.0 || layout.iteration() > 700);
}

#[test]
fn positions_stay_inside_the_border() {
    let mut m = model(clustered_graph(), 400, 300);
    let mut layout = FRLayout::new(FRConfig {
        seed: Some(11),
        ..FRConfig::default()
    });
    m.accept(&mut layout).unwrap();

    let border = 300.0 / 50.0;
    for _ in 0..50 {
        layout.step(&mut m).unwrap();
        for v in m.nodes() {
            let p = m.get(&v);
            assert!(p.x >= border && p.x <= 400.0 - border, "x out of bounds");
            assert!(p.y >= border && p.y <= 300.0 - border, "y out of bounds");
        }
    }
}

#[test]
fn connected_nodes_end_up_closer_than_unconnected_ones() {
    let mut m = model(clustered_graph(), 600, 600);
    let mut layout = FRLayout::new(FRConfig {
        seed: Some(3),
        ..FRConfig::default()
    });
    run_to_convergence(&mut m, &mut layout).unwrap();

    // Mean distance within cluster a versus across the two clusters.
    let mut within = Vec::new();
    let mut across = Vec::new();
    for i in 0..5 {
        for j in 0..5 {
            if i < j {
                within.push((m.get(&format!("a{i}")) - m.get(&format!("a{j}"))).length());
            }
            across.push((m.get(&format!("a{i}")) - m.get(&format!("b{j}"))).length());
        }
    }
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    assert!(
        mean(&within) < mean(&across),
        "clusters did not separate: within {} across {}",
        mean(&within),
        mean(&across)
    );
}

#[test]
fn fixed_seed_is_deterministic() {
    let run = |seed| {
        let mut m = model(clustered_graph(), 400, 400);
        let mut layout = FRLayout::new(FRConfig {
            seed: Some(seed),
            ..FRConfig::default()
        });
        m.accept(&mut layout).unwrap();
        for _ in 0..10 {
            layout.step(&mut m).unwrap();
        }
        m.nodes().iter().map(|v| m.get(v)).collect::<Vec<_>>()
    };
    assert_eq!(run(42), run(42));
}

#[test]
fn locked_node_holds_its_position() {
    let mut m = model(clustered_graph(), 400, 400);
    let mut layout = FRLayout::new(FRConfig {
        seed: Some(5),
        ..FRConfig::default()
    });
    m.accept(&mut layout).unwrap();
    let pinned = m.get("bridge");
    m.lock_node("bridge", true);

    for _ in 0..20 {
        layout.step(&mut m).unwrap();
    }
    assert_eq!(m.get("bridge"), pinned);

    m.lock_node("bridge", false);
    for _ in 0..10 {
        layout.step(&mut m).unwrap();
    }
    assert_ne!(m.get("bridge"), pinned);
}

#[test]
fn barnes_hut_variant_converges_too() {
    let mut m = model(clustered_graph(), 400, 400);
    let mut layout = FRLayout::new(FRConfig {
        barnes_hut: true,
        seed: Some(13),
        ..FRConfig::default()
    });
    let steps = run_to_convergence(&mut m, &mut layout).unwrap();
    assert!(steps > 0);
    for v in m.nodes() {
        let p = m.get(&v);
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

#[test]
fn barnes_hut_tracks_the_exact_pass() {
    // Same seed, one step each: the approximate repulsion should land every
    // node within a few pixels of the exact result.
    let run = |barnes_hut| {
        let mut m = model(clustered_graph(), 400, 400);
        let mut layout = FRLayout::new(FRConfig {
            barnes_hut,
            seed: Some(21),
            ..FRConfig::default()
        });
        m.accept(&mut layout).unwrap();
        layout.step(&mut m).unwrap();
        m.nodes().iter().map(|v| m.get(v)).collect::<Vec<_>>()
    };
    let exact = run(false);
    let approx = run(true);
    for (e, a) in exact.iter().zip(&approx) {
        assert!((*e - *a).length() < 20.0);
    }
}
