use medusa::geom::{Point, point, rect, vector};
use medusa::quadtree::{Body, QuadTree};

/// Deterministic scatter so the approximation test never flakes.
fn scatter(n: usize, width: f64, height: f64) -> Vec<Point> {
    let mut state = 0x2545_f491_4f6c_dd1d_u64;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|_| point(next() * width, next() * height))
        .collect()
}

fn bodies(points: &[Point]) -> Vec<Body> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| Body::new(format!("n{i}"), *p, 1.0))
        .collect()
}

#[test]
fn total_mass_is_conserved() {
    let points = scatter(64, 500.0, 500.0);
    let tree = QuadTree::build(bodies(&points), rect(0.0, 0.0, 500.0, 500.0));
    assert!((tree.total_mass() - 64.0).abs() < 1e-9);
}

#[test]
fn probe_never_sees_itself() {
    let tree = QuadTree::build(
        [Body::new("only", point(10.0, 10.0), 1.0)],
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let mut calls = 0;
    tree.visit("only", point(10.0, 10.0), 0.5, |_, _| calls += 1);
    assert_eq!(calls, 0);
}

#[test]
fn coincident_bodies_share_a_leaf() {
    let tree = QuadTree::build(
        [
            Body::new("a", point(30.0, 30.0), 1.0),
            Body::new("b", point(30.0, 30.0), 1.0),
            Body::new("c", point(80.0, 80.0), 1.0),
        ],
        rect(0.0, 0.0, 100.0, 100.0),
    );
    let mut seen = Vec::new();
    tree.visit("a", point(30.0, 30.0), 0.5, |p, m| seen.push((p, m)));
    // b at the same spot plus c, but never a itself.
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().any(|(p, _)| *p == point(30.0, 30.0)));
}

#[test]
fn distant_cluster_collapses_to_one_aggregate() {
    // Tight cluster in one corner, probe in the opposite corner.
    let mut all = vec![Body::new("probe", point(10.0, 10.0), 1.0)];
    for i in 0..8 {
        let p = point(900.0 + (i % 3) as f64, 900.0 + (i / 3) as f64);
        all.push(Body::new(format!("c{i}"), p, 1.0));
    }
    let tree = QuadTree::build(all, rect(0.0, 0.0, 1000.0, 1000.0));

    let mut calls = 0;
    let mut mass_seen = 0.0;
    tree.visit("probe", point(10.0, 10.0), 0.5, |_, m| {
        calls += 1;
        mass_seen += m;
    });
    assert!(calls < 8, "expected aggregation, got {calls} callbacks");
    assert!((mass_seen - 8.0).abs() < 1e-9);
}

#[test]
fn out_of_bounds_bodies_are_clamped_not_lost() {
    let tree = QuadTree::build(
        [
            Body::new("inside", point(50.0, 50.0), 1.0),
            Body::new("escaped", point(-40.0, 900.0), 1.0),
        ],
        rect(0.0, 0.0, 100.0, 100.0),
    );
    assert!((tree.total_mass() - 2.0).abs() < 1e-9);
    let mut calls = 0;
    tree.visit("inside", point(50.0, 50.0), 0.5, |_, _| calls += 1);
    assert_eq!(calls, 1);
}

#[test]
fn approximation_tracks_brute_force() {
    let width = 500.0;
    let height = 500.0;
    let points = scatter(60, width, height);
    let tree = QuadTree::build(bodies(&points), rect(0.0, 0.0, width, height));

    for (i, p) in points.iter().enumerate() {
        let mut brute = vector(0.0, 0.0);
        let mut scale = 0.0;
        for (j, other) in points.iter().enumerate() {
            if i == j {
                continue;
            }
            let delta = *p - *other;
            let dist_sq = delta.square_length().max(1e-12);
            brute += delta * (1.0 / dist_sq);
            scale += 1.0 / dist_sq.sqrt();
        }

        let mut approx = vector(0.0, 0.0);
        tree.visit(&format!("n{i}"), *p, 0.5, |other, mass| {
            let delta = *p - other;
            let dist_sq = delta.square_length().max(1e-12);
            approx += delta * (mass / dist_sq);
        });

        let err = (approx - brute).length();
        assert!(
            err <= 0.05 * scale,
            "node {i}: error {err} exceeds 5% of contribution scale {scale}"
        );
    }
}
