use std::sync::Arc;
use std::time::Duration;

use medusa::algorithms::{
    FRConfig, FRLayout, ISOMConfig, ISOMLayout, IterativeLayout, LayoutAlgorithm, SpringConfig,
    SpringLayout,
};
use medusa::graphlib::Graph;
use medusa::{Error, LayoutEvent, LayoutModel, Relaxer, Result, SharedLayoutModel, prerelax};

fn small_graph() -> Graph {
    let mut g: Graph = Graph::default();
    g.set_path(&["a", "b", "c", "d"]);
    g.set_edge("b", "d");
    g
}

fn shared_model() -> SharedLayoutModel {
    let model = LayoutModel::new(Arc::new(small_graph()), 400, 400).unwrap();
    SharedLayoutModel::new(model)
}

fn wait_for_done(relaxer: &Relaxer) -> usize {
    loop {
        match relaxer
            .events()
            .recv_timeout(Duration::from_secs(10))
            .expect("relaxer went silent")
        {
            LayoutEvent::Done { iterations } => return iterations,
            LayoutEvent::Step { .. } => {}
            LayoutEvent::Failed { error, .. } => panic!("relaxer failed: {error}"),
        }
    }
}

#[test]
fn prerelax_steps_until_convergence() {
    let mut model = LayoutModel::new(Arc::new(small_graph()), 400, 400).unwrap();
    let mut layout = FRLayout::new(FRConfig {
        max_iterations: 50,
        seed: Some(1),
        ..FRConfig::default()
    });
    model.accept(&mut layout).unwrap();

    let steps = prerelax(&mut model, &mut layout, Duration::from_secs(5)).unwrap();
    assert!(steps > 0);
    assert!(steps <= 51);
}

#[test]
fn background_relaxer_reports_done() {
    let shared = shared_model();
    let mut layout = ISOMLayout::new(ISOMConfig {
        max_epochs: 30,
        seed: Some(2),
        ..ISOMConfig::default()
    });
    shared.lock().accept(&mut layout).unwrap();

    let relaxer = Relaxer::spawn(shared.clone(), Box::new(layout), Duration::ZERO);
    let iterations = wait_for_done(&relaxer);
    assert_eq!(iterations, 30);

    let model = shared.lock();
    for v in model.nodes() {
        let p = model.get(&v);
        assert!(p.x.is_finite() && p.y.is_finite());
    }
    relaxer.join();
}

#[test]
fn stop_halts_an_endless_algorithm() {
    let shared = shared_model();
    let mut layout = SpringLayout::new(SpringConfig {
        seed: Some(3),
        ..SpringConfig::default()
    });
    shared.lock().accept(&mut layout).unwrap();

    let relaxer = Relaxer::spawn(shared.clone(), Box::new(layout), Duration::from_millis(1));
    // Let it make some progress first.
    for _ in 0..3 {
        relaxer
            .events()
            .recv_timeout(Duration::from_secs(10))
            .expect("no step events");
    }
    relaxer.stop();
    assert!(relaxer.is_stopped());
    let iterations = wait_for_done(&relaxer);
    assert!(iterations >= 3);
    relaxer.join();
}

#[test]
fn readers_see_consistent_positions_mid_flight() {
    let shared = shared_model();
    let mut layout = SpringLayout::new(SpringConfig {
        seed: Some(4),
        ..SpringConfig::default()
    });
    shared.lock().accept(&mut layout).unwrap();

    let relaxer = Relaxer::spawn(shared.clone(), Box::new(layout), Duration::ZERO);
    for _ in 0..50 {
        let p = shared.get("a");
        assert!(p.x.is_finite() && p.y.is_finite());
        assert!((0.0..=400.0).contains(&p.x) && (0.0..=400.0).contains(&p.y));
    }
    relaxer.join();
}

#[test]
fn join_hands_the_algorithm_back_for_resumption() {
    let shared = shared_model();
    let mut layout = ISOMLayout::new(ISOMConfig {
        max_epochs: 30,
        seed: Some(8),
        ..ISOMConfig::default()
    });
    shared.lock().accept(&mut layout).unwrap();

    let first = Relaxer::spawn(shared.clone(), Box::new(layout), Duration::from_millis(1));
    for _ in 0..3 {
        first
            .events()
            .recv_timeout(Duration::from_secs(10))
            .expect("no step events");
    }
    first.stop();
    let first_iterations = wait_for_done(&first);
    let algorithm = first.join().expect("relaxer thread panicked");

    // The recovered box still carries the epoch counter, so the second run
    // picks up the remaining budget instead of starting a fresh relaxation.
    let second = Relaxer::spawn(shared.clone(), algorithm, Duration::ZERO);
    let second_iterations = wait_for_done(&second);
    assert_eq!(first_iterations + second_iterations, 30);

    let model = shared.lock();
    for v in model.nodes() {
        let p = model.get(&v);
        assert!(p.x.is_finite() && p.y.is_finite());
    }
}

struct ExplodingLayout {
    steps_before_failure: usize,
    steps: usize,
}

impl LayoutAlgorithm for ExplodingLayout {
    fn visit(&mut self, _model: &mut LayoutModel) -> Result<()> {
        Ok(())
    }
}

impl IterativeLayout for ExplodingLayout {
    fn step(&mut self, _model: &mut LayoutModel) -> Result<()> {
        self.steps += 1;
        if self.steps > self.steps_before_failure {
            return Err(Error::NonFiniteCoordinate {
                node: "a".to_string(),
                x: f64::NAN,
                y: f64::NAN,
            });
        }
        Ok(())
    }

    fn done(&self) -> bool {
        false
    }
}

#[test]
fn a_failing_step_surfaces_as_failed_not_done() {
    let shared = shared_model();
    let layout = ExplodingLayout {
        steps_before_failure: 2,
        steps: 0,
    };
    let relaxer = Relaxer::spawn(shared, Box::new(layout), Duration::ZERO);

    loop {
        match relaxer
            .events()
            .recv_timeout(Duration::from_secs(10))
            .expect("relaxer went silent")
        {
            LayoutEvent::Step { .. } => {}
            LayoutEvent::Done { .. } => panic!("failure reported as convergence"),
            LayoutEvent::Failed { iterations, error } => {
                assert_eq!(iterations, 2);
                assert!(matches!(error, Error::NonFiniteCoordinate { .. }));
                break;
            }
        }
    }
    relaxer.join();
}

#[test]
fn spawning_a_second_relaxer_stops_the_first() {
    let shared = shared_model();

    let mut first_algo = SpringLayout::new(SpringConfig {
        seed: Some(5),
        ..SpringConfig::default()
    });
    shared.lock().accept(&mut first_algo).unwrap();
    let first = Relaxer::spawn(shared.clone(), Box::new(first_algo), Duration::from_millis(1));

    let mut second_algo = SpringLayout::new(SpringConfig {
        seed: Some(6),
        ..SpringConfig::default()
    });
    shared.lock().accept(&mut second_algo).unwrap();
    let second = Relaxer::spawn(shared.clone(), Box::new(second_algo), Duration::from_millis(1));

    // The first relaxer's stop token was flipped by the handover; it must wind
    // down on its own without an explicit stop().
    wait_for_done(&first);
    assert!(first.is_stopped());

    second.stop();
    second.join();
    first.join();
}
