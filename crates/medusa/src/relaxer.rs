//! Drives an iterative layout to convergence.
//!
//! `prerelax` burns a bounded amount of wall time synchronously so the first
//! frame a renderer sees is already partially untangled. `Relaxer::spawn` then
//! continues on a background thread: each tick locks the shared model, runs
//! exactly one `step()`, and publishes an event on a channel. Readers take the
//! model lock between steps, so they always observe fully written coordinate
//! pairs. The stop token may be flipped from any thread at any time; the
//! model is left in a consistent state because a step never spans an unlock.
//! `join` hands the algorithm back, so a stopped relaxation can be resumed by
//! spawning a new relaxer with the same box.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::algorithms::IterativeLayout;
use crate::error::{Error, Result};
use crate::model::{LayoutModel, SharedLayoutModel};

/// Default wall-time budget for `prerelax`.
pub const PRERELAX_BUDGET: Duration = Duration::from_millis(500);

/// Default pause between background steps, yielding the model lock to readers.
pub const STEP_PACING: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// One `step()` finished; positions changed.
    Step { iteration: usize },
    /// The algorithm converged or the relaxer was stopped.
    Done { iterations: usize },
    /// A `step()` returned an error; the model holds the last good positions.
    Failed { iterations: usize, error: Error },
}

/// Step synchronously until the algorithm converges or the budget elapses.
/// Returns the number of steps taken.
pub fn prerelax(
    model: &mut LayoutModel,
    algorithm: &mut dyn IterativeLayout,
    budget: Duration,
) -> Result<usize> {
    let deadline = Instant::now() + budget;
    let mut steps = 0;
    while !algorithm.done() && Instant::now() < deadline {
        algorithm.step(model)?;
        steps += 1;
    }
    tracing::debug!(steps, "prerelax finished");
    Ok(steps)
}

pub struct Relaxer {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<Box<dyn IterativeLayout + Send>>>,
    events: Receiver<LayoutEvent>,
}

impl Relaxer {
    /// Start a background thread stepping `algorithm` against `shared`.
    ///
    /// At most one relaxer drives a model: spawning a second one on the same
    /// `SharedLayoutModel` flips the previous relaxer's stop token first.
    /// The algorithm must already have visited the model.
    pub fn spawn(
        shared: SharedLayoutModel,
        mut algorithm: Box<dyn IterativeLayout + Send>,
        pacing: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        shared.replace_active(Arc::clone(&stop));
        let (tx, events) = channel();

        let thread_stop = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            run(shared, algorithm.as_mut(), thread_stop, tx, pacing);
            algorithm
        });

        Self {
            stop,
            handle: Some(handle),
            events,
        }
    }

    /// Position-update notifications, ending with `LayoutEvent::Done`.
    pub fn events(&self) -> &Receiver<LayoutEvent> {
        &self.events
    }

    /// Request termination at the next step boundary. Safe from any thread.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    /// Block until the background thread has exited and take the algorithm
    /// back, with its state (iteration counts, caches, temperature) intact.
    /// Spawning a new relaxer with the returned box resumes stepping exactly
    /// where this one stopped; positions in the model are untouched. Returns
    /// `None` only if the background thread panicked.
    pub fn join(mut self) -> Option<Box<dyn IterativeLayout + Send>> {
        self.stop();
        self.handle.take().and_then(|handle| handle.join().ok())
    }
}

impl Drop for Relaxer {
    fn drop(&mut self) {
        self.stop();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn run(
    shared: SharedLayoutModel,
    algorithm: &mut dyn IterativeLayout,
    stop: Arc<AtomicBool>,
    tx: Sender<LayoutEvent>,
    pacing: Duration,
) {
    let mut iterations = 0usize;
    let failure = loop {
        if stop.load(Ordering::Relaxed) {
            break None;
        }
        {
            let mut model = shared.lock();
            if algorithm.done() {
                break None;
            }
            if let Err(err) = algorithm.step(&mut model) {
                tracing::error!(%err, "layout step failed, stopping relaxer");
                break Some(err);
            }
        }
        iterations += 1;
        // Receiver may be gone; keep stepping, positions still land in the model.
        let _ = tx.send(LayoutEvent::Step {
            iteration: iterations,
        });
        if algorithm.done() {
            break None;
        }
        if !pacing.is_zero() {
            std::thread::sleep(pacing);
        }
    };
    match failure {
        Some(error) => {
            let _ = tx.send(LayoutEvent::Failed { iterations, error });
        }
        None => {
            tracing::debug!(iterations, "relaxer finished");
            let _ = tx.send(LayoutEvent::Done { iterations });
        }
    }
}
