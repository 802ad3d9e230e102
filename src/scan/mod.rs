//! Sweeping the lattice over the spinning object and evaluating every cell
//! inside it on a worker pool.

mod grid;

pub use grid::{CellIndex, Grid, MAX_DIVISOR};

use log::info;

use std::num::NonZeroUsize;
use std::thread;

use crate::error::ScanError;
use crate::math::Point3;
use crate::model::Scene;
use crate::occlusion::{classify, CellFrame};
use crate::report::{Accumulator, BodyOutcome, CellOutcome};

/// Twice the available parallelism, and never fewer than two.
pub fn default_workers() -> usize {
    let available = thread::available_parallelism().map_or(1, NonZeroUsize::get);
    (2 * available).max(2)
}

/// Runs every body past one cell.
pub fn evaluate_cell(scene: &Scene, index: CellIndex, centroid: Point3) -> CellOutcome {
    let frame = CellFrame::new(scene, centroid);
    let bodies = scene
        .bodies
        .iter()
        .map(|body| {
            let contribution = classify(&scene.kernel, &frame, &body.ball);
            let pull = contribution
                .visible
                .as_ref()
                .map(|visible| scene.pull(&frame.centroid, visible));
            let magnitude = pull.as_ref().map(|pull| pull.norm_squared().sqrt());
            BodyOutcome {
                contribution,
                pull,
                magnitude,
            }
        })
        .collect();
    CellOutcome { index, bodies }
}

/// Evaluates every cell of `grid` that lies inside the object, folding the
/// results into `accumulator`. Returns once every cell is done.
pub fn run_scan(
    scene: &Scene,
    grid: &Grid,
    accumulator: &Accumulator,
    workers: usize,
) -> Result<(), ScanError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .thread_name(|i| format!("cell-worker-{}", i))
        .build()?;

    info!(
        "Scanning {} cells, {} per half edge, against {} bodies on {} workers",
        grid.candidate_count(),
        grid.steps_on_edge(),
        scene.bodies.len(),
        workers
    );

    // The scope doesn't return until every spawned cell has finished
    pool.scope(|scope| {
        for index in grid.cells() {
            let centroid = grid.centroid(&scene.kernel, index);
            if !grid.contains(&centroid) {
                accumulator.record_skipped();
                continue;
            }
            accumulator.record_dispatched();
            scope.spawn(move |_| {
                let outcome = evaluate_cell(scene, index, centroid);
                accumulator.record_cell(outcome);
            });
        }
    });

    accumulator.flush();
    Ok(())
}
