use std::io::Write;
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};

use crate::math::{Point3, Real};
use crate::model::Scene;
use crate::occlusion::{format_trace, Contribution, PathTally};
use crate::scan::{CellIndex, Grid};

use super::sample::{tint, Sample, SampleSink};
use super::summary::Summary;

// Progress is logged every this many cells, and the running mean less often
const PROGRESS_EVERY: u64 = 100;
const MEAN_EVERY: u64 = 500;

/// What one body did to one cell.
#[derive(Debug, Clone)]
pub struct BodyOutcome {
    pub contribution: Contribution,
    /// The pull of the visible part, if any.
    pub pull: Option<Point3>,
    pub magnitude: Option<Real>,
}

/// Everything a finished cell reports, one entry per body in scene order.
#[derive(Debug, Clone)]
pub struct CellOutcome {
    pub index: CellIndex,
    pub bodies: Vec<BodyOutcome>,
}

/// Running sums over all finished cells.
#[derive(Debug, Clone)]
pub struct Totals {
    pub aggregate: Point3,
    pub per_body: Vec<Point3>,
    pub included_mass: Vec<Real>,
    pub paths: PathTally,
    /// Cells seen, whether skipped or evaluated
    pub done: u64,
    /// Cells inside the object, handed out for evaluation
    pub taken: u64,
    /// Evaluated cells
    pub completed: u64,
}

struct State {
    totals: Totals,
    debug_log: Option<Box<dyn Write + Send>>,
}

/// Collects cell results from all workers.
///
/// Each finished cell is folded in under a single lock, so the vector sums
/// never see a partial update.
pub struct Accumulator {
    state: Mutex<State>,
    body_names: Vec<String>,
    newton_magnitudes: Vec<Real>,
    candidates: u64,
    steps_on_edge: i64,
    workers: usize,
    sink: Box<dyn SampleSink>,
}

impl Accumulator {
    pub fn new(scene: &Scene, grid: &Grid, workers: usize, sink: Box<dyn SampleSink>) -> Self {
        let k = &scene.kernel;
        let bodies = scene.bodies.len();
        let totals = Totals {
            aggregate: Point3::origin(k),
            per_body: vec![Point3::origin(k); bodies],
            included_mass: vec![k.zero(); bodies],
            paths: PathTally::new(),
            done: 0,
            taken: 0,
            completed: 0,
        };
        Self {
            state: Mutex::new(State {
                totals,
                debug_log: None,
            }),
            body_names: scene.bodies.iter().map(|body| body.name.clone()).collect(),
            newton_magnitudes: scene.newtonian().magnitudes,
            candidates: grid.candidate_count(),
            steps_on_edge: grid.steps_on_edge(),
            workers,
            sink,
        }
    }

    /// Also writes one line per finished cell to `log`.
    pub fn with_debug_log(self, log: Box<dyn Write + Send>) -> Self {
        self.lock().debug_log = Some(log);
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock means a worker hit an arithmetic fault; the scan is
        // already failing, so just keep the sums reachable.
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// A cell outside the object.
    pub fn record_skipped(&self) {
        let mut state = self.lock();
        state.totals.done += 1;
        self.report_progress(&state.totals);
    }

    /// A cell inside the object, about to be evaluated.
    pub fn record_dispatched(&self) {
        self.lock().totals.taken += 1;
    }

    pub fn record_cell(&self, outcome: CellOutcome) {
        let sample = self.sample_for(&outcome);

        let mut state = self.lock();
        let totals = &mut state.totals;
        for (i, body) in outcome.bodies.iter().enumerate() {
            totals.paths.record(&body.contribution.trace());
            if let Some(visible) = &body.contribution.visible {
                totals.included_mass[i] = &totals.included_mass[i] + &visible.mass;
            }
            if let Some(pull) = &body.pull {
                totals.aggregate = &totals.aggregate + pull;
                totals.per_body[i] = &totals.per_body[i] + pull;
            }
        }
        totals.completed += 1;
        totals.done += 1;
        self.report_progress(&state.totals);

        if let Some(log) = state.debug_log.as_mut() {
            let line = self.debug_line(&outcome);
            if let Err(err) = writeln!(log, "{}", line) {
                warn!("debug log write failed, closing it: {}", err);
                state.debug_log = None;
            }
        }
        drop(state);

        self.sink.push(sample);
    }

    fn sample_for(&self, outcome: &CellOutcome) -> Sample {
        let mut channels = [0.5f32; 3];
        for (channel, (body, newton)) in channels
            .iter_mut()
            .zip(outcome.bodies.iter().zip(&self.newton_magnitudes))
        {
            *channel = tint(body.magnitude.as_ref(), newton);
        }
        let (x, y, z) = outcome.index.offset(self.steps_on_edge);
        Sample {
            x,
            y,
            z,
            r: channels[0],
            g: channels[1],
            b: channels[2],
            alpha: 1.0 / (2 * self.steps_on_edge) as f32,
            paths: outcome
                .bodies
                .iter()
                .map(|body| body.contribution.trace())
                .collect(),
        }
    }

    fn debug_line(&self, outcome: &CellOutcome) -> String {
        let index = outcome.index;
        let mut line = format!("{},{},{}", index.x, index.y, index.z);
        for (name, body) in self.body_names.iter().zip(&outcome.bodies) {
            let magnitude = body
                .magnitude
                .as_ref()
                .map_or_else(|| "-".to_string(), |m| format!("{:e}", m.to_f64()));
            line.push_str(&format!(
                " {}[{}] {}",
                name,
                format_trace(&body.contribution.trace()),
                magnitude
            ));
        }
        line
    }

    // Progress counts are best-effort: workers race to report
    fn report_progress(&self, totals: &Totals) {
        if totals.done == 0 || totals.done % PROGRESS_EVERY != 0 {
            return;
        }
        let percent = totals.done as f64 / self.candidates.max(1) as f64 * 100.0;
        info!(
            "Done {} of {} ({:.2}%), {} of {} taken cells evaluated on {} workers",
            totals.done, self.candidates, percent, totals.completed, totals.taken, self.workers
        );
        if totals.done % MEAN_EVERY == 0 && totals.completed > 0 {
            let mean = totals.aggregate.to_vector3() / totals.completed as f64;
            info!("Running mean pull: ({:e}, {:e}, {:e})", mean.x, mean.y, mean.z);
        }
    }

    pub fn totals(&self) -> Totals {
        self.lock().totals.clone()
    }

    /// Flushes the debug log, if any.
    pub fn flush(&self) {
        if let Some(log) = self.lock().debug_log.as_mut() {
            if let Err(err) = log.flush() {
                warn!("debug log flush failed: {}", err);
            }
        }
    }

    /// Means per evaluated cell, set against the unoccluded pull.
    pub fn summary(&self, scene: &Scene) -> Summary {
        let totals = self.totals();
        Summary::new(scene, self.candidates, totals)
    }
}
