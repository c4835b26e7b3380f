//! Incremental run orchestration without I/O.
//!
//! [`RunController`] owns at most one active run and advances it in
//! bounded batches. It never reads a clock or spawns anything: every
//! entry point takes the caller's current time in milliseconds, so the
//! same core drives the background [`RunWorker`](super::RunWorker), the
//! blocking runner and the wasm binding.
//!
//! # Lifecycle
//!
//! ```text
//! init ──► running ──tick──► ... ──budget reached──► Complete (run dropped)
//!            │  ▲
//!      pause │  │ resume
//!            ▼  │
//!           paused            stop (any time) ──► Stopped (run dropped)
//! ```

use chrono::Utc;
use rand::rngs::SmallRng;
use u_numflow::random::create_rng;

use super::types::{Algorithm, Command, Event, InitRequest, Progress, RunId, RunResult, Settings};
use crate::convergence::{ConvergencePoint, ConvergenceSampler};
use crate::error::Result;
use crate::hsa::{HsaSettings, HsaState};
use crate::sa::{SaSettings, SaState};
use crate::tsp::DistanceMatrix;

/// Engine state paired with the settings that drive it.
#[derive(Debug, Clone)]
enum Search {
    Sa {
        settings: SaSettings,
        state: SaState,
    },
    Hsa {
        settings: HsaSettings,
        state: HsaState,
        memory_updates: usize,
    },
}

impl Search {
    fn new(request: InitRequest, matrix: &DistanceMatrix, rng: &mut SmallRng) -> Self {
        let InitRequest {
            settings,
            start_index,
            seed_tour,
            ..
        } = request;
        match settings {
            Settings::Sa(settings) => {
                let state = SaState::new(matrix, &settings, start_index, seed_tour, rng);
                Search::Sa { settings, state }
            }
            Settings::Hsa(settings) => {
                let state = HsaState::new(matrix, &settings, start_index, seed_tour, rng);
                Search::Hsa {
                    settings,
                    state,
                    memory_updates: 0,
                }
            }
        }
    }

    fn step(&mut self, matrix: &DistanceMatrix, rng: &mut SmallRng) {
        match self {
            Search::Sa { settings, state } => {
                state.step(settings, matrix, rng);
            }
            Search::Hsa {
                settings,
                state,
                memory_updates,
            } => {
                if state.step(settings, matrix, rng).replaced {
                    *memory_updates += 1;
                }
            }
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Search::Sa { settings, state } => state.is_finished(settings),
            Search::Hsa { settings, state, .. } => state.is_finished(settings),
        }
    }

    fn iteration(&self) -> usize {
        match self {
            Search::Sa { state, .. } => state.iteration,
            Search::Hsa { state, .. } => state.iteration,
        }
    }

    fn budget(&self) -> usize {
        match self {
            Search::Sa { settings, .. } => settings.iterations,
            Search::Hsa { settings, .. } => settings.iterations,
        }
    }

    fn best_distance(&self) -> f64 {
        match self {
            Search::Sa { state, .. } => state.best_distance,
            Search::Hsa { state, .. } => state.best_distance,
        }
    }

    fn best_tour(&self) -> &[usize] {
        match self {
            Search::Sa { state, .. } => &state.best_tour,
            Search::Hsa { state, .. } => &state.best_tour,
        }
    }

    fn temperature(&self) -> Option<f64> {
        match self {
            Search::Sa { state, .. } => Some(state.temperature),
            Search::Hsa { .. } => None,
        }
    }

    fn memory_updates(&self) -> Option<usize> {
        match self {
            Search::Sa { .. } => None,
            Search::Hsa { memory_updates, .. } => Some(*memory_updates),
        }
    }

    fn settings(&self) -> Settings {
        match self {
            Search::Sa { settings, .. } => Settings::Sa(settings.clone()),
            Search::Hsa { settings, .. } => Settings::Hsa(settings.clone()),
        }
    }
}

/// Bookkeeping for the one run a controller is driving.
#[derive(Debug)]
struct ActiveRun {
    run_id: RunId,
    algorithm: Algorithm,
    search: Search,
    matrix: DistanceMatrix,
    rng: SmallRng,
    sampler: ConvergenceSampler,
    /// Sampled since the last progress event.
    pending_samples: Vec<ConvergencePoint>,
    batch_size: usize,
    emit_interval_ms: f64,
    started_at_ms: f64,
    paused_total_ms: f64,
    /// `Some` while paused.
    paused_at_ms: Option<f64>,
    last_emit_ms: Option<f64>,
}

impl ActiveRun {
    fn elapsed_ms(&self, now_ms: f64) -> f64 {
        let reference = self.paused_at_ms.unwrap_or(now_ms);
        (reference - self.started_at_ms - self.paused_total_ms).max(0.0)
    }

    fn run_batch(&mut self) {
        for _ in 0..self.batch_size {
            if self.search.is_finished() {
                break;
            }
            self.search.step(&self.matrix, &mut self.rng);
            if let Some(point) = self
                .sampler
                .observe(self.search.iteration(), self.search.best_distance())
            {
                self.pending_samples.push(point);
            }
        }
    }

    fn progress(&mut self, now_ms: f64) -> Progress {
        Progress {
            run_id: self.run_id.clone(),
            algorithm: self.algorithm,
            iteration: self.search.iteration(),
            iteration_budget: self.search.budget(),
            best_distance: self.search.best_distance(),
            best_tour: self.search.best_tour().to_vec(),
            elapsed_ms: self.elapsed_ms(now_ms),
            temperature: self.search.temperature(),
            memory_updates: self.search.memory_updates(),
            new_samples: std::mem::take(&mut self.pending_samples),
        }
    }

    fn into_result(mut self, now_ms: f64) -> RunResult {
        let iteration = self.search.iteration();
        let best_distance = self.search.best_distance();
        self.sampler.finish(iteration, best_distance);
        let elapsed_ms = self.elapsed_ms(now_ms);
        RunResult {
            best_tour: self.search.best_tour().to_vec(),
            temperature: self.search.temperature(),
            memory_updates: self.search.memory_updates(),
            settings: self.search.settings(),
            run_id: self.run_id,
            algorithm: self.algorithm,
            iterations: iteration,
            iteration_budget: self.search.budget(),
            best_distance,
            elapsed_ms,
            convergence: self.sampler.into_trace(),
            created_at: Utc::now(),
        }
    }
}

/// Drives at most one run at a time through init / tick / pause / resume
/// / stop.
#[derive(Debug, Default)]
pub struct RunController {
    active: Option<ActiveRun>,
}

impl RunController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier of the run currently owned, running or paused.
    pub fn active_run(&self) -> Option<&RunId> {
        self.active.as_ref().map(|run| &run.run_id)
    }

    /// Whether the next [`tick`](Self::tick) will make progress.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.paused_at_ms.is_none())
    }

    pub fn is_paused(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|run| run.paused_at_ms.is_some())
    }

    /// Validates `request` and makes it the active run, superseding any
    /// previous one. A rejected request leaves the current run untouched.
    pub fn init(&mut self, request: InitRequest, now_ms: f64) -> Result<()> {
        request.validate()?;

        if let Some(previous) = self.active.take() {
            log::debug!("run {} superseded by {}", previous.run_id, request.run_id);
        }

        let run_id = request.run_id.clone();
        let algorithm = request.algorithm;
        let mut rng = match request.options.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let matrix = DistanceMatrix::build(&request.points);
        let batch_size = request.options.resolved_batch_size(matrix.len());
        let emit_interval_ms = request.options.emit_interval_ms as f64;
        let mut sampler =
            ConvergenceSampler::new(request.settings.iterations(), request.options.sample_target);

        let search = Search::new(request, &matrix, &mut rng);
        let initial = sampler.start(search.best_distance());

        log::info!(
            "run {run_id} started: {algorithm} over {} points, {} iterations, batch {batch_size}",
            matrix.len(),
            search.budget()
        );

        self.active = Some(ActiveRun {
            run_id,
            algorithm,
            search,
            matrix,
            rng,
            sampler,
            pending_samples: vec![initial],
            batch_size,
            emit_interval_ms,
            started_at_ms: now_ms,
            paused_total_ms: 0.0,
            paused_at_ms: None,
            last_emit_ms: None,
        });
        Ok(())
    }

    /// Applies one inbound message. Returns the immediate reply, if any:
    /// `Stopped` for an accepted stop, `Rejected` for an invalid init.
    ///
    /// Control messages whose run id is not the active run are ignored.
    pub fn handle(&mut self, command: Command, now_ms: f64) -> Option<Event> {
        match command {
            Command::Init(request) => {
                let run_id = request.run_id.clone();
                match self.init(*request, now_ms) {
                    Ok(()) => None,
                    Err(e) => {
                        log::warn!("run {run_id} rejected: {e}");
                        Some(Event::Rejected {
                            run_id,
                            reason: e.to_string(),
                        })
                    }
                }
            }
            Command::Pause { run_id } => {
                match self.matching_run(&run_id) {
                    Some(run) if run.paused_at_ms.is_none() => {
                        run.paused_at_ms = Some(now_ms);
                        log::debug!("run {run_id} paused at iteration {}", run.search.iteration());
                    }
                    Some(_) => {}
                    None => log::debug!("ignoring pause for inactive run {run_id}"),
                }
                None
            }
            Command::Resume { run_id } => {
                match self.matching_run(&run_id) {
                    Some(run) => {
                        if let Some(paused_at) = run.paused_at_ms.take() {
                            run.paused_total_ms += (now_ms - paused_at).max(0.0);
                            log::debug!("run {run_id} resumed");
                        }
                    }
                    None => log::debug!("ignoring resume for inactive run {run_id}"),
                }
                None
            }
            Command::Stop { run_id } => {
                if self.matching_run(&run_id).is_none() {
                    log::debug!("ignoring stop for inactive run {run_id}");
                    return None;
                }
                if let Some(run) = self.active.take() {
                    log::info!(
                        "run {run_id} stopped at iteration {}/{}",
                        run.search.iteration(),
                        run.search.budget()
                    );
                }
                Some(Event::Stopped { run_id })
            }
        }
    }

    /// Runs one scheduling tick: up to `batch_size` engine steps, then a
    /// progress event if the emit interval has elapsed, or the completion
    /// result if the budget is spent. Does nothing while idle or paused.
    pub fn tick(&mut self, now_ms: f64) -> Vec<Event> {
        let Some(run) = self.active.as_mut().filter(|run| run.paused_at_ms.is_none()) else {
            return Vec::new();
        };

        run.run_batch();

        if run.search.is_finished() {
            let Some(run) = self.active.take() else {
                return Vec::new();
            };
            let result = run.into_result(now_ms);
            log::info!(
                "run {} complete: best {:.6} after {} iterations in {:.1} ms",
                result.run_id,
                result.best_distance,
                result.iterations,
                result.elapsed_ms
            );
            return vec![Event::Complete(Box::new(result))];
        }

        let due = run
            .last_emit_ms
            .is_none_or(|last| now_ms - last >= run.emit_interval_ms);
        if !due {
            return Vec::new();
        }
        run.last_emit_ms = Some(now_ms);
        vec![Event::Progress(run.progress(now_ms))]
    }

    fn matching_run(&mut self, run_id: &RunId) -> Option<&mut ActiveRun> {
        self.active.as_mut().filter(|run| &run.run_id == run_id)
    }
}
