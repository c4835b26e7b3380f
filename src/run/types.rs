//! Message protocol and result types shared by every run driver.

use chrono::{DateTime, Utc};

use crate::convergence::{ConvergencePoint, DEFAULT_SAMPLE_TARGET};
use crate::error::{Error, Result};
use crate::hsa::HsaSettings;
use crate::sa::SaSettings;
use crate::tsp::{dataset, is_valid_tour, Point, Tour};

/// Default minimum spacing between progress events.
pub const DEFAULT_EMIT_INTERVAL_MS: u64 = 80;

/// Search algorithm tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[cfg_attr(feature = "serde", serde(rename = "SA"))]
    Sa,
    #[cfg_attr(feature = "serde", serde(rename = "HSA"))]
    Hsa,
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Algorithm::Sa => f.write_str("SA"),
            Algorithm::Hsa => f.write_str("HSA"),
        }
    }
}

/// Identifies one run; control messages carrying another id are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh `run-<unix-millis>-<random>` identifier.
    pub fn generate() -> Self {
        Self(format!(
            "run-{}-{}",
            Utc::now().timestamp_millis(),
            rand::random::<u32>() % 1_000_000
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RunId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Settings for either algorithm; the variant selects the engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Settings {
    Sa(SaSettings),
    Hsa(HsaSettings),
}

impl Settings {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            Settings::Sa(_) => Algorithm::Sa,
            Settings::Hsa(_) => Algorithm::Hsa,
        }
    }

    /// Iteration budget.
    pub fn iterations(&self) -> usize {
        match self {
            Settings::Sa(s) => s.iterations,
            Settings::Hsa(s) => s.iterations,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Settings::Sa(s) => s.validate(),
            Settings::Hsa(s) => s.validate(),
        }
    }
}

impl From<SaSettings> for Settings {
    fn from(settings: SaSettings) -> Self {
        Settings::Sa(settings)
    }
}

impl From<HsaSettings> for Settings {
    fn from(settings: HsaSettings) -> Self {
        Settings::Hsa(settings)
    }
}

/// Scheduling knobs for a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct RunOptions {
    /// Engine steps per scheduling tick. `None` = `max(8, n / 4)`.
    pub batch_size: Option<usize>,

    /// Minimum milliseconds between progress events.
    pub emit_interval_ms: u64,

    /// Approximate convergence trace length.
    pub sample_target: usize,

    /// Random seed for reproducibility. `None` = fresh entropy.
    pub seed: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: None,
            emit_interval_ms: DEFAULT_EMIT_INTERVAL_MS,
            sample_target: DEFAULT_SAMPLE_TARGET,
            seed: None,
        }
    }
}

impl RunOptions {
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }

    pub fn with_emit_interval_ms(mut self, ms: u64) -> Self {
        self.emit_interval_ms = ms;
        self
    }

    pub fn with_sample_target(mut self, n: usize) -> Self {
        self.sample_target = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Batch size for a run over `point_count` points.
    pub fn resolved_batch_size(&self, point_count: usize) -> usize {
        self.batch_size
            .unwrap_or_else(|| (point_count / 4).max(8))
            .max(1)
    }
}

/// Everything needed to start a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InitRequest {
    pub run_id: RunId,
    pub algorithm: Algorithm,
    pub points: Vec<Point>,
    pub start_index: usize,
    pub settings: Settings,
    #[cfg_attr(feature = "serde", serde(default))]
    pub seed_tour: Option<Tour>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub options: RunOptions,
}

impl InitRequest {
    /// Request starting at point 0 with default options; the algorithm
    /// follows the settings variant.
    pub fn new(run_id: impl Into<RunId>, points: Vec<Point>, settings: impl Into<Settings>) -> Self {
        let settings = settings.into();
        Self {
            run_id: run_id.into(),
            algorithm: settings.algorithm(),
            points,
            start_index: 0,
            settings,
            seed_tour: None,
            options: RunOptions::default(),
        }
    }

    pub fn with_start_index(mut self, index: usize) -> Self {
        self.start_index = index;
        self
    }

    pub fn with_seed_tour(mut self, tour: Tour) -> Self {
        self.seed_tour = Some(tour);
        self
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    /// Rejects anything the engines assume away.
    pub fn validate(&self) -> Result<()> {
        dataset::validate_point_set(&self.points)?;
        let n = self.points.len();
        if self.start_index >= n {
            return Err(Error::invalid_input(format!(
                "start index {} out of range for {n} points",
                self.start_index
            )));
        }
        if self.settings.algorithm() != self.algorithm {
            return Err(Error::invalid_input(format!(
                "algorithm {} does not match {} settings",
                self.algorithm,
                self.settings.algorithm()
            )));
        }
        self.settings.validate()?;
        if let Some(tour) = &self.seed_tour {
            if !is_valid_tour(tour, n, self.start_index) {
                return Err(Error::invalid_input(
                    "seed tour must be a permutation of all points beginning at the start index",
                ));
            }
        }
        if self.options.batch_size == Some(0) {
            return Err(Error::invalid_settings("batch size must be at least 1"));
        }
        Ok(())
    }
}

/// Inbound control messages.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum Command {
    Init(Box<InitRequest>),
    Pause { run_id: RunId },
    Resume { run_id: RunId },
    Stop { run_id: RunId },
}

impl Command {
    pub fn run_id(&self) -> &RunId {
        match self {
            Command::Init(request) => &request.run_id,
            Command::Pause { run_id } | Command::Resume { run_id } | Command::Stop { run_id } => {
                run_id
            }
        }
    }
}

/// Throttled snapshot of a running search. Owns copies of everything it
/// reports.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Progress {
    pub run_id: RunId,
    pub algorithm: Algorithm,
    pub iteration: usize,
    pub iteration_budget: usize,
    pub best_distance: f64,
    pub best_tour: Tour,
    /// Compute time, excluding paused intervals.
    pub elapsed_ms: f64,
    /// SA only.
    pub temperature: Option<f64>,
    /// HSA only: memory slots replaced so far.
    pub memory_updates: Option<usize>,
    /// Trace points sampled since the previous progress event.
    pub new_samples: Vec<ConvergencePoint>,
}

/// Final outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RunResult {
    pub run_id: RunId,
    pub algorithm: Algorithm,
    /// Steps actually taken.
    pub iterations: usize,
    pub iteration_budget: usize,
    pub best_tour: Tour,
    pub best_distance: f64,
    /// Compute time, excluding paused intervals.
    pub elapsed_ms: f64,
    pub temperature: Option<f64>,
    pub memory_updates: Option<usize>,
    pub convergence: Vec<ConvergencePoint>,
    pub settings: Settings,
    pub created_at: DateTime<Utc>,
}

/// Outbound messages. For any run, events arrive in non-decreasing
/// iteration order and `Complete` is the last one unless the run was
/// stopped first.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum Event {
    Progress(Progress),
    Complete(Box<RunResult>),
    Stopped { run_id: RunId },
    Rejected { run_id: RunId, reason: String },
}

impl Event {
    pub fn run_id(&self) -> &RunId {
        match self {
            Event::Progress(p) => &p.run_id,
            Event::Complete(r) => &r.run_id,
            Event::Stopped { run_id } | Event::Rejected { run_id, .. } => run_id,
        }
    }
}
