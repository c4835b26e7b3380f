//! Accumulated run results and their summary statistics.

use super::types::{Algorithm, RunResult};

/// Consumer of finished runs.
pub trait ResultSink {
    fn record(&mut self, result: RunResult);
}

impl ResultSink for Vec<RunResult> {
    fn record(&mut self, result: RunResult) {
        self.push(result);
    }
}

/// Aggregate over the runs of one algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RunSummary {
    pub runs: usize,
    pub mean_distance: f64,
    /// Sample standard deviation; 0 for a single run.
    pub std_dev_distance: f64,
    pub best_distance: f64,
    pub worst_distance: f64,
    pub mean_elapsed_ms: f64,
}

impl RunSummary {
    /// Summarizes `runs`; `None` when empty.
    pub fn from_runs(runs: &[RunResult]) -> Option<Self> {
        if runs.is_empty() {
            return None;
        }
        let distances: Vec<f64> = runs.iter().map(|r| r.best_distance).collect();
        let elapsed: Vec<f64> = runs.iter().map(|r| r.elapsed_ms).collect();
        Some(Self {
            runs: runs.len(),
            mean_distance: mean(&distances),
            std_dev_distance: sample_std_dev(&distances),
            best_distance: distances.iter().copied().fold(f64::INFINITY, f64::min),
            worst_distance: distances.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            mean_elapsed_ms: mean(&elapsed),
        })
    }
}

#[derive(Debug, Clone, Default)]
struct Track {
    last: Option<RunResult>,
    /// Newest first.
    history: Vec<RunResult>,
}

/// Per-algorithm history of completed runs, newest first.
///
/// [`clear`](Self::clear) empties the histories but keeps the most recent
/// result of each algorithm.
#[derive(Debug, Clone, Default)]
pub struct RunHistory {
    sa: Track,
    hsa: Track,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self, algorithm: Algorithm) -> &[RunResult] {
        &self.track(algorithm).history
    }

    /// Most recently recorded result for `algorithm`.
    pub fn last(&self, algorithm: Algorithm) -> Option<&RunResult> {
        self.track(algorithm).last.as_ref()
    }

    pub fn summary(&self, algorithm: Algorithm) -> Option<RunSummary> {
        RunSummary::from_runs(self.runs(algorithm))
    }

    pub fn len(&self) -> usize {
        self.sa.history.len() + self.hsa.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.sa.history.clear();
        self.hsa.history.clear();
    }

    fn track(&self, algorithm: Algorithm) -> &Track {
        match algorithm {
            Algorithm::Sa => &self.sa,
            Algorithm::Hsa => &self.hsa,
        }
    }
}

impl ResultSink for RunHistory {
    fn record(&mut self, result: RunResult) {
        let track = match result.algorithm {
            Algorithm::Sa => &mut self.sa,
            Algorithm::Hsa => &mut self.hsa,
        };
        track.last = Some(result.clone());
        track.history.insert(0, result);
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    variance.sqrt()
}
