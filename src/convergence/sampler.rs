/// Approximate number of points a trace is decimated to.
pub const DEFAULT_SAMPLE_TARGET: usize = 200;

/// Best distance found up to `iteration`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergencePoint {
    pub iteration: usize,
    pub distance: f64,
}

impl ConvergencePoint {
    pub fn new(iteration: usize, distance: f64) -> Self {
        Self {
            iteration,
            distance,
        }
    }
}

/// Records every `sample_every`-th best distance.
///
/// `sample_every = max(1, budget / target)`, so a trace holds roughly
/// `target` points plus the initial state and, when the budget is not a
/// multiple of the stride, the final state.
///
/// Callers feed *best-so-far* distances, which makes the trace
/// non-increasing in distance and strictly increasing in iteration.
#[derive(Debug, Clone)]
pub struct ConvergenceSampler {
    sample_every: usize,
    trace: Vec<ConvergencePoint>,
}

impl ConvergenceSampler {
    pub fn new(iteration_budget: usize, target_points: usize) -> Self {
        let sample_every = (iteration_budget / target_points.max(1)).max(1);
        Self {
            sample_every,
            trace: Vec::with_capacity(target_points.min(iteration_budget).saturating_add(2)),
        }
    }

    pub fn sample_every(&self) -> usize {
        self.sample_every
    }

    /// Records the state before any step, unconditionally.
    pub fn start(&mut self, best_distance: f64) -> ConvergencePoint {
        self.trace.clear();
        let point = ConvergencePoint::new(0, best_distance);
        self.trace.push(point);
        point
    }

    /// Offers the best distance after `iteration` steps; returns the point
    /// if it was sampled.
    pub fn observe(&mut self, iteration: usize, best_distance: f64) -> Option<ConvergencePoint> {
        if iteration % self.sample_every != 0 || self.last_iteration() == Some(iteration) {
            return None;
        }
        let point = ConvergencePoint::new(iteration, best_distance);
        self.trace.push(point);
        Some(point)
    }

    /// Closes the trace at the terminal state. Adds a point only if the
    /// last sample does not already sit at `iteration`.
    pub fn finish(&mut self, iteration: usize, best_distance: f64) -> Option<ConvergencePoint> {
        if self.last_iteration() == Some(iteration) {
            return None;
        }
        let point = ConvergencePoint::new(iteration, best_distance);
        self.trace.push(point);
        Some(point)
    }

    pub fn trace(&self) -> &[ConvergencePoint] {
        &self.trace
    }

    pub fn into_trace(self) -> Vec<ConvergencePoint> {
        self.trace
    }

    fn last_iteration(&self) -> Option<usize> {
        self.trace.last().map(|p| p.iteration)
    }
}
