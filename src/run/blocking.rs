//! Synchronous drivers for callers that just want the result.

use std::time::Instant;

use super::controller::RunController;
use super::types::{Event, InitRequest, RunResult};
use crate::error::{Error, Result};

/// Drives a run to completion on the calling thread.
///
/// Uses the same controller as [`RunWorker`](super::RunWorker), so a
/// seeded request produces the same result either way.
pub fn run_to_completion(request: InitRequest) -> Result<RunResult> {
    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

    let run_id = request.run_id.clone();
    let mut controller = RunController::new();
    controller.init(request, now_ms())?;

    while controller.is_running() {
        for event in controller.tick(now_ms()) {
            if let Event::Complete(result) = event {
                return Ok(*result);
            }
        }
    }
    Err(Error::invalid_input(format!("run {run_id} ended without completing")))
}

/// Runs independent requests, returning outcomes in request order.
///
/// With the `parallel` feature the runs execute concurrently on the rayon
/// pool.
pub fn run_batch(requests: Vec<InitRequest>) -> Vec<Result<RunResult>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        requests.into_par_iter().map(run_to_completion).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        requests.into_iter().map(run_to_completion).collect()
    }
}
