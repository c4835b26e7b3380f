//! Run orchestration.
//!
//! A run drives one SA or HSA search over a point set in bounded batches,
//! reporting throttled [`Progress`] snapshots and a final [`RunResult`].
//!
//! - [`RunController`]: sans-IO state machine; the caller supplies time
//! - [`RunWorker`]: one background thread per controller, driven over
//!   channels with [`Command`]s and reporting [`Event`]s
//! - [`run_to_completion`] / [`run_batch`]: blocking drivers
//! - [`RunHistory`]: per-algorithm result history with [`RunSummary`]
//! - [`SettingsStore`]: editable settings and named [`Preset`]s

mod blocking;
mod controller;
mod history;
mod presets;
mod types;
mod worker;

pub use blocking::{run_batch, run_to_completion};
pub use controller::RunController;
pub use history::{ResultSink, RunHistory, RunSummary};
pub use presets::{Preset, SettingsStore};
pub use types::{
    Algorithm, Command, Event, InitRequest, Progress, RunId, RunOptions, RunResult, Settings,
    DEFAULT_EMIT_INTERVAL_MS,
};
pub use worker::RunWorker;
