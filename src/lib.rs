//! Travelling Salesman tour search with Simulated Annealing and Harmony
//! Search.
//!
//! - **Data model** ([`tsp`]): points, tours, a precomputed distance
//!   matrix, and point-set generation and import.
//! - **Neighborhoods** ([`neighborhood`]): swap, two-opt and insert moves
//!   that keep the start city fixed.
//! - **Simulated Annealing** ([`sa`]): Metropolis acceptance with
//!   geometric cooling and stagnation reheats.
//! - **Harmony Search** ([`hsa`]): memory-based improvisation with elite
//!   protection.
//! - **Convergence** ([`convergence`]): a bounded best-distance trace.
//! - **Runs** ([`run`]): batched, pausable, stoppable execution with
//!   throttled progress, on a background thread or inline.
//!
//! Both engines are resumable state machines: build a state from settings,
//! call `step` as often as you like, and read the best tour at any point.
//!
//! ```
//! use rand::SeedableRng;
//! use tsp_anneal::sa::{SaSettings, SaState};
//! use tsp_anneal::tsp::{DistanceMatrix, Point};
//!
//! let points = vec![
//!     Point::new("a", 0.0, 0.0),
//!     Point::new("b", 1.0, 0.0),
//!     Point::new("c", 1.0, 1.0),
//!     Point::new("d", 0.0, 1.0),
//! ];
//! let matrix = DistanceMatrix::build(&points);
//! let settings = SaSettings::default().with_iterations(5_000);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let mut state = SaState::new(&matrix, &settings, 0, None, &mut rng);
//! while !state.is_finished(&settings) {
//!     state.step(&settings, &matrix, &mut rng);
//! }
//! assert!((state.best_distance - 4.0).abs() < 1e-9);
//! ```

pub mod convergence;
pub mod error;
pub mod hsa;
pub mod neighborhood;
pub mod run;
pub mod sa;
pub mod tsp;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Result};
