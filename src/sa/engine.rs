//! SA state machine.
//!
//! Unlike a closed optimization loop, the search is exposed one step at a
//! time so an orchestrator can run it in bounded batches, pause between
//! them and resume from exactly the same state.

use rand::Rng;

use super::config::SaSettings;
use crate::tsp::{random_tour, DistanceMatrix, Tour};

/// Positive floor on the temperature; keeps `-delta / T` finite.
pub const MIN_TEMPERATURE: f64 = 1e-4;

/// Complete state of one SA run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SaState {
    /// Steps taken so far.
    pub iteration: usize,
    pub temperature: f64,
    pub current_tour: Tour,
    pub current_distance: f64,
    pub best_tour: Tour,
    pub best_distance: f64,
    /// Steps since the best distance last improved (reset on reheat).
    pub iterations_since_best: usize,
}

/// Outcome of a single [`SaState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaStep {
    /// The candidate replaced the current tour.
    pub accepted: bool,
    /// The best distance improved.
    pub improved: bool,
    /// The temperature was raised after stagnation.
    pub reheated: bool,
}

impl SaState {
    /// Initial state from `seed_tour`, or a random tour beginning at `start`.
    ///
    /// Inputs are assumed validated: `seed_tour`, if given, must be a valid
    /// tour over `matrix.len()` points.
    pub fn new<R: Rng>(
        matrix: &DistanceMatrix,
        settings: &SaSettings,
        start: usize,
        seed_tour: Option<Tour>,
        rng: &mut R,
    ) -> Self {
        let tour = seed_tour.unwrap_or_else(|| random_tour(matrix.len(), start, rng));
        let distance = matrix.tour_length(&tour);
        Self {
            iteration: 0,
            temperature: settings.initial_temperature,
            best_tour: tour.clone(),
            current_tour: tour,
            current_distance: distance,
            best_distance: distance,
            iterations_since_best: 0,
        }
    }

    /// Whether the iteration budget has been spent.
    pub fn is_finished(&self, settings: &SaSettings) -> bool {
        self.iteration >= settings.iterations
    }

    /// Advances the search by one candidate evaluation.
    ///
    /// 1. Perturb the current tour with the configured operator
    /// 2. Accept improvements outright; accept a worse candidate with
    ///    probability `exp(-delta / T)` (Metropolis)
    /// 3. Track the best tour and the stagnation counter
    /// 4. Cool geometrically, floored at [`MIN_TEMPERATURE`]
    /// 5. Reheat to `max(T, T0 * multiplier)` after `reheat_interval`
    ///    steps without improvement
    pub fn step<R: Rng>(
        &mut self,
        settings: &SaSettings,
        matrix: &DistanceMatrix,
        rng: &mut R,
    ) -> SaStep {
        let mut outcome = SaStep::default();

        let candidate = settings.neighborhood.neighbor(&self.current_tour, rng);
        let candidate_distance = matrix.tour_length(&candidate);
        let delta = candidate_distance - self.current_distance;

        // Metropolis acceptance criterion
        let accept = delta < 0.0 || rng.random::<f64>() < (-delta / self.temperature).exp();
        if accept {
            self.current_tour = candidate;
            self.current_distance = candidate_distance;
            outcome.accepted = true;
        }

        if self.current_distance < self.best_distance {
            self.best_distance = self.current_distance;
            self.best_tour.clone_from(&self.current_tour);
            self.iterations_since_best = 0;
            outcome.improved = true;
        } else {
            self.iterations_since_best += 1;
        }

        self.temperature = (self.temperature * settings.cooling_rate).max(MIN_TEMPERATURE);

        if settings.reheat_interval > 0 && self.iterations_since_best >= settings.reheat_interval {
            let multiplier = settings.reheat_multiplier.max(1.0);
            self.temperature = self
                .temperature
                .max(settings.initial_temperature * multiplier);
            self.iterations_since_best = 0;
            outcome.reheated = true;
            log::trace!(
                "sa reheat at iteration {} to T={:.3}",
                self.iteration,
                self.temperature
            );
        }

        self.iteration += 1;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighborhood::Neighborhood;
    use crate::tsp::{is_valid_tour, Point};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_square() -> DistanceMatrix {
        DistanceMatrix::build(&[
            Point::new("a", 0.0, 0.0),
            Point::new("b", 1.0, 0.0),
            Point::new("c", 1.0, 1.0),
            Point::new("d", 0.0, 1.0),
        ])
    }

    fn ring(n: usize) -> DistanceMatrix {
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                Point::new(format!("p{i}"), 0.5 + 0.4 * a.cos(), 0.5 + 0.4 * a.sin())
            })
            .collect();
        DistanceMatrix::build(&points)
    }

    fn run(state: &mut SaState, settings: &SaSettings, matrix: &DistanceMatrix, rng: &mut StdRng) {
        while !state.is_finished(settings) {
            state.step(settings, matrix, rng);
        }
    }

    #[test]
    fn test_sa_solves_unit_square() {
        let matrix = unit_square();
        let settings = SaSettings::default().with_iterations(5_000);
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut state = SaState::new(&matrix, &settings, 0, None, &mut rng);
            run(&mut state, &settings, &matrix, &mut rng);
            assert_eq!(state.iteration, 5_000);
            assert!(
                (state.best_distance - 4.0).abs() < 1e-9,
                "seed {seed}: got {}",
                state.best_distance
            );
            assert_eq!(state.best_tour[0], 0);
        }
    }

    #[test]
    fn test_sa_improves_ring() {
        let matrix = ring(20);
        let settings = SaSettings::default()
            .with_initial_temperature(1.0)
            .with_cooling_rate(0.999)
            .with_iterations(20_000);
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = SaState::new(&matrix, &settings, 0, None, &mut rng);
        let initial = state.best_distance;
        run(&mut state, &settings, &matrix, &mut rng);

        let optimum = matrix.tour_length(&(0..20).collect::<Vec<_>>());
        assert!(state.best_distance < initial);
        assert!(
            state.best_distance < optimum * 1.15,
            "expected near-optimal ring tour, got {} vs {optimum}",
            state.best_distance
        );
        assert!(is_valid_tour(&state.best_tour, 20, 0));
        assert!((matrix.tour_length(&state.best_tour) - state.best_distance).abs() < 1e-9);
    }

    #[test]
    fn test_best_never_increases() {
        let matrix = ring(12);
        let settings = SaSettings::default().with_iterations(3_000);
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = SaState::new(&matrix, &settings, 3, None, &mut rng);
        let mut last = state.best_distance;
        while !state.is_finished(&settings) {
            state.step(&settings, &matrix, &mut rng);
            assert!(state.best_distance <= last);
            assert!(state.best_distance <= state.current_distance + 1e-12);
            last = state.best_distance;
        }
    }

    #[test]
    fn test_temperature_floor() {
        let matrix = ring(8);
        let settings = SaSettings::default()
            .with_initial_temperature(1.0)
            .with_cooling_rate(0.01)
            .with_iterations(100)
            .without_reheat();
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = SaState::new(&matrix, &settings, 0, None, &mut rng);
        run(&mut state, &settings, &matrix, &mut rng);
        assert_eq!(state.temperature, MIN_TEMPERATURE);
    }

    #[test]
    fn test_cold_search_rejects_uphill() {
        let matrix = ring(10);
        let settings = SaSettings::default()
            .with_initial_temperature(1e-9)
            .with_iterations(2_000)
            .with_neighborhood(Neighborhood::Swap)
            .without_reheat();
        let mut rng = StdRng::seed_from_u64(8);
        let mut state = SaState::new(&matrix, &settings, 0, None, &mut rng);
        let mut current = state.current_distance;
        while !state.is_finished(&settings) {
            state.step(&settings, &matrix, &mut rng);
            assert!(state.current_distance <= current + 1e-12);
            current = state.current_distance;
        }
    }

    #[test]
    fn test_reheat_after_stagnation() {
        let matrix = unit_square();
        // Seeded with the optimum so nothing ever improves.
        let settings = SaSettings::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.5)
            .with_iterations(50)
            .with_reheat(10, 2.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SaState::new(&matrix, &settings, 0, Some(vec![0, 1, 2, 3]), &mut rng);

        let mut reheats = Vec::new();
        while !state.is_finished(&settings) {
            let before = state.iteration;
            let step = state.step(&settings, &matrix, &mut rng);
            assert!(!step.improved);
            if step.reheated {
                reheats.push(before);
                assert_eq!(state.temperature, 20.0);
                assert_eq!(state.iterations_since_best, 0);
            }
        }
        assert_eq!(reheats, vec![9, 19, 29, 39, 49]);
        assert!((state.best_distance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_reheat_never_lowers_temperature() {
        let matrix = unit_square();
        let settings = SaSettings::default()
            .with_initial_temperature(10.0)
            .with_cooling_rate(0.999)
            .with_iterations(5)
            .with_reheat(1, 1.0);
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = SaState::new(&matrix, &settings, 0, Some(vec![0, 1, 2, 3]), &mut rng);
        state.temperature = 50.0;
        state.step(&settings, &matrix, &mut rng);
        assert!((state.temperature - 50.0 * 0.999).abs() < 1e-12);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let matrix = ring(15);
        let settings = SaSettings::default().with_iterations(2_000);
        let mut a_rng = StdRng::seed_from_u64(99);
        let mut b_rng = StdRng::seed_from_u64(99);
        let mut a = SaState::new(&matrix, &settings, 0, None, &mut a_rng);
        let mut b = SaState::new(&matrix, &settings, 0, None, &mut b_rng);
        run(&mut a, &settings, &matrix, &mut a_rng);
        run(&mut b, &settings, &matrix, &mut b_rng);
        assert_eq!(a, b);
    }
}
