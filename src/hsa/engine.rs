//! HSA state machine.

use rand::Rng;

use super::config::HsaSettings;
use crate::neighborhood::pitch_adjust;
use crate::tsp::{random_tour, DistanceMatrix, Tour};

/// Complete state of one HSA run.
///
/// `memory` and `memory_distances` are parallel and keep their length
/// for the lifetime of the run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HsaState {
    /// Steps taken so far.
    pub iteration: usize,
    pub memory: Vec<Tour>,
    pub memory_distances: Vec<f64>,
    pub best_tour: Tour,
    pub best_distance: f64,
    start: usize,
    elite_count: usize,
}

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Improvisation {
    /// Copied from a memory slot unchanged.
    Recalled,
    /// Copied from a memory slot and perturbed.
    PitchAdjusted,
    /// Generated at random.
    Random,
}

/// Outcome of a single [`HsaState::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsaStep {
    pub source: Improvisation,
    /// Slot the candidate competed against.
    pub target: usize,
    /// The candidate took over `target`.
    pub replaced: bool,
    /// The global best improved.
    pub improved: bool,
}

impl HsaState {
    /// Builds the harmony memory.
    ///
    /// The first slot holds `seed_tour` when given; every other slot is an
    /// independent random tour beginning at `start`. The memory size is
    /// clamped to at least 1 and the elite count to `[0, size - 1]`.
    pub fn new<R: Rng>(
        matrix: &DistanceMatrix,
        settings: &HsaSettings,
        start: usize,
        seed_tour: Option<Tour>,
        rng: &mut R,
    ) -> Self {
        let memory_size = settings.memory_size.max(1);
        let n = matrix.len();

        let mut memory: Vec<Tour> = Vec::with_capacity(memory_size);
        memory.extend(seed_tour);
        while memory.len() < memory_size {
            memory.push(random_tour(n, start, rng));
        }

        let memory_distances: Vec<f64> = memory.iter().map(|t| matrix.tour_length(t)).collect();
        let best_index = index_of_min(&memory_distances);

        Self {
            iteration: 0,
            best_tour: memory[best_index].clone(),
            best_distance: memory_distances[best_index],
            memory,
            memory_distances,
            start,
            elite_count: settings.elite_count.min(memory_size - 1),
        }
    }

    /// Whether the iteration budget has been spent.
    pub fn is_finished(&self, settings: &HsaSettings) -> bool {
        self.iteration >= settings.iterations
    }

    /// Number of memory slots protected from replacement each step.
    pub fn elite_count(&self) -> usize {
        self.elite_count
    }

    /// Advances the search by one improvisation.
    ///
    /// 1. With probability HMCR recall a random slot, pitch-adjusting it
    ///    with probability PAR; otherwise improvise a random tour
    /// 2. Pick a replacement target outside the elite slots
    /// 3. Replace the target only if the candidate is strictly shorter
    /// 4. Update the global best
    pub fn step<R: Rng>(
        &mut self,
        settings: &HsaSettings,
        matrix: &DistanceMatrix,
        rng: &mut R,
    ) -> HsaStep {
        let (candidate, source) = if rng.random::<f64>() < settings.hmcr {
            let slot = rng.random_range(0..self.memory.len());
            let mut recalled = self.memory[slot].clone();
            if rng.random::<f64>() < settings.par {
                pitch_adjust(&mut recalled, rng);
                (recalled, Improvisation::PitchAdjusted)
            } else {
                (recalled, Improvisation::Recalled)
            }
        } else {
            (
                random_tour(matrix.len(), self.start, rng),
                Improvisation::Random,
            )
        };
        let candidate_distance = matrix.tour_length(&candidate);

        let target = select_replacement(&self.memory_distances, self.elite_count, rng);
        let replaced = candidate_distance < self.memory_distances[target];
        let improved = candidate_distance < self.best_distance;

        if improved {
            self.best_distance = candidate_distance;
            self.best_tour.clone_from(&candidate);
        }
        if replaced {
            self.memory[target] = candidate;
            self.memory_distances[target] = candidate_distance;
        }

        self.iteration += 1;
        HsaStep {
            source,
            target,
            replaced,
            improved,
        }
    }
}

/// Replacement target under elitism.
///
/// With no elites the single worst slot is chosen. Otherwise the
/// `elite_count` shortest slots are protected and the target is drawn
/// uniformly from the rest. Ties between equal distances may resolve
/// either way.
fn select_replacement<R: Rng>(distances: &[f64], elite_count: usize, rng: &mut R) -> usize {
    if distances.len() <= 1 {
        return 0;
    }
    if elite_count == 0 {
        return index_of_max(distances);
    }

    let mut order: Vec<usize> = (0..distances.len()).collect();
    order.sort_unstable_by(|&a, &b| distances[a].total_cmp(&distances[b]));
    let candidates = &order[elite_count.min(distances.len() - 1)..];
    candidates[rng.random_range(0..candidates.len())]
}

fn index_of_min(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v < values[best] {
            best = i;
        }
    }
    best
}

fn index_of_max(values: &[f64]) -> usize {
    let mut worst = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[worst] {
            worst = i;
        }
    }
    worst
}
