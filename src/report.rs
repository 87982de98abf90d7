//! Run outcome shared by all drivers.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::energy::{ConvergenceTracker, EnergyModel};
use crate::geometry::Point;
use crate::quality::count_obtuse;
use crate::region::Boundary;
use crate::steiner::SteinerMethod;
use crate::triangulation::Triangulation;

/// Seeded RNG for a run; unseeded runs draw a seed from the thread RNG.
pub(crate) fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::random()),
    }
}

/// How many committed points each generator (and the escape helper)
/// contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorUsage {
    counts: [usize; 6],
}

impl GeneratorUsage {
    const RANDOM: usize = 5;

    pub fn record(&mut self, method: SteinerMethod) {
        self.counts[method.index()] += 1;
    }

    pub fn record_random(&mut self) {
        self.counts[Self::RANDOM] += 1;
    }

    pub fn get(&self, method: SteinerMethod) -> usize {
        self.counts[method.index()]
    }

    pub fn random(&self) -> usize {
        self.counts[Self::RANDOM]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Counters in generator order, escape last.
    pub fn as_array(&self) -> [usize; 6] {
        self.counts
    }

    pub(crate) fn merge(&mut self, other: &GeneratorUsage) {
        for (a, b) in self.counts.iter_mut().zip(other.counts) {
            *a += b;
        }
    }
}

/// Result of an optimization run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Outcome {
    /// Best triangulation found.
    pub triangulation: Triangulation,

    /// Region boundary, including vertices added by boundary splits.
    pub boundary: Boundary,

    /// Obtuse faces in the region before the run.
    pub initial_obtuse: usize,

    /// Obtuse faces in the region after the run.
    pub obtuse_count: usize,

    /// Points inserted by the run.
    pub steiner_count: usize,

    /// Energy of the returned triangulation.
    pub energy: f64,

    /// Committed insertions per generator.
    pub usage: GeneratorUsage,

    /// Escape points that were kept.
    pub random_points: Vec<Point>,

    /// Convergence rate over the accepted improvements.
    pub convergence_rate: f64,

    /// Driver iterations (passes, annealing steps or colony cycles).
    pub iterations: usize,

    /// Incumbent energy after each accepted improvement, starting with the
    /// initial energy.
    pub energy_history: Vec<f64>,
}

impl Outcome {
    /// Whether any escape point survived into the result.
    pub fn randomization_used(&self) -> bool {
        !self.random_points.is_empty()
    }

    /// Points of the result that are not in `original`, in vertex order.
    pub fn inserted_points(&self, original: &[Point]) -> Vec<Point> {
        self.triangulation
            .finite_vertices()
            .map(|v| self.triangulation.point(v))
            .filter(|p| !original.contains(p))
            .collect()
    }
}

/// Bookkeeping a driver carries through its run.
#[derive(Debug, Clone)]
pub(crate) struct Tally {
    pub initial_vertices: usize,
    pub initial_obtuse: usize,
    pub usage: GeneratorUsage,
    pub random_points: Vec<Point>,
    pub convergence: ConvergenceTracker,
    pub energy_history: Vec<f64>,
    pub iterations: usize,
}

impl Tally {
    pub fn new(tri: &Triangulation, region: &Boundary, energy: &EnergyModel) -> Self {
        let initial_obtuse = count_obtuse(tri, region);
        Self {
            initial_vertices: tri.number_of_vertices(),
            initial_obtuse,
            usage: GeneratorUsage::default(),
            random_points: Vec::new(),
            convergence: ConvergenceTracker::new(initial_obtuse),
            energy_history: vec![energy.energy(initial_obtuse, 0)],
            iterations: 0,
        }
    }

    pub fn steiner_count(&self, tri: &Triangulation) -> usize {
        tri.number_of_vertices() - self.initial_vertices
    }

    pub fn finish(
        self,
        triangulation: Triangulation,
        boundary: Boundary,
        energy: &EnergyModel,
    ) -> Outcome {
        let obtuse_count = count_obtuse(&triangulation, &boundary);
        let steiner_count = self.steiner_count(&triangulation);
        let random_points = self
            .random_points
            .into_iter()
            .filter(|&p| {
                triangulation
                    .finite_vertices()
                    .any(|v| triangulation.point(v) == p)
            })
            .collect();
        Outcome {
            energy: energy.energy(obtuse_count, steiner_count),
            convergence_rate: self.convergence.rate(steiner_count),
            triangulation,
            boundary,
            initial_obtuse: self.initial_obtuse,
            obtuse_count,
            steiner_count,
            usage: self.usage,
            random_points,
            iterations: self.iterations,
            energy_history: self.energy_history,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_usage_counters() {
        let mut usage = GeneratorUsage::default();
        usage.record(SteinerMethod::Projection);
        usage.record(SteinerMethod::Projection);
        usage.record_random();
        assert_eq!(usage.get(SteinerMethod::Projection), 2);
        assert_eq!(usage.random(), 1);
        assert_eq!(usage.total(), 3);
        assert_eq!(usage.as_array(), [0, 0, 2, 0, 0, 1]);

        let mut other = GeneratorUsage::default();
        other.record(SteinerMethod::Centroid);
        usage.merge(&other);
        assert_eq!(usage.get(SteinerMethod::Centroid), 1);
    }

    #[test]
    fn test_inserted_points_round_trip() {
        let original = vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let mut tri = Triangulation::from_points(&original).unwrap();
        tri.insert_local(p(1.0, 0.0)).unwrap();
        tri.insert_local(p(1.5, 0.5)).unwrap();
        let region = Boundary::new(original.clone()).unwrap();
        let model = EnergyModel::default();
        let tally = Tally {
            initial_vertices: 3,
            ..Tally::new(&Triangulation::from_points(&original).unwrap(), &region, &model)
        };
        let outcome = tally.finish(tri, region, &model);
        assert_eq!(outcome.steiner_count, 2);
        let inserted = outcome.inserted_points(&original);
        assert_eq!(inserted, vec![p(1.0, 0.0), p(1.5, 0.5)]);
        assert!(!outcome.randomization_used());
    }

    #[test]
    fn test_create_rng_seeded_is_reproducible() {
        use rand::Rng;
        let a: u64 = create_rng(Some(3)).random();
        let b: u64 = create_rng(Some(3)).random();
        assert_eq!(a, b);
    }
}
