//! SA execution loop.

use rand::Rng;

use super::config::{CoolingSchedule, SaConfig};
use crate::energy::metropolis_accept;
use crate::error::OptimizeError;
use crate::escape::escape;
use crate::geometry::Point;
use crate::quality::{count_obtuse, obtuse_faces};
use crate::region::Boundary;
use crate::report::{create_rng, GeneratorUsage, Outcome, Tally};
use crate::steiner::{
    insert_candidate, propose, propose_with_fallback, SteinerCandidate, SteinerMethod,
};
use crate::triangulation::FaceId;
use crate::triangulation::Triangulation;

/// Executes the simulated annealing driver.
pub struct SaRunner;

/// Tentative moves since the last commit or reset.
#[derive(Default)]
struct Batch {
    moves: usize,
    usage: GeneratorUsage,
    candidates: Vec<SteinerCandidate>,
    escape: Option<Point>,
}

impl Batch {
    fn clear(&mut self) {
        *self = Batch::default();
    }
}

impl SaRunner {
    /// Optimizes `tri` inside `region`.
    pub fn run(
        tri: Triangulation,
        region: Boundary,
        config: &SaConfig,
    ) -> Result<Outcome, OptimizeError> {
        config.validate().map_err(OptimizeError::Config)?;
        let mut rng = create_rng(config.seed);
        let model = &config.energy;
        let mut region = region;
        let mut tally = Tally::new(&tri, &region, model);

        let mut best_obtuse = tally.initial_obtuse;
        let mut best_energy = model.energy(best_obtuse, 0);
        let mut best = tri;
        let mut working = best.clone();
        let mut batch = Batch::default();
        let mut temperature = config.initial_temperature;
        let mut accepted_moves = 0usize;
        let mut resets = 0usize;

        tracing::info!(
            obtuse = best_obtuse,
            iterations = config.max_iterations,
            "simulated annealing started"
        );

        let mut i = 0usize;
        while i < config.max_iterations && temperature > config.min_temperature {
            if best_obtuse == 0 {
                break;
            }
            tally.iterations += 1;

            for f in obtuse_faces(&working, &region) {
                let method = config.generators[rng.random_range(0..config.generators.len())];
                let Some(candidate) = annealing_candidate(method, &working, f, &region)? else {
                    continue;
                };
                let steiner_before = tally.steiner_count(&working);
                let mut trial = working.clone();
                insert_candidate(&mut trial, &region, &candidate)?;
                let obtuse = count_obtuse(&trial, &region);
                let steiner = tally.steiner_count(&trial);
                let energy = model.energy(obtuse, steiner);
                let raw_delta = energy - best_energy;
                if raw_delta == 0.0 {
                    continue;
                }
                let severe = raw_delta >= 3.0 * model.alpha;
                let delta = model.clamp_severe(raw_delta);

                if delta < 0.0 {
                    tally.convergence.improve(steiner_before, obtuse);
                    batch.usage.record(candidate.method);
                    tally.usage.merge(&batch.usage);
                    if let Some(point) = batch.escape.take() {
                        tally.random_points.push(point);
                    }
                    for pending in batch.candidates.iter().chain(std::iter::once(&candidate)) {
                        pending.update_boundary(&mut region);
                    }
                    batch.clear();
                    tally.energy_history.push(energy);
                    accepted_moves += 1;
                    tracing::debug!(
                        iteration = i,
                        method = candidate.method.name(),
                        obtuse,
                        energy,
                        "annealing step improved incumbent"
                    );
                    working = trial;
                    best = working.clone();
                    best_obtuse = obtuse;
                    best_energy = energy;
                    break;
                }

                if !metropolis_accept(delta, temperature, &mut rng) {
                    continue;
                }
                accepted_moves += 1;
                batch.moves += 1;
                batch.usage.record(candidate.method);
                batch.candidates.push(candidate);
                tally.convergence.tentative(steiner_before, obtuse);
                working = trial;

                if batch.moves >= config.batch_size || severe {
                    working = best.clone();
                    batch.clear();
                    tally.convergence.rollback(best_obtuse);
                    resets += 1;
                    tracing::trace!(iteration = i, severe, "working mesh reset to incumbent");

                    let late = i as f64 > config.max_iterations as f64 / 1.5;
                    if config.randomize && late && best_obtuse > 1 {
                        if let Some(point) =
                            escape(&mut working, &region, &mut rng, &config.escape)?
                        {
                            let obtuse = count_obtuse(&working, &region);
                            let energy =
                                model.energy(obtuse, tally.steiner_count(&working));
                            if energy < best_energy {
                                tally
                                    .convergence
                                    .improve(tally.steiner_count(&best), obtuse);
                                tally.usage.record_random();
                                tally.random_points.push(point);
                                tally.energy_history.push(energy);
                                best = working.clone();
                                best_obtuse = obtuse;
                                best_energy = energy;
                                tracing::debug!(iteration = i, obtuse, "escape point adopted");
                            } else {
                                batch.moves += 1;
                                batch.usage.record_random();
                                batch.escape = Some(point);
                            }
                        }
                    }
                }
                break;
            }

            if temperature < 1.0
                && config
                    .reheat_windows
                    .iter()
                    .any(|&(lo, hi)| i > lo && i < hi)
            {
                temperature *= config.reheat_factor;
                tracing::trace!(iteration = i, temperature, "reheat");
            }
            temperature = cool(temperature, config, i);
            i += 1;
        }

        tracing::info!(
            obtuse = best_obtuse,
            iterations = tally.iterations,
            accepted_moves,
            resets,
            final_temperature = temperature,
            "simulated annealing finished"
        );
        Ok(tally.finish(best, region, model))
    }
}

/// Candidate for one annealing move. An inadmissible circumcenter skips the
/// face instead of falling back to the centroid; other generators keep their
/// fallback.
fn annealing_candidate(
    method: SteinerMethod,
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
) -> Result<Option<SteinerCandidate>, OptimizeError> {
    if method == SteinerMethod::Circumcenter {
        let candidate = propose(method, tri, f, region)?;
        return Ok(candidate.admissible.then_some(candidate));
    }
    propose_with_fallback(method, tri, f, region)
}

/// Apply the cooling schedule after iteration `step`.
fn cool(temperature: f64, config: &SaConfig, step: usize) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            let t = config.initial_temperature
                - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                    / config.max_iterations.max(1) as f64;
            t.max(config.min_temperature)
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assert_constraints_preserved, p, square, zigzag};

    #[test]
    fn test_square_is_left_unchanged() {
        let (tri, region) = square();
        let config = SaConfig::default().with_seed(1);
        let outcome = SaRunner::run(tri.clone(), region, &config).unwrap();
        assert_eq!(outcome.steiner_count, 0);
        assert_eq!(outcome.triangulation, tri);
    }

    #[test]
    fn test_zero_iterations_returns_input() {
        let (tri, region, _) = zigzag();
        let config = SaConfig::default().with_max_iterations(0).with_seed(3);
        let outcome = SaRunner::run(tri.clone(), region.clone(), &config).unwrap();
        assert_eq!(outcome.triangulation, tri);
        assert_eq!(outcome.boundary, region);
        assert_eq!(outcome.steiner_count, 0);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.obtuse_count, outcome.initial_obtuse);
    }

    #[test]
    fn test_single_obtuse_triangle() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.clone()).unwrap();
        let config = SaConfig::default()
            .with_generators(vec![SteinerMethod::Projection])
            .with_seed(2);
        let outcome = SaRunner::run(tri, region, &config).unwrap();
        assert_eq!(outcome.obtuse_count, 0);
        assert_eq!(outcome.steiner_count, 1);
        assert_eq!(outcome.inserted_points(&pts), vec![p(1.0, 0.0)]);
        assert_eq!(outcome.boundary.len(), 4, "projection foot splits the boundary");
    }

    #[test]
    fn test_zigzag_never_worse_and_keeps_constraints() {
        let (tri, region, segments) = zigzag();
        let config = SaConfig::default()
            .with_max_iterations(60)
            .with_randomize(true)
            .with_seed(17);
        let outcome = SaRunner::run(tri, region, &config).unwrap();
        assert!(outcome.obtuse_count <= outcome.initial_obtuse);
        assert!(outcome.energy <= outcome.energy_history[0] + 1e-12);
        assert!(outcome
            .energy_history
            .windows(2)
            .all(|w| w[1] < w[0]), "incumbent energy must strictly drop on every commit");
        assert_constraints_preserved(&outcome.triangulation, &segments);
    }

    #[test]
    fn test_circumcenter_only_run_never_inserts_centroids() {
        let (tri, region, _) = zigzag();
        for seed in 0..8 {
            let config = SaConfig::default()
                .with_generators(vec![SteinerMethod::Circumcenter])
                .with_max_iterations(200)
                .with_seed(seed);
            let outcome = SaRunner::run(tri.clone(), region.clone(), &config).unwrap();
            assert_eq!(
                outcome.usage.get(SteinerMethod::Centroid),
                0,
                "seed {seed}: inadmissible circumcenters must be skipped"
            );
        }
    }

    #[test]
    fn test_annealing_candidate_skips_bad_circumcenter() {
        let (tri, region, _) = zigzag();
        for f in crate::quality::obtuse_faces(&tri, &region) {
            let direct = propose(SteinerMethod::Circumcenter, &tri, f, &region).unwrap();
            let chosen = annealing_candidate(SteinerMethod::Circumcenter, &tri, f, &region).unwrap();
            match chosen {
                Some(c) => {
                    assert!(direct.admissible);
                    assert_eq!(c.method, SteinerMethod::Circumcenter);
                }
                None => assert!(!direct.admissible),
            }
        }
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let (tri, region, _) = zigzag();
        let config = SaConfig::default().with_max_iterations(25).with_seed(99);
        let a = SaRunner::run(tri.clone(), region.clone(), &config).unwrap();
        let b = SaRunner::run(tri, region, &config).unwrap();
        assert_eq!(a.triangulation, b.triangulation);
        assert_eq!(a.usage, b.usage);
        assert_eq!(a.energy_history, b.energy_history);
    }

    #[test]
    fn test_linear_and_lundy_mees_schedules_cool() {
        let config = SaConfig::default()
            .with_max_iterations(10)
            .with_cooling(CoolingSchedule::Linear);
        let t = cool(1.0, &config, 0);
        assert!((t - (1.0 - (1.0 - 1e-6) / 10.0)).abs() < 1e-12);
        let config = config.with_cooling(CoolingSchedule::LundyMees { beta: 1.0 });
        assert!((cool(1.0, &config, 0) - 0.5).abs() < 1e-12);
    }
}
