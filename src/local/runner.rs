//! Local search execution loop.

use super::config::LocalSearchConfig;
use crate::error::OptimizeError;
use crate::escape::escape;
use crate::quality::{count_obtuse, obtuse_faces};
use crate::region::Boundary;
use crate::report::{create_rng, Outcome, Tally};
use crate::steiner::{
    adjacent_faces_progressive, insert_candidate, propose, propose_with_fallback,
    SteinerCandidate, SteinerMethod,
};
use crate::triangulation::{FaceId, Triangulation};

/// One generator applied to a private copy of the mesh.
struct Trial {
    candidate: SteinerCandidate,
    tri: Triangulation,
    obtuse: usize,
}

/// Executes the local search.
pub struct LocalSearchRunner;

impl LocalSearchRunner {
    /// Optimizes `tri` inside `region`.
    pub fn run(
        tri: Triangulation,
        region: Boundary,
        config: &LocalSearchConfig,
    ) -> Result<Outcome, OptimizeError> {
        config.validate().map_err(OptimizeError::Config)?;
        let mut rng = create_rng(config.seed);
        let model = &config.energy;
        let mut region = region;
        let mut tally = Tally::new(&tri, &region, model);

        let mut best_obtuse = tally.initial_obtuse;
        let mut best_energy = model.energy(best_obtuse, 0);
        let mut best = tri;
        let mut current = best.clone();
        let mut pending_escape = None;
        let mut budget = config.max_passes;

        tracing::info!(obtuse = best_obtuse, passes = budget, "local search started");

        while budget > 0 && best_obtuse > 0 {
            tally.iterations += 1;
            let mut progress = false;

            for f in obtuse_faces(&current, &region) {
                let Some(trial) = best_trial(&current, f, &region, &config.generators)? else {
                    continue;
                };
                let energy = model.energy(trial.obtuse, tally.steiner_count(&trial.tri));
                if trial.obtuse >= best_obtuse || energy > best_energy {
                    continue;
                }

                tally
                    .convergence
                    .improve(tally.steiner_count(&current), trial.obtuse);
                if let Some(point) = pending_escape.take() {
                    tally.random_points.push(point);
                    tally.usage.record_random();
                }
                tally.usage.record(trial.candidate.method);
                trial.candidate.update_boundary(&mut region);
                tally.energy_history.push(energy);
                tracing::debug!(
                    method = trial.candidate.method.name(),
                    obtuse = trial.obtuse,
                    energy,
                    "local search step committed"
                );

                current = trial.tri;
                best = current.clone();
                best_obtuse = trial.obtuse;
                best_energy = energy;
                progress = true;
                break;
            }

            if progress {
                continue;
            }
            budget -= 1;
            current = best.clone();
            pending_escape = None;
            if !config.randomize {
                // Without an escape the next pass would repeat this one.
                break;
            }
            let Some(point) = escape(&mut current, &region, &mut rng, &config.escape)? else {
                continue;
            };
            let obtuse = count_obtuse(&current, &region);
            let energy = model.energy(obtuse, tally.steiner_count(&current));
            if obtuse < best_obtuse && energy <= best_energy {
                tally
                    .convergence
                    .improve(tally.steiner_count(&best), obtuse);
                tally.random_points.push(point);
                tally.usage.record_random();
                tally.energy_history.push(energy);
                best = current.clone();
                best_obtuse = obtuse;
                best_energy = energy;
                tracing::debug!(obtuse, "escape point adopted");
            } else {
                // Kept in the working mesh; adopted with the next commit.
                pending_escape = Some(point);
            }
        }

        tracing::info!(
            obtuse = best_obtuse,
            passes = tally.iterations,
            "local search finished"
        );
        Ok(tally.finish(best, region, model))
    }
}

/// Tries every generator on face `f`; returns the trial with the fewest
/// obtuse faces, earlier generators winning ties.
fn best_trial(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
    generators: &[SteinerMethod],
) -> Result<Option<Trial>, OptimizeError> {
    let mut best: Option<Trial> = None;
    for &method in generators {
        let Some(trial) = try_method(tri, f, region, method)? else {
            continue;
        };
        if best.as_ref().map_or(true, |b| trial.obtuse < b.obtuse) {
            best = Some(trial);
        }
    }
    Ok(best)
}

fn try_method(
    tri: &Triangulation,
    f: FaceId,
    region: &Boundary,
    method: SteinerMethod,
) -> Result<Option<Trial>, OptimizeError> {
    let candidate = if method == SteinerMethod::AdjacentFaces {
        let mut copy = tri.clone();
        if let Some(candidate) = adjacent_faces_progressive(&mut copy, f, region)? {
            let obtuse = count_obtuse(&copy, region);
            return Ok(Some(Trial {
                candidate,
                tri: copy,
                obtuse,
            }));
        }
        let fallback = propose(SteinerMethod::Projection, tri, f, region)?;
        fallback.admissible.then_some(fallback)
    } else {
        propose_with_fallback(method, tri, f, region)?
    };
    let Some(candidate) = candidate else {
        return Ok(None);
    };
    let mut copy = tri.clone();
    insert_candidate(&mut copy, region, &candidate)?;
    let obtuse = count_obtuse(&copy, region);
    Ok(Some(Trial {
        candidate,
        tri: copy,
        obtuse,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::test_support::{assert_constraints_preserved, p, square, zigzag};

    #[test]
    fn test_square_is_left_unchanged() {
        let (tri, region) = square();
        let outcome =
            LocalSearchRunner::run(tri.clone(), region, &LocalSearchConfig::default()).unwrap();
        assert_eq!(outcome.initial_obtuse, 0);
        assert_eq!(outcome.steiner_count, 0);
        assert_eq!(outcome.triangulation, tri);
        assert_eq!(outcome.iterations, 0);
    }

    #[test]
    fn test_single_obtuse_triangle_is_fixed() {
        let pts = vec![p(0.0, 0.0), p(4.0, 0.0), p(1.0, 1.0)];
        let tri = Triangulation::from_points(&pts).unwrap();
        let region = Boundary::new(pts.clone()).unwrap();
        let config = LocalSearchConfig::default()
            .with_generators(vec![
                SteinerMethod::Midpoint,
                SteinerMethod::Projection,
                SteinerMethod::Centroid,
            ])
            .with_seed(1);
        let outcome = LocalSearchRunner::run(tri, region, &config).unwrap();
        assert_eq!(outcome.initial_obtuse, 1);
        assert_eq!(outcome.obtuse_count, 0, "local search must remove the obtuse angle");
        assert!(outcome.steiner_count >= 1 && outcome.steiner_count <= 3);
        assert_eq!(outcome.inserted_points(&pts).len(), outcome.steiner_count);
        // The foot of the altitude lands on the long side and splits the boundary.
        assert_eq!(outcome.usage.get(SteinerMethod::Projection), 1);
        assert_eq!(outcome.boundary.len(), 4);
        outcome.triangulation.validate().unwrap();
    }

    #[test]
    fn test_zigzag_improves_and_keeps_constraints() {
        let (tri, region, segments) = zigzag();
        let config = LocalSearchConfig::default().with_max_passes(3).with_seed(5);
        let outcome = LocalSearchRunner::run(tri, region, &config).unwrap();
        assert!(outcome.initial_obtuse > 0);
        assert!(
            outcome.obtuse_count < outcome.initial_obtuse,
            "obtuse {} -> {}",
            outcome.initial_obtuse,
            outcome.obtuse_count
        );
        assert_constraints_preserved(&outcome.triangulation, &segments);
    }

    #[test]
    fn test_stops_after_first_failed_pass_without_escape() {
        let (tri, region, _) = zigzag();
        let config = LocalSearchConfig::default().with_max_passes(50);
        let outcome = LocalSearchRunner::run(tri, region, &config).unwrap();
        let commits = outcome.energy_history.len() - 1;
        let failed_passes = outcome.iterations - commits;
        assert!(
            failed_passes <= 1,
            "{failed_passes} passes without improvement were repeated"
        );
    }

    #[test]
    fn test_energy_history_is_non_increasing() {
        let (tri, region, _) = zigzag();
        let config = LocalSearchConfig::default()
            .with_max_passes(2)
            .with_randomize(true)
            .with_seed(9);
        let outcome = LocalSearchRunner::run(tri, region, &config).unwrap();
        assert!(outcome
            .energy_history
            .windows(2)
            .all(|w| w[1] <= w[0] + 1e-12));
        let last = *outcome.energy_history.last().unwrap();
        assert!((last - outcome.energy).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let (tri, region) = square();
        let config = LocalSearchConfig::default().with_generators(Vec::new());
        assert!(matches!(
            LocalSearchRunner::run(tri, region, &config),
            Err(OptimizeError::Config(_))
        ));
    }

    #[test]
    fn test_random_points_are_reported_only_when_kept() {
        let (tri, region, _) = zigzag();
        let config = LocalSearchConfig::default()
            .with_max_passes(4)
            .with_randomize(true)
            .with_seed(21);
        let outcome = LocalSearchRunner::run(tri, region, &config).unwrap();
        let vertices: Vec<Point> = outcome
            .triangulation
            .finite_vertices()
            .map(|v| outcome.triangulation.point(v))
            .collect();
        assert!(outcome.random_points.iter().all(|p| vertices.contains(p)));
        assert_eq!(outcome.randomization_used(), !outcome.random_points.is_empty());
    }
}
