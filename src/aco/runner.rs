//! ACO execution loop.

use super::ant::{resolve_conflicts, Ant, AntPlan};
use super::config::AcoConfig;
use super::pheromone::{desirability, Trails};
use crate::energy::EnergyModel;
use crate::error::OptimizeError;
use crate::escape::escape;
use crate::quality::{count_obtuse, has_obtuse_neighbors, radius_to_height, random_obtuse_face};
use crate::region::Boundary;
use crate::report::{create_rng, Outcome, Tally};
use crate::steiner::insert_candidate;
use crate::triangulation::Triangulation;

/// Executes the ant colony driver.
pub struct AcoRunner;

impl AcoRunner {
    /// Optimizes `tri` inside `region`.
    pub fn run(
        tri: Triangulation,
        region: Boundary,
        config: &AcoConfig,
    ) -> Result<Outcome, OptimizeError> {
        config.validate().map_err(OptimizeError::Config)?;
        let mut rng = create_rng(config.seed);
        let model = &config.energy;
        let mut region = region;
        let mut tally = Tally::new(&tri, &region, model);
        let mut trails = Trails::default();

        let mut best = tri;
        let mut best_obtuse = tally.initial_obtuse;
        let mut best_energy = model.energy(best_obtuse, 0);
        let mut stagnant = 0usize;

        tracing::info!(
            obtuse = best_obtuse,
            cycles = config.cycles,
            ants = config.ants,
            "ant colony started"
        );

        for cycle in 0..config.cycles {
            if best_obtuse == 0 {
                break;
            }
            tally.iterations += 1;

            let mut plans = Vec::with_capacity(config.ants);
            for _ in 0..config.ants {
                let Some(face) = random_obtuse_face(&best, &region, &mut rng) else {
                    break;
                };
                let rho = radius_to_height(best.face_points(face));
                let eta = desirability(rho, has_obtuse_neighbors(&best, face, &region));
                let method = trails.select(&eta, config.chi, config.psi, &mut rng);
                plans.push(AntPlan { face, method });
            }

            let mut ants = evaluate_ants(
                &best,
                &region,
                &plans,
                model,
                tally.initial_vertices,
                best_energy,
                config.parallel,
            )?;
            for ant in ants.iter_mut().filter(|a| a.reduces_obtuses) {
                ant.compute_affected(&best);
            }
            let winners = resolve_conflicts(&mut ants);

            let obtuse_before = best_obtuse;
            for &w in &winners {
                let Some(candidate) = ants[w].candidate else {
                    continue;
                };
                let steiner_before = tally.steiner_count(&best);
                insert_candidate(&mut best, &region, &candidate)?;
                candidate.update_boundary(&mut region);
                best_obtuse = count_obtuse(&best, &region);
                tally.convergence.improve(steiner_before, best_obtuse);
                tally.usage.record(candidate.method);
            }
            if !winners.is_empty() {
                best_energy = model.energy(best_obtuse, tally.steiner_count(&best));
                tally.energy_history.push(best_energy);
                tracing::debug!(
                    cycle,
                    winners = winners.len(),
                    obtuse = best_obtuse,
                    energy = best_energy,
                    "colony committed winners"
                );
            }

            trails.reinforce(
                winners.iter().map(|&w| (ants[w].method, ants[w].energy)),
                config.evaporation,
            );
            tracing::trace!(cycle, tau = ?trails.values(), "pheromones updated");

            if best_obtuse < obtuse_before {
                stagnant = 0;
                continue;
            }
            stagnant += 1;
            if stagnant >= config.stagnation_cycles {
                stagnant = 0;
                if config.randomize {
                    try_escape(
                        &mut best,
                        &region,
                        &mut rng,
                        config,
                        &mut tally,
                        &mut best_obtuse,
                        &mut best_energy,
                    )?;
                }
            }
        }

        tracing::info!(
            obtuse = best_obtuse,
            cycles = tally.iterations,
            tau = ?trails.values(),
            "ant colony finished"
        );
        Ok(tally.finish(best, region, model))
    }
}

/// Scores every planned ant against the incumbent. Plans are drawn up front,
/// so parallel evaluation yields the same ants as sequential evaluation.
fn evaluate_ants(
    best: &Triangulation,
    region: &Boundary,
    plans: &[AntPlan],
    model: &EnergyModel,
    initial_vertices: usize,
    best_energy: f64,
    parallel: bool,
) -> Result<Vec<Ant>, OptimizeError> {
    #[cfg(feature = "parallel")]
    if parallel {
        use rayon::prelude::*;
        return plans
            .par_iter()
            .map(|&plan| Ant::evaluate(best, region, plan, model, initial_vertices, best_energy))
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    plans
        .iter()
        .map(|&plan| Ant::evaluate(best, region, plan, model, initial_vertices, best_energy))
        .collect()
}

/// Randomized escape on a copy of the incumbent, adopted only if it strictly
/// lowers the obtuse count.
fn try_escape<R: rand::Rng>(
    best: &mut Triangulation,
    region: &Boundary,
    rng: &mut R,
    config: &AcoConfig,
    tally: &mut Tally,
    best_obtuse: &mut usize,
    best_energy: &mut f64,
) -> Result<(), OptimizeError> {
    let mut trial = best.clone();
    let Some(point) = escape(&mut trial, region, rng, &config.escape)? else {
        return Ok(());
    };
    let obtuse = count_obtuse(&trial, region);
    if obtuse >= *best_obtuse {
        tracing::trace!(obtuse, best = *best_obtuse, "escape point rejected");
        return Ok(());
    }
    tally.convergence.improve(tally.steiner_count(best), obtuse);
    tally.usage.record_random();
    tally.random_points.push(point);
    *best = trial;
    *best_obtuse = obtuse;
    *best_energy = config.energy.energy(obtuse, tally.steiner_count(best));
    tally.energy_history.push(*best_energy);
    tracing::debug!(obtuse, "escape point adopted after stagnation");
    Ok(())
}
