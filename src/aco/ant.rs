//! A single ant's trial insertion and conflict resolution between ants.

use std::collections::BTreeSet;

use crate::energy::EnergyModel;
use crate::error::OptimizeError;
use crate::quality::count_obtuse;
use crate::region::Boundary;
use crate::steiner::{insert_candidate, propose_with_fallback, SteinerCandidate, SteinerMethod};
use crate::triangulation::{FaceId, FaceKey, Triangulation};

/// Face and generator drawn for one ant before evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntPlan {
    pub face: FaceId,
    pub method: SteinerMethod,
}

/// One ant's private copy of the incumbent after its insertion.
#[derive(Debug, Clone)]
pub struct Ant {
    pub tri: Triangulation,
    pub face: FaceId,
    /// Generator actually used, after fallback.
    pub method: SteinerMethod,
    /// `None` when neither the drawn generator nor its fallback produced an
    /// admissible point; the ant then leaves the mesh untouched.
    pub candidate: Option<SteinerCandidate>,
    pub obtuse: usize,
    pub energy: f64,
    /// Energy change against the incumbent.
    pub delta: f64,
    pub reduces_obtuses: bool,
    pub conflict: bool,
    pub conflict_loser: bool,
    /// Incumbent faces the insertion destroyed.
    pub affected: BTreeSet<FaceKey>,
}

impl Ant {
    /// Applies `plan` to a copy of `incumbent` and scores it.
    ///
    /// `initial_vertices` is the vertex count of the run's input mesh, so the
    /// energy charges every point inserted since the start.
    pub fn evaluate(
        incumbent: &Triangulation,
        region: &Boundary,
        plan: AntPlan,
        model: &EnergyModel,
        initial_vertices: usize,
        best_energy: f64,
    ) -> Result<Self, OptimizeError> {
        let mut tri = incumbent.clone();
        let candidate = propose_with_fallback(plan.method, incumbent, plan.face, region)?;
        let method = candidate.as_ref().map_or(plan.method, |c| c.method);
        if let Some(c) = &candidate {
            insert_candidate(&mut tri, region, c)?;
        }
        let obtuse = count_obtuse(&tri, region);
        let steiner = tri.number_of_vertices().saturating_sub(initial_vertices);
        let energy = model.energy(obtuse, steiner);
        let delta = energy - best_energy;
        Ok(Self {
            tri,
            face: plan.face,
            method,
            candidate,
            obtuse,
            energy,
            delta,
            reduces_obtuses: delta < 0.0,
            conflict: false,
            conflict_loser: false,
            affected: BTreeSet::new(),
        })
    }

    /// Records the finite incumbent faces missing from this ant's mesh.
    pub fn compute_affected(&mut self, incumbent: &Triangulation) {
        let kept: BTreeSet<FaceKey> = self
            .tri
            .finite_faces()
            .map(|f| self.tri.face_key(f))
            .collect();
        self.affected = incumbent
            .finite_faces()
            .map(|f| incumbent.face_key(f))
            .filter(|key| !kept.contains(key))
            .collect();
    }

    /// Whether both ants destroyed a common incumbent face.
    pub fn conflicts_with(&self, other: &Ant) -> bool {
        !self.affected.is_disjoint(&other.affected)
    }

    /// Improving and not beaten by a conflicting ant.
    pub fn is_winner(&self) -> bool {
        self.reduces_obtuses && !self.conflict_loser
    }
}

/// Marks conflicting improving ants and returns the indices of the winners,
/// in ant order.
///
/// Ants are compared pairwise in order. An ant already marked as a loser is
/// not compared again; of two conflicting ants the lower energy wins, with
/// ties going to the earlier ant. Improving ants without a conflict win
/// outright.
pub fn resolve_conflicts(ants: &mut [Ant]) -> Vec<usize> {
    let n = ants.len();
    for i in 0..n {
        for j in i + 1..n {
            if !(ants[i].reduces_obtuses && ants[j].reduces_obtuses) {
                continue;
            }
            if !ants[i].conflicts_with(&ants[j]) {
                continue;
            }
            if ants[i].conflict_loser || ants[j].conflict_loser {
                continue;
            }
            ants[i].conflict = true;
            ants[j].conflict = true;
            if ants[i].energy <= ants[j].energy {
                ants[j].conflict_loser = true;
            } else {
                ants[i].conflict_loser = true;
                break;
            }
        }
    }
    (0..n).filter(|&i| ants[i].is_winner()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{p, zigzag};
    use crate::triangulation::VertexId;

    fn ant(energy: f64, affected: &[[usize; 3]]) -> Ant {
        let tri = Triangulation::from_points(&[p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)]).unwrap();
        Ant {
            tri,
            face: FaceId(0),
            method: SteinerMethod::Projection,
            candidate: None,
            obtuse: 0,
            energy,
            delta: -1.0,
            reduces_obtuses: true,
            conflict: false,
            conflict_loser: false,
            affected: affected
                .iter()
                .map(|&[a, b, c]| FaceKey::new([VertexId(a), VertexId(b), VertexId(c)]))
                .collect(),
        }
    }

    #[test]
    fn test_disjoint_ants_all_win() {
        let mut ants = vec![ant(1.0, &[[1, 2, 3]]), ant(2.0, &[[4, 5, 6]])];
        assert_eq!(resolve_conflicts(&mut ants), vec![0, 1]);
        assert!(!ants[0].conflict && !ants[1].conflict);
    }

    #[test]
    fn test_lower_energy_wins_conflict() {
        let mut ants = vec![ant(3.0, &[[1, 2, 3]]), ant(2.0, &[[1, 2, 3], [2, 3, 4]])];
        assert_eq!(resolve_conflicts(&mut ants), vec![1]);
        assert!(ants[0].conflict_loser);
        assert!(ants[1].conflict && !ants[1].conflict_loser);
    }

    #[test]
    fn test_tie_goes_to_earlier_ant() {
        let mut ants = vec![ant(2.0, &[[1, 2, 3]]), ant(2.0, &[[1, 2, 3]])];
        assert_eq!(resolve_conflicts(&mut ants), vec![0]);
    }

    #[test]
    fn test_loser_is_not_compared_again() {
        // 0 beats 1; 1 and 2 overlap but 1 already lost, so 2 stays clear.
        let mut ants = vec![
            ant(1.0, &[[1, 2, 3]]),
            ant(2.0, &[[1, 2, 3], [7, 8, 9]]),
            ant(3.0, &[[7, 8, 9]]),
        ];
        assert_eq!(resolve_conflicts(&mut ants), vec![0, 2]);
    }

    #[test]
    fn test_non_improving_ants_never_win() {
        let mut ants = vec![ant(1.0, &[[1, 2, 3]]), ant(0.5, &[[4, 5, 6]])];
        ants[1].reduces_obtuses = false;
        assert_eq!(resolve_conflicts(&mut ants), vec![0]);
    }

    #[test]
    fn test_evaluate_records_destroyed_faces() {
        let (tri, region, _) = zigzag();
        let model = EnergyModel::default();
        let face = crate::quality::obtuse_faces(&tri, &region)[0];
        let best_energy = model.energy(count_obtuse(&tri, &region), 0);
        let plan = AntPlan {
            face,
            method: SteinerMethod::Centroid,
        };
        let mut a = Ant::evaluate(&tri, &region, plan, &model, tri.number_of_vertices(), best_energy)
            .unwrap();
        assert!(a.candidate.is_some());
        assert_eq!(a.tri.number_of_vertices(), tri.number_of_vertices() + 1);
        a.compute_affected(&tri);
        assert!(a.affected.contains(&tri.face_key(face)));
        assert!(a.conflicts_with(&a.clone()));
    }
}
