use crate::core::models::rigid_body::RigidBody;
use kiddo::{KdTree, SquaredEuclidean};
use tracing::debug;

/// Indices of one candidate interacting pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomPair {
    pub receptor: usize,
    pub ligand: usize,
}

impl AtomPair {
    pub fn new(receptor: usize, ligand: usize) -> Self {
        Self { receptor, ligand }
    }
}

/// Enumeration of receptor/ligand atom pairs consumed by the evaluators.
///
/// Each qualifying pair appears exactly once; evaluators make no assumption
/// about the order.
pub trait PairList {
    fn len(&self) -> usize;

    fn pair(&self, k: usize) -> AtomPair;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PairList for Vec<AtomPair> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn pair(&self, k: usize) -> AtomPair {
        self[k]
    }
}

/// Pairs of active atoms closer than a cutoff, sorted by `(receptor, ligand)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutoffPairList {
    pairs: Vec<AtomPair>,
    cutoff: f64,
}

impl CutoffPairList {
    /// Lists every active receptor atom and active ligand atom whose current world
    /// distance is at most `cutoff`.
    pub fn build(receptor: &RigidBody, ligand: &RigidBody, cutoff: f64) -> Self {
        let cutoff_sq = cutoff * cutoff;
        let ligand_active = ligand.active_atoms();
        if ligand_active.is_empty() || receptor.is_empty() {
            return Self {
                pairs: Vec::new(),
                cutoff,
            };
        }

        let ligand_coords = ligand.world_coords();
        let positions: Vec<[f64; 3]> = ligand_active
            .iter()
            .map(|&j| {
                let p = ligand_coords[j];
                [p.x, p.y, p.z]
            })
            .collect();
        let kdtree: KdTree<f64, 3> = (&positions).into();
        // Widened so the exact test below decides pairs sitting on the boundary.
        let query_radius = cutoff_sq * (1.0 + 1e-9) + 1e-12;

        let mut pairs = Vec::new();
        for i in receptor.active_atoms() {
            let rec = receptor.coords(i);
            for neighbour in kdtree.within_unsorted::<SquaredEuclidean>(&[rec.x, rec.y, rec.z], query_radius) {
                let j = ligand_active[neighbour.item as usize];
                if (ligand_coords[j] - rec).norm_squared() <= cutoff_sq {
                    pairs.push(AtomPair::new(i, j));
                }
            }
        }
        pairs.sort_unstable();

        debug!(pairs = pairs.len(), cutoff, "Built cutoff pair list.");
        Self { pairs, cutoff }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn pairs(&self) -> &[AtomPair] {
        &self.pairs
    }
}

impl PairList for CutoffPairList {
    fn len(&self) -> usize {
        self.pairs.len()
    }

    fn pair(&self, k: usize) -> AtomPair {
        self.pairs[k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomProperty;
    use nalgebra::{Point3, Vector3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn body_from(points: &[Point3<f64>]) -> RigidBody {
        let mut body = RigidBody::new();
        for (k, p) in points.iter().enumerate() {
            let name = if k % 3 == 2 { "CB" } else { "CA" };
            body.add_atom(AtomProperty::new(name, "GLY", k as i32, k as i32), *p);
        }
        body
    }

    fn random_points(rng: &mut StdRng, n: usize, spread: f64) -> Vec<Point3<f64>> {
        (0..n)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-spread..spread),
                    rng.gen_range(-spread..spread),
                    rng.gen_range(-spread..spread),
                )
            })
            .collect()
    }

    fn brute_force(receptor: &RigidBody, ligand: &RigidBody, cutoff: f64) -> Vec<AtomPair> {
        let mut pairs = Vec::new();
        for i in receptor.active_atoms() {
            for j in ligand.active_atoms() {
                if (receptor.coords(i) - ligand.coords(j)).norm() <= cutoff {
                    pairs.push(AtomPair::new(i, j));
                }
            }
        }
        pairs
    }

    fn ca_only(atom: &AtomProperty) -> bool {
        atom.atom_type == "CA"
    }

    #[test]
    fn build_matches_brute_force_enumeration() {
        let mut rng = StdRng::seed_from_u64(7);
        let receptor = body_from(&random_points(&mut rng, 60, 12.0));
        let ligand = body_from(&random_points(&mut rng, 40, 12.0));
        let list = CutoffPairList::build(&receptor, &ligand, 6.0);
        assert!(!list.is_empty());
        assert_eq!(list.pairs(), brute_force(&receptor, &ligand, 6.0).as_slice());
    }

    #[test]
    fn build_uses_current_world_positions() {
        let receptor = body_from(&[Point3::new(0.0, 0.0, 0.0)]);
        let mut ligand = body_from(&[Point3::new(20.0, 0.0, 0.0)]);
        assert!(CutoffPairList::build(&receptor, &ligand, 5.0).is_empty());
        ligand.translate(&Vector3::new(-18.0, 0.0, 0.0));
        let list = CutoffPairList::build(&receptor, &ligand, 5.0);
        assert_eq!(list.len(), 1);
        assert_eq!(list.pair(0), AtomPair::new(0, 0));
    }

    #[test]
    fn build_includes_pairs_exactly_at_cutoff() {
        let receptor = body_from(&[Point3::new(0.0, 0.0, 0.0)]);
        let ligand = body_from(&[Point3::new(0.0, 4.0, 0.0)]);
        assert_eq!(CutoffPairList::build(&receptor, &ligand, 4.0).len(), 1);
    }

    #[test]
    fn build_skips_inactive_atoms() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut receptor = body_from(&random_points(&mut rng, 30, 5.0));
        let mut ligand = body_from(&random_points(&mut rng, 30, 5.0));
        receptor.set_activity(ca_only);
        ligand.set_activity(ca_only);
        let list = CutoffPairList::build(&receptor, &ligand, 100.0);
        assert_eq!(list.len(), 20 * 20);
        assert!(list
            .pairs()
            .iter()
            .all(|p| receptor.is_atom_active(p.receptor) && ligand.is_atom_active(p.ligand)));
    }

    #[test]
    fn build_with_empty_body_is_empty() {
        let receptor = body_from(&[Point3::origin()]);
        let list = CutoffPairList::build(&receptor, &RigidBody::new(), 10.0);
        assert!(list.is_empty());
        assert_eq!(list.cutoff(), 10.0);
    }

    #[test]
    fn vec_of_pairs_is_a_pair_list() {
        let pairs = vec![AtomPair::new(2, 3), AtomPair::new(0, 1)];
        assert_eq!(PairList::len(&pairs), 2);
        assert_eq!(pairs.pair(1), AtomPair::new(0, 1));
        assert!(!PairList::is_empty(&pairs));
    }
}
