use super::ForceField;
use super::derivatives::{
    GeneralizedGradient, GradientConvention, rotational_forces, translational_forces,
};
use super::pairlist::{CutoffPairList, PairList};
use super::params::ParameterTable;
use super::pose::{DockingState, STATE_SIZE};
use super::potentials::{
    LEGACY_DIELECTRIC, clamped_inverse_r2, lennard_jones_8_6, quartic_restraint,
    screened_coulomb,
};
use super::term::EnergyTerm;
use crate::core::models::rigid_body::RigidBody;
use crate::core::utils::geometry::AttractEuler;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use tracing::{debug, trace};

/// Pulls one ligand atom toward the receptor center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restraint {
    /// Spring constant; zero disables the term.
    pub strength: f64,
    /// Ligand atom closest to the receptor center when the evaluator was built.
    pub ligand_atom: usize,
    pub receptor_center: Point3<f64>,
}

/// Single-branch 8-6 evaluator with a dielectric of 20 and an optional restraint.
///
/// Ligand forces accumulate as `-dE/dx`; the mapped derivatives are negated to
/// yield the gradient ([`GradientConvention::Negated`]).
#[derive(Debug, Clone)]
pub struct LegacyForceField<P: PairList = CutoffPairList> {
    receptor: RigidBody,
    centered_ligand: RigidBody,
    moved_ligand: RigidBody,
    ligand_center: Point3<f64>,
    params: Arc<ParameterTable>,
    pairlist: P,
    restraint: Option<Restraint>,
    last_state: Option<[f64; STATE_SIZE]>,
    last_energy: EnergyTerm,
}

impl LegacyForceField<CutoffPairList> {
    pub fn new(
        receptor: RigidBody,
        ligand: RigidBody,
        params: Arc<ParameterTable>,
        cutoff: f64,
    ) -> Self {
        let pairlist = CutoffPairList::build(&receptor, &ligand, cutoff);
        Self::with_pairlist(receptor, ligand, params, pairlist)
    }
}

impl<P: PairList> LegacyForceField<P> {
    pub fn with_pairlist(
        receptor: RigidBody,
        ligand: RigidBody,
        params: Arc<ParameterTable>,
        pairlist: P,
    ) -> Self {
        debug_assert!(
            receptor
                .atoms()
                .iter()
                .chain(ligand.atoms())
                .all(|a| a.category < params.size()),
            "atom category outside the parameter table"
        );
        let receptor_center = receptor.find_center();
        let restraint = nearest_atom(ligand.world_coords(), &receptor_center).map(|index| {
            Restraint {
                strength: 0.0,
                ligand_atom: index,
                receptor_center,
            }
        });

        let ligand_center = ligand.find_center();
        let centered_ligand = ligand.centered();
        let moved_ligand = centered_ligand.clone();
        debug!(
            receptor_atoms = receptor.len(),
            ligand_atoms = ligand.len(),
            pairs = pairlist.len(),
            "Initialized legacy force field."
        );
        Self {
            receptor,
            centered_ligand,
            moved_ligand,
            ligand_center,
            params,
            pairlist,
            restraint,
            last_state: None,
            last_energy: EnergyTerm::default(),
        }
    }

    /// Sets the restraint spring constant. Zero (the default) disables it.
    pub fn set_restraint(&mut self, strength: f64) {
        if let Some(restraint) = self.restraint.as_mut() {
            restraint.strength = strength;
        }
        self.last_state = None;
    }

    pub fn restraint(&self) -> Option<&Restraint> {
        self.restraint.as_ref()
    }

    pub fn receptor(&self) -> &RigidBody {
        &self.receptor
    }

    /// The ligand at the pose of the last evaluation.
    pub fn ligand(&self) -> &RigidBody {
        &self.moved_ligand
    }

    pub fn pairlist(&self) -> &P {
        &self.pairlist
    }

    fn nonbonded(&mut self) -> EnergyTerm {
        let mut ligand_forces = vec![Vector3::zeros(); self.moved_ligand.len()];
        let mut receptor_forces = vec![Vector3::zeros(); self.receptor.len()];
        let mut energy = EnergyTerm::default();

        let receptor_coords = self.receptor.world_coords();
        let ligand_coords = self.moved_ligand.world_coords();

        for k in 0..self.pairlist.len() {
            let pair = self.pairlist.pair(k);
            let (i, j) = (pair.receptor, pair.ligand);

            let mut dx = ligand_coords[j] - receptor_coords[i];
            let (_, rr2) = clamped_inverse_r2(&dx);
            dx *= rr2;

            let coefficients = self
                .params
                .pair(self.receptor.category(i), self.moved_ligand.category(j));
            let (vlj, fb) = lennard_jones_8_6(coefficients.rc, coefficients.ac, rr2);
            energy.vdw += vlj;
            let mut fdb = fb * dx;

            let charge = self.receptor.charge(i) * self.moved_ligand.charge(j);
            if charge.abs() > 0.0 {
                let et = screened_coulomb(charge, rr2, LEGACY_DIELECTRIC);
                energy.coulomb += et;
                fdb += 2.0 * et * dx;
            }

            ligand_forces[j] += fdb;
            receptor_forces[i] -= fdb;
        }

        if let Some(restraint) = self.restraint.filter(|r| r.strength != 0.0) {
            let v = restraint.receptor_center - ligand_coords[restraint.ligand_atom];
            let (e, force) = quartic_restraint(restraint.strength, &v);
            energy.restraint = e;
            ligand_forces[restraint.ligand_atom] += force;
        }

        self.moved_ligand.reset_forces();
        for (j, f) in ligand_forces.iter().enumerate() {
            self.moved_ligand.add_force(j, f);
        }
        self.receptor.reset_forces();
        for (i, f) in receptor_forces.iter().enumerate() {
            self.receptor.add_force(i, f);
        }
        energy
    }

    fn is_current(&self, state: &[f64]) -> bool {
        self.last_state
            .is_some_and(|last| last.as_slice() == &state[..STATE_SIZE])
    }
}

fn nearest_atom(points: &[Point3<f64>], target: &Point3<f64>) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, p)| (i, (p - target).norm_squared()))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, best_d)) if best_d <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}

impl<P: PairList> ForceField for LegacyForceField<P> {
    fn function(&mut self, state: &[f64]) -> f64 {
        let pose = DockingState::from_slice(state);
        pose.apply(&mut self.moved_ligand, &self.ligand_center);
        self.last_energy = self.nonbonded();
        self.last_state = Some(pose.to_array());
        trace!(
            vdw = self.last_energy.vdw,
            coulomb = self.last_energy.coulomb,
            restraint = self.last_energy.restraint,
            %pose,
            "Evaluated legacy energy."
        );
        self.last_energy.total()
    }

    fn derivatives(&mut self, state: &[f64], gradient: &mut [f64]) {
        if !self.is_current(state) {
            self.function(state);
        }
        let pose = DockingState::from_slice(state);
        let euler = AttractEuler::new(pose.phi, pose.ssi, pose.rot);
        let atoms = 0..self.centered_ligand.len();
        GeneralizedGradient {
            rotation: rotational_forces(&euler, &self.centered_ligand, &self.moved_ligand, atoms),
            translation: translational_forces(&self.moved_ligand),
        }
        .with_convention(self.gradient_convention())
        .write_into(gradient);
    }

    fn gradient_convention(&self) -> GradientConvention {
        GradientConvention::Negated
    }

    fn energy_breakdown(&self) -> EnergyTerm {
        self.last_energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::AtomProperty;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
    }

    fn legacy_params() -> Arc<ParameterTable> {
        let content = "\
1 1.2 0.8 0
2 1.5 1.0 0
3 1.9 0.6 0
4 2.1 1.1 0
";
        Arc::new(ParameterTable::parse_legacy(content, "test").unwrap())
    }

    fn body(atoms: &[([f64; 3], usize, f64)]) -> RigidBody {
        let mut body = RigidBody::new();
        for (k, (p, category, charge)) in atoms.iter().enumerate() {
            let property = AtomProperty::new("CA", "ALA", k as i32, k as i32)
                .with_category(*category)
                .with_charge(*charge);
            body.add_atom(property, Point3::new(p[0], p[1], p[2]));
        }
        body
    }

    fn receptor() -> RigidBody {
        body(&[
            ([0.0, 0.0, 0.0], 0, 0.0),
            ([3.8, 0.0, 0.0], 1, 1.0),
            ([1.9, 3.3, 0.0], 2, -1.0),
            ([1.9, 1.1, 3.1], 3, 0.0),
        ])
    }

    fn ligand() -> RigidBody {
        body(&[
            ([1.5, 1.0, 7.5], 3, 1.0),
            ([4.2, 1.8, 8.0], 1, 0.0),
            ([2.0, 3.9, 8.4], 0, -1.0),
        ])
    }

    fn reference_energy(receptor: &RigidBody, ligand: &RigidBody, params: &ParameterTable) -> f64 {
        let mut total = 0.0;
        for i in 0..receptor.len() {
            for j in 0..ligand.len() {
                let r2 = (receptor.coords(i) - ligand.coords(j)).norm_squared().max(0.001);
                let pair = params.pair(receptor.category(i), ligand.category(j));
                total += pair.rc / r2.powi(4) - pair.ac / r2.powi(3);
                total += receptor.charge(i) * ligand.charge(j) * 332.053986 / 20.0 / r2;
            }
        }
        total
    }

    #[test]
    fn zero_state_energy_matches_direct_pair_sum() {
        let params = legacy_params();
        let mut ff = LegacyForceField::new(receptor(), ligand(), params.clone(), 50.0);
        let energy = ff.function(&[0.0; 6]);
        let expected = reference_energy(&receptor(), &ligand(), &params);
        assert!(f64_approx_equal(energy, expected, TOLERANCE));
        assert_eq!(ff.energy_breakdown().restraint, 0.0);
    }

    #[test]
    fn restraint_targets_ligand_atom_nearest_receptor_center() {
        let ff = LegacyForceField::new(receptor(), ligand(), legacy_params(), 50.0);
        let restraint = ff.restraint().unwrap();
        assert_eq!(restraint.ligand_atom, 0);
        assert_eq!(restraint.strength, 0.0);
        assert!((restraint.receptor_center - Point3::new(1.9, 1.1, 0.775)).norm() < 1e-12);
    }

    #[test]
    fn restraint_adds_quartic_energy() {
        let mut ff = LegacyForceField::new(receptor(), ligand(), legacy_params(), 50.0);
        let without = ff.function(&[0.0; 6]);
        ff.set_restraint(0.01);
        let with = ff.function(&[0.0; 6]);
        let v = Point3::new(1.9, 1.1, 0.775) - ff.ligand().coords(0);
        let expected = 0.01 * v.norm_squared().powi(2);
        assert!(f64_approx_equal(ff.energy_breakdown().restraint, expected, TOLERANCE));
        assert!(f64_approx_equal(with - without, expected, TOLERANCE));
    }

    #[test]
    fn analytic_derivatives_agree_with_central_differences() {
        let mut ff = LegacyForceField::new(receptor(), ligand(), legacy_params(), 50.0);
        ff.set_restraint(0.002);
        for state in [
            [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            [0.4, 0.8, -0.6, 0.3, 0.2, -0.5],
            [-1.3, 2.2, 0.7, 1.0, -1.0, 0.5],
        ] {
            let mut analytic = [0.0; 6];
            let mut numeric = [0.0; 6];
            ff.function(&state);
            ff.derivatives(&state, &mut analytic);
            ff.numerical_derivatives(&state, &mut numeric);
            for k in 0..6 {
                assert!(
                    f64_approx_equal(analytic[k], numeric[k], 1e-3),
                    "component {k}: analytic {} numeric {}",
                    analytic[k],
                    numeric[k]
                );
            }
        }
    }

    #[test]
    fn gradient_is_negated_mapping_of_ligand_forces() {
        let mut ff = LegacyForceField::new(receptor(), ligand(), legacy_params(), 50.0);
        let mut gradient = [0.0; 6];
        ff.derivatives(&[0.0; 6], &mut gradient);
        let summed = ff
            .ligand()
            .forces()
            .iter()
            .fold(Vector3::zeros(), |acc, f| acc + f);
        assert_eq!(ff.gradient_convention(), GradientConvention::Negated);
        assert_eq!(&gradient[3..6], (-summed).as_slice());
    }

    #[test]
    fn empty_ligand_has_no_restraint_and_zero_energy() {
        let mut ff = LegacyForceField::new(receptor(), RigidBody::new(), legacy_params(), 50.0);
        ff.set_restraint(1.0);
        assert!(ff.restraint().is_none());
        assert_eq!(ff.function(&[0.0; 6]), 0.0);
    }

    #[test]
    fn nearest_atom_prefers_first_of_equal_distances() {
        let points = [Point3::new(1.0, 0.0, 0.0), Point3::new(-1.0, 0.0, 0.0)];
        assert_eq!(nearest_atom(&points, &Point3::origin()), Some(0));
        assert_eq!(nearest_atom(&[], &Point3::origin()), None);
    }
}
