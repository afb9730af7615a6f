use super::ForceField;
use super::derivatives::{
    GeneralizedGradient, GradientConvention, rotational_forces, translational_forces,
};
use super::pairlist::{CutoffPairList, PairList};
use super::params::ParameterTable;
use super::pose::{DockingState, STATE_SIZE};
use super::potentials::{
    ATTRACT_DIELECTRIC, clamped_inverse_r2, screened_coulomb, switched_lennard_jones,
};
use super::term::EnergyTerm;
use crate::core::models::rigid_body::RigidBody;
use crate::core::utils::geometry::AttractEuler;
use nalgebra::{Point3, Vector3};
use std::sync::Arc;
use tracing::{debug, trace};

/// Polarity-switched Attract evaluator.
///
/// Each category pair either keeps its Lennard-Jones well (polarity `1`) or is
/// turned into a purely repulsive saddle (polarity `-1`), switching at the
/// minimum distance. Electrostatics use a distance-dependent dielectric of 15.
///
/// Ligand forces accumulate as `+dE/dx`, so the mapped derivatives are the
/// gradient as-is ([`GradientConvention::Raw`]). Receptor forces receive the
/// opposite contributions.
#[derive(Debug, Clone)]
pub struct AttractForceField<P: PairList = CutoffPairList> {
    receptor: RigidBody,
    centered_ligand: RigidBody,
    moved_ligand: RigidBody,
    ligand_center: Point3<f64>,
    params: Arc<ParameterTable>,
    pairlist: P,
    last_state: Option<[f64; STATE_SIZE]>,
    last_energy: EnergyTerm,
}

impl AttractForceField<CutoffPairList> {
    /// Builds the evaluator with a cutoff pair list taken from the bodies'
    /// current poses. The pair list is not rebuilt when the ligand moves.
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

impl<P: PairList> AttractForceField<P> {
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
        let ligand_center = ligand.find_center();
        let centered_ligand = ligand.centered();
        let moved_ligand = centered_ligand.clone();
        debug!(
            receptor_atoms = receptor.len(),
            ligand_atoms = ligand.len(),
            pairs = pairlist.len(),
            "Initialized polarity-switched force field."
        );
        Self {
            receptor,
            centered_ligand,
            moved_ligand,
            ligand_center,
            params,
            pairlist,
            last_state: None,
            last_energy: EnergyTerm::default(),
        }
    }

    pub fn receptor(&self) -> &RigidBody {
        &self.receptor
    }

    /// The ligand at the pose of the last evaluation.
    pub fn ligand(&self) -> &RigidBody {
        &self.moved_ligand
    }

    pub fn ligand_center(&self) -> Point3<f64> {
        self.ligand_center
    }

    pub fn pairlist(&self) -> &P {
        &self.pairlist
    }

    /// Non-bonded energy of the current poses; fills the force accumulators of
    /// both bodies.
    fn nonbonded(&mut self) -> EnergyTerm {
        let mut ligand_forces = vec![Vector3::zeros(); self.moved_ligand.len()];
        let mut receptor_forces = vec![Vector3::zeros(); self.receptor.len()];
        let mut energy = EnergyTerm::default();

        let receptor_coords = self.receptor.world_coords();
        let ligand_coords = self.moved_ligand.world_coords();

        for k in 0..self.pairlist.len() {
            let pair = self.pairlist.pair(k);
            let (i, j) = (pair.receptor, pair.ligand);

            let mut dx = receptor_coords[i] - ligand_coords[j];
            let (r2, rr2) = clamped_inverse_r2(&dx);
            dx *= rr2;

            let charge = self.receptor.charge(i) * self.moved_ligand.charge(j);
            if charge != 0.0 {
                let et = screened_coulomb(charge, rr2, ATTRACT_DIELECTRIC);
                energy.coulomb += et;
                let fdb = 2.0 * et * dx;
                ligand_forces[j] += fdb;
                receptor_forces[i] -= fdb;
            }

            let coefficients = self
                .params
                .pair(self.receptor.category(i), self.moved_ligand.category(j));
            let (vlj, fb) = switched_lennard_jones(coefficients, r2, rr2);
            energy.vdw += vlj;
            let fdb = fb * dx;
            ligand_forces[j] += fdb;
            receptor_forces[i] -= fdb;
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

impl<P: PairList> ForceField for AttractForceField<P> {
    fn function(&mut self, state: &[f64]) -> f64 {
        let pose = DockingState::from_slice(state);
        pose.apply(&mut self.moved_ligand, &self.ligand_center);
        self.last_energy = self.nonbonded();
        self.last_state = Some(pose.to_array());
        trace!(
            vdw = self.last_energy.vdw,
            coulomb = self.last_energy.coulomb,
            %pose,
            "Evaluated polarity-switched energy."
        );
        self.last_energy.total()
    }

    fn derivatives(&mut self, state: &[f64], gradient: &mut [f64]) {
        if !self.is_current(state) {
            self.function(state);
        }
        let pose = DockingState::from_slice(state);
        let euler = AttractEuler::new(pose.phi, pose.ssi, pose.rot);
        let active = self.centered_ligand.active_atoms();
        GeneralizedGradient {
            rotation: rotational_forces(&euler, &self.centered_ligand, &self.moved_ligand, active),
            translation: translational_forces(&self.moved_ligand),
        }
        .with_convention(self.gradient_convention())
        .write_into(gradient);
    }

    fn gradient_convention(&self) -> GradientConvention {
        GradientConvention::Raw
    }

    fn energy_breakdown(&self) -> EnergyTerm {
        self.last_energy
    }
}
