use super::atom::{AtomProperty, all_atoms_active};
use super::coords::CoordsArray;
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::utils::geometry::{axis_rotation_matrix, geometric_center};
use nalgebra::{Matrix4, Point3, Vector3};
use std::ops::Add;
use std::path::Path;

/// Decides whether an atom takes part in derivative accumulation.
pub type ActivityPredicate = fn(&AtomProperty) -> bool;

/// A molecule moved as one rigid unit.
///
/// Positions live in a [`CoordsArray`] and are index-aligned with the atom
/// properties and the per-atom force accumulator. Pose operations only touch the
/// accumulated transform; properties and forces are never reordered.
#[derive(Debug, Clone)]
pub struct RigidBody {
    coords: CoordsArray,
    atoms: Vec<AtomProperty>,
    forces: Vec<Vector3<f64>>,
    active: ActivityPredicate,
    description: String,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            coords: CoordsArray::new(),
            atoms: Vec::new(),
            forces: Vec::new(),
            active: all_atoms_active,
            description: String::new(),
        }
    }

    /// Reads a body from a PDB file; the description is set to the file path.
    pub fn from_pdb<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        let path = path.as_ref();
        let mut body = PdbFile::read_from_path(path)?;
        body.description = path.display().to_string();
        Ok(body)
    }

    /// Appends an atom at the world position `position`.
    pub fn add_atom(&mut self, property: AtomProperty, position: Point3<f64>) {
        self.coords.push(position);
        self.atoms.push(property);
        self.forces.push(Vector3::zeros());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn translate(&mut self, translation: &Vector3<f64>) {
        self.coords.translate(translation);
    }

    /// Rotates by `theta` radians around the axis running from `a` to `b`.
    pub fn rotate(&mut self, a: &Point3<f64>, b: &Point3<f64>, theta: f64) {
        self.coords.apply_matrix(&axis_rotation_matrix(a, b, theta));
    }

    pub fn rotate_euler(&mut self, phi: f64, ssi: f64, rot: f64) {
        self.coords.rotate_euler(phi, ssi, rot);
    }

    pub fn apply_matrix(&mut self, matrix: &Matrix4<f64>) {
        self.coords.apply_matrix(matrix);
    }

    pub fn reset_matrix(&mut self) {
        self.coords.reset_matrix();
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        self.coords.matrix()
    }

    pub fn coords_array(&self) -> &CoordsArray {
        &self.coords
    }

    #[inline]
    pub fn coords(&self, i: usize) -> Point3<f64> {
        self.coords.coords(i)
    }

    pub fn world_coords(&self) -> &[Point3<f64>] {
        self.coords.world_coords()
    }

    pub fn set_coords(&mut self, i: usize, position: Point3<f64>) {
        self.coords.set_coords(i, position);
    }

    pub fn atom(&self, i: usize) -> &AtomProperty {
        &self.atoms[i]
    }

    pub fn atoms(&self) -> &[AtomProperty] {
        &self.atoms
    }

    pub fn set_atom(&mut self, i: usize, property: AtomProperty) {
        self.atoms[i] = property;
    }

    #[inline]
    pub fn category(&self, i: usize) -> usize {
        self.atoms[i].category
    }

    #[inline]
    pub fn charge(&self, i: usize) -> f64 {
        self.atoms[i].charge
    }

    /// Replaces the predicate used by [`RigidBody::is_atom_active`].
    pub fn set_activity(&mut self, predicate: ActivityPredicate) {
        self.active = predicate;
    }

    #[inline]
    pub fn is_atom_active(&self, i: usize) -> bool {
        (self.active)(&self.atoms[i])
    }

    pub fn active_atoms(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| self.is_atom_active(i)).collect()
    }

    pub fn reset_forces(&mut self) {
        self.forces.fill(Vector3::zeros());
    }

    #[inline]
    pub fn add_force(&mut self, i: usize, force: &Vector3<f64>) {
        self.forces[i] += force;
    }

    #[inline]
    pub fn force(&self, i: usize) -> Vector3<f64> {
        self.forces[i]
    }

    pub fn forces(&self) -> &[Vector3<f64>] {
        &self.forces
    }

    pub fn find_center(&self) -> Point3<f64> {
        geometric_center(self.world_coords())
    }

    /// Translates the body so that its geometric center sits at the origin.
    pub fn center_to_origin(&mut self) {
        let center = self.find_center();
        self.translate(&(-center.coords));
    }

    /// A copy whose reference frame is the current world frame shifted so the
    /// geometric center is the origin, with an identity transform.
    pub fn centered(&self) -> Self {
        let center = self.find_center();
        let points = self.world_coords().iter().map(|p| p - center.coords).collect();
        Self {
            coords: CoordsArray::from_points(points),
            atoms: self.atoms.clone(),
            forces: vec![Vector3::zeros(); self.len()],
            active: self.active,
            description: self.description.clone(),
        }
    }

    pub fn radius_of_gyration(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let center = self.find_center();
        let sum: f64 = self
            .world_coords()
            .iter()
            .map(|p| (p - center).norm_squared())
            .sum();
        (sum / self.len() as f64).sqrt()
    }

    /// Largest distance from the geometric center to any atom.
    pub fn radius(&self) -> f64 {
        let center = self.find_center();
        self.world_coords()
            .iter()
            .map(|p| (p - center).norm())
            .fold(0.0, f64::max)
    }
}

impl Add<&RigidBody> for &RigidBody {
    type Output = RigidBody;

    /// Appends `rhs`'s atoms after `self`'s. `self` keeps its pose; `rhs`'s atoms
    /// land at their current world positions.
    fn add(self, rhs: &RigidBody) -> RigidBody {
        let mut merged = self.clone();
        for (atom, position) in rhs.atoms.iter().zip(rhs.world_coords()) {
            merged.add_atom(atom.clone(), *position);
        }
        merged
    }
}

impl Add for RigidBody {
    type Output = RigidBody;

    fn add(self, rhs: RigidBody) -> RigidBody {
        &self + &rhs
    }
}
