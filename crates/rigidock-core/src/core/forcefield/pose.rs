use crate::core::models::rigid_body::RigidBody;
use nalgebra::{Point3, Vector3};
use std::fmt;

/// Number of rigid-body degrees of freedom of a docked ligand.
pub const STATE_SIZE: usize = 6;

/// Six-variable ligand pose: three Attract Euler angles followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DockingState {
    pub phi: f64,
    pub ssi: f64,
    pub rot: f64,
    pub translation: Vector3<f64>,
}

impl DockingState {
    pub fn new(phi: f64, ssi: f64, rot: f64, translation: Vector3<f64>) -> Self {
        Self {
            phi,
            ssi,
            rot,
            translation,
        }
    }

    /// Reads `[phi, ssi, rot, x, y, z]` from the first six values.
    ///
    /// # Panics
    ///
    /// Panics if `values` holds fewer than six entries.
    pub fn from_slice(values: &[f64]) -> Self {
        debug_assert!(values.len() >= STATE_SIZE, "state holds {} values", values.len());
        Self {
            phi: values[0],
            ssi: values[1],
            rot: values[2],
            translation: Vector3::new(values[3], values[4], values[5]),
        }
    }

    pub fn to_array(&self) -> [f64; STATE_SIZE] {
        [
            self.phi,
            self.ssi,
            self.rot,
            self.translation.x,
            self.translation.y,
            self.translation.z,
        ]
    }

    /// Moves `moved` to this pose.
    ///
    /// `moved` must share its reference frame with the centered ligand; its
    /// transform is rebuilt from scratch as `T(t) * T(center) * E(phi, ssi, rot)`.
    pub fn apply(&self, moved: &mut RigidBody, center: &Point3<f64>) {
        moved.reset_matrix();
        moved.rotate_euler(self.phi, self.ssi, self.rot);
        moved.translate(&center.coords);
        moved.translate(&self.translation);
    }
}

impl fmt::Display for DockingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "phi={:.6} ssi={:.6} rot={:.6} t=({:.4}, {:.4}, {:.4})",
            self.phi,
            self.ssi,
            self.rot,
            self.translation.x,
            self.translation.y,
            self.translation.z
        )
    }
}
