use crate::core::models::rigid_body::RigidBody;
use crate::core::utils::geometry::AttractEuler;
use nalgebra::Vector3;
use tracing::trace;

/// Squared magnitude above which the summed translational force is reduced.
pub const FORCE_LIMIT_SQUARED: f64 = 1.0e18;
const FORCE_REDUCTION_FACTOR: f64 = 0.01;
const FORCE_REDUCTION_PASSES: usize = 3;

/// How an evaluator's accumulated ligand forces relate to the energy gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientConvention {
    /// Accumulated forces are `+dE/dx`; the mapped vector is the gradient.
    Raw,
    /// Accumulated forces are `-dE/dx`; the mapped vector is negated.
    Negated,
}

/// Derivatives of the energy with respect to the six rigid-body state variables.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GeneralizedGradient {
    /// Components along `phi`, `ssi` and `rot`.
    pub rotation: Vector3<f64>,
    /// Components along `x`, `y` and `z`.
    pub translation: Vector3<f64>,
}

impl GeneralizedGradient {
    pub fn negated(self) -> Self {
        Self {
            rotation: -self.rotation,
            translation: -self.translation,
        }
    }

    pub fn with_convention(self, convention: GradientConvention) -> Self {
        match convention {
            GradientConvention::Raw => self,
            GradientConvention::Negated => self.negated(),
        }
    }

    /// Writes `[d/dphi, d/dssi, d/drot, d/dx, d/dy, d/dz]` into the first six slots.
    pub fn write_into(&self, out: &mut [f64]) {
        debug_assert!(out.len() >= 6, "gradient buffer holds {} values", out.len());
        out[..3].copy_from_slice(self.rotation.as_slice());
        out[3..6].copy_from_slice(self.translation.as_slice());
    }

    pub fn to_array(&self) -> [f64; 6] {
        let mut out = [0.0; 6];
        self.write_into(&mut out);
        out
    }
}

/// Sum of all per-atom forces on the body, reduced by a factor of 100 (up to
/// three times) while its squared magnitude exceeds [`FORCE_LIMIT_SQUARED`].
pub fn translational_forces(body: &RigidBody) -> Vector3<f64> {
    let mut total = body
        .forces()
        .iter()
        .fold(Vector3::zeros(), |acc, f| acc + f);
    for _ in 0..FORCE_REDUCTION_PASSES {
        if total.norm_squared() > FORCE_LIMIT_SQUARED {
            trace!(magnitude = total.norm(), "Reducing oversized translational force.");
            total *= FORCE_REDUCTION_FACTOR;
        }
    }
    total
}

/// Projects per-atom forces onto the three Euler angles.
///
/// `centered` supplies the unrotated, centered reference positions and `moved`
/// the forces accumulated at the posed positions; only the listed atoms
/// contribute.
pub fn rotational_forces(
    euler: &AttractEuler,
    centered: &RigidBody,
    moved: &RigidBody,
    atoms: impl IntoIterator<Item = usize>,
) -> Vector3<f64> {
    let reference = centered.world_coords();
    atoms.into_iter().fold(Vector3::zeros(), |acc, i| {
        let projection = euler.jacobian(&reference[i]);
        acc + projection.transpose() * moved.force(i)
    })
}
