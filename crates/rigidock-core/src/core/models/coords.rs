use crate::core::utils::geometry::{
    AttractEuler, format_matrix, inverse_transform_point, is_rigid_transform, transform_point,
    translation_matrix,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::cell::OnceCell;

/// Atom positions stored as untransformed reference coordinates plus one shared
/// accumulated rigid transform.
///
/// World coordinates are materialized lazily: every mutator that changes the
/// transform or a reference coordinate empties the cache, and the next read
/// recomputes all world coordinates at once. An empty cache is the dirty state.
///
/// Transforms compose by left-multiplication, so applying `M` to a collection
/// whose accumulated transform is `C` leaves it at `M * C`.
#[derive(Debug, Clone)]
pub struct CoordsArray {
    reference: Vec<Point3<f64>>,
    matrix: Matrix4<f64>,
    moved: OnceCell<Vec<Point3<f64>>>,
}

impl Default for CoordsArray {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordsArray {
    pub fn new() -> Self {
        Self {
            reference: Vec::new(),
            matrix: Matrix4::identity(),
            moved: OnceCell::new(),
        }
    }

    /// Creates a collection whose reference frame is the given positions and whose
    /// transform is the identity.
    pub fn from_points(points: Vec<Point3<f64>>) -> Self {
        Self {
            reference: points,
            matrix: Matrix4::identity(),
            moved: OnceCell::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    /// Appends a world-space coordinate.
    ///
    /// The point is back-projected through the current transform, so its world
    /// position reads back as `point`. Invalidates the cache.
    pub fn push(&mut self, point: Point3<f64>) {
        let reference = self.back_project(&point);
        self.reference.push(reference);
        self.invalidate();
    }

    /// Composes a pure translation into the transform. Invalidates the cache.
    pub fn translate(&mut self, translation: &Vector3<f64>) {
        self.apply_matrix(&translation_matrix(translation));
    }

    /// Composes the Attract Euler rotation `(phi, ssi, rot)` into the transform.
    /// Invalidates the cache.
    pub fn rotate_euler(&mut self, phi: f64, ssi: f64, rot: f64) {
        self.apply_matrix(&AttractEuler::new(phi, ssi, rot).matrix());
    }

    /// Left-multiplies `matrix` into the transform. Invalidates the cache.
    pub fn apply_matrix(&mut self, matrix: &Matrix4<f64>) {
        self.matrix = matrix * self.matrix;
        self.invalidate();
    }

    /// Restores the identity transform. Invalidates the cache.
    pub fn reset_matrix(&mut self) {
        self.matrix = Matrix4::identity();
        self.invalidate();
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn reference_coords(&self) -> &[Point3<f64>] {
        &self.reference
    }

    /// World coordinate of atom `i`. May recompute the cache.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    #[inline]
    pub fn coords(&self, i: usize) -> Point3<f64> {
        self.world_coords()[i]
    }

    /// All world coordinates, index-aligned with the reference frame. May
    /// recompute the cache.
    pub fn world_coords(&self) -> &[Point3<f64>] {
        self.moved.get_or_init(|| {
            self.reference
                .iter()
                .map(|p| transform_point(&self.matrix, p))
                .collect()
        })
    }

    /// Moves atom `i` to the world position `point` by rewriting its reference
    /// coordinate; the transform is left untouched. Invalidates the cache.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of range.
    pub fn set_coords(&mut self, i: usize, point: Point3<f64>) {
        self.reference[i] = self.back_project(&point);
        self.invalidate();
    }

    /// Returns `true` when the next read will recompute world coordinates.
    pub fn is_dirty(&self) -> bool {
        self.moved.get().is_none()
    }

    /// The accumulated transform, one row per line.
    pub fn matrix_dump(&self) -> String {
        format_matrix(&self.matrix)
    }

    /// Replaces the reference frame with the current world coordinates and
    /// resets the transform to the identity.
    pub fn bake(&mut self) {
        let world = self.world_coords().to_vec();
        self.reference = world;
        self.reset_matrix();
    }

    fn back_project(&self, point: &Point3<f64>) -> Point3<f64> {
        debug_assert!(
            is_rigid_transform(&self.matrix),
            "accumulated transform is no longer rigid:\n{}",
            self.matrix_dump()
        );
        inverse_transform_point(&self.matrix, point)
    }

    #[inline]
    fn invalidate(&mut self) {
        self.moved.take();
    }
}
