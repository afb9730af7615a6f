use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

const ORTHONORMALITY_TOLERANCE: f64 = 1e-6;

/// Trigonometric terms of the Attract Euler parameterization `(phi, ssi, rot)`.
///
/// The same terms drive both pose generation ([`AttractEuler::matrix`]) and the
/// analytic derivatives of a rotated point with respect to the three angles
/// ([`AttractEuler::jacobian`]), so the two always agree on the convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttractEuler {
    cs: f64,
    cp: f64,
    ss: f64,
    sp: f64,
    crot: f64,
    srot: f64,
}

impl AttractEuler {
    pub fn new(phi: f64, ssi: f64, rot: f64) -> Self {
        Self {
            cs: ssi.cos(),
            cp: phi.cos(),
            ss: ssi.sin(),
            sp: phi.sin(),
            crot: rot.cos(),
            srot: rot.sin(),
        }
    }

    /// Homogeneous rotation matrix for this set of angles.
    pub fn matrix(&self) -> Matrix4<f64> {
        let Self {
            cs,
            cp,
            ss,
            sp,
            crot,
            srot,
        } = *self;
        let cscp = cs * cp;
        let cssp = cs * sp;
        let sscp = ss * cp;
        let sssp = ss * sp;

        #[rustfmt::skip]
        let matrix = Matrix4::new(
            crot * cscp + srot * sp, srot * cscp - crot * sp, sscp, 0.0,
            crot * cssp - srot * cp, srot * cssp + crot * cp, sssp, 0.0,
            -crot * ss,              -srot * ss,              cs,   0.0,
            0.0,                     0.0,                     0.0,  1.0,
        );
        matrix
    }

    /// Partial derivatives of the rotated image of `point`.
    ///
    /// Column 0 is d/dphi, column 1 is d/dssi and column 2 is d/drot; rows are the
    /// x, y and z components of the rotated point.
    pub fn jacobian(&self, point: &Point3<f64>) -> Matrix3<f64> {
        let Self {
            cs,
            cp,
            ss,
            sp,
            crot,
            srot,
        } = *self;
        let cscp = cs * cp;
        let cssp = cs * sp;
        let sscp = ss * cp;
        let sssp = ss * sp;

        let (x, y, z) = (point.x, point.y, point.z);
        let xar = x * crot + y * srot;
        let yar = -x * srot + y * crot;

        #[rustfmt::skip]
        let jacobian = Matrix3::new(
            -xar * cssp - yar * cp - z * sssp, -xar * sscp + z * cscp, yar * cscp + xar * sp,
            xar * cscp - yar * sp + z * sscp,  -xar * sssp + z * cssp, yar * cssp - xar * cp,
            0.0,                               -xar * cs - z * ss,     -yar * ss,
        );
        jacobian
    }
}

pub fn translation_matrix(translation: &Vector3<f64>) -> Matrix4<f64> {
    Matrix4::new_translation(translation)
}

/// Builds the rotation by `theta` (radians) around the axis running from `a` to `b`.
///
/// The matrix is assembled as translate-to-origin, align the axis onto Z, rotate,
/// undo the alignment, translate back. When the axis has no component outside X
/// the alignment is undefined and a rotation about the X-parallel axis through `a`
/// is returned directly.
pub fn axis_rotation_matrix(a: &Point3<f64>, b: &Point3<f64>, theta: f64) -> Matrix4<f64> {
    let axis = b - a;
    let to_origin = translation_matrix(&(-a.coords));
    let back = translation_matrix(&a.coords);
    let cost = theta.cos();
    let sint = theta.sin();

    let d = (axis.y * axis.y + axis.z * axis.z).sqrt();
    if d == 0.0 {
        let s = if axis.x < 0.0 { -sint } else { sint };
        #[rustfmt::skip]
        let x_rotation = Matrix4::new(
            1.0, 0.0,  0.0,  0.0,
            0.0, cost, s,    0.0,
            0.0, -s,   cost, 0.0,
            0.0, 0.0,  0.0,  1.0,
        );
        return back * x_rotation * to_origin;
    }

    let cosg = axis.z / d;
    let sing = axis.y / d;
    #[rustfmt::skip]
    let onto_xz = Matrix4::new(
        1.0, 0.0,  0.0,   0.0,
        0.0, cosg, -sing, 0.0,
        0.0, sing, cosg,  0.0,
        0.0, 0.0,  0.0,   1.0,
    );

    let f = axis.norm();
    let cosp = d / f;
    let sinp = axis.x / f;
    #[rustfmt::skip]
    let onto_z = Matrix4::new(
        cosp, 0.0, -sinp, 0.0,
        0.0,  1.0, 0.0,   0.0,
        sinp, 0.0, cosp,  0.0,
        0.0,  0.0, 0.0,   1.0,
    );

    #[rustfmt::skip]
    let z_rotation = Matrix4::new(
        cost,  sint, 0.0, 0.0,
        -sint, cost, 0.0, 0.0,
        0.0,   0.0,  1.0, 0.0,
        0.0,   0.0,  0.0, 1.0,
    );

    back * onto_xz.transpose() * onto_z.transpose() * z_rotation * onto_z * onto_xz * to_origin
}

/// Applies a homogeneous rigid transform to a point (the bottom row is assumed to be `[0, 0, 0, 1]`).
#[inline]
pub fn transform_point(matrix: &Matrix4<f64>, point: &Point3<f64>) -> Point3<f64> {
    Point3::new(
        point.x * matrix[(0, 0)] + point.y * matrix[(0, 1)] + point.z * matrix[(0, 2)] + matrix[(0, 3)],
        point.x * matrix[(1, 0)] + point.y * matrix[(1, 1)] + point.z * matrix[(1, 2)] + matrix[(1, 3)],
        point.x * matrix[(2, 0)] + point.y * matrix[(2, 1)] + point.z * matrix[(2, 2)] + matrix[(2, 3)],
    )
}

/// Maps a world point back through a rigid transform.
///
/// The inverse uses the transpose of the rotation block, so it is only valid while
/// that block is orthonormal.
#[inline]
pub fn inverse_transform_point(matrix: &Matrix4<f64>, point: &Point3<f64>) -> Point3<f64> {
    let shifted = Vector3::new(
        point.x - matrix[(0, 3)],
        point.y - matrix[(1, 3)],
        point.z - matrix[(2, 3)],
    );
    let rotation = matrix.fixed_view::<3, 3>(0, 0);
    Point3::from(rotation.transpose() * shifted)
}

/// Returns `true` when the matrix is a rotation plus translation (no scale, no shear).
pub fn is_rigid_transform(matrix: &Matrix4<f64>) -> bool {
    let rotation = matrix.fixed_view::<3, 3>(0, 0).into_owned();
    let gram = rotation.transpose() * rotation;
    let bottom_row_ok = matrix[(3, 0)] == 0.0
        && matrix[(3, 1)] == 0.0
        && matrix[(3, 2)] == 0.0
        && matrix[(3, 3)] == 1.0;
    bottom_row_ok && (gram - Matrix3::identity()).abs().max() < ORTHONORMALITY_TOLERANCE
}

pub fn geometric_center(points: &[Point3<f64>]) -> Point3<f64> {
    if points.is_empty() {
        return Point3::origin();
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Point3::from(sum / points.len() as f64)
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}

/// Formats a 4x4 matrix one row per line, for debug logging.
pub fn format_matrix(matrix: &Matrix4<f64>) -> String {
    let mut out = String::new();
    for row in 0..4 {
        for col in 0..4 {
            out.push_str(&format!("{:14.7} ", matrix[(row, col)]));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Unit};

    const TOLERANCE: f64 = 1e-9;

    fn points_approx_equal(a: &Point3<f64>, b: &Point3<f64>) -> bool {
        (a - b).norm() < TOLERANCE
    }

    #[test]
    fn attract_euler_matrix_at_zero_angles_is_identity() {
        let matrix = AttractEuler::new(0.0, 0.0, 0.0).matrix();
        assert!((matrix - Matrix4::identity()).abs().max() < TOLERANCE);
    }

    #[test]
    fn attract_euler_matrix_is_a_rigid_rotation() {
        let matrix = AttractEuler::new(0.7, -1.3, 2.9).matrix();
        assert!(is_rigid_transform(&matrix));
        let rotation = matrix.fixed_view::<3, 3>(0, 0).into_owned();
        assert!((rotation.determinant() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn attract_euler_matrix_matches_published_element_formulas() {
        let (phi, ssi, rot) = (0.3_f64, 1.1_f64, -0.4_f64);
        let m = AttractEuler::new(phi, ssi, rot).matrix();
        let (cs, cp, ss, sp) = (ssi.cos(), phi.cos(), ssi.sin(), phi.sin());
        let (crot, srot) = (rot.cos(), rot.sin());
        assert!((m[(0, 0)] - (crot * cs * cp + srot * sp)).abs() < TOLERANCE);
        assert!((m[(0, 1)] - (srot * cs * cp - crot * sp)).abs() < TOLERANCE);
        assert!((m[(1, 0)] - (crot * cs * sp - srot * cp)).abs() < TOLERANCE);
        assert!((m[(1, 2)] - ss * sp).abs() < TOLERANCE);
        assert!((m[(2, 0)] + crot * ss).abs() < TOLERANCE);
        assert!((m[(2, 2)] - cs).abs() < TOLERANCE);
    }

    #[test]
    fn jacobian_matches_finite_difference_of_rotation() {
        let point = Point3::new(1.5, -2.0, 0.75);
        let angles = [0.4, 0.9, -1.2];
        let h = 1e-6;
        let jacobian = AttractEuler::new(angles[0], angles[1], angles[2]).jacobian(&point);

        for k in 0..3 {
            let mut plus = angles;
            let mut minus = angles;
            plus[k] += h;
            minus[k] -= h;
            let p_plus = transform_point(&AttractEuler::new(plus[0], plus[1], plus[2]).matrix(), &point);
            let p_minus =
                transform_point(&AttractEuler::new(minus[0], minus[1], minus[2]).matrix(), &point);
            let numeric = (p_plus - p_minus) / (2.0 * h);
            for row in 0..3 {
                assert!(
                    (numeric[row] - jacobian[(row, k)]).abs() < 1e-6,
                    "mismatch at row {row}, column {k}"
                );
            }
        }
    }

    #[test]
    fn axis_rotation_matches_right_handed_rotation_by_negative_angle() {
        let a = Point3::new(1.0, 2.0, -1.0);
        let b = Point3::new(3.0, -1.0, 4.0);
        let theta = 0.83;
        let matrix = axis_rotation_matrix(&a, &b, theta);

        let axis = Unit::new_normalize(b - a);
        let expected_rotation = Rotation3::from_axis_angle(&axis, -theta);
        let point = Point3::new(-2.0, 0.5, 7.0);
        let expected = a + expected_rotation * (point - a);

        assert!(points_approx_equal(&transform_point(&matrix, &point), &expected));
        assert!(is_rigid_transform(&matrix));
    }

    #[test]
    fn axis_rotation_leaves_points_on_the_axis_fixed() {
        let a = Point3::new(0.5, 0.5, 0.5);
        let b = Point3::new(1.5, 2.5, -0.5);
        let matrix = axis_rotation_matrix(&a, &b, 2.1);
        let midpoint = Point3::from((a.coords + b.coords) / 2.0);
        assert!(points_approx_equal(&transform_point(&matrix, &a), &a));
        assert!(points_approx_equal(&transform_point(&matrix, &midpoint), &midpoint));
    }

    #[test]
    fn axis_rotation_along_x_uses_shortcut_and_agrees_with_general_case() {
        let a = Point3::new(0.0, 1.0, 2.0);
        let b = Point3::new(5.0, 1.0, 2.0);
        let nearly_b = Point3::new(5.0, 1.0 + 1e-9, 2.0);
        let theta = 1.2;

        let exact = axis_rotation_matrix(&a, &b, theta);
        let general = axis_rotation_matrix(&a, &nearly_b, theta);
        assert!((exact - general).abs().max() < 1e-6);
        assert!(points_approx_equal(&transform_point(&exact, &a), &a));
    }

    #[test]
    fn axis_rotation_along_offset_x_line_pivots_about_that_line() {
        let a = Point3::new(0.0, 1.0, 2.0);
        let b = Point3::new(5.0, 1.0, 2.0);
        let matrix = axis_rotation_matrix(&a, &b, 1.2);

        let on_axis = Point3::new(-3.0, 1.0, 2.0);
        assert!(points_approx_equal(&transform_point(&matrix, &on_axis), &on_axis));

        let (c, s) = (1.2_f64.cos(), 1.2_f64.sin());
        let expected = Point3::new(0.0, 1.0 - c - 2.0 * s, 2.0 + s - 2.0 * c);
        assert!(points_approx_equal(&transform_point(&matrix, &Point3::origin()), &expected));
    }

    #[test]
    fn axis_rotation_along_negative_x_reverses_direction() {
        let origin = Point3::origin();
        let forward = axis_rotation_matrix(&origin, &Point3::new(1.0, 0.0, 0.0), 0.5);
        let backward = axis_rotation_matrix(&origin, &Point3::new(-1.0, 0.0, 0.0), -0.5);
        assert!((forward - backward).abs().max() < TOLERANCE);
    }

    #[test]
    fn inverse_transform_point_undoes_transform_point() {
        let matrix = translation_matrix(&Vector3::new(3.0, -1.0, 2.0))
            * AttractEuler::new(1.0, 2.0, 3.0).matrix();
        let point = Point3::new(4.0, 5.0, -6.0);
        let round_trip = inverse_transform_point(&matrix, &transform_point(&matrix, &point));
        assert!(points_approx_equal(&round_trip, &point));
    }

    #[test]
    fn is_rigid_transform_rejects_scaling() {
        let scaled = Matrix4::new_scaling(2.0);
        assert!(!is_rigid_transform(&scaled));
        assert!(is_rigid_transform(&Matrix4::identity()));
    }

    #[test]
    fn geometric_center_of_empty_slice_is_origin() {
        assert_eq!(geometric_center(&[]), Point3::origin());
    }

    #[test]
    fn geometric_center_averages_points() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, -6.0)];
        assert_eq!(geometric_center(&points), Point3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn calculate_rmsd_returns_none_for_mismatched_lengths() {
        let a = [Point3::origin()];
        let b = [Point3::origin(), Point3::origin()];
        assert_eq!(calculate_rmsd(&a, &b), None);
        assert_eq!(calculate_rmsd(&[], &[]), None);
    }

    #[test]
    fn calculate_rmsd_of_uniform_shift_is_shift_length() {
        let a = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)];
        let b = [Point3::new(4.0, 0.0, 0.0), Point3::new(5.0, 1.0, 1.0)];
        let rmsd = calculate_rmsd(&a, &b).unwrap();
        assert!((rmsd - 4.0).abs() < TOLERANCE);
    }
}
