use super::params::PairCoefficients;
use nalgebra::Vector3;

/// Coulomb constant in kcal·Å/(mol·e²).
pub const COULOMB_CONSTANT: f64 = 332.053986;
/// Distance-dependent dielectric of the polarity-switched evaluator.
pub const ATTRACT_DIELECTRIC: f64 = 15.0;
/// Distance-dependent dielectric of the legacy evaluator.
pub const LEGACY_DIELECTRIC: f64 = 20.0;
/// Floor applied to squared pair distances.
pub const MIN_DISTANCE_SQUARED: f64 = 0.001;

/// Squared distance (clamped at [`MIN_DISTANCE_SQUARED`]) and its inverse.
#[inline]
pub fn clamped_inverse_r2(dx: &Vector3<f64>) -> (f64, f64) {
    let r2 = dx.norm_squared().max(MIN_DISTANCE_SQUARED);
    (r2, 1.0 / r2)
}

/// The 8-6 pair energy `rc/r^8 - ac/r^6` and its radial force factor.
///
/// Multiplying the factor by `dx / r²` gives the force along `dx`.
#[inline]
pub fn lennard_jones_8_6(rc: f64, ac: f64, rr2: f64) -> (f64, f64) {
    let rr23 = rr2 * rr2 * rr2;
    let rep = rc * rr2;
    let vlj = (rep - ac) * rr23;
    let fb = 6.0 * vlj + 2.0 * (rep * rr23);
    (vlj, fb)
}

/// 8-6 energy with the minimum/saddle switch.
///
/// Inside the switch distance the potential keeps its attractive well and is
/// shifted by `(polarity - 1) * emin`, which lifts a repulsive pair's minimum to
/// `-emin`. Beyond it the whole potential is scaled by the polarity. Both
/// branches give `polarity * emin` at the switch distance.
#[inline]
pub fn switched_lennard_jones(pair: &PairCoefficients, r2: f64, rr2: f64) -> (f64, f64) {
    let (vlj, fb) = lennard_jones_8_6(pair.rc, pair.ac, rr2);
    if r2 < pair.switch_distance_squared {
        (vlj + f64::from(pair.polarity - 1) * pair.emin, fb)
    } else {
        let polarity = f64::from(pair.polarity);
        (polarity * vlj, polarity * fb)
    }
}

/// Screened Coulomb energy `q_i q_j k / (eps r²)`.
#[inline]
pub fn screened_coulomb(charge_product: f64, rr2: f64, dielectric: f64) -> f64 {
    charge_product * rr2 * (COULOMB_CONSTANT / dielectric)
}

/// Quartic restraint energy `k |v|^4` and the pulling force `4 k |v|² v`.
#[inline]
pub fn quartic_restraint(k: f64, v: &Vector3<f64>) -> (f64, Vector3<f64>) {
    let ett = v.norm_squared();
    (k * ett * ett, 4.0 * k * ett * v)
}
