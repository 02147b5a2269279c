//! # Reference frames
//!
//! Rotations between the frames the viewer works in:
//!
//! - **Equatorial mean J2000**: the common frame of every computed heliocentric position.
//! - **Ecliptic of an equinox**: the frame orbital elements are expressed in.
//! - **Ecliptic of date**: the world frame used for drawing.
//!
//! The world transform is carried by [`ReferenceFrameMatrix`], an immutable value tagged
//! with the epoch it was built for. It is rebuilt, never patched, once the working epoch
//! drifts more than [`RESAMPLE_THRESHOLD`] days away.
use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::constants::{
    JulianDay, Radian, DAYS_PER_CENTURY, JD2000, RADSEC, RESAMPLE_THRESHOLD,
};
use crate::time::Epoch;

/// Compute the mean obliquity of the ecliptic at a given epoch (IAU 1976 model).
///
/// Arguments
/// ---------
/// * `jd`: Julian Day (TT scale).
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// The obliquity ε is a cubic polynomial in Julian centuries since J2000, evaluated
/// with Horner's method:
///
/// ```text
/// ε = ((ob3 * t + ob2) * t + ob1) * t + ob0;
/// ```
pub fn obleq(jd: JulianDay) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.00059 * RADSEC;
    let ob3 = 0.001813 * RADSEC;

    let t = (jd - JD2000) / DAYS_PER_CENTURY;

    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// Construct a right-handed 3×3 rotation matrix around one of the principal axes.
///
/// The rotation is **active**: the vector is turned by `alpha` counter-clockwise when
/// looking down the axis toward the origin. A change of basis by `alpha` is
/// `rotmt(-alpha, k)`.
///
/// # Arguments
///
/// * `alpha` - Rotation angle in **radians**.
/// * `k` - Index of the axis of rotation: `0` → X, `1` → Y, `2` → Z.
///
/// # Panics
///
/// Panics if `k > 2`.
pub fn rotmt(alpha: f64, k: usize) -> Matrix3<f64> {
    let axis = match k {
        0 => Vector3::x_axis(),
        1 => Vector3::y_axis(),
        2 => Vector3::z_axis(),
        _ => panic!("rotmt: invalid axis index {k} (must be 0, 1 or 2)"),
    };

    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Rotation from equatorial to ecliptic coordinates for an obliquity `eps`.
pub fn equatorial_to_ecliptic(eps: Radian) -> Matrix3<f64> {
    rotmt(-eps, 0)
}

/// Rotation from ecliptic to equatorial coordinates for an obliquity `eps`.
pub fn ecliptic_to_equatorial(eps: Radian) -> Matrix3<f64> {
    rotmt(eps, 0)
}

/// Precession matrix between two equinoxes (IAU 1976, Lieske et al. 1977).
///
/// Equatorial coordinates referred to the mean equinox of `from_jd` are mapped to the
/// mean equinox of `to_jd`: `x_to = P · x_from`.
///
/// The three angles ζ, z, θ are expanded with `T` the Julian centuries between J2000
/// and `from_jd`, and `t` the Julian centuries between `from_jd` and `to_jd`:
///
/// ```text
/// ζ = (2306.2181 + 1.39656 T − 0.000139 T²) t + (0.30188 − 0.000344 T) t² + 0.017998 t³
/// z = (2306.2181 + 1.39656 T − 0.000139 T²) t + (1.09468 + 0.000066 T) t² + 0.018203 t³
/// θ = (2004.3109 − 0.85330 T − 0.000217 T²) t − (0.42665 + 0.000217 T) t² − 0.041833 t³
/// ```
///
/// and `P = Rz(z) · Ry(−θ) · Rz(ζ)` with active elementary rotations.
pub fn precession_matrix(from_jd: JulianDay, to_jd: JulianDay) -> Matrix3<f64> {
    if from_jd == to_jd {
        return Matrix3::identity();
    }

    let tt = (from_jd - JD2000) / DAYS_PER_CENTURY;
    let t = (to_jd - from_jd) / DAYS_PER_CENTURY;
    let tt2 = tt * tt;
    let t2 = t * t;
    let t3 = t2 * t;

    let common = 2306.2181 + 1.39656 * tt - 0.000139 * tt2;
    let zeta = (common * t + (0.30188 - 0.000344 * tt) * t2 + 0.017998 * t3) * RADSEC;
    let z = (common * t + (1.09468 + 0.000066 * tt) * t2 + 0.018203 * t3) * RADSEC;
    let theta = ((2004.3109 - 0.85330 * tt - 0.000217 * tt2) * t
        - (0.42665 + 0.000217 * tt) * t2
        - 0.041833 * t3)
        * RADSEC;

    rotmt(z, 2) * rotmt(-theta, 1) * rotmt(zeta, 2)
}

/// Equatorial J2000 → ecliptic-of-date transform, tagged with the epoch it was built for.
///
/// The matrix composes the precession from J2000 to the date with the tilt by the mean
/// obliquity of the date; the precession is always applied first.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrameMatrix {
    epoch: Epoch,
    matrix: Matrix3<f64>,
}

impl ReferenceFrameMatrix {
    pub fn build(target: &Epoch) -> Self {
        let precession = precession_matrix(JD2000, target.jd());
        let tilt = equatorial_to_ecliptic(obleq(target.jd()));
        ReferenceFrameMatrix {
            epoch: *target,
            matrix: tilt * precession,
        }
    }

    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Express an equatorial J2000 vector in ecliptic-of-date coordinates.
    pub fn apply(&self, equatorial_j2000: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * equatorial_j2000
    }

    /// True once `current` is more than the resampling threshold away from the epoch
    /// this matrix was built for.
    pub fn is_stale(&self, current: &Epoch) -> bool {
        (self.epoch.jd() - current.jd()).abs() > RESAMPLE_THRESHOLD
    }
}
