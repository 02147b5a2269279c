//! # Kepler equation
//!
//! Position along a conic at a time offset from perihelion passage, for any
//! eccentricity.
//!
//! The conic family is picked once from the eccentricity ([`OrbitKind`]), then:
//!
//! - **Elliptic**: Newton iteration on `M = E − e·sin E`, safeguarded by bisection.
//! - **Parabolic**: Barker's equation, solved in closed form.
//! - **Hyperbolic**: Newton iteration on `M = e·sinh H − H`, safeguarded by bisection.
//! - **Near-parabolic** (`|e − 1| < 0.02`, either side): universal-variable formulation
//!   with Stumpff functions, which stays well conditioned as `a → ∞`.
//!
//! Every solver returns an [`AnomalySolution`]: the true anomaly and the heliocentric
//! distance. Time offsets are in days and distances in AU.
use nalgebra::Vector3;

use crate::constants::{
    AstronomicalUnit, Radian, DPI, GAUSS_GRAV, GAUSS_GRAV_SQUARED, PARABOLIC_TOLERANCE,
};
use crate::orbitview_errors::OrbitViewError;
use std::f64::consts::PI;

/// Half-width of the eccentricity band around 1 handled by the universal-variable solver.
pub const NEAR_PARABOLIC_BAND: f64 = 0.02;

/// Convergence threshold on the Newton step (radians).
const KEPLER_TOLERANCE: f64 = 1e-12;

/// Iteration bound for the iterative solvers.
const MAX_ITERATIONS: usize = 100;

/// Conic family of an orbit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitKind {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

impl OrbitKind {
    pub fn from_eccentricity(e: f64) -> Self {
        if (e - 1.0).abs() < PARABOLIC_TOLERANCE {
            OrbitKind::Parabolic
        } else if e < 1.0 {
            OrbitKind::Elliptic
        } else {
            OrbitKind::Hyperbolic
        }
    }

    pub fn is_bound(self) -> bool {
        self == OrbitKind::Elliptic
    }
}

/// Solution of the Kepler problem at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalySolution {
    /// True anomaly ν in (−π, π]
    pub true_anomaly: Radian,
    /// Heliocentric distance r (AU)
    pub radius: AstronomicalUnit,
}

impl AnomalySolution {
    /// Build the solution from an elliptic eccentric anomaly.
    ///
    /// Arguments
    /// ---------
    /// * `a`: semi-major axis (AU)
    /// * `e`: eccentricity, `0 ≤ e < 1`
    /// * `ecc_anomaly`: eccentric anomaly E (radians)
    pub fn from_eccentric_anomaly(a: f64, e: f64, ecc_anomaly: Radian) -> Self {
        let half = 0.5 * ecc_anomaly;
        let true_anomaly =
            2.0 * ((1.0 + e).sqrt() * half.sin()).atan2((1.0 - e).sqrt() * half.cos());
        AnomalySolution {
            true_anomaly: wrap_half_turn(true_anomaly),
            radius: a * (1.0 - e * ecc_anomaly.cos()),
        }
    }

    /// Position in the orbital plane, perihelion along +X.
    pub fn orbital_plane_position(&self) -> Vector3<f64> {
        Vector3::new(
            self.radius * self.true_anomaly.cos(),
            self.radius * self.true_anomaly.sin(),
            0.0,
        )
    }
}

/// Return the principal value of an angle in radians, in [0, 2π).
pub fn principal_angle(a: f64) -> f64 {
    a.rem_euclid(DPI)
}

/// Reduce an angle to (−π, π].
fn wrap_half_turn(a: f64) -> f64 {
    let reduced = principal_angle(a);
    if reduced > PI {
        reduced - DPI
    } else {
        reduced
    }
}

/// Mean motion (radians/day) of an orbit with semi-major axis `a` (AU).
pub fn mean_motion(a: f64) -> f64 {
    GAUSS_GRAV / (a * a.sqrt())
}

/// Solve Kepler's equation `M = E − e·sin E` for the eccentric anomaly.
///
/// The mean anomaly is first reduced to (−π, π] and solved for its absolute value:
/// on `[0, π]` the root lies in `[M, M + e]`, which brackets every Newton step.
/// A step leaving the bracket is replaced by a bisection.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M (radians), any value
/// * `e`: eccentricity, `0 ≤ e < 1`
///
/// Return
/// ------
/// * E in (−π, π], or [`OrbitViewError::KeplerNotConverged`] after 100 iterations.
pub fn solve_elliptic(mean_anomaly: Radian, e: f64) -> Result<Radian, OrbitViewError> {
    let m = wrap_half_turn(mean_anomaly);
    let sign = if m < 0.0 { -1.0 } else { 1.0 };
    let m = m.abs();

    let mut lo = m;
    let mut hi = (m + e).min(PI);
    let mut ecc = m;

    for _ in 0..MAX_ITERATIONS {
        let fun = ecc - e * ecc.sin() - m;
        let funp = 1.0 - e * ecc.cos();

        if fun < 0.0 {
            lo = ecc;
        } else {
            hi = ecc;
        }

        let mut next = ecc - fun / funp;
        if !(lo..=hi).contains(&next) {
            next = 0.5 * (lo + hi);
        }

        if (next - ecc).abs() < KEPLER_TOLERANCE {
            return Ok(sign * next);
        }
        ecc = next;
    }

    Err(OrbitViewError::KeplerNotConverged {
        kind: OrbitKind::Elliptic,
        iterations: MAX_ITERATIONS,
    })
}

/// Solve the hyperbolic Kepler equation `M = e·sinh H − H` for H.
///
/// For `M ≥ 0` the root lies in `[asinh(M/e), asinh(M/(e−1))]`. Newton starts from the
/// upper bound, where the function is convex, and falls back on bisection whenever a
/// step leaves the bracket. Negative mean anomalies use the odd symmetry.
pub fn solve_hyperbolic(mean_anomaly: f64, e: f64) -> Result<f64, OrbitViewError> {
    let sign = if mean_anomaly < 0.0 { -1.0 } else { 1.0 };
    let m = mean_anomaly.abs();

    let mut lo = (m / e).asinh();
    let mut hi = (m / (e - 1.0)).asinh();
    let mut hyp = hi;

    for _ in 0..MAX_ITERATIONS {
        let fun = e * hyp.sinh() - hyp - m;
        let funp = e * hyp.cosh() - 1.0;

        if fun < 0.0 {
            lo = hyp;
        } else {
            hi = hyp;
        }

        let mut next = hyp - fun / funp;
        if !(lo..=hi).contains(&next) {
            next = 0.5 * (lo + hi);
        }

        if (next - hyp).abs() < KEPLER_TOLERANCE * (1.0 + next.abs()) {
            return Ok(sign * next);
        }
        hyp = next;
    }

    Err(OrbitViewError::KeplerNotConverged {
        kind: OrbitKind::Hyperbolic,
        iterations: MAX_ITERATIONS,
    })
}

/// Solve Barker's equation for a parabolic orbit.
///
/// With `s = tan(ν/2)`, the time since perihelion satisfies
/// `s + s³/3 = k·Δt / √(2q³)`. Writing `W = 3k·Δt / √(2q³)`, the real root of
/// `s³ + 3s − W = 0` is `s = Y − 1/Y` with `Y = ∛(W/2 + √(W²/4 + 1))`.
///
/// Arguments
/// ---------
/// * `q`: perihelion distance (AU)
/// * `dt`: time since perihelion passage (days)
pub fn solve_parabolic(q: f64, dt: f64) -> AnomalySolution {
    let w = 3.0 * GAUSS_GRAV * dt / (2.0 * q.powi(3)).sqrt();

    // The cubic is odd in W; solving for |W| avoids the cancellation for W << 0.
    let wa = w.abs();
    let y = (0.5 * wa + (0.25 * wa * wa + 1.0).sqrt()).cbrt();
    let s = (y - 1.0 / y).copysign(w);

    AnomalySolution {
        true_anomaly: 2.0 * s.atan(),
        radius: q * (1.0 + s * s),
    }
}

/// Stumpff functions `s0..s3` of the universal anomaly `psi` for `alpha = 2·energy`.
///
/// Small `|alpha·psi²|` values are summed as power series. Larger ones halve `psi`
/// until the series converges fast, then climb back with the duplication formulas.
fn s_funct(psi: f64, alpha: f64) -> (f64, f64, f64, f64) {
    const JMAX: usize = 70;
    const HALFMAX: usize = 30;
    const BETACONTR: f64 = 100.0;

    let epsilon = f64::EPSILON;
    let contr = 100.0 * epsilon;
    let overfl = 1.0 / epsilon;

    let beta = alpha * psi.powi(2);
    let mut s0: f64;
    let mut s1: f64;
    let s2: f64;
    let s3: f64;

    if beta.abs() < BETACONTR {
        let mut term2 = psi.powi(2) / 2.0;
        let mut term3 = term2 * psi / 3.0;
        let mut sum2 = term2;
        let mut sum3 = term3;

        for j in 1..=JMAX {
            term2 *= beta / ((2.0 * j as f64 + 1.0) * (2.0 * j as f64 + 2.0));
            sum2 += term2;
            if term2.abs() < contr || term2.abs() > overfl {
                break;
            }
        }

        for j in 1..=JMAX {
            term3 *= beta / ((2.0 * j as f64 + 2.0) * (2.0 * j as f64 + 3.0));
            sum3 += term3;
            if term3.abs() < contr || term3.abs() > overfl {
                break;
            }
        }

        s2 = sum2;
        s3 = sum3;
        s1 = psi + alpha * s3;
        s0 = 1.0 + alpha * s2;
    } else {
        let mut psi2 = psi;
        let mut beta_half = beta;
        let mut nhalf = 0;

        for _ in 0..HALFMAX {
            psi2 *= 0.5;
            nhalf += 1;
            beta_half = alpha * psi2.powi(2);
            if beta_half.abs() < BETACONTR {
                break;
            }
        }

        let mut term0 = 1.0;
        let mut term1 = psi2;
        s0 = 1.0;
        s1 = psi2;

        for j in 1..=JMAX {
            term0 *= beta_half / ((2 * j - 1) as f64 * (2 * j) as f64);
            s0 += term0;
            if term0.abs() < contr || term0.abs() > overfl {
                break;
            }
        }

        for j in 1..=JMAX {
            term1 *= beta_half / ((2 * j) as f64 * (2 * j + 1) as f64);
            s1 += term1;
            if term1.abs() < contr || term1.abs() > overfl {
                break;
            }
        }

        // Duplication back to the original psi
        for _ in 0..nhalf {
            let s02 = 2.0 * s0.powi(2) - 1.0;
            let s12 = 2.0 * s0 * s1;
            s0 = s02;
            s1 = s12;
        }

        s3 = (s1 - psi) / alpha;
        s2 = (s0 - 1.0) / alpha;
    }

    (s0, s1, s2, s3)
}

/// Universal-variable solution starting from perihelion.
///
/// At perihelion `r0 = q` and `r0·ṙ0 = 0`, so the universal Kepler equation reduces to
/// `F(ψ) = q·s1 + μ·s3 − Δt = 0` with `α = μ(e − 1)/q`. On a bound orbit `Δt` is first
/// folded into half a period around the nearest perihelion passage. Newton is seeded
/// with [`universal_seed`]; a step that changes the sign of ψ is halved instead.
///
/// The Lagrange coefficients `f = 1 − μ·s2/q` and `g = Δt − μ·s3` then give the
/// position in the orbital plane.
pub fn solve_universal(q: f64, e: f64, dt: f64) -> Result<AnomalySolution, OrbitViewError> {
    let epsilon = f64::EPSILON;
    let contr = 100.0 * epsilon;
    let mu = GAUSS_GRAV_SQUARED;
    let alpha = mu * (e - 1.0) / q;

    let dt = if e < 1.0 {
        fold_into_period(q / (1.0 - e), dt)
    } else {
        dt
    };
    let mut psi = universal_seed(q, e, dt);

    for _ in 0..MAX_ITERATIONS {
        let (s0, s1, s2, s3) = s_funct(psi, alpha);

        let fun = q * s1 + mu * s3 - dt;
        let funp = q * s0 + mu * s2;
        let dpsi = -fun / funp;

        if s3.abs() > 1e-2 / epsilon {
            break;
        }

        if dpsi.abs() < contr || dpsi.abs() < contr * 10.0 * psi.abs() {
            let (s0, _, s2, s3) = s_funct(psi + dpsi, alpha);
            let x = q - mu * s2;
            let y = (dt - mu * s3) * (mu * (1.0 + e) / q).sqrt();
            return Ok(AnomalySolution {
                true_anomaly: y.atan2(x),
                radius: q * s0 + mu * s2,
            });
        }

        let psi1 = psi + dpsi;
        psi = if psi1 * psi < 0.0 { psi / 2.0 } else { psi1 };
    }

    Err(OrbitViewError::KeplerNotConverged {
        kind: OrbitKind::from_eccentricity(e),
        iterations: MAX_ITERATIONS,
    })
}

/// Time offset from the nearest perihelion passage of a bound orbit, in `[−P/2, P/2]`.
fn fold_into_period(a: f64, dt: f64) -> f64 {
    let period = DPI / mean_motion(a);
    dt - period * (dt / period).round()
}

/// Starting universal anomaly for [`solve_universal`].
///
/// With `β = √|α|` the universal anomaly from perihelion is `E/β` on an ellipse and
/// `H/β` on a hyperbola, so the classical anomaly gives a seed that is already close
/// to the root. The parabolic root is used when α vanishes or the classical solver
/// fails.
fn universal_seed(q: f64, e: f64, dt: f64) -> f64 {
    let beta = (GAUSS_GRAV_SQUARED * (e - 1.0).abs() / q).sqrt();
    if beta == 0.0 {
        return parabolic_psi(q, dt);
    }

    let classical = if e < 1.0 {
        solve_elliptic(mean_motion(q / (1.0 - e)) * dt, e)
    } else {
        solve_hyperbolic(mean_motion(q / (e - 1.0)) * dt, e)
    };
    classical
        .map(|anomaly| anomaly / beta)
        .unwrap_or_else(|_| parabolic_psi(q, dt))
}

/// Real root of `ψ³ + (6q/μ)ψ − 6Δt/μ = 0` (universal anomaly of the parabola).
fn parabolic_psi(q: f64, dt: f64) -> f64 {
    let mu = GAUSS_GRAV_SQUARED;
    let p = 6.0 * q / mu;
    let half_q = 3.0 * dt.abs() / mu;
    let y = (half_q + (half_q * half_q + p.powi(3) / 27.0).sqrt()).cbrt();
    (y - p / (3.0 * y)).copysign(dt)
}

/// Solve the Kepler problem for a conic given by its perihelion distance and eccentricity.
///
/// Arguments
/// ---------
/// * `q`: perihelion distance (AU), `q > 0`
/// * `e`: eccentricity, `e ≥ 0`
/// * `dt`: time since perihelion passage (days), negative before it
///
/// Return
/// ------
/// * The true anomaly and heliocentric distance at `T + dt`.
pub fn solve_kepler(q: f64, e: f64, dt: f64) -> Result<AnomalySolution, OrbitViewError> {
    let kind = OrbitKind::from_eccentricity(e);
    if kind == OrbitKind::Parabolic {
        return Ok(solve_parabolic(q, dt));
    }
    if (e - 1.0).abs() < NEAR_PARABOLIC_BAND {
        return solve_universal(q, e, dt);
    }

    match kind {
        OrbitKind::Elliptic => {
            let a = q / (1.0 - e);
            let ecc_anomaly = solve_elliptic(mean_motion(a) * dt, e)?;
            Ok(AnomalySolution::from_eccentric_anomaly(a, e, ecc_anomaly))
        }
        _ => {
            let a = q / (e - 1.0);
            let hyp_anomaly = solve_hyperbolic(mean_motion(a) * dt, e)?;
            let true_anomaly =
                2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (0.5 * hyp_anomaly).tanh()).atan();
            Ok(AnomalySolution {
                true_anomaly,
                radius: a * (e * hyp_anomaly.cosh() - 1.0),
            })
        }
    }
}

#[cfg(test)]
mod kepler_test {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    /// Radius predicted by the conic equation for a given true anomaly.
    fn conic_radius(q: f64, e: f64, nu: f64) -> f64 {
        q * (1.0 + e) / (1.0 + e * nu.cos())
    }

    #[test]
    fn test_orbit_kind() {
        assert_eq!(OrbitKind::from_eccentricity(0.0), OrbitKind::Elliptic);
        assert_eq!(OrbitKind::from_eccentricity(0.967), OrbitKind::Elliptic);
        assert_eq!(OrbitKind::from_eccentricity(1.0), OrbitKind::Parabolic);
        assert_eq!(OrbitKind::from_eccentricity(1.0 + 1e-9), OrbitKind::Hyperbolic);
        assert!(OrbitKind::Elliptic.is_bound());
        assert!(!OrbitKind::Hyperbolic.is_bound());
    }

    #[test]
    fn test_s_funct() {
        let psi = -15.279808141051223;
        let alpha = -1.6298946008705195e-4;

        let (s0, s1, s2, s3) = s_funct(psi, alpha);

        assert_relative_eq!(s0, 0.9810334785583247, epsilon = 1e-14);
        assert_relative_eq!(s1, -15.183083836892674, epsilon = 1e-14);
        assert_relative_eq!(s2, 116.3665517484714, epsilon = 1e-14);
        assert_relative_eq!(s3, -593.4390119881925, epsilon = 1e-14);
    }

    #[test]
    fn test_s_funct_duplication_branch() {
        // Elliptic: s0 = cos(√−α ψ), s1 = sin(√−α ψ)/√−α
        let (s0, s1, _, _) = s_funct(20.0, -1.0);
        assert_abs_diff_eq!(s0, 20f64.cos(), epsilon = 1e-10);
        assert_abs_diff_eq!(s1, 20f64.sin(), epsilon = 1e-10);

        // Hyperbolic: s0 = cosh(√α ψ), s1 = sinh(√α ψ)/√α
        let (s0, s1, s2, _) = s_funct(12.0, 1.0);
        assert_relative_eq!(s0, 12f64.cosh(), max_relative = 1e-10);
        assert_relative_eq!(s1, 12f64.sinh(), max_relative = 1e-10);
        assert_relative_eq!(s2, 12f64.cosh() - 1.0, max_relative = 1e-10);
    }

    #[test]
    fn test_elliptic_residual() {
        let eccentricities = [0.0, 0.1, 0.3, 0.5, 0.7, 0.9, 0.95, 0.99, 0.999];
        for e in eccentricities {
            for i in 0..360 {
                let m = i as f64 * DPI / 360.0;
                let ecc = solve_elliptic(m, e).unwrap();
                let residual = wrap_half_turn(ecc - e * ecc.sin() - m);
                assert!(
                    residual.abs() < 1e-10,
                    "e = {e}, M = {m}: residual {residual}"
                );
            }
        }
    }

    #[test]
    fn test_elliptic_symmetry() {
        let e = 0.6;
        let forward = solve_elliptic(1.2, e).unwrap();
        let backward = solve_elliptic(-1.2, e).unwrap();
        assert_abs_diff_eq!(forward, -backward, epsilon = 1e-14);
        assert_eq!(solve_elliptic(0.0, e).unwrap(), 0.0);
    }

    #[test]
    fn test_elliptic_not_converged() {
        let err = solve_elliptic(f64::NAN, 0.5).unwrap_err();
        assert_eq!(
            err,
            OrbitViewError::KeplerNotConverged {
                kind: OrbitKind::Elliptic,
                iterations: 100
            }
        );
        assert!(err.is_convergence());
    }

    #[test]
    fn test_eccentric_to_true_anomaly() {
        let a = 2.0;
        let e = 0.4;
        let sol = AnomalySolution::from_eccentric_anomaly(a, e, 0.0);
        assert_abs_diff_eq!(sol.true_anomaly, 0.0);
        assert_abs_diff_eq!(sol.radius, a * (1.0 - e));

        let sol = AnomalySolution::from_eccentric_anomaly(a, e, PI);
        assert_abs_diff_eq!(sol.true_anomaly.abs(), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.radius, a * (1.0 + e), epsilon = 1e-12);
    }

    #[test]
    fn test_parabolic_barker() {
        let q = 0.5;
        let dt = 10.0;
        let sol = solve_parabolic(q, dt);

        let s = (0.5 * sol.true_anomaly).tan();
        let w = 3.0 * GAUSS_GRAV * dt / (2.0 * q * q * q).sqrt();
        assert_abs_diff_eq!(s + s.powi(3) / 3.0, w / 3.0, epsilon = 1e-14);

        assert_abs_diff_eq!(sol.true_anomaly, 0.6407, epsilon = 1e-3);
        assert_abs_diff_eq!(sol.radius, 0.55507, epsilon = 1e-4);
        assert_abs_diff_eq!(sol.radius, conic_radius(q, 1.0, sol.true_anomaly), epsilon = 1e-14);

        let before = solve_parabolic(q, -dt);
        assert_abs_diff_eq!(before.true_anomaly, -sol.true_anomaly, epsilon = 1e-15);
        assert_abs_diff_eq!(before.radius, sol.radius, epsilon = 1e-15);
    }

    #[test]
    fn test_parabolic_far_from_perihelion() {
        let sol = solve_parabolic(1.0, -40_000.0);
        assert!(sol.true_anomaly < -2.9 && sol.true_anomaly > -PI);
        assert_relative_eq!(
            sol.radius,
            conic_radius(1.0, 1.0, sol.true_anomaly),
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_hyperbolic() {
        let e = 1.5;
        let m = 2.0;
        let hyp = solve_hyperbolic(m, e).unwrap();
        assert_abs_diff_eq!(e * hyp.sinh() - hyp, m, epsilon = 1e-10);
        assert_eq!(solve_hyperbolic(-m, e).unwrap(), -hyp);

        let q = 1.0;
        let sol = solve_kepler(q, e, 50.0).unwrap();
        assert!(sol.true_anomaly > 0.0);
        assert!(sol.true_anomaly < (-1.0 / e).acos());
        assert_relative_eq!(
            sol.radius,
            conic_radius(q, e, sol.true_anomaly),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_hyperbolic_large_mean_anomaly() {
        let hyp = solve_hyperbolic(1.0e4, 3.0).unwrap();
        assert_relative_eq!(3.0 * hyp.sinh() - hyp, 1.0e4, max_relative = 1e-12);
    }

    /// Same conic through the elliptic or hyperbolic Kepler equation.
    fn classical(q: f64, e: f64, dt: f64) -> AnomalySolution {
        if e < 1.0 {
            let a = q / (1.0 - e);
            let ecc = solve_elliptic(mean_motion(a) * dt, e).unwrap();
            AnomalySolution::from_eccentric_anomaly(a, e, ecc)
        } else {
            let a = q / (e - 1.0);
            let hyp = solve_hyperbolic(mean_motion(a) * dt, e).unwrap();
            AnomalySolution {
                true_anomaly: 2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (0.5 * hyp).tanh()).atan(),
                radius: a * (e * hyp.cosh() - 1.0),
            }
        }
    }

    #[test]
    fn test_near_parabolic_agrees_with_classical() {
        let q = 0.6;
        for (e, dt) in [(0.985, 30.0), (0.985, -120.0), (1.015, 45.0), (1.015, -200.0)] {
            let universal = solve_universal(q, e, dt).unwrap();
            let classical = classical(q, e, dt);

            assert_abs_diff_eq!(
                universal.true_anomaly,
                classical.true_anomaly,
                epsilon = 1e-8
            );
            assert_relative_eq!(universal.radius, classical.radius, max_relative = 1e-8);
        }
    }

    #[test]
    fn test_near_parabolic_over_many_revolutions() {
        let band = [
            (0.3, 0.9805),
            (0.45, 0.985),
            (1.5, 0.995),
            (0.6, 0.999),
            (0.45, 1.015),
            (0.3, 1.0195),
        ];

        for (q, e) in band {
            let mut dt = -2.0e5;
            while dt <= 2.0e5 {
                let sol = solve_kepler(q, e, dt)
                    .unwrap_or_else(|err| panic!("q = {q}, e = {e}, dt = {dt}: {err}"));
                let reference = classical(q, e, dt);

                let dnu = wrap_half_turn(sol.true_anomaly - reference.true_anomaly);
                assert!(dnu.abs() < 1e-7, "q = {q}, e = {e}, dt = {dt}: Δν = {dnu}");
                assert_relative_eq!(sol.radius, reference.radius, max_relative = 1e-8);
                assert_relative_eq!(
                    sol.radius,
                    conic_radius(q, e, sol.true_anomaly),
                    max_relative = 1e-8
                );
                dt += 173.1;
            }
        }
    }

    #[test]
    fn test_near_parabolic_repeats_every_period() {
        let (q, e) = (0.3, 0.9805);
        let period = DPI / mean_motion(q / (1.0 - e));
        let dt = 0.37 * period;

        let first = solve_kepler(q, e, dt).unwrap();
        for revolutions in [-9.0, -3.0, 1.0, 5.0, 12.0] {
            let later = solve_kepler(q, e, dt + revolutions * period).unwrap();
            assert_abs_diff_eq!(later.true_anomaly, first.true_anomaly, epsilon = 1e-8);
            assert_relative_eq!(later.radius, first.radius, max_relative = 1e-9);
        }

        let aphelion = solve_kepler(q, e, 0.5 * period).unwrap();
        assert_abs_diff_eq!(aphelion.true_anomaly.abs(), PI, epsilon = 1e-8);
        assert_relative_eq!(aphelion.radius, q * (1.0 + e) / (1.0 - e), max_relative = 1e-9);
    }

    #[test]
    fn test_near_parabolic_matches_barker_at_limit() {
        let q = 0.5;
        let dt = 10.0;
        let barker = solve_parabolic(q, dt);
        for e in [1.0 - 1e-9, 1.0 + 1e-9] {
            let sol = solve_kepler(q, e, dt).unwrap();
            assert_abs_diff_eq!(sol.true_anomaly, barker.true_anomaly, epsilon = 1e-7);
            assert_abs_diff_eq!(sol.radius, barker.radius, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_solve_kepler_at_perihelion() {
        for e in [0.0, 0.2, 0.99, 1.0, 1.01, 2.0] {
            let sol = solve_kepler(0.587, e, 0.0).unwrap();
            assert_abs_diff_eq!(sol.true_anomaly, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(sol.radius, 0.587, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_circular_orbit_quarter_period() {
        let a = 1.0;
        let period = DPI / mean_motion(a);
        let sol = solve_kepler(a, 0.0, 0.25 * period).unwrap();
        assert_abs_diff_eq!(sol.true_anomaly, 0.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.radius, 1.0, epsilon = 1e-12);

        let pos = sol.orbital_plane_position();
        assert_abs_diff_eq!(pos, Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
