//! # Small-body orbit
//!
//! Heliocentric positions of the tracked comet or asteroid, expressed in the
//! equatorial mean J2000 frame shared with the planets.
//!
//! The orbital-plane → equatorial J2000 rotation is computed once from the elements:
//!
//! ```text
//! x_J2000 = P(equinox → J2000) · R_x(ε_equinox) · R_z(Ω) · R_x(i) · R_z(ω) · x_plane
//! ```
use nalgebra::Matrix3;

use crate::constants::{Position, Radian, JD2000};
use crate::kepler::{solve_kepler, AnomalySolution, OrbitKind};
use crate::orbit_type::CometaryElements;
use crate::orbitview_errors::OrbitViewError;
use crate::ref_system::{ecliptic_to_equatorial, obleq, precession_matrix, rotmt};
use crate::time::Epoch;

/// Distance at which an unbound orbit is cut when sampled (AU).
pub const UNBOUND_SAMPLING_RADIUS: f64 = 50.0;

/// Fraction of the asymptotic true anomaly an unbound curve may reach.
const ASYMPTOTE_MARGIN: f64 = 0.999;

/// Position of the body at one epoch, with its anomaly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub true_anomaly: Radian,
    pub radius: f64,
    /// Equatorial J2000 position (AU)
    pub position: Position,
}

/// Rotation from the orbital plane (perihelion on +X) to the ecliptic of the elements.
pub fn orbital_plane_to_ecliptic(
    node: Radian,
    inclination: Radian,
    peri: Radian,
) -> Matrix3<f64> {
    rotmt(node, 2) * rotmt(inclination, 0) * rotmt(peri, 2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SmallBodyOrbit {
    elements: CometaryElements,
    plane_to_j2000: Matrix3<f64>,
}

impl SmallBodyOrbit {
    pub fn new(elements: CometaryElements) -> Self {
        let equinox_jd = elements.equinox_jd();
        let plane_to_ecliptic = orbital_plane_to_ecliptic(
            elements.ascending_node_longitude,
            elements.inclination,
            elements.periapsis_argument,
        );
        let plane_to_j2000 = precession_matrix(equinox_jd, JD2000)
            * ecliptic_to_equatorial(obleq(equinox_jd))
            * plane_to_ecliptic;

        SmallBodyOrbit {
            elements,
            plane_to_j2000,
        }
    }

    pub fn elements(&self) -> &CometaryElements {
        &self.elements
    }

    pub fn name(&self) -> &str {
        &self.elements.name
    }

    pub fn kind(&self) -> OrbitKind {
        self.elements.kind
    }

    /// Orbital-plane → equatorial J2000 rotation.
    pub fn plane_to_j2000(&self) -> &Matrix3<f64> {
        &self.plane_to_j2000
    }

    /// True anomaly, distance and position at `epoch`.
    ///
    /// Return
    /// ------
    /// * The state, or [`OrbitViewError::KeplerNotConverged`] if the solver failed.
    pub fn state_at(&self, epoch: &Epoch) -> Result<BodyState, OrbitViewError> {
        let dt = epoch.jd() - self.elements.perihelion_time;
        let AnomalySolution {
            true_anomaly,
            radius,
        } = solve_kepler(
            self.elements.perihelion_distance,
            self.elements.eccentricity,
            dt,
        )?;

        Ok(BodyState {
            true_anomaly,
            radius,
            position: self.plane_position(true_anomaly, radius),
        })
    }

    /// Equatorial J2000 position at `epoch`.
    pub fn position_at(&self, epoch: &Epoch) -> Result<Position, OrbitViewError> {
        Ok(self.state_at(epoch)?.position)
    }

    /// Distance on the conic for a given true anomaly.
    pub fn radius_at(&self, true_anomaly: Radian) -> f64 {
        let e = self.elements.eccentricity;
        self.elements.perihelion_distance * (1.0 + e) / (1.0 + e * true_anomaly.cos())
    }

    /// Largest true anomaly sampled on an unbound orbit: where `r` reaches
    /// [`UNBOUND_SAMPLING_RADIUS`], kept inside the asymptote.
    pub fn max_true_anomaly(&self) -> Radian {
        let e = self.elements.eccentricity;
        let q = self.elements.perihelion_distance;
        if q >= UNBOUND_SAMPLING_RADIUS {
            return std::f64::consts::FRAC_PI_2;
        }

        let cos_nu = ((q * (1.0 + e) / UNBOUND_SAMPLING_RADIUS - 1.0) / e).clamp(-1.0, 1.0);
        let nu = cos_nu.acos();
        if e > 1.0 {
            nu.min(ASYMPTOTE_MARGIN * (-1.0 / e).acos())
        } else {
            nu
        }
    }

    /// Sample the orbit as equatorial J2000 points.
    ///
    /// Elliptic orbits yield `divisions` points uniformly spaced in true anomaly from
    /// perihelion, with the first point repeated at the end. Parabolic and hyperbolic
    /// orbits yield `divisions + 1` points across `[−ν_max, ν_max]`.
    pub fn sample_curve(&self, divisions: usize) -> Vec<Position> {
        let divisions = divisions.max(1);

        if self.kind().is_bound() {
            let step = std::f64::consts::TAU / divisions as f64;
            let mut points: Vec<Position> = (0..divisions)
                .map(|k| {
                    let nu = k as f64 * step;
                    self.plane_position(nu, self.radius_at(nu))
                })
                .collect();
            points.push(points[0]);
            points
        } else {
            let nu_max = self.max_true_anomaly();
            let step = 2.0 * nu_max / divisions as f64;
            (0..=divisions)
                .map(|k| {
                    let nu = -nu_max + k as f64 * step;
                    self.plane_position(nu, self.radius_at(nu))
                })
                .collect()
        }
    }

    fn plane_position(&self, true_anomaly: Radian, radius: f64) -> Position {
        let solution = AnomalySolution {
            true_anomaly,
            radius,
        };
        self.plane_to_j2000 * solution.orbital_plane_position()
    }
}
