//! # Planet ephemeris
//!
//! Low-precision heliocentric positions of the nine major planets from the JPL
//! "Approximate Positions of the Planets" mean elements (E.M. Standish), valid
//! 1800–2050 AD and usable for display over the whole viewer range.
//!
//! Each element is a J2000 value plus a linear rate per Julian century, referred to
//! the ecliptic and equinox of J2000. Positions are returned in the equatorial mean
//! J2000 frame, the same frame as [`crate::small_body::SmallBodyOrbit`].
use std::fmt;

use nalgebra::Matrix3;
use serde::Deserialize;

use crate::constants::{Position, JD2000, RADEG};
use crate::kepler::{principal_angle, solve_elliptic, AnomalySolution};
use crate::orbitview_errors::OrbitViewError;
use crate::ref_system::{ecliptic_to_equatorial, obleq};
use crate::small_body::orbital_plane_to_ecliptic;
use crate::time::Epoch;

/// Planet identifier, ordered from the Sun outward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// One element of the table: value at J2000 and rate per century.
type Secular = (f64, f64);

/// `[a (AU), e, I (°), L (°), ϖ (°), Ω (°)]`, each as (J2000 value, rate per century).
type ElementRow = [Secular; 6];

impl Planet {
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Position in [`Planet::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    fn table_row(self) -> ElementRow {
        match self {
            Planet::Mercury => [
                (0.38709927, 0.00000037),
                (0.20563593, 0.00001906),
                (7.00497902, -0.00594749),
                (252.25032350, 149472.67411175),
                (77.45779628, 0.16047689),
                (48.33076593, -0.12534081),
            ],
            Planet::Venus => [
                (0.72333566, 0.00000390),
                (0.00677672, -0.00004107),
                (3.39467605, -0.00078890),
                (181.97909950, 58517.81538729),
                (131.60246718, 0.00268329),
                (76.67984255, -0.27769418),
            ],
            // Earth-Moon barycentre
            Planet::Earth => [
                (1.00000261, 0.00000562),
                (0.01671123, -0.00004392),
                (-0.00001531, -0.01294668),
                (100.46457166, 35999.37244981),
                (102.93768193, 0.32327364),
                (0.0, 0.0),
            ],
            Planet::Mars => [
                (1.52371034, 0.00001847),
                (0.09339410, 0.00007882),
                (1.84969142, -0.00813131),
                (-4.55343205, 19140.30268499),
                (-23.94362959, 0.44441088),
                (49.55953891, -0.29257343),
            ],
            Planet::Jupiter => [
                (5.20288700, -0.00011607),
                (0.04838624, -0.00013253),
                (1.30439695, -0.00183714),
                (34.39644051, 3034.74612775),
                (14.72847983, 0.21252668),
                (100.47390909, 0.20469106),
            ],
            Planet::Saturn => [
                (9.53667594, -0.00125060),
                (0.05386179, -0.00050991),
                (2.48599187, 0.00193609),
                (49.95424423, 1222.49362201),
                (92.59887831, -0.41897216),
                (113.66242448, -0.28867794),
            ],
            Planet::Uranus => [
                (19.18916464, -0.00196176),
                (0.04725744, -0.00004397),
                (0.77263783, -0.00242939),
                (313.23810451, 428.48202785),
                (170.95427630, 0.40805281),
                (74.01692503, 0.04240589),
            ],
            Planet::Neptune => [
                (30.06992276, 0.00026291),
                (0.00859048, 0.00005105),
                (1.77004347, 0.00035372),
                (-55.12002969, 218.45945325),
                (44.96476227, -0.32241464),
                (131.78422574, -0.00508664),
            ],
            Planet::Pluto => [
                (39.48211675, -0.00031596),
                (0.24882730, 0.00005170),
                (17.14001206, 0.00004818),
                (238.92903833, 145.20780515),
                (224.06891629, -0.04062942),
                (110.30393684, -0.01183482),
            ],
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mean elements of a planet at one epoch (ecliptic and equinox J2000).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetElements {
    /// Semi-major axis (AU)
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    /// Inclination (rad)
    pub inclination: f64,
    /// Mean longitude L (rad)
    pub mean_longitude: f64,
    /// Longitude of perihelion ϖ (rad)
    pub perihelion_longitude: f64,
    /// Longitude of the ascending node Ω (rad)
    pub ascending_node_longitude: f64,
}

impl PlanetElements {
    /// Evaluate the secular elements of `planet` at `epoch`.
    pub fn at(planet: Planet, epoch: &Epoch) -> Self {
        let t = epoch.centuries_since_j2000();
        let [a, e, i, l, varpi, node] = planet.table_row().map(|(v0, rate)| v0 + rate * t);

        PlanetElements {
            semi_major_axis: a,
            eccentricity: e,
            inclination: i * RADEG,
            mean_longitude: l * RADEG,
            perihelion_longitude: varpi * RADEG,
            ascending_node_longitude: node * RADEG,
        }
    }

    /// Argument of perihelion ω = ϖ − Ω.
    pub fn periapsis_argument(&self) -> f64 {
        self.perihelion_longitude - self.ascending_node_longitude
    }

    /// Mean anomaly M = L − ϖ, in [0, 2π).
    pub fn mean_anomaly(&self) -> f64 {
        principal_angle(self.mean_longitude - self.perihelion_longitude)
    }

    /// Orbital-plane → equatorial J2000 rotation.
    fn plane_to_j2000(&self) -> Matrix3<f64> {
        ecliptic_to_equatorial(obleq(JD2000))
            * orbital_plane_to_ecliptic(
                self.ascending_node_longitude,
                self.inclination,
                self.periapsis_argument(),
            )
    }
}

/// Equatorial J2000 heliocentric position of `planet` at `epoch`.
pub fn position_at(planet: Planet, epoch: &Epoch) -> Result<Position, OrbitViewError> {
    let elements = PlanetElements::at(planet, epoch);
    let ecc_anomaly = solve_elliptic(elements.mean_anomaly(), elements.eccentricity)?;
    let solution = AnomalySolution::from_eccentric_anomaly(
        elements.semi_major_axis,
        elements.eccentricity,
        ecc_anomaly,
    );
    Ok(elements.plane_to_j2000() * solution.orbital_plane_position())
}

/// Closed orbit of `planet` with the elements of `epoch`: `divisions` points uniformly
/// spaced in true anomaly, the first repeated at the end.
pub fn sample_curve(planet: Planet, epoch: &Epoch, divisions: usize) -> Vec<Position> {
    let elements = PlanetElements::at(planet, epoch);
    let rotation = elements.plane_to_j2000();
    let a = elements.semi_major_axis;
    let e = elements.eccentricity;
    let p = a * (1.0 - e * e);

    let divisions = divisions.max(1);
    let step = std::f64::consts::TAU / divisions as f64;
    let mut points: Vec<Position> = (0..divisions)
        .map(|k| {
            let nu = k as f64 * step;
            let solution = AnomalySolution {
                true_anomaly: nu,
                radius: p / (1.0 + e * nu.cos()),
            };
            rotation * solution.orbital_plane_position()
        })
        .collect();
    points.push(points[0]);
    points
}
