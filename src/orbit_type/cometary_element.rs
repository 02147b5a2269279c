use std::fmt;

use serde::Deserialize;

use crate::constants::{Degree, JulianDay, PARABOLIC_TOLERANCE, RADEG};
use crate::kepler::{mean_motion, OrbitKind};
use crate::orbitview_errors::OrbitViewError;
use crate::time::Epoch;

/// Eccentricity above which a mean anomaly at epoch is not accepted (the orbit is
/// too close to parabolic for `M` to be meaningful).
const NEAR_PARABOLIC_ECCENTRICITY: f64 = 0.95;

/// Smallest accepted perihelion distance (AU).
const MIN_PERIHELION_DISTANCE: f64 = 1e-15;

/// Julian Day of the Besselian epoch B1900.0 and length of the Besselian year.
const B1900: JulianDay = 2_415_020.313_52;
const BESSELIAN_YEAR: f64 = 365.242_198_781;

/// # Cometary orbital elements
///
/// Perihelion-based elements `(T, q, e, ω, Ω, i)` referred to the ecliptic and mean
/// equinox of a given year. They cover elliptic, parabolic and hyperbolic orbits
/// uniformly, which is what a comet or asteroid viewer needs.
///
/// Units & conventions
/// --------------------
/// - Distances in **AU**; angles in **radians**; epochs as **Julian Days**.
/// - The equinox is a (fractional) year, e.g. `2000.0` or `1950.0`.
/// - The conic family is decided once at construction and stored in [`Self::kind`].
#[derive(Debug, Clone, PartialEq)]
pub struct CometaryElements {
    /// Display name of the body.
    pub name: String,

    /// Time of perihelion passage `T` (JD).
    pub perihelion_time: JulianDay,

    /// Eccentricity `e` (≥ 0).
    pub eccentricity: f64,

    /// Perihelion distance `q` (AU).
    pub perihelion_distance: f64,

    /// Argument of perihelion `ω` (rad).
    pub periapsis_argument: f64,

    /// Longitude of the ascending node `Ω` (rad).
    pub ascending_node_longitude: f64,

    /// Inclination `i` (rad).
    pub inclination: f64,

    /// Year of the equinox the angles are referred to.
    pub equinox: f64,

    /// Conic family, chosen from `e`.
    pub kind: OrbitKind,
}

impl CometaryElements {
    /// Build a validated element set.
    ///
    /// Arguments
    /// -----------------
    /// * `name`: display name.
    /// * `perihelion_time`: `T` in Julian Days.
    /// * `eccentricity`: `e ≥ 0`.
    /// * `perihelion_distance`: `q > 0` in AU.
    /// * `periapsis_argument`, `ascending_node_longitude`, `inclination`: radians.
    /// * `equinox`: year of the equinox.
    ///
    /// Return
    /// ----------
    /// * The element set, or [`OrbitViewError::InvalidOrbit`] if a value is out of domain.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        perihelion_time: JulianDay,
        eccentricity: f64,
        perihelion_distance: f64,
        periapsis_argument: f64,
        ascending_node_longitude: f64,
        inclination: f64,
        equinox: f64,
    ) -> Result<Self, OrbitViewError> {
        let values = [
            perihelion_time,
            eccentricity,
            perihelion_distance,
            periapsis_argument,
            ascending_node_longitude,
            inclination,
            equinox,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(OrbitViewError::InvalidOrbit(
                "orbital elements must be finite".into(),
            ));
        }
        if eccentricity < 0.0 {
            return Err(OrbitViewError::InvalidOrbit(format!(
                "negative eccentricity {eccentricity}"
            )));
        }
        if perihelion_distance <= 0.0 {
            return Err(OrbitViewError::InvalidOrbit(format!(
                "non-positive perihelion distance {perihelion_distance}"
            )));
        }

        Ok(CometaryElements {
            name: name.into(),
            perihelion_time,
            eccentricity,
            perihelion_distance,
            periapsis_argument,
            ascending_node_longitude,
            inclination,
            equinox,
            kind: OrbitKind::from_eccentricity(eccentricity),
        })
    }

    /// Julian Day of the equinox, read as a Besselian epoch (1950.0 → B1950.0).
    pub fn equinox_jd(&self) -> JulianDay {
        B1900 + (self.equinox - 1900.0) * BESSELIAN_YEAR
    }

    /// Semi-major axis `a = q / (1 − e)` (AU), negative for hyperbolic orbits,
    /// `None` for a parabola.
    pub fn semi_major_axis(&self) -> Option<f64> {
        match self.kind {
            OrbitKind::Parabolic => None,
            _ => Some(self.perihelion_distance / (1.0 - self.eccentricity)),
        }
    }

    /// Orbital period in days, for elliptic orbits only.
    pub fn period(&self) -> Option<f64> {
        match self.kind {
            OrbitKind::Elliptic => self
                .semi_major_axis()
                .map(|a| std::f64::consts::TAU / mean_motion(a)),
            _ => None,
        }
    }
}

impl fmt::Display for CometaryElements {
    /// Pretty-print cometary elements with both radians and degrees for angles.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rad_to_deg = 180.0 / std::f64::consts::PI;
        writeln!(
            f,
            "Cometary Elements of {} ({:?}) @ T (JD): {:.6}",
            self.name, self.kind, self.perihelion_time
        )?;
        writeln!(f, "------------------------------------------------")?;
        writeln!(
            f,
            "  q   (perihelion distance)     = {:.6} AU",
            self.perihelion_distance
        )?;
        writeln!(
            f,
            "  e   (eccentricity)            = {:.6}",
            self.eccentricity
        )?;
        writeln!(
            f,
            "  i   (inclination)             = {:.6} rad ({:.6}°)",
            self.inclination,
            self.inclination * rad_to_deg
        )?;
        writeln!(
            f,
            "  Ω   (longitude of node)       = {:.6} rad ({:.6}°)",
            self.ascending_node_longitude,
            self.ascending_node_longitude * rad_to_deg
        )?;
        writeln!(
            f,
            "  ω   (argument of perihelion)  = {:.6} rad ({:.6}°)",
            self.periapsis_argument,
            self.periapsis_argument * rad_to_deg
        )?;
        write!(f, "  equinox                       = {:.1}", self.equinox)
    }
}

/// Orbital parameters as supplied by the host page, one decimal string per key.
///
/// Angles are in degrees and dates in the `YYYYMMDD.fraction` format. The element set
/// is either perihelion based (`T` with `q` or `a`) or epoch based (`Epoch`, `M` with
/// `a` or `q`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BodyParameters {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "T")]
    pub perihelion_time: Option<String>,
    #[serde(rename = "e")]
    pub eccentricity: Option<String>,
    #[serde(rename = "q")]
    pub perihelion_distance: Option<String>,
    #[serde(rename = "a")]
    pub semi_major_axis: Option<String>,
    #[serde(rename = "Epoch")]
    pub epoch: Option<String>,
    #[serde(rename = "M")]
    pub mean_anomaly: Option<String>,
    #[serde(rename = "Peri")]
    pub periapsis_argument: Option<String>,
    #[serde(rename = "Node")]
    pub ascending_node_longitude: Option<String>,
    #[serde(rename = "Incl")]
    pub inclination: Option<String>,
    #[serde(rename = "Eqnx")]
    pub equinox: Option<String>,
    /// Initial date of the view.
    #[serde(rename = "Date")]
    pub date: Option<String>,
}

fn parse_decimal(name: &'static str, raw: &str) -> Result<f64, OrbitViewError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| OrbitViewError::InvalidParameter {
            name,
            value: raw.to_string(),
        })
}

fn optional(name: &'static str, raw: &Option<String>) -> Result<Option<f64>, OrbitViewError> {
    raw.as_deref().map(|s| parse_decimal(name, s)).transpose()
}

fn required(name: &'static str, raw: &Option<String>) -> Result<f64, OrbitViewError> {
    optional(name, raw)?.ok_or(OrbitViewError::MissingParameter(name))
}

fn required_angle(name: &'static str, raw: &Option<String>) -> Result<f64, OrbitViewError> {
    let deg: Degree = required(name, raw)?;
    Ok(deg * RADEG)
}

impl BodyParameters {
    /// Resolve the raw parameters into canonical cometary elements.
    ///
    /// Perihelion based input takes `q` directly, or derives it from `a` as
    /// `q = a(1 − e)` (not possible for a parabola). Epoch based input derives the time
    /// of perihelion from the mean anomaly with `n = k / a^1.5`:
    ///
    /// ```text
    /// T = Epoch − M/n          if M < π
    /// T = Epoch + (2π − M)/n   otherwise
    /// ```
    ///
    /// Errors
    /// ------
    /// * [`OrbitViewError::MissingParameter`] for a missing `e`, `T`/`Epoch`, `q`/`a`,
    ///   `M`, `Peri`, `Node`, `Incl` or `Eqnx`.
    /// * [`OrbitViewError::InvalidParameter`] for a value that is not a decimal number.
    /// * [`OrbitViewError::ParabolicWithoutPerihelionDistance`],
    ///   [`OrbitViewError::NearParabolicWithoutPerihelionTime`],
    ///   [`OrbitViewError::PerihelionTooSmall`] for inconsistent element sets.
    pub fn resolve(&self) -> Result<CometaryElements, OrbitViewError> {
        let name = self.name.clone().unwrap_or_else(|| "Object".to_string());
        let e = required("e", &self.eccentricity)?;

        let (perihelion_time, q) = if let Some(t) = optional("T", &self.perihelion_time)? {
            let q = match (
                optional("q", &self.perihelion_distance)?,
                optional("a", &self.semi_major_axis)?,
            ) {
                (Some(q), _) => q,
                (None, Some(_)) if (e - 1.0).abs() < PARABOLIC_TOLERANCE => {
                    return Err(OrbitViewError::ParabolicWithoutPerihelionDistance)
                }
                (None, Some(a)) => a * (1.0 - e),
                (None, None) => return Err(OrbitViewError::MissingParameter("q")),
            };
            (Epoch::from_ymd_decimal(t).jd(), q)
        } else if let Some(epoch) = optional("Epoch", &self.epoch)? {
            if e > NEAR_PARABOLIC_ECCENTRICITY {
                return Err(OrbitViewError::NearParabolicWithoutPerihelionTime(e));
            }
            let (a, q) = match (
                optional("a", &self.semi_major_axis)?,
                optional("q", &self.perihelion_distance)?,
            ) {
                (Some(a), _) => (a, a * (1.0 - e)),
                (None, Some(q)) => (q / (1.0 - e), q),
                (None, None) => return Err(OrbitViewError::MissingParameter("q")),
            };
            if q < MIN_PERIHELION_DISTANCE {
                return Err(OrbitViewError::PerihelionTooSmall(q));
            }

            let n = mean_motion(a);
            let m = required_angle("M", &self.mean_anomaly)?;
            let epoch_jd = Epoch::from_ymd_decimal(epoch).jd();
            let t = if m < std::f64::consts::PI {
                epoch_jd - m / n
            } else {
                epoch_jd + (std::f64::consts::TAU - m) / n
            };
            (t, q)
        } else {
            return Err(OrbitViewError::MissingParameter("T"));
        };

        let elements = CometaryElements::new(
            name,
            perihelion_time,
            e,
            q,
            required_angle("Peri", &self.periapsis_argument)?,
            required_angle("Node", &self.ascending_node_longitude)?,
            required_angle("Incl", &self.inclination)?,
            required("Eqnx", &self.equinox)?,
        )?;
        log::debug!(
            "resolved {} as {:?} orbit, T = JD {:.5}",
            elements.name,
            elements.kind,
            elements.perihelion_time
        );
        Ok(elements)
    }

    /// Initial date of the view, if the host supplied one.
    pub fn initial_date(&self) -> Result<Option<Epoch>, OrbitViewError> {
        Ok(optional("Date", &self.date)?.map(Epoch::from_ymd_decimal))
    }
}
