//! # Orbital element representations
//!
//! - [`cometary_element`](crate::orbit_type::cometary_element): perihelion-based
//!   representation `(T, q, e, ω, Ω, i)` for any eccentricity, together with the
//!   resolution of host-supplied parameters ([`BodyParameters`]) into it.
//!
//! ## Typical workflow
//!
//! ```rust, no_run
//! use orbitview::orbit_type::BodyParameters;
//!
//! let params = BodyParameters {
//!     name: Some("1P/Halley".into()),
//!     perihelion_time: Some("19860209.7695".into()),
//!     eccentricity: Some("0.967267".into()),
//!     perihelion_distance: Some("0.587096".into()),
//!     periapsis_argument: Some("111.8466".into()),
//!     ascending_node_longitude: Some("58.1440".into()),
//!     inclination: Some("162.2393".into()),
//!     equinox: Some("1950.0".into()),
//!     ..Default::default()
//! };
//!
//! let elements = params.resolve().unwrap();
//! println!("{elements}");
//! ```

/// Cometary (perihelion-based) orbital elements and host parameter resolution.
pub mod cometary_element;

pub use cometary_element::{BodyParameters, CometaryElements};
