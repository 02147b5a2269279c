//! # Constants and type definitions for orbitview
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Astronomical constants (Gaussian gravitational constant, J2000, tropical year)
//! - Unit conversions (degrees ↔ radians, arcseconds → radians)
//! - The supported calendar range of the viewer
//! - Core type aliases used across the crate

use nalgebra::Vector3;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Julian Day of J2000.0 (2000-01-01 12:00:00 TT)
pub const JD2000: f64 = 2_451_545.0;

/// Days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Length of the tropical year in days
pub const TROPICAL_YEAR: f64 = 365.2422;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Gaussian gravitational constant k (AU^1.5 / day)
pub const GAUSS_GRAV: f64 = 0.01720209895;

/// k², the heliocentric gravitational parameter in AU³/day²
pub const GAUSS_GRAV_SQUARED: f64 = GAUSS_GRAV * GAUSS_GRAV;

/// |e − 1| below this value classifies an orbit as parabolic
pub const PARABOLIC_TOLERANCE: f64 = 1e-15;

/// Drift between the working epoch and a cached curve/frame before it is rebuilt (days)
pub const RESAMPLE_THRESHOLD: f64 = TROPICAL_YEAR * 5.0;

// -------------------------------------------------------------------------------------------------
// Supported calendar range
// -------------------------------------------------------------------------------------------------

/// First supported calendar year (inclusive, January 1st 0h)
pub const MIN_YEAR: i32 = 1600;

/// End of the supported calendar range (January 1st 0h of this year)
pub const MAX_YEAR: i32 = 2200;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Day (days)
pub type JulianDay = f64;

/// Heliocentric Cartesian position (AU)
pub type Position = Vector3<f64>;
