//! # Orbit curves
//!
//! Sampled orbits in world coordinates (ecliptic of date), cached together with the
//! frame matrix they were transformed by.
//!
//! A [`CacheSnapshot`] is immutable: the frame matrix, the small-body curve and the
//! nine planet curves, all built for the same epoch. [`OrbitCurveCache`] holds the
//! current snapshot behind an `RwLock<Arc<_>>`. A refresh builds a complete new
//! snapshot without holding the lock and swaps the `Arc`, so a reader always sees a
//! consistent epoch/frame/curve triple. Camera changes never touch the cache.
use std::sync::{Arc, RwLock};

use itertools::Itertools;
use serde::Deserialize;

use crate::constants::{Position, RESAMPLE_THRESHOLD};
use crate::planets::{self, Planet};
use crate::ref_system::ReferenceFrameMatrix;
use crate::small_body::SmallBodyOrbit;
use crate::time::Epoch;

/// Sampling resolution and drift threshold of the cached curves.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct CurveSettings {
    /// Divisions of the small-body curve
    pub object_divisions: usize,
    /// Divisions of each planet curve
    pub planet_divisions: usize,
    /// Epoch drift (days) beyond which curves and frame are rebuilt
    pub resample_threshold: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        CurveSettings {
            object_divisions: 120,
            planet_divisions: 48,
            resample_threshold: RESAMPLE_THRESHOLD,
        }
    }
}

/// A sampled orbit in world coordinates, tagged with its generation epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCurve {
    epoch: Epoch,
    points: Vec<Position>,
    closed: bool,
}

impl OrbitCurve {
    /// Transform equatorial J2000 samples into world coordinates with `frame`.
    pub fn from_samples(samples: &[Position], frame: &ReferenceFrameMatrix, closed: bool) -> Self {
        OrbitCurve {
            epoch: *frame.epoch(),
            points: samples.iter().map(|p| frame.apply(p)).collect(),
            closed,
        }
    }

    pub fn epoch(&self) -> &Epoch {
        &self.epoch
    }

    pub fn points(&self) -> &[Position] {
        &self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Consecutive point pairs, the polyline to draw.
    pub fn segments(&self) -> impl Iterator<Item = (&Position, &Position)> + '_ {
        self.points.iter().tuple_windows()
    }
}

/// Frame matrix and curves built for one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    frame: ReferenceFrameMatrix,
    object_curve: Arc<OrbitCurve>,
    planet_curves: Vec<Arc<OrbitCurve>>,
}

impl CacheSnapshot {
    pub fn build(orbit: &SmallBodyOrbit, epoch: &Epoch, settings: &CurveSettings) -> Self {
        let frame = ReferenceFrameMatrix::build(epoch);

        let object_samples = orbit.sample_curve(settings.object_divisions);
        let object_curve = Arc::new(OrbitCurve::from_samples(
            &object_samples,
            &frame,
            orbit.kind().is_bound(),
        ));

        let planet_curves = Planet::ALL
            .iter()
            .map(|&planet| {
                let samples = planets::sample_curve(planet, epoch, settings.planet_divisions);
                Arc::new(OrbitCurve::from_samples(&samples, &frame, true))
            })
            .collect();

        CacheSnapshot {
            frame,
            object_curve,
            planet_curves,
        }
    }

    pub fn epoch(&self) -> &Epoch {
        self.frame.epoch()
    }

    pub fn frame(&self) -> &ReferenceFrameMatrix {
        &self.frame
    }

    pub fn object_curve(&self) -> &Arc<OrbitCurve> {
        &self.object_curve
    }

    pub fn planet_curve(&self, planet: Planet) -> &Arc<OrbitCurve> {
        &self.planet_curves[planet.index()]
    }

    /// True once `current` has drifted beyond `threshold` days from the build epoch.
    pub fn is_stale(&self, current: &Epoch, threshold: f64) -> bool {
        (self.epoch().jd() - current.jd()).abs() > threshold
    }
}

/// Shared, lazily refreshed [`CacheSnapshot`].
#[derive(Debug)]
pub struct OrbitCurveCache {
    settings: CurveSettings,
    snapshot: RwLock<Arc<CacheSnapshot>>,
}

impl OrbitCurveCache {
    pub fn new(orbit: &SmallBodyOrbit, epoch: &Epoch, settings: CurveSettings) -> Self {
        let snapshot = Arc::new(CacheSnapshot::build(orbit, epoch, &settings));
        OrbitCurveCache {
            settings,
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn settings(&self) -> &CurveSettings {
        &self.settings
    }

    /// Current snapshot, whatever its epoch.
    pub fn snapshot(&self) -> Arc<CacheSnapshot> {
        let guard = self
            .snapshot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&guard)
    }

    /// Snapshot valid for `epoch`, rebuilding and swapping it in if the current one
    /// has drifted too far.
    pub fn refresh(&self, orbit: &SmallBodyOrbit, epoch: &Epoch) -> Arc<CacheSnapshot> {
        let current = self.snapshot();
        if !current.is_stale(epoch, self.settings.resample_threshold) {
            return current;
        }

        log::debug!(
            "resampling orbit curves: cached at JD {:.2}, now JD {:.2}",
            current.epoch().jd(),
            epoch.jd()
        );
        let rebuilt = Arc::new(CacheSnapshot::build(orbit, epoch, &self.settings));

        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&rebuilt);
        rebuilt
    }

    /// Rebuild unconditionally for `epoch`.
    pub fn rebuild(&self, orbit: &SmallBodyOrbit, epoch: &Epoch) -> Arc<CacheSnapshot> {
        let rebuilt = Arc::new(CacheSnapshot::build(orbit, epoch, &self.settings));
        let mut guard = self
            .snapshot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Arc::clone(&rebuilt);
        rebuilt
    }
}
