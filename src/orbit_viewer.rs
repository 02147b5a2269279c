//! # Orbit viewer
//!
//! [`OrbitViewer`] is the façade the host talks to. It owns the tracked body, the
//! shared [`EpochClock`] and the orbit-curve cache, and renders a [`Frame`] for any
//! [`ViewState`] and canvas size.
//!
//! ## Typical usage
//!
//! ```rust, no_run
//! use orbitview::orbit_type::BodyParameters;
//! use orbitview::orbit_viewer::{OrbitViewer, ViewerConfig};
//! use orbitview::projection::CanvasSize;
//! use orbitview::time::Direction;
//!
//! # async fn run() -> Result<(), orbitview::orbitview_errors::OrbitViewError> {
//! let params = BodyParameters {
//!     name: Some("1P/Halley".into()),
//!     perihelion_time: Some("19860209.7695".into()),
//!     eccentricity: Some("0.967267".into()),
//!     perihelion_distance: Some("0.587096".into()),
//!     periapsis_argument: Some("111.8466".into()),
//!     ascending_node_longitude: Some("58.1440".into()),
//!     inclination: Some("162.2393".into()),
//!     equinox: Some("1950.0".into()),
//!     date: Some("19860101".into()),
//!     ..Default::default()
//! };
//!
//! let viewer = OrbitViewer::new(&params, ViewerConfig::default())?;
//! let view = viewer.initial_view();
//! let frame = viewer.render(&view, CanvasSize::new(800, 600))?;
//! println!("{} primitives", frame.primitives.len());
//!
//! let mut driver = viewer.animation_driver();
//! driver.play(Direction::Forward).await?;
//! // ... the host redraws on every clock change
//! driver.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Construction fails with a configuration error when the parameters cannot describe
//! an orbit. A render fails with [`OrbitViewError::KeplerNotConverged`] when a
//! position cannot be computed at the current epoch; no frame is produced then.
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::orbit_curve::{CurveSettings, OrbitCurveCache};
use crate::orbit_type::{BodyParameters, CometaryElements};
use crate::orbitview_errors::OrbitViewError;
use crate::player::{AnimationDriver, EpochClock, DEFAULT_CADENCE};
use crate::projection::{CanvasSize, ScenePositions};
use crate::render::{render, Frame, Scene};
use crate::small_body::SmallBodyOrbit;
use crate::time::{Epoch, TimeStep};
use crate::view_state::ViewState;

/// Host-tunable settings of the viewer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub curves: CurveSettings,
    /// Delay between two playback steps (ms)
    pub cadence_ms: u64,
    pub time_step: TimeStep,
    pub view: ViewState,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            curves: CurveSettings::default(),
            cadence_ms: DEFAULT_CADENCE.as_millis() as u64,
            time_step: TimeStep::default(),
            view: ViewState::default(),
        }
    }
}

impl ViewerConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

/// How the date-entry dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateEntryOutcome {
    Confirmed(Epoch),
    Cancelled,
}

#[derive(Debug)]
pub struct OrbitViewer {
    orbit: SmallBodyOrbit,
    clock: Arc<EpochClock>,
    cache: OrbitCurveCache,
    config: ViewerConfig,
}

impl OrbitViewer {
    /// Build the viewer from the host parameters.
    ///
    /// Arguments
    /// ---------
    /// * `params`: raw orbital parameters; the `Date` entry, if any, sets the start date
    /// * `config`: sampling, playback and initial view settings
    ///
    /// Return
    /// ------
    /// * The viewer at the start date (the `Date` parameter or today, clamped to the
    ///   supported range), or the configuration error raised by the parameters.
    pub fn new(params: &BodyParameters, config: ViewerConfig) -> Result<Self, OrbitViewError> {
        let elements = params.resolve()?;
        let start = params.initial_date()?.unwrap_or_else(Epoch::now);
        Ok(OrbitViewer::from_elements(elements, start, config))
    }

    /// Build the viewer from already resolved elements.
    pub fn from_elements(elements: CometaryElements, start: Epoch, config: ViewerConfig) -> Self {
        let orbit = SmallBodyOrbit::new(elements);
        let clock = Arc::new(EpochClock::new(start));
        let cache = OrbitCurveCache::new(&orbit, &clock.current(), config.curves);
        log::debug!("viewer ready for {} at {}", orbit.name(), clock.current());

        OrbitViewer {
            orbit,
            clock,
            cache,
            config,
        }
    }

    pub fn orbit(&self) -> &SmallBodyOrbit {
        &self.orbit
    }

    pub fn name(&self) -> &str {
        self.orbit.name()
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<EpochClock> {
        &self.clock
    }

    pub fn epoch(&self) -> Epoch {
        self.clock.current()
    }

    pub fn curve_cache(&self) -> &OrbitCurveCache {
        &self.cache
    }

    /// View the host should start with.
    pub fn initial_view(&self) -> ViewState {
        self.config.view
    }

    /// Play controls bound to this viewer's clock.
    pub fn animation_driver(&self) -> AnimationDriver {
        AnimationDriver::new(
            Arc::clone(&self.clock),
            self.config.cadence(),
            self.config.time_step,
        )
    }

    /// Jump to `epoch`, clamped to the supported range.
    pub fn set_date(&self, epoch: Epoch) -> Epoch {
        self.clock.set(epoch)
    }

    /// Completion hook of the date-entry dialog.
    pub fn end_date_entry(&self, outcome: DateEntryOutcome) -> Epoch {
        match outcome {
            DateEntryOutcome::Confirmed(epoch) => self.set_date(epoch),
            DateEntryOutcome::Cancelled => self.epoch(),
        }
    }

    /// Render the scene at the current epoch.
    ///
    /// Curves and frame matrix are rebuilt first when the epoch has drifted beyond
    /// the resample threshold.
    pub fn render(&self, view: &ViewState, canvas: CanvasSize) -> Result<Frame, OrbitViewError> {
        let epoch = self.clock.current();
        let curves = self.cache.refresh(&self.orbit, &epoch);

        let positions = ScenePositions::compute(&self.orbit, &epoch, curves.frame())
            .inspect_err(|err| log::warn!("frame at {epoch} skipped: {err}"))?;

        let scene = Scene {
            object_name: self.orbit.name(),
            epoch: &epoch,
            curves: &curves,
            positions: &positions,
        };
        Ok(render(&scene, view, canvas))
    }
}

#[cfg(test)]
mod orbit_viewer_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    use crate::constants::TROPICAL_YEAR;
    use crate::view_state::CenterObject;

    fn halley_params() -> BodyParameters {
        BodyParameters {
            name: Some("1P/Halley".into()),
            perihelion_time: Some("19860209.7695".into()),
            eccentricity: Some("0.967267".into()),
            perihelion_distance: Some("0.587096".into()),
            periapsis_argument: Some("111.8466".into()),
            ascending_node_longitude: Some("58.1440".into()),
            inclination: Some("162.2393".into()),
            equinox: Some("1950.0".into()),
            date: Some("19860101".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_uses_date_parameter() {
        let viewer = OrbitViewer::new(&halley_params(), ViewerConfig::default()).unwrap();
        assert_eq!(viewer.name(), "1P/Halley");
        assert_eq!(viewer.epoch(), Epoch::from_calendar(1986, 1, 1.0));
        assert_eq!(viewer.initial_view(), ViewState::default());
    }

    #[test]
    fn test_new_rejects_bad_parameters() {
        let params = BodyParameters {
            perihelion_distance: None,
            ..halley_params()
        };
        let err = OrbitViewer::new(&params, ViewerConfig::default()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_date_entry() {
        let viewer = OrbitViewer::new(&halley_params(), ViewerConfig::default()).unwrap();
        let start = viewer.epoch();

        assert_eq!(viewer.end_date_entry(DateEntryOutcome::Cancelled), start);

        let target = Epoch::from_calendar(2061, 7, 28.0);
        assert_eq!(
            viewer.end_date_entry(DateEntryOutcome::Confirmed(target)),
            target
        );

        let (_, max) = Epoch::supported_range();
        let far = Epoch::from_calendar(2300, 1, 1.0);
        assert_eq!(viewer.set_date(far), max);
        assert_eq!(viewer.epoch(), max);
    }

    #[test]
    fn test_render_refreshes_cache() {
        let viewer = OrbitViewer::new(&halley_params(), ViewerConfig::default()).unwrap();
        let before = viewer.curve_cache().snapshot();

        viewer.set_date(Epoch::from_jd(viewer.epoch().jd() + 2.0 * TROPICAL_YEAR));
        viewer
            .render(&viewer.initial_view(), CanvasSize::new(600, 600))
            .unwrap();
        assert!(Arc::ptr_eq(&before, &viewer.curve_cache().snapshot()));

        viewer.set_date(Epoch::from_jd(viewer.epoch().jd() + 10.0 * TROPICAL_YEAR));
        viewer
            .render(&viewer.initial_view(), CanvasSize::new(600, 600))
            .unwrap();
        let after = viewer.curve_cache().snapshot();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.epoch(), &viewer.epoch());
    }

    #[test]
    fn test_render_centered_on_object() {
        let viewer = OrbitViewer::new(&halley_params(), ViewerConfig::default()).unwrap();
        let view = ViewState {
            center: CenterObject::Object,
            ..viewer.initial_view()
        };
        let frame = viewer.render(&view, CanvasSize::new(800, 600)).unwrap();
        let (object, _) = frame.disks().nth(1).unwrap();
        assert_abs_diff_eq!(object.x, 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(object.y, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_render_without_position_gives_no_frame() {
        // Finite elements whose mean motion overflows: the hyperbolic solver never settles.
        let elements = CometaryElements::new(
            "degenerate",
            Epoch::from_calendar(1986, 2, 9.0).jd(),
            2.0,
            1e-300,
            0.0,
            0.0,
            0.0,
            2000.0,
        )
        .unwrap();
        let viewer = OrbitViewer::from_elements(
            elements,
            Epoch::from_calendar(1986, 1, 1.0),
            ViewerConfig::default(),
        );
        let before = viewer.curve_cache().snapshot();

        let err = viewer
            .render(&viewer.initial_view(), CanvasSize::new(600, 600))
            .unwrap_err();
        assert!(err.is_convergence());
        assert!(!err.is_configuration());
        assert!(Arc::ptr_eq(&before, &viewer.curve_cache().snapshot()));
    }

    #[test]
    fn test_config_cadence() {
        let config = ViewerConfig {
            cadence_ms: 20,
            time_step: TimeStep::OneMonth,
            ..Default::default()
        };
        assert_eq!(config.cadence(), Duration::from_millis(20));

        let viewer = OrbitViewer::new(&halley_params(), config).unwrap();
        let driver = viewer.animation_driver();
        assert_eq!(driver.cadence(), Duration::from_millis(20));
        assert_eq!(driver.time_step(), TimeStep::OneMonth);
        assert!(Arc::ptr_eq(driver.clock(), viewer.clock()));
    }
}
