//! # Projection
//!
//! Maps world coordinates (heliocentric ecliptic of date, AU) to canvas pixels.
//!
//! The view rotation turns the scene by `rot_h` about the ecliptic pole, then tilts
//! it by `rot_v` about the X axis. A weak perspective enlarges points nearer to the
//! viewer:
//!
//! ```text
//! (x', y', z') = R_x(rot_v) · R_z(rot_h) · world        (passive rotations)
//! s            = zoom · width / 600 · (1 + z' / 250)
//! screen       = origin + (x'·s, −y'·s)
//! ```
//!
//! With zoom 5 the canvas width spans 120 AU, with zoom 100 it spans 6 AU.
use nalgebra::Matrix3;

use crate::constants::{Position, RADEG};
use crate::orbitview_errors::OrbitViewError;
use crate::planets::{self, Planet};
use crate::ref_system::{rotmt, ReferenceFrameMatrix};
use crate::small_body::SmallBodyOrbit;
use crate::time::Epoch;
use crate::view_state::{CenterObject, ViewState};

/// Depth (AU) at which the perspective factor doubles.
const PERSPECTIVE_DEPTH: f64 = 250.0;

/// Canvas width that maps zoom 1 to one pixel per AU.
const REFERENCE_WIDTH: f64 = 600.0;

/// Canvas size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub fn new(width: u32, height: u32) -> Self {
        CanvasSize { width, height }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }
}

/// Canvas position in pixels, Y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        ScreenPoint { x, y }
    }

    /// Nearest pixel.
    pub fn to_pixel(&self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> ScreenPoint {
        ScreenPoint::new(self.x + dx, self.y + dy)
    }
}

/// World positions of every drawable body at the current epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePositions {
    pub object: Position,
    /// Indexed like [`Planet::ALL`]
    pub planets: [Position; 9],
}

impl ScenePositions {
    /// Positions of the small body and the planets at `epoch`, through `frame`.
    pub fn compute(
        orbit: &SmallBodyOrbit,
        epoch: &Epoch,
        frame: &ReferenceFrameMatrix,
    ) -> Result<Self, OrbitViewError> {
        let object = frame.apply(&orbit.position_at(epoch)?);
        let mut positions = [Position::zeros(); 9];
        for (slot, planet) in positions.iter_mut().zip(Planet::ALL) {
            *slot = frame.apply(&planets::position_at(planet, epoch)?);
        }
        Ok(ScenePositions {
            object,
            planets: positions,
        })
    }

    pub fn planet(&self, planet: Planet) -> &Position {
        &self.planets[planet.index()]
    }

    /// World position of a centre candidate, the Sun being the origin.
    pub fn center_position(&self, center: CenterObject) -> Position {
        match center {
            CenterObject::Sun => Position::zeros(),
            CenterObject::Object => self.object,
            CenterObject::Planet(planet) => *self.planet(planet),
        }
    }
}

/// View rotation and scale for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    rotation: Matrix3<f64>,
    scale: f64,
    canvas: CanvasSize,
}

impl Projection {
    pub fn new(view: &ViewState, canvas: CanvasSize) -> Self {
        let rot_h = rotmt(-view.rot_h * RADEG, 2);
        let rot_v = rotmt(-view.rot_v * RADEG, 0);

        Projection {
            rotation: rot_v * rot_h,
            scale: view.zoom * canvas.width as f64 / REFERENCE_WIDTH,
            canvas,
        }
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// World position seen from the viewer.
    pub fn rotate(&self, world: &Position) -> Position {
        self.rotation * world
    }

    /// Pixel offset of `world` from the projected Sun.
    pub fn raw_projection(&self, world: &Position) -> (f64, f64) {
        let view = self.rotate(world);
        let s = self.scale * (1.0 + view.z / PERSPECTIVE_DEPTH);
        (view.x * s, -view.y * s)
    }

    pub fn screen_point(&self, world: &Position, origin: &ScreenPoint) -> ScreenPoint {
        let (dx, dy) = self.raw_projection(world);
        origin.offset(dx, dy)
    }

    /// Projected Sun position that puts the selected body at the canvas centre.
    pub fn choose_origin(&self, view: &ViewState, positions: &ScenePositions) -> ScreenPoint {
        let center = self.canvas.center();
        match view.center {
            CenterObject::Sun => center,
            selected => {
                let (dx, dy) = self.raw_projection(&positions.center_position(selected));
                center.offset(-dx, -dy)
            }
        }
    }
}
