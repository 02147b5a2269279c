//! # Render frame
//!
//! Turns the cached curves, the body positions and the view state into a [`Frame`]:
//! a list of drawing primitives in canvas pixels, in paint order. The host draws them
//! on a black background with whatever graphics backend it has.
//!
//! Paint order:
//!
//! 1. the ecliptic X and Z axes (±50 AU), minus halves first,
//! 2. the Sun,
//! 3. the small-body orbit when enabled, then the small body and its name,
//! 4. planets from Pluto inward, each orbit followed by the body and its name,
//! 5. the text readouts.
//!
//! Orbit segments take the "upper" colour when their end point lies north of the
//! ecliptic of date and the "lower" colour otherwise. Earth's orbit always uses the
//! upper colour. Mars, Earth, Venus and Mercury are left out entirely while their
//! orbit would be too small to tell apart from the Sun.
use crate::constants::{AstronomicalUnit, Position};
use crate::orbit_curve::{CacheSnapshot, OrbitCurve};
use crate::planets::Planet;
use crate::projection::{CanvasSize, Projection, ScenePositions, ScreenPoint};
use crate::time::Epoch;
use crate::view_state::ViewState;

/// Half length of the drawn ecliptic axes (AU).
pub const AXIS_LENGTH: f64 = 50.0;

/// Smallest `zoom · a` for which an inner planet is drawn.
pub const INNER_PLANET_MIN_EXTENT: f64 = 7.5;

/// Radius of the body disks (px).
pub const BODY_RADIUS: f64 = 2.5;

/// Horizontal gap between a body and its name (px).
pub const LABEL_OFFSET: f64 = 5.0;

/// 24-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Rgb {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }
}

pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb::from_hex(0x000000);
    pub const OBJECT_ORBIT_UPPER: Rgb = Rgb::from_hex(0x00f5ff);
    pub const OBJECT_ORBIT_LOWER: Rgb = Rgb::from_hex(0x0000ff);
    pub const OBJECT: Rgb = Rgb::from_hex(0x00ffff);
    pub const OBJECT_NAME: Rgb = Rgb::from_hex(0x00cccc);
    pub const PLANET_ORBIT_UPPER: Rgb = Rgb::from_hex(0xffffff);
    pub const PLANET_ORBIT_LOWER: Rgb = Rgb::from_hex(0x808080);
    pub const PLANET: Rgb = Rgb::from_hex(0x00ff00);
    pub const PLANET_NAME: Rgb = Rgb::from_hex(0x00aa00);
    pub const SUN: Rgb = Rgb::from_hex(0xd04040);
    pub const AXIS_PLUS: Rgb = Rgb::from_hex(0xffff00);
    pub const AXIS_MINUS: Rgb = Rgb::from_hex(0x555500);
    pub const INFORMATION: Rgb = Rgb::from_hex(0xffffff);
}

/// Font role of a text primitive; the host maps it to an actual font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextRole {
    ObjectName,
    PlanetName,
    Information,
}

/// Canvas corner a readout is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anchor {
    TopLeft,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        color: Rgb,
    },
    Disk {
        center: ScreenPoint,
        radius: f64,
        color: Rgb,
    },
    /// Text whose baseline starts at `position`.
    Label {
        position: ScreenPoint,
        text: String,
        color: Rgb,
        role: TextRole,
    },
    /// Text laid out by the host against a canvas corner; `row` 0 is nearest to it.
    Readout {
        anchor: Anchor,
        row: u8,
        text: String,
        color: Rgb,
    },
}

/// Everything to paint for one epoch and view.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub canvas: CanvasSize,
    pub background: Rgb,
    pub primitives: Vec<Primitive>,
}

impl Frame {
    fn new(canvas: CanvasSize) -> Self {
        Frame {
            canvas,
            background: palette::BACKGROUND,
            primitives: Vec::new(),
        }
    }

    fn line(&mut self, from: ScreenPoint, to: ScreenPoint, color: Rgb) {
        self.primitives.push(Primitive::Line { from, to, color });
    }

    fn disk(&mut self, center: ScreenPoint, color: Rgb) {
        self.primitives.push(Primitive::Disk {
            center,
            radius: BODY_RADIUS,
            color,
        });
    }

    fn label(&mut self, body: ScreenPoint, text: &str, color: Rgb, role: TextRole) {
        self.primitives.push(Primitive::Label {
            position: body.offset(LABEL_OFFSET, 0.0),
            text: text.to_string(),
            color,
            role,
        });
    }

    fn readout(&mut self, anchor: Anchor, row: u8, text: String) {
        self.primitives.push(Primitive::Readout {
            anchor,
            row,
            text,
            color: palette::INFORMATION,
        });
    }

    pub fn lines(&self) -> impl Iterator<Item = (&ScreenPoint, &ScreenPoint, Rgb)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { from, to, color } => Some((from, to, *color)),
            _ => None,
        })
    }

    pub fn disks(&self) -> impl Iterator<Item = (&ScreenPoint, Rgb)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Disk { center, color, .. } => Some((center, *color)),
            _ => None,
        })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Label { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn readouts(&self) -> impl Iterator<Item = (Anchor, u8, &str)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Readout {
                anchor, row, text, ..
            } => Some((*anchor, *row, text.as_str())),
            _ => None,
        })
    }
}

/// Inputs of one frame, all for the same epoch.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub object_name: &'a str,
    pub epoch: &'a Epoch,
    pub curves: &'a CacheSnapshot,
    /// World positions at `epoch`
    pub positions: &'a ScenePositions,
}

/// Nominal semi-major axis used to hide the inner planets at small zoom.
fn inner_planet_extent(planet: Planet) -> Option<AstronomicalUnit> {
    match planet {
        Planet::Mercury => Some(0.387),
        Planet::Venus => Some(0.723),
        Planet::Earth => Some(1.0),
        Planet::Mars => Some(1.524),
        _ => None,
    }
}

/// True when `planet` is large enough on screen at `zoom` to be drawn.
pub fn planet_drawn_at(planet: Planet, zoom: f64) -> bool {
    inner_planet_extent(planet).map_or(true, |a| zoom * a >= INNER_PLANET_MIN_EXTENT)
}

/// Distance for the readouts: rounded half up then truncated to three decimals.
pub fn display_distance(distance: AstronomicalUnit) -> f64 {
    ((distance + 0.0005) * 1000.0).trunc() / 1000.0
}

struct Painter<'a> {
    projection: Projection,
    origin: ScreenPoint,
    frame: &'a mut Frame,
}

impl Painter<'_> {
    fn point(&self, world: &Position) -> ScreenPoint {
        self.projection.screen_point(world, &self.origin)
    }

    fn axes(&mut self) {
        let axes = [
            (Position::new(-AXIS_LENGTH, 0.0, 0.0), palette::AXIS_MINUS),
            (Position::new(0.0, 0.0, -AXIS_LENGTH), palette::AXIS_MINUS),
            (Position::new(AXIS_LENGTH, 0.0, 0.0), palette::AXIS_PLUS),
            (Position::new(0.0, 0.0, AXIS_LENGTH), palette::AXIS_PLUS),
        ];
        for (end, color) in axes {
            let to = self.point(&end);
            self.frame.line(self.origin, to, color);
        }
    }

    fn orbit(&mut self, curve: &OrbitCurve, upper: Rgb, lower: Rgb) {
        for (from, to) in curve.segments() {
            let color = if to.z >= 0.0 { upper } else { lower };
            let (a, b) = (self.point(from), self.point(to));
            self.frame.line(a, b, color);
        }
    }

    fn body(&mut self, world: &Position, color: Rgb, name: Option<(&str, Rgb, TextRole)>) {
        let at = self.point(world);
        self.frame.disk(at, color);
        if let Some((text, name_color, role)) = name {
            self.frame.label(at, text, name_color, role);
        }
    }
}

/// Build the frame for `scene` seen through `view` on a canvas of size `canvas`.
pub fn render(scene: &Scene<'_>, view: &ViewState, canvas: CanvasSize) -> Frame {
    let projection = Projection::new(view, canvas);
    let origin = projection.choose_origin(view, scene.positions);
    let mut frame = Frame::new(canvas);
    let mut painter = Painter {
        projection,
        origin,
        frame: &mut frame,
    };

    painter.axes();
    painter.frame.disk(origin, palette::SUN);

    if view.orbits.object {
        painter.orbit(
            scene.curves.object_curve(),
            palette::OBJECT_ORBIT_UPPER,
            palette::OBJECT_ORBIT_LOWER,
        );
    }
    let object_label = view
        .labels
        .object_name
        .then_some((scene.object_name, palette::OBJECT_NAME, TextRole::ObjectName));
    painter.body(&scene.positions.object, palette::OBJECT, object_label);

    for &planet in Planet::ALL.iter().rev() {
        if !planet_drawn_at(planet, view.zoom) {
            continue;
        }
        if view.orbits.planets[planet.index()] {
            let lower = if planet == Planet::Earth {
                palette::PLANET_ORBIT_UPPER
            } else {
                palette::PLANET_ORBIT_LOWER
            };
            painter.orbit(
                scene.curves.planet_curve(planet),
                palette::PLANET_ORBIT_UPPER,
                lower,
            );
        }
        let planet_label = view
            .labels
            .planet_names
            .then_some((planet.name(), palette::PLANET_NAME, TextRole::PlanetName));
        painter.body(scene.positions.planet(planet), palette::PLANET, planet_label);
    }

    frame.readout(Anchor::TopLeft, 0, scene.object_name.to_string());

    if view.labels.distance {
        let object = &scene.positions.object;
        let earth = scene.positions.planet(Planet::Earth);
        let earth_distance = display_distance((object - earth).norm());
        let sun_distance = display_distance(object.norm());
        frame.readout(
            Anchor::BottomLeft,
            1,
            format!("Earth Distance: {earth_distance:.3} AU"),
        );
        frame.readout(
            Anchor::BottomLeft,
            0,
            format!("Sun Distance  : {sun_distance:.3} AU"),
        );
    }

    if view.labels.date {
        frame.readout(Anchor::BottomRight, 0, scene.epoch.to_calendar().to_string());
    }

    frame
}
