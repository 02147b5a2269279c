//! # View state
//!
//! Camera and display toggles chosen by the host: two rotation angles, the zoom,
//! the body kept at the canvas centre, which orbits are drawn and which labels are
//! shown. A [`ViewState`] is a plain value; changing it never invalidates the
//! cached orbit curves.
use serde::Deserialize;

use crate::constants::Degree;
use crate::planets::Planet;

/// Smallest zoom offered by the host slider.
pub const MIN_ZOOM: f64 = 5.0;

/// Largest zoom offered by the host slider.
pub const MAX_ZOOM: f64 = 450.0;

/// Body kept at the canvas centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum CenterObject {
    #[default]
    Sun,
    /// The tracked comet or asteroid
    Object,
    Planet(Planet),
}

impl CenterObject {
    /// Number of entries of the host selector.
    pub const COUNT: usize = 11;

    /// Entry of the host selector: Sun, object, then Mercury..Pluto.
    pub fn from_index(index: usize) -> Option<CenterObject> {
        match index {
            0 => Some(CenterObject::Sun),
            1 => Some(CenterObject::Object),
            i => Planet::ALL.get(i - 2).copied().map(CenterObject::Planet),
        }
    }

    pub fn index(self) -> usize {
        match self {
            CenterObject::Sun => 0,
            CenterObject::Object => 1,
            CenterObject::Planet(planet) => planet.index() + 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CenterObject::Sun => "Sun",
            CenterObject::Object => "Asteroid/Comet",
            CenterObject::Planet(planet) => planet.name(),
        }
    }
}

/// A body whose orbit can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum OrbitBody {
    Object,
    Planet(Planet),
}

/// Entry of the host orbit menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitMenuItem {
    Default,
    All,
    None,
    Separator,
    Toggle(OrbitBody),
}

impl OrbitMenuItem {
    /// Number of entries of the host menu.
    pub const COUNT: usize = 14;

    /// Menu entry at `index`: the three presets, a separator, then the object and
    /// Mercury..Pluto.
    pub fn from_index(index: usize) -> Option<OrbitMenuItem> {
        match index {
            0 => Some(OrbitMenuItem::Default),
            1 => Some(OrbitMenuItem::All),
            2 => Some(OrbitMenuItem::None),
            3 => Some(OrbitMenuItem::Separator),
            4 => Some(OrbitMenuItem::Toggle(OrbitBody::Object)),
            i => Planet::ALL
                .get(i - 5)
                .copied()
                .map(|planet| OrbitMenuItem::Toggle(OrbitBody::Planet(planet))),
        }
    }
}

/// Per-body orbit visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrbitVisibility {
    pub object: bool,
    /// Indexed like [`Planet::ALL`]
    pub planets: [bool; 9],
}

impl Default for OrbitVisibility {
    /// The object and Mercury..Jupiter.
    fn default() -> Self {
        let mut planets = [false; 9];
        for planet in &mut planets[..=Planet::Jupiter.index()] {
            *planet = true;
        }
        OrbitVisibility {
            object: true,
            planets,
        }
    }
}

impl OrbitVisibility {
    pub fn all() -> Self {
        OrbitVisibility {
            object: true,
            planets: [true; 9],
        }
    }

    pub fn none() -> Self {
        OrbitVisibility {
            object: false,
            planets: [false; 9],
        }
    }

    pub fn is_visible(&self, body: OrbitBody) -> bool {
        match body {
            OrbitBody::Object => self.object,
            OrbitBody::Planet(planet) => self.planets[planet.index()],
        }
    }

    pub fn set(&mut self, body: OrbitBody, visible: bool) {
        match body {
            OrbitBody::Object => self.object = visible,
            OrbitBody::Planet(planet) => self.planets[planet.index()] = visible,
        }
    }

    pub fn toggle(&mut self, body: OrbitBody) {
        let visible = self.is_visible(body);
        self.set(body, !visible);
    }

    /// Apply a menu selection. The separator leaves the flags untouched.
    pub fn apply(&mut self, item: OrbitMenuItem) {
        match item {
            OrbitMenuItem::Default => *self = OrbitVisibility::default(),
            OrbitMenuItem::All => *self = OrbitVisibility::all(),
            OrbitMenuItem::None => *self = OrbitVisibility::none(),
            OrbitMenuItem::Separator => {}
            OrbitMenuItem::Toggle(body) => self.toggle(body),
        }
    }
}

/// Text overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LabelVisibility {
    pub planet_names: bool,
    pub object_name: bool,
    pub distance: bool,
    pub date: bool,
}

impl Default for LabelVisibility {
    fn default() -> Self {
        LabelVisibility {
            planet_names: true,
            object_name: true,
            distance: true,
            date: true,
        }
    }
}

/// Camera parameters and display toggles.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Horizontal rotation about the ecliptic pole (degrees, [0, 360))
    pub rot_h: Degree,
    /// Vertical tilt about the X axis (degrees, [0, 360))
    pub rot_v: Degree,
    pub zoom: f64,
    pub center: CenterObject,
    pub orbits: OrbitVisibility,
    pub labels: LabelVisibility,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            rot_h: 15.0,
            rot_v: 50.0,
            zoom: 67.0,
            center: CenterObject::default(),
            orbits: OrbitVisibility::default(),
            labels: LabelVisibility::default(),
        }
    }
}

impl ViewState {
    /// Set both angles, wrapped into [0, 360).
    pub fn set_rotation(&mut self, rot_h: Degree, rot_v: Degree) {
        self.rot_h = rot_h.rem_euclid(360.0);
        self.rot_v = rot_v.rem_euclid(360.0);
    }

    /// Set the zoom, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn set_center(&mut self, center: CenterObject) {
        self.center = center;
    }

    /// Apply the host orbit-menu entry at `index`; unknown indices are ignored.
    pub fn select_orbit_menu(&mut self, index: usize) {
        if let Some(item) = OrbitMenuItem::from_index(index) {
            self.orbits.apply(item);
        }
    }
}
