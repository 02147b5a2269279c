//! # orbitview
//!
//! Interactive 3-D view of a comet or asteroid orbit among the nine planets.
//!
//! The crate computes heliocentric positions of the tracked body (elliptic,
//! parabolic or hyperbolic orbit) and of the planets, rotates them into the
//! ecliptic of date, projects them onto a canvas with a weak perspective and
//! returns a display list of primitives the host paints. A tokio task animates the
//! shared epoch forward or backward by a fixed time step.
//!
//! Main entry points:
//!
//! * [`orbit_viewer::OrbitViewer`] – host façade: construction from parameters,
//!   date entry and rendering.
//! * [`player::AnimationDriver`] – play, step and stop over the shared
//!   [`player::EpochClock`].
//! * [`orbit_type::BodyParameters`] – raw host parameters and their resolution into
//!   [`orbit_type::CometaryElements`].
pub mod constants;
pub mod kepler;
pub mod orbit_curve;
pub mod orbit_type;
pub mod orbit_viewer;
pub mod orbitview_errors;
pub mod planets;
pub mod player;
pub mod projection;
pub mod ref_system;
pub mod render;
pub mod small_body;
pub mod time;
pub mod view_state;
