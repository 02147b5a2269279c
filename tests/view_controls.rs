use std::sync::Arc;

use orbitview::constants::TROPICAL_YEAR;
use orbitview::planets::Planet;
use orbitview::projection::{CanvasSize, Projection, ScenePositions};
use orbitview::render::palette;
use orbitview::time::Epoch;
use orbitview::view_state::{CenterObject, OrbitVisibility, ViewState};

mod common;
use common::{assert_point_close, halley_params, viewer};

#[test]
fn test_every_center_object_lands_on_canvas_center() {
    let viewer = viewer(&halley_params());
    let canvas = CanvasSize::new(640, 480);
    let snapshot = viewer.curve_cache().snapshot();
    let positions =
        ScenePositions::compute(viewer.orbit(), &viewer.epoch(), snapshot.frame()).unwrap();

    for index in 0..CenterObject::COUNT {
        let views = [(15.0, 50.0, 67.0), (123.0, 271.0, 12.0), (359.0, 0.0, 450.0)];
        for (rot_h, rot_v, zoom) in views {
            let mut view = ViewState::default();
            view.set_rotation(rot_h, rot_v);
            view.set_zoom(zoom);
            view.set_center(CenterObject::from_index(index).unwrap());

            let projection = Projection::new(&view, canvas);
            let origin = projection.choose_origin(&view, &positions);
            let point = projection.screen_point(&positions.center_position(view.center), &origin);
            assert_point_close(&point, &canvas.center(), 1e-9);
        }
    }
}

#[test]
fn test_orbit_menu_changes_frame() {
    let viewer = viewer(&halley_params());
    let canvas = CanvasSize::new(600, 600);
    let mut view = viewer.initial_view();

    view.select_orbit_menu(2);
    assert_eq!(view.orbits, OrbitVisibility::none());
    let frame = viewer.render(&view, canvas).unwrap();
    assert_eq!(frame.lines().count(), 4);

    // Toggle Earth only.
    view.select_orbit_menu(7);
    let frame = viewer.render(&view, canvas).unwrap();
    assert_eq!(frame.lines().count(), 4 + 48);
    assert!(frame
        .lines()
        .skip(4)
        .all(|(_, _, color)| color == palette::PLANET_ORBIT_UPPER));

    view.select_orbit_menu(0);
    let frame = viewer.render(&view, canvas).unwrap();
    // Object plus Mercury..Jupiter
    assert_eq!(frame.lines().count(), 4 + 120 + 5 * 48);
}

#[test]
fn test_camera_changes_keep_cached_curves() {
    let viewer = viewer(&halley_params());
    let before = viewer.curve_cache().snapshot();

    let mut view = viewer.initial_view();
    for zoom in [5.0, 100.0, 450.0] {
        view.set_zoom(zoom);
        view.set_rotation(view.rot_h + 40.0, view.rot_v - 75.0);
        view.set_center(CenterObject::Planet(Planet::Saturn));
        viewer.render(&view, CanvasSize::new(300, 200)).unwrap();
    }
    assert!(Arc::ptr_eq(&before, &viewer.curve_cache().snapshot()));
}

#[test]
fn test_long_jump_rebuilds_curves_for_new_epoch() {
    let viewer = viewer(&halley_params());
    let before = viewer.curve_cache().snapshot();

    let target = Epoch::from_jd(viewer.epoch().jd() + 75.0 * TROPICAL_YEAR);
    viewer.set_date(target);
    viewer
        .render(&viewer.initial_view(), CanvasSize::new(600, 600))
        .unwrap();

    let after = viewer.curve_cache().snapshot();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(after.epoch(), &target);
    assert_eq!(after.frame().epoch(), &target);
    assert_eq!(after.object_curve().epoch(), &target);
    assert_eq!(after.planet_curve(Planet::Neptune).epoch(), &target);
}
