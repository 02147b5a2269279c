use approx::{assert_abs_diff_eq, assert_relative_eq};

use orbitview::kepler::OrbitKind;
use orbitview::orbit_viewer::DateEntryOutcome;
use orbitview::projection::CanvasSize;
use orbitview::render::Anchor;
use orbitview::time::{Direction, Epoch, TimeStep};

mod common;
use common::{ceres_params, halley_params, viewer};

#[test]
fn test_halley_at_perihelion() {
    let viewer = viewer(&halley_params());
    let elements = viewer.orbit().elements();
    assert_eq!(elements.kind, OrbitKind::Elliptic);

    let perihelion = Epoch::from_jd(elements.perihelion_time);
    assert_eq!(perihelion.to_calendar().day_of_month(), 9);

    let state = viewer.orbit().state_at(&perihelion).unwrap();
    assert_abs_diff_eq!(state.radius, 0.587096, epsilon = 1e-9);
    assert_abs_diff_eq!(state.true_anomaly, 0.0, epsilon = 1e-9);
}

#[test]
fn test_halley_period() {
    let viewer = viewer(&halley_params());
    let years = viewer.orbit().elements().period().unwrap() / 365.25;
    assert_relative_eq!(years, 76.0, max_relative = 0.01);
}

#[test]
fn test_halley_frame_readouts() {
    let viewer = viewer(&halley_params());
    viewer.end_date_entry(DateEntryOutcome::Confirmed(Epoch::from_calendar(1986, 2, 9.0)));

    let frame = viewer
        .render(&viewer.initial_view(), CanvasSize::new(800, 600))
        .unwrap();
    let readouts: Vec<(Anchor, u8, &str)> = frame.readouts().collect();
    assert!(readouts.contains(&(Anchor::TopLeft, 0, "1P/Halley")));
    assert!(readouts.contains(&(Anchor::BottomLeft, 0, "Sun Distance  : 0.587 AU")));
    assert!(readouts.contains(&(Anchor::BottomRight, 0, "Feb 9, 1986")));
}

#[test]
fn test_eight_one_day_steps_equal_one_eight_day_step() {
    let stepped = viewer(&halley_params());
    let driver = stepped.animation_driver();
    for _ in 0..8 {
        driver.step(Direction::Forward);
    }

    let jumped = viewer(&halley_params());
    let target = jumped
        .epoch()
        .apply_delta(&orbitview::time::TimeDelta::days(8), Direction::Forward);
    jumped.set_date(target);

    assert_abs_diff_eq!(stepped.epoch().jd(), jumped.epoch().jd(), epsilon = 1e-9);
    assert_eq!(stepped.epoch().to_calendar().to_string(), "Jan 9, 1986");
}

#[test]
fn test_monthly_steps_follow_calendar() {
    let viewer = viewer(&halley_params());
    let driver = viewer.animation_driver();
    assert_eq!(driver.time_step(), TimeStep::OneDay);

    let epoch = viewer
        .epoch()
        .apply_delta(&TimeStep::ThreeMonths.delta(), Direction::Backward);
    assert_eq!(epoch.to_calendar().to_string(), "Oct 1, 1985");
}

#[test]
fn test_ceres_from_mean_anomaly() {
    let viewer = viewer(&ceres_params());
    let elements = viewer.orbit().elements();
    assert_eq!(elements.kind, OrbitKind::Elliptic);
    assert_relative_eq!(
        elements.perihelion_distance,
        2.7691 * (1.0 - 0.0769),
        max_relative = 1e-12
    );

    let state = viewer.orbit().state_at(&viewer.epoch()).unwrap();
    assert!(state.radius > 2.55 && state.radius < 2.99);
}
