use approx::assert_abs_diff_eq;
use orbitview::constants::Position;
use orbitview::orbit_type::BodyParameters;
use orbitview::orbit_viewer::{OrbitViewer, ViewerConfig};
use orbitview::projection::ScreenPoint;

/// 1P/Halley, perihelion based, equinox B1950.
pub fn halley_params() -> BodyParameters {
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

/// 1 Ceres, epoch based, equinox J2000.
pub fn ceres_params() -> BodyParameters {
    BodyParameters {
        name: Some("1 Ceres".into()),
        epoch: Some("20200531.0".into()),
        mean_anomaly: Some("162.6865".into()),
        eccentricity: Some("0.0769".into()),
        semi_major_axis: Some("2.7691".into()),
        periapsis_argument: Some("73.5977".into()),
        ascending_node_longitude: Some("80.3055".into()),
        inclination: Some("10.5935".into()),
        equinox: Some("2000.0".into()),
        date: Some("20200601".into()),
        ..Default::default()
    }
}

pub fn viewer(params: &BodyParameters) -> OrbitViewer {
    OrbitViewer::new(params, ViewerConfig::default()).unwrap()
}

pub fn assert_point_close(actual: &ScreenPoint, expected: &ScreenPoint, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = epsilon);
}

pub fn assert_position_close(actual: &Position, expected: &Position, epsilon: f64) {
    assert_abs_diff_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_abs_diff_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_abs_diff_eq!(actual.z, expected.z, epsilon = epsilon);
}
