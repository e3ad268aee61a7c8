use std::f64::consts::PI;

use approx::assert_relative_eq;
use nalgebra::Point2;
use planet_sim::export::ExportFormat;
use planet_sim::file::read_file;
use planet_sim::model::stepper::{frames_per_orbit, orbital_speed};
use planet_sim::model::{Color, OrbitParams, Orrery, Planet, SummaryRecord};
use planet_sim::session::{self, ExportTarget, StopFlag};

#[test]
fn test_shipped_config() {
    let config = read_file("config.json").unwrap();
    let names: Vec<_> = config.planets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Mercury", "Venus", "Earth", "Mars"]);
    assert_eq!(config.center(), Point2::new(640.0, 360.0));
}

/// One Earth year of frames, plus the frame that counts the lap.
/// - Mercury and Venus have lapped several times by then
/// - Earth has just completed its first orbit
/// - Mars is about halfway around
#[test]
fn test_one_earth_year() {
    let config = read_file("config.json").unwrap();
    let earth = config.planet("Earth").unwrap();
    let frames = frames_per_orbit(&earth.params).unwrap() + 1;

    let mut orrery = Orrery::from_config(&config);
    for _ in 0..frames {
        orrery.advance();
    }

    let records = orrery.finalize().unwrap();
    assert_eq!(records.len(), config.planets.len());

    for (record, planet) in records.iter().zip(config.planets.iter()) {
        assert_eq!(record.name, planet.name);

        // Laps are counted on the frame after the angle passes 2pi
        let lap = frames_per_orbit(&planet.params).unwrap();
        assert_eq!(record.orbit_count, (frames - 1) / lap, "{}", planet.name);

        // Speed never changes, so its mean is just the speed
        assert_relative_eq!(
            record.mean_velocity,
            orbital_speed(&planet.params, config.fps as f64),
            max_relative = 1e-12
        );

        let a = planet.params.semi_major_axis;
        let b = planet.params.semi_minor_axis;
        assert!(b <= record.mean_distance && record.mean_distance <= a);
    }

    let counts: Vec<_> = records.iter().map(|r| r.orbit_count).collect();
    assert_eq!(counts[2], 1);
    assert_eq!(counts[3], 0);
    assert!(counts[0] > counts[1] && counts[1] >= 1);
}

/// a = 100, b = 50, starting at angle 0, half a turn per frame. The planet
/// is drawn at 0, then pi. The third frame catches the angle sitting on 2pi,
/// resets it and counts the lap.
#[test]
fn test_half_turn_scenario() {
    let params = OrbitParams {
        semi_major_axis: 100.0,
        semi_minor_axis: 50.0,
        radius: 10.0,
        distance_scale: 2.0,
        angular_speed: PI,
        color: Color(255, 0, 0),
    };
    let center = Point2::new(200.0, 100.0);
    let mut orrery = Orrery::new(vec![Planet::new("Half", params, 0.0)], center, 60.0);

    let expected_x = [300.0, 100.0, 300.0, 100.0];
    let expected_counts = [0, 0, 1, 1];
    for (x, count) in expected_x.iter().zip(expected_counts) {
        let out = orrery.advance();
        assert_relative_eq!(out[0].position.x, *x, epsilon = 1e-9);
        assert_relative_eq!(out[0].position.y, 100.0, epsilon = 1e-9);
        assert_relative_eq!(out[0].distance, 100.0, epsilon = 1e-9);
        assert_eq!(orrery.orbit_count("Half"), count);
    }

    let records = orrery.finalize().unwrap();
    assert_eq!(records[0].orbit_count, 1);
    assert_relative_eq!(records[0].mean_distance, 100.0, epsilon = 1e-9);
    assert_relative_eq!(records[0].mean_velocity, 5.0 * PI * 60.0, max_relative = 1e-12);
}

#[test]
fn test_headless_session_writes_summary() {
    let config = read_file("config.json").unwrap();
    let path = std::env::temp_dir().join(format!("planet-sim-it-{}.json", std::process::id()));
    let target = ExportTarget::new(ExportFormat::Json, Some(path.clone()));

    let frames = session::headless(120, StopFlag::new());
    let report = session::run(Orrery::from_config(&config), &target, frames).unwrap();
    assert_eq!(report.frames, 120);

    let written: Vec<SummaryRecord> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written, report.records);
    std::fs::remove_file(&path).unwrap();
}
