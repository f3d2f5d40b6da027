use prizewheel_core::{
    config::{SectorConfig, WheelConfig},
    error::WheelError,
    layout::{build_layout, ArcMode, WheelLayout},
    resolver::{pointer_angle, resolve, sector_at, try_sector_at},
    types::TAU,
};

fn layouts() -> Vec<WheelLayout> {
    vec![
        WheelConfig::default_test().layout().unwrap(),
        WheelConfig::classic().layout().unwrap(),
        WheelConfig::interleaved().layout().unwrap(),
        build_layout(
            &[
                SectorConfig::new("tiny", 0.001, "#000", "#FFF"),
                SectorConfig::new("huge", 999.0, "#000", "#FFF"),
                SectorConfig::new("mid", 3.3, "#000", "#FFF"),
            ],
            ArcMode::Weighted,
        )
        .unwrap(),
    ]
}

#[test]
fn every_angle_belongs_to_exactly_one_sector() {
    const STEPS: usize = 20_000;

    for layout in layouts() {
        for step in 0..STEPS {
            let angle = TAU * step as f64 / STEPS as f64;
            let hits = layout.sectors().iter().filter(|s| s.contains(angle)).count();
            assert_eq!(hits, 1, "angle {angle} covered by {hits} sectors");
            assert!(try_sector_at(&layout, angle).is_ok());
        }
    }
}

#[test]
fn start_angle_is_closed_end_angle_is_open() {
    for layout in layouts() {
        let sectors = layout.sectors();
        for (i, sector) in sectors.iter().enumerate() {
            assert_eq!(sector_at(&layout, sector.start_angle).index, i);

            let expected_next = if i + 1 == sectors.len() { 0 } else { i + 1 };
            assert_eq!(
                sector_at(&layout, sector.end_angle).index,
                expected_next,
                "end of sector {i} should resolve to {expected_next}"
            );
        }
    }
}

#[test]
fn full_turn_wraps_to_first_sector() {
    let layout = WheelConfig::default_test().layout().unwrap();
    assert_eq!(sector_at(&layout, TAU).index, 0);
    assert_eq!(sector_at(&layout, 3.0 * TAU + 0.01).index, 0);
}

#[test]
fn pointer_reads_against_wheel_rotation() {
    let layout = WheelConfig::classic().layout().unwrap();

    // At rest the pointer sits on the start of sector 0.
    assert_eq!(resolve(&layout, 0.0).index, 0);
    // Turning a hair clockwise brings the end of the last sector under it.
    assert_eq!(resolve(&layout, 0.01).index, 7);
    // Turning by one and a half sectors exposes the middle of sector 6.
    let arc = TAU / 8.0;
    assert_eq!(resolve(&layout, 1.5 * arc).index, 6);

    assert!((pointer_angle(1.5 * arc) - 6.5 * arc).abs() < 1e-12);
}

#[test]
fn uncovered_angle_reports_mismatch_and_falls_back() {
    let layout = WheelConfig::default_test().layout().unwrap();

    let err = try_sector_at(&layout, f64::NAN).unwrap_err();
    assert!(matches!(err, WheelError::GeometryMismatch { .. }));

    assert_eq!(sector_at(&layout, f64::NAN).index, 0);
    assert_eq!(resolve(&layout, f64::INFINITY).index, 0);
}
