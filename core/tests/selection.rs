use prizewheel_core::{
    config::WheelConfig,
    layout::{build_layout, ArcMode},
    rng::{RngBank, RngSlot, ScriptedSource},
    selector::{index_for_threshold, select_sector},
};
use std::collections::HashMap;

#[test]
fn midpoint_draw_selects_dominant_sector() {
    let layout = WheelConfig::default_test().layout().unwrap();
    let mut random = ScriptedSource::constant(0.5);

    // cumulative 92 >= 50
    assert_eq!(select_sector(&layout, &mut random).label, "Perdu");
}

#[test]
fn high_draw_selects_sector_whose_cumulative_weight_reaches_it() {
    let layout = WheelConfig::default_test().layout().unwrap();

    // 92 < 95 <= 98: the sector closing at cumulative 98 wins.
    let mut random = ScriptedSource::constant(0.95);
    assert_eq!(select_sector(&layout, &mut random).label, "Soda");

    // 98 < 99 <= 100
    let mut random = ScriptedSource::constant(0.99);
    assert_eq!(select_sector(&layout, &mut random).label, "Choco");
}

#[test]
fn threshold_walk_uses_first_sector_reaching_it() {
    let layout = WheelConfig::default_test().layout().unwrap();

    assert_eq!(index_for_threshold(&layout, 0.0), 0);
    assert_eq!(index_for_threshold(&layout, 92.0), 0);
    assert_eq!(index_for_threshold(&layout, 92.000_001), 1);
    assert_eq!(index_for_threshold(&layout, 98.0), 1);
    assert_eq!(index_for_threshold(&layout, 99.5), 2);
}

#[test]
fn drift_past_total_falls_back_to_last_sector() {
    let layout = WheelConfig::default_test().layout().unwrap();
    assert_eq!(index_for_threshold(&layout, 100.000_000_1), 2);
}

#[test]
fn observed_frequencies_track_weights() {
    const TRIALS: usize = 100_000;

    let layout = WheelConfig::default_test().layout().unwrap();
    let mut rng = RngBank::new(0xC0FFEE).for_slot(RngSlot::Spin);

    let mut counts: HashMap<String, usize> = HashMap::new();
    for _ in 0..TRIALS {
        let sector = select_sector(&layout, &mut rng);
        *counts.entry(sector.label.clone()).or_default() += 1;
    }

    for (label, expected) in [("Perdu", 0.92), ("Soda", 0.06), ("Choco", 0.02)] {
        let observed = counts.get(label).copied().unwrap_or(0) as f64 / TRIALS as f64;
        assert!(
            (observed - expected).abs() < 0.01,
            "{label}: observed {observed:.4}, expected {expected:.2}"
        );
    }
}

#[test]
fn uniform_arcs_still_draw_by_weight() {
    let mut config = WheelConfig::default_test();
    config.arc_mode = ArcMode::Uniform;
    let layout = config.layout().unwrap();
    let mut rng = RngBank::new(17).for_slot(RngSlot::Spin);

    let trials = 50_000;
    let soda = (0..trials)
        .filter(|_| select_sector(&layout, &mut rng).label == "Soda")
        .count();
    let observed = soda as f64 / trials as f64;
    assert!((observed - 0.06).abs() < 0.01, "Soda drawn {observed:.4} of the time");
}

#[test]
fn duplicate_labels_are_distinct_sectors() {
    let layout = build_layout(&WheelConfig::classic().sectors, ArcMode::Uniform).unwrap();
    let mut random = ScriptedSource::new(vec![0.40, 0.55, 0.70]);

    let picked: Vec<usize> = (0..3).map(|_| select_sector(&layout, &mut random).index).collect();
    assert_eq!(picked, vec![3, 4, 5]);
    assert!(picked.iter().all(|&i| layout.sectors()[i].label == "Perdu"));
}
