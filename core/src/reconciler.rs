//! Angle reconciliation: turn a drawn sector into a stop angle and the
//! total travel needed to get there from the current rotation.
//!
//! INVARIANT: `resolve(current_angle + final_angular_distance)` is the
//! drawn sector. Rotation counts are whole turns so they never move
//! the landing point.

use crate::{
    config::ReconcileConfig,
    layout::Sector,
    resolver::wheel_angle_for,
    rng::UniformSource,
    types::{SpinId, TAU},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AimedTarget {
    /// Layout angle that will sit under the pointer.
    pub pointer_offset:         f64,
    /// Wheel rotation, in `[0, 2π)`, at which the wheel comes to rest.
    pub target_angle:           f64,
    /// Travel past the full turns, always `>= min_delta`.
    pub delta:                  f64,
    pub rotation_count:         u32,
    pub final_angular_distance: f64,
}

/// The draw for one aimed spin, produced when the spin is requested.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutcomeDraw {
    pub spin_id:      SpinId,
    pub sector_index: usize,
    pub label:        String,
    pub target:       AimedTarget,
}

/// Pick a landing point inside `sector` and the travel that reaches it.
pub fn reconcile(
    sector: &Sector,
    current_angle: f64,
    config: &ReconcileConfig,
    random: &mut dyn UniformSource,
) -> AimedTarget {
    let width = sector.arc_width();
    let margin = config.edge_margin;
    let pointer_offset =
        sector.start_angle + width * (margin + random.next_f64() * (1.0 - 2.0 * margin));

    let target_angle = wheel_angle_for(pointer_offset);
    let mut delta = (target_angle - current_angle).rem_euclid(TAU);
    if delta < config.min_delta {
        delta += TAU;
    }

    let rotation_count = random.next_in_range(config.min_rotations, config.max_rotations);
    let final_angular_distance = rotation_count as f64 * TAU + delta;

    AimedTarget {
        pointer_offset,
        target_angle,
        delta,
        rotation_count,
        final_angular_distance,
    }
}
