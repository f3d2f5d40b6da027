//! Result resolution: which sector sits under the pointer.
//!
//! The pointer is fixed at the top and the wheel turns clockwise, so a
//! wheel rotation of `a` puts the layout angle `2π - a` under the pointer.

use crate::{
    error::{WheelError, WheelResult},
    layout::{Sector, WheelLayout},
    types::TAU,
};

/// Layout angle under the pointer for a given wheel rotation.
pub fn pointer_angle(wheel_angle: f64) -> f64 {
    (TAU - wheel_angle.rem_euclid(TAU)).rem_euclid(TAU)
}

/// Wheel rotation that places `layout_angle` under the pointer.
/// Inverse of [`pointer_angle`].
pub fn wheel_angle_for(layout_angle: f64) -> f64 {
    (TAU - layout_angle.rem_euclid(TAU)).rem_euclid(TAU)
}

/// Sector containing `angle` (normalised into `[0, 2π)`), or
/// `GeometryMismatch` when the layout leaves it uncovered.
pub fn try_sector_at(layout: &WheelLayout, angle: f64) -> WheelResult<&Sector> {
    let normalized = angle.rem_euclid(TAU);
    layout
        .sectors()
        .iter()
        .find(|s| s.contains(normalized))
        .ok_or(WheelError::GeometryMismatch { angle })
}

/// Like [`try_sector_at`] but never fails: a miss is a tiling defect,
/// logged, and answered with the first sector.
pub fn sector_at(layout: &WheelLayout, angle: f64) -> &Sector {
    match try_sector_at(layout, angle) {
        Ok(sector) => sector,
        Err(e) => {
            log::error!("resolver defect: {e}; falling back to first sector");
            &layout.sectors()[0]
        }
    }
}

/// Sector under the pointer for a wheel rotation.
pub fn resolve(layout: &WheelLayout, wheel_angle: f64) -> &Sector {
    sector_at(layout, pointer_angle(wheel_angle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_angle_inverts_rotation() {
        assert_eq!(pointer_angle(0.0), 0.0);
        assert!((pointer_angle(1.0) - (TAU - 1.0)).abs() < 1e-12);
        assert!((pointer_angle(TAU + 1.0) - (TAU - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn wheel_angle_round_trips_through_pointer() {
        for i in 1..100 {
            let a = TAU * i as f64 / 100.0;
            assert!((pointer_angle(wheel_angle_for(a)) - a).abs() < 1e-9);
        }
    }
}
