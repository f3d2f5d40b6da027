//! Per-frame view of the wheel for the render collaborator.

use crate::types::Tick;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSnapshot {
    pub tick:                 Tick,
    pub current_angle:        f64,
    /// Rotation to apply to a canvas drawn with sector 0 starting at 3 o'clock.
    pub css_rotation:         f64,
    pub angular_velocity:     f64,
    pub is_spinning:          bool,
    pub pointer_sector_index: usize,
    pub pointer_label:        String,
}
