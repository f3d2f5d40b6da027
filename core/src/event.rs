//! Wheel events, returned from every engine tick in emission order.
//!
//! RULE: `SpinCompleted` is emitted exactly once per accepted spin.
//! Collaborators react to events; they never poke engine state.

use crate::{
    config::SpinPolicy,
    types::{Millis, SpinId, Tick},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WheelEvent {
    SpinStarted {
        tick: Tick,
        spin_id: SpinId,
        policy: SpinPolicy,
        initial_velocity: f64,
        /// Aimed policy only.
        target_label: Option<String>,
        target_angle: Option<f64>,
        final_angular_distance: Option<f64>,
    },
    SpinRejected {
        tick: Tick,
    },
    FrictionEngaged {
        tick: Tick,
        spin_id: SpinId,
        elapsed_ms: Millis,
    },
    SpinCompleted {
        tick: Tick,
        outcome: SpinOutcome,
    },
}

impl WheelEvent {
    /// Stable name, used in logs and by the runner's output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SpinStarted { .. }     => "spin_started",
            Self::SpinRejected { .. }    => "spin_rejected",
            Self::FrictionEngaged { .. } => "friction_engaged",
            Self::SpinCompleted { .. }   => "spin_completed",
        }
    }
}

/// Completion payload: what the renderer shows once the wheel stops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpinOutcome {
    pub spin_id:        SpinId,
    pub sector_index:   usize,
    pub label:          String,
    pub final_angle:    f64,
    pub pointer_angle:  f64,
    /// Sector the spin was aimed at, when aimed.
    pub intended_index: Option<usize>,
    pub ticks:          u64,
    pub elapsed_ms:     Millis,
    pub celebrate:      bool,
}

impl SpinOutcome {
    /// False only when an aimed spin resolved somewhere else.
    pub fn matches_intent(&self) -> bool {
        self.intended_index.map_or(true, |i| i == self.sector_index)
    }
}
